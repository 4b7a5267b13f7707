//! GitHub webhook payload parser.
//!
//! This module parses raw webhook JSON payloads into typed [`CommentEvent`] values.
//! The parser tolerates unknown fields and unknown event types.
//!
//! # Parsing Strategy
//!
//! 1. The event type is determined from the `X-GitHub-Event` header
//! 2. `issue_comment` payloads are decoded into a [`CommentEvent`]
//! 3. Other event types return `Ok(None)` (ignored, not error)
//! 4. Malformed payloads return `Err` with details

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::types::{CommentId, IssueNumber, PermissionLevel, RepoId};

use super::events::{CommentAction, CommentEvent};

/// Error type for webhook parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Field has invalid value (e.g., malformed repository name).
    #[error("invalid field value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Parses a webhook payload into a comment event.
///
/// # Arguments
///
/// * `event_type` - The value of the `X-GitHub-Event` header
/// * `payload` - The raw JSON payload bytes
///
/// # Returns
///
/// * `Ok(Some(event))` - An `issue_comment` delivery
/// * `Ok(None)` - Any other event type (ignored, not an error)
/// * `Err(e)` - Malformed payload or missing required fields
///
/// # Examples
///
/// ```
/// use comment_dispatch::webhooks::parse_webhook;
///
/// let payload = br#"{
///     "action": "created",
///     "comment": { "id": 123, "body": "/assignme" },
///     "issue": { "number": 42 },
///     "repository": { "full_name": "octocat/hello-world" },
///     "sender": { "login": "octocat", "permission": "read" }
/// }"#;
///
/// let event = parse_webhook("issue_comment", payload).unwrap().unwrap();
/// assert_eq!(event.actor, "octocat");
///
/// assert!(parse_webhook("ping", b"{}").unwrap().is_none());
/// ```
pub fn parse_webhook(event_type: &str, payload: &[u8]) -> Result<Option<CommentEvent>, ParseError> {
    match event_type {
        "issue_comment" => parse_issue_comment(payload).map(Some),
        // Unknown event types are ignored (not an error)
        _ => Ok(None),
    }
}

// ============================================================================
// Raw payload structures for deserialization
//
// These match GitHub's webhook JSON structure. Only the fields the bot reads
// are declared; serde ignores the rest.
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawIssueCommentPayload {
    action: String,
    comment: RawComment,
    issue: RawIssue,
    repository: RawRepository,
    sender: RawSender,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    id: u64,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct RawSender {
    login: String,
    permission: Option<String>,
    #[serde(rename = "type")]
    account_type: Option<String>,
}

fn parse_issue_comment(payload: &[u8]) -> Result<CommentEvent, ParseError> {
    let raw: RawIssueCommentPayload = serde_json::from_slice(payload)?;

    let action = match raw.action.as_str() {
        "created" => CommentAction::Created,
        "edited" => CommentAction::Edited,
        "deleted" => CommentAction::Deleted,
        other => {
            debug!(action = other, "Unrecognised issue_comment action");
            CommentAction::Other
        }
    };

    let repo =
        RepoId::parse_full_name(&raw.repository.full_name).map_err(|e| ParseError::InvalidField {
            field: "repository.full_name",
            value: e.0,
        })?;

    // An unrecognised level is treated as absent so the API is asked instead.
    let actor_permission = raw.sender.permission.and_then(|p| match p.parse::<PermissionLevel>() {
        Ok(level) => Some(level),
        Err(e) => {
            debug!(error = %e, "Ignoring sender.permission");
            None
        }
    });

    Ok(CommentEvent {
        repo,
        action,
        issue: IssueNumber(raw.issue.number),
        comment_id: CommentId(raw.comment.id),
        body: raw.comment.body.unwrap_or_default(),
        actor: raw.sender.login,
        actor_permission,
        actor_is_bot: raw.sender.account_type.as_deref() == Some("Bot"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_issue_comment_created() {
        let payload = r#"{
            "action": "created",
            "comment": {
                "id": 12345,
                "body": "/assignme",
                "user": { "id": 100, "login": "octocat" }
            },
            "issue": {
                "number": 42,
                "title": "Fix the thing"
            },
            "repository": {
                "full_name": "myorg/myrepo",
                "owner": { "login": "myorg" },
                "name": "myrepo"
            },
            "sender": { "login": "octocat", "type": "User", "permission": "write" }
        }"#;

        let event = parse_webhook("issue_comment", payload.as_bytes())
            .unwrap()
            .expect("should parse");

        assert_eq!(event.repo, RepoId::new("myorg", "myrepo"));
        assert_eq!(event.action, CommentAction::Created);
        assert_eq!(event.issue, IssueNumber(42));
        assert_eq!(event.comment_id, CommentId(12345));
        assert_eq!(event.body, "/assignme");
        assert_eq!(event.actor, "octocat");
        assert_eq!(event.actor_permission, Some(PermissionLevel::Write));
        assert!(!event.actor_is_bot);
    }

    #[test]
    fn permission_is_optional() {
        let payload = r#"{
            "action": "created",
            "comment": { "id": 1, "body": "/assignme" },
            "issue": { "number": 1 },
            "repository": { "full_name": "org/repo" },
            "sender": { "login": "someone" }
        }"#;

        let event = parse_webhook("issue_comment", payload.as_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(event.actor_permission, None);
    }

    #[test]
    fn bot_sender_is_flagged() {
        let payload = r#"{
            "action": "created",
            "comment": { "id": 1, "body": "/assignme" },
            "issue": { "number": 1 },
            "repository": { "full_name": "org/repo" },
            "sender": { "login": "dependabot[bot]", "type": "Bot" }
        }"#;

        let event = parse_webhook("issue_comment", payload.as_bytes())
            .unwrap()
            .unwrap();
        assert!(event.actor_is_bot);
    }

    #[test]
    fn parse_issue_comment_deleted_has_empty_body() {
        let payload = r#"{
            "action": "deleted",
            "comment": { "id": 999 },
            "issue": { "number": 10 },
            "repository": { "full_name": "org/repo" },
            "sender": { "login": "user" }
        }"#;

        let event = parse_webhook("issue_comment", payload.as_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(event.action, CommentAction::Deleted);
        assert_eq!(event.body, "");
    }

    #[test]
    fn unknown_event_type_returns_none() {
        let payload = b"{}";

        assert!(parse_webhook("ping", payload).unwrap().is_none());
        assert!(parse_webhook("push", payload).unwrap().is_none());
        assert!(parse_webhook("pull_request", payload).unwrap().is_none());
        assert!(parse_webhook("unknown_event", payload).unwrap().is_none());
    }

    // ========================================================================
    // Error handling
    // ========================================================================

    #[test]
    fn malformed_json_returns_error() {
        let result = parse_webhook("issue_comment", b"not valid json");
        assert!(matches!(result, Err(ParseError::JsonError(_))));
    }

    #[test]
    fn missing_required_field_returns_error() {
        // Missing sender
        let payload = r#"{
            "action": "created",
            "comment": { "id": 1, "body": "/assignme" },
            "issue": { "number": 1 },
            "repository": { "full_name": "org/repo" }
        }"#;
        let result = parse_webhook("issue_comment", payload.as_bytes());
        assert!(matches!(result, Err(ParseError::JsonError(_))));
    }

    #[test]
    fn unrecognised_action_is_kept_as_other() {
        let payload = r#"{
            "action": "pinned",
            "comment": { "id": 1, "body": "/assignme" },
            "issue": { "number": 1 },
            "repository": { "full_name": "org/repo" },
            "sender": { "login": "u" }
        }"#;
        let event = parse_webhook("issue_comment", payload.as_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(event.action, CommentAction::Other);
        assert!(!event.is_dispatchable());
    }

    #[test]
    fn invalid_full_name_returns_error() {
        let payload = r#"{
            "action": "created",
            "comment": { "id": 1, "body": "/assignme" },
            "issue": { "number": 1 },
            "repository": { "full_name": "no-slash" },
            "sender": { "login": "u" }
        }"#;
        let result = parse_webhook("issue_comment", payload.as_bytes());
        assert!(matches!(
            result,
            Err(ParseError::InvalidField {
                field: "repository.full_name",
                ..
            })
        ));
    }

    #[test]
    fn unrecognised_permission_is_treated_as_absent() {
        let payload = r#"{
            "action": "created",
            "comment": { "id": 1, "body": "/assignme" },
            "issue": { "number": 1 },
            "repository": { "full_name": "org/repo" },
            "sender": { "login": "u", "permission": "superuser" }
        }"#;
        let event = parse_webhook("issue_comment", payload.as_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(event.actor_permission, None);
        assert!(event.is_dispatchable());
    }
}
