//! GitHub effect interpreter using octocrab.
//!
//! This module implements the `GitHubInterpreter` trait, executing GitHub effects
//! against the real GitHub REST API via octocrab. Every effect runs under
//! `retry_with_backoff`, so transient failures are retried and permanent ones
//! surface immediately.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse, Reaction};
use crate::types::{CommentId, IssueNumber, PermissionLevel, UnknownPermissionLevel};

use super::client::OctocrabClient;
use super::error::GitHubApiError;
use super::retry::{RetryConfig, retry_with_backoff};

impl GitHubInterpreter for OctocrabClient {
    type Error = GitHubApiError;

    async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
        interpret_github_effect(self, effect, RetryConfig::DEFAULT).await
    }
}

/// Interprets a GitHub effect, executing it against the GitHub API.
///
/// # Arguments
///
/// * `client` - The octocrab client scoped to a repository
/// * `effect` - The effect to execute
/// * `retry` - Backoff applied to transient failures
#[instrument(skip_all, fields(repo = %client.repo(), effect = effect.name()))]
pub async fn interpret_github_effect(
    client: &OctocrabClient,
    effect: GitHubEffect,
    retry: RetryConfig,
) -> Result<GitHubResponse, GitHubApiError> {
    retry_with_backoff(retry, || execute_effect(client, effect.clone())).await
}

/// Executes a single effect without retry logic.
async fn execute_effect(
    client: &OctocrabClient,
    effect: GitHubEffect,
) -> Result<GitHubResponse, GitHubApiError> {
    match effect {
        GitHubEffect::GetPermission { login } => get_permission(client, &login).await,
        GitHubEffect::AddReaction {
            comment_id,
            reaction,
        } => add_reaction(client, comment_id, reaction).await,
        GitHubEffect::AddAssignees { issue, assignees } => {
            add_assignees(client, issue, &assignees).await
        }
        GitHubEffect::PostComment { issue, body } => post_comment(client, issue, body).await,
    }
}

// ─── Permissions ──────────────────────────────────────────────────────────────

/// Response body of `GET /repos/{owner}/{repo}/collaborators/{username}/permission`.
#[derive(Debug, Deserialize)]
struct PermissionResponse {
    /// Legacy field: `maintain` is reported as `write`, `triage` as `read`.
    permission: String,
    /// The actual role, or the name of a custom repository role.
    #[serde(default)]
    role_name: Option<String>,
}

impl PermissionResponse {
    /// Prefers `role_name`. Custom roles are not levels, so they fall back
    /// to the base permission they extend.
    fn level(&self) -> Result<PermissionLevel, UnknownPermissionLevel> {
        match self.role_name.as_deref().map(str::parse::<PermissionLevel>) {
            Some(Ok(level)) => Ok(level),
            _ => self.permission.parse(),
        }
    }
}

async fn get_permission(
    client: &OctocrabClient,
    login: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    let url = format!(
        "/repos/{}/{}/collaborators/{}/permission",
        client.owner(),
        client.repo_name(),
        login
    );

    let result: Result<PermissionResponse, _> = client.inner().get(&url, None::<&()>).await;

    match result {
        Ok(response) => {
            let level = response.level().map_err(|e| {
                GitHubApiError::permanent_without_source(format!(
                    "Unexpected permission for {}: {}",
                    login, e
                ))
            })?;
            Ok(GitHubResponse::Permission(level))
        }
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}

// ─── Issue Operations ─────────────────────────────────────────────────────────

async fn add_reaction(
    client: &OctocrabClient,
    comment_id: CommentId,
    reaction: Reaction,
) -> Result<GitHubResponse, GitHubApiError> {
    let url = format!(
        "/repos/{}/{}/issues/comments/{}/reactions",
        client.owner(),
        client.repo_name(),
        comment_id.0
    );

    #[derive(Serialize)]
    struct ReactionRequest {
        content: &'static str,
    }

    let result: Result<serde_json::Value, _> = client
        .inner()
        .post(
            &url,
            Some(&ReactionRequest {
                content: reaction.as_api_str(),
            }),
        )
        .await;

    match result {
        Ok(_) => Ok(GitHubResponse::ReactionAdded),
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}

async fn add_assignees(
    client: &OctocrabClient,
    issue: IssueNumber,
    assignees: &[String],
) -> Result<GitHubResponse, GitHubApiError> {
    let url = format!(
        "/repos/{}/{}/issues/{}/assignees",
        client.owner(),
        client.repo_name(),
        issue.0
    );

    #[derive(Serialize)]
    struct AssigneesRequest<'a> {
        assignees: &'a [String],
    }

    // The response is the full issue; nothing in it is needed.
    let result: Result<serde_json::Value, _> = client
        .inner()
        .post(&url, Some(&AssigneesRequest { assignees }))
        .await;

    match result {
        Ok(_) => Ok(GitHubResponse::AssigneesAdded),
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}

async fn post_comment(
    client: &OctocrabClient,
    issue: IssueNumber,
    body: String,
) -> Result<GitHubResponse, GitHubApiError> {
    let url = format!(
        "/repos/{}/{}/issues/{}/comments",
        client.owner(),
        client.repo_name(),
        issue.0
    );

    #[derive(Serialize)]
    struct CommentRequest {
        body: String,
    }

    #[derive(Deserialize)]
    struct CreatedComment {
        id: u64,
    }

    let result: Result<CreatedComment, _> = client
        .inner()
        .post(&url, Some(&CommentRequest { body }))
        .await;

    match result {
        Ok(comment) => Ok(GitHubResponse::CommentPosted {
            id: CommentId(comment.id),
        }),
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}
