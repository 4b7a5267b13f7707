//! GitHub API effect types.
//!
//! These types describe GitHub API operations as data, without executing them.
//! Handlers return them; the dispatcher hands them to a `GitHubInterpreter`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CommentId, IssueNumber, PermissionLevel};

/// GitHub reaction types.
///
/// These correspond to the reactions available on GitHub comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    /// +1 / thumbs up
    ThumbsUp,
    /// -1 / thumbs down
    ThumbsDown,
    Laugh,
    /// Hooray / tada
    Hooray,
    Confused,
    Heart,
    Rocket,
    Eyes,
}

impl Reaction {
    /// Returns the GitHub API content string for this reaction.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Reaction::ThumbsUp => "+1",
            Reaction::ThumbsDown => "-1",
            Reaction::Laugh => "laugh",
            Reaction::Hooray => "hooray",
            Reaction::Confused => "confused",
            Reaction::Heart => "heart",
            Reaction::Rocket => "rocket",
            Reaction::Eyes => "eyes",
        }
    }
}

/// Returned when a reaction name is not one GitHub offers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown reaction: {0:?}")]
pub struct UnknownReaction(pub String);

impl FromStr for Reaction {
    type Err = UnknownReaction;

    /// Accepts the API content strings (`+1`, `rocket`) and the spelled-out
    /// names (`thumbs_up`, `tada`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "+1" | "thumbs_up" | "thumbsup" => Ok(Reaction::ThumbsUp),
            "-1" | "thumbs_down" | "thumbsdown" => Ok(Reaction::ThumbsDown),
            "laugh" => Ok(Reaction::Laugh),
            "hooray" | "tada" => Ok(Reaction::Hooray),
            "confused" => Ok(Reaction::Confused),
            "heart" => Ok(Reaction::Heart),
            "rocket" => Ok(Reaction::Rocket),
            "eyes" => Ok(Reaction::Eyes),
            _ => Err(UnknownReaction(s.to_string())),
        }
    }
}

/// A GitHub API effect.
///
/// Effects are repo-scoped: the interpreter is constructed for a `RepoId`,
/// so effects don't include it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GitHubEffect {
    // ─── Queries ──────────────────────────────────────────────────────────────
    /// Look up a user's permission level on the repository.
    GetPermission { login: String },

    // ─── Mutations ────────────────────────────────────────────────────────────
    /// Add a reaction to an issue comment.
    AddReaction {
        comment_id: CommentId,
        reaction: Reaction,
    },

    /// Add users as assignees of an issue or PR.
    AddAssignees {
        issue: IssueNumber,
        assignees: Vec<String>,
    },

    /// Post a new comment on an issue or PR.
    PostComment { issue: IssueNumber, body: String },
}

impl GitHubEffect {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            GitHubEffect::GetPermission { .. } => "get_permission",
            GitHubEffect::AddReaction { .. } => "add_reaction",
            GitHubEffect::AddAssignees { .. } => "add_assignees",
            GitHubEffect::PostComment { .. } => "post_comment",
        }
    }
}

// ─── Response Types ───────────────────────────────────────────────────────────

/// Response from a GitHub effect.
///
/// Each variant corresponds to the response from a particular effect type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GitHubResponse {
    /// Response to `GetPermission`.
    Permission(PermissionLevel),

    /// Response to `AddReaction`.
    ReactionAdded,

    /// Response to `AddAssignees`.
    AssigneesAdded,

    /// Response to `PostComment`.
    CommentPosted {
        /// The ID of the newly created comment.
        id: CommentId,
    },
}
