//! GitHub webhook event types.
//!
//! The bot only reacts to `issue_comment` deliveries. Everything it needs from
//! such a delivery is captured in [`CommentEvent`], which is created once on
//! receipt and only read afterwards.

use serde::{Deserialize, Serialize};

use crate::types::{CommentId, IssueNumber, PermissionLevel, RepoId};

/// Action performed on an issue comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentAction {
    Created,
    Edited,
    Deleted,
    /// Any action GitHub adds later. Never dispatched.
    #[serde(other)]
    Other,
}

/// An issue/PR comment event.
///
/// In GitHub's model, comments on the PR conversation tab are "issue comments"
/// even when they're on a PR, so both arrive here with the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEvent {
    /// The repository.
    pub repo: RepoId,

    /// The action that triggered this event.
    pub action: CommentAction,

    /// The issue or PR the comment was posted on.
    pub issue: IssueNumber,

    /// The comment ID, used for the acknowledgement reaction.
    pub comment_id: CommentId,

    /// The comment body text. Empty for `deleted` actions.
    pub body: String,

    /// Login of the user who wrote the comment.
    pub actor: String,

    /// The actor's permission on the repository, when the payload carries it.
    ///
    /// `None` means the dispatcher has to ask the API.
    pub actor_permission: Option<PermissionLevel>,

    /// Whether the actor is a bot account (`sender.type == "Bot"`).
    pub actor_is_bot: bool,
}

impl CommentEvent {
    /// Returns true if this event should be considered for command dispatch.
    ///
    /// Only freshly created comments by humans are. Edits would re-run a
    /// command that already ran, and bot comments could loop with our own
    /// replies.
    pub fn is_dispatchable(&self) -> bool {
        self.action == CommentAction::Created && !self.actor_is_bot
    }
}
