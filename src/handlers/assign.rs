//! `/assignme`: assigns the commenter to the issue.

use crate::commands::Command;
use crate::effects::GitHubEffect;
use crate::webhooks::CommentEvent;

use super::CommandHandler;

/// Adds the invoking actor as an assignee of the target issue or PR.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignActor;

impl CommandHandler for AssignActor {
    fn name(&self) -> &'static str {
        "assign_actor"
    }

    fn handle(&self, event: &CommentEvent, _command: &Command) -> Vec<GitHubEffect> {
        vec![GitHubEffect::AddAssignees {
            issue: event.issue,
            assignees: vec![event.actor.clone()],
        }]
    }
}
