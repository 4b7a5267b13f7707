//! `/contributing-agreement`: posts a fixed reply.

use crate::commands::Command;
use crate::effects::GitHubEffect;
use crate::webhooks::CommentEvent;

use super::CommandHandler;

/// Reply posted by `/contributing-agreement` unless overridden at startup.
pub const DEFAULT_CONTRIBUTING_AGREEMENT: &str = "\
Thanks for your interest in contributing!

Before we can accept your contribution, please read the contributing \
guidelines in `CONTRIBUTING.md` and confirm that you agree to license your \
contribution under the same terms as this project.

By opening a pull request you confirm that:

- the work is your own, or you have the right to submit it;
- you agree to license it under the project's license;
- you have read and will follow the code of conduct.";

/// Posts a fixed, pre-defined comment on the target issue.
///
/// The body is static text; command arguments are ignored.
#[derive(Debug, Clone)]
pub struct PostTemplatedReply {
    body: String,
}

impl PostTemplatedReply {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Default for PostTemplatedReply {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRIBUTING_AGREEMENT)
    }
}

impl CommandHandler for PostTemplatedReply {
    fn name(&self) -> &'static str {
        "post_templated_reply"
    }

    fn handle(&self, event: &CommentEvent, _command: &Command) -> Vec<GitHubEffect> {
        vec![GitHubEffect::PostComment {
            issue: event.issue,
            body: self.body.clone(),
        }]
    }
}
