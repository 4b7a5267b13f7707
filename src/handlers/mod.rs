//! Command handlers.
//!
//! A handler turns an authorized command into the GitHub effects that carry
//! it out. Handlers are pure: they never touch the network themselves, the
//! dispatcher interprets the returned effects. This keeps each handler a
//! plain function of its inputs and lets tests assert on the effects directly.

use std::sync::Arc;

use crate::commands::Command;
use crate::effects::GitHubEffect;
use crate::webhooks::CommentEvent;

mod assign;
mod reply;

pub use assign::AssignActor;
pub use reply::{DEFAULT_CONTRIBUTING_AGREEMENT, PostTemplatedReply};

/// Token for the self-assignment command.
pub const ASSIGNME: &str = "assignme";

/// Token for the contributing agreement reply.
pub const CONTRIBUTING_AGREEMENT: &str = "contributing-agreement";

/// Tokens of every handler shipped with the bot.
pub const BUILTIN_TOKENS: [&str; 2] = [ASSIGNME, CONTRIBUTING_AGREEMENT];

/// The effect of a slash command.
pub trait CommandHandler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the effects to execute for `command`, in order.
    ///
    /// Called at most once per event, and only after the actor has been
    /// authorized.
    fn handle(&self, event: &CommentEvent, command: &Command) -> Vec<GitHubEffect>;
}

/// Instantiates a built-in handler by token.
///
/// `agreement_body` is the fixed text posted by `/contributing-agreement`.
/// Returns `None` for tokens the bot does not ship a handler for.
pub fn builtin_handler(token: &str, agreement_body: &str) -> Option<Arc<dyn CommandHandler>> {
    match token {
        ASSIGNME => Some(Arc::new(AssignActor)),
        CONTRIBUTING_AGREEMENT => Some(Arc::new(PostTemplatedReply::new(agreement_body))),
        _ => None,
    }
}
