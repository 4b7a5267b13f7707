//! Command dispatch.
//!
//! The dispatcher takes one comment event through the pipeline
//!
//! ```text
//! Received → Parsed → NoCommand                      → End
//!                   → Dispatched → Unauthorized      → End
//!                                → Executed          → End
//! ```
//!
//! It resolves the command against the registry, checks the actor's
//! permission, acknowledges the comment with a reaction, and then executes the
//! effects returned by the handler, each under a timeout.
//!
//! Nothing here deduplicates deliveries. If GitHub redelivers a webhook the
//! command runs again.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::commands::{Command, parse_command};
use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse, InterpreterFactory, Reaction};
use crate::registry::CommandRegistry;
use crate::types::{DeliveryId, PermissionLevel};
use crate::webhooks::CommentEvent;


/// Default bound on a single outbound GitHub call.
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime policy for the dispatcher.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Upper bound on each outbound call, retries included.
    pub handler_timeout: Duration,

    /// Reaction added to a comment once its command is authorized.
    pub acknowledgement: Reaction,

    /// Post a short explanation when an actor lacks permission.
    pub reply_on_denied: bool,

    /// Post a comment when a handler's API call fails.
    pub report_failures: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
            acknowledgement: Reaction::Rocket,
            reply_on_denied: false,
            report_failures: false,
        }
    }
}

/// How an event's processing ended, when it ended normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a freshly created comment by a human; not considered at all.
    Skipped,

    /// The comment does not start with a slash command.
    NoCommand,

    /// The token is not registered.
    UnknownCommand { token: String },

    /// The handler ran and all of its effects succeeded.
    Executed { token: String, effects: usize },
}

/// Per-event failures. None of them affect other events.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The actor's permission is below the command's floor.
    #[error("{actor} has {actual} permission but /{token} requires {required}")]
    InsufficientPermission {
        token: String,
        actor: String,
        actual: PermissionLevel,
        required: PermissionLevel,
    },

    /// A GitHub API call failed or timed out.
    #[error("{effect} failed: {message}")]
    ExternalApi {
        effect: &'static str,
        message: String,
    },
}

/// Routes comment events to their handlers.
///
/// Holds only read-only state, so one instance is shared by every in-flight
/// delivery.
pub struct Dispatcher<F> {
    registry: Arc<CommandRegistry>,
    clients: F,
    config: DispatchConfig,
}

impl<F> Dispatcher<F>
where
    F: InterpreterFactory,
{
    pub fn new(registry: Arc<CommandRegistry>, clients: F, config: DispatchConfig) -> Self {
        Self {
            registry,
            clients,
            config,
        }
    }

    /// Processes one delivery and logs how it ended.
    ///
    /// This is the entry point for the spawned per-delivery task. Errors are
    /// logged here and go no further.
    pub async fn run(&self, delivery_id: DeliveryId, event: CommentEvent) {
        match self.dispatch(&event).await {
            Ok(DispatchOutcome::Executed { token, effects }) => {
                info!(delivery_id = %delivery_id, token = %token, effects, "Command executed");
            }
            Ok(outcome) => {
                debug!(delivery_id = %delivery_id, outcome = ?outcome, "Nothing to do");
            }
            Err(e @ DispatchError::InsufficientPermission { .. }) => {
                info!(delivery_id = %delivery_id, reason = %e, "Command denied");
            }
            Err(e @ DispatchError::ExternalApi { .. }) => {
                warn!(delivery_id = %delivery_id, error = %e, "Command failed");
            }
        }
    }

    /// Parses the event's comment and dispatches any command it contains.
    pub async fn dispatch(&self, event: &CommentEvent) -> Result<DispatchOutcome, DispatchError> {
        if !event.is_dispatchable() {
            return Ok(DispatchOutcome::Skipped);
        }

        let Some(command) = parse_command(&event.body) else {
            return Ok(DispatchOutcome::NoCommand);
        };

        self.dispatch_command(event, command).await
    }

    /// Resolves, authorizes, acknowledges and executes a parsed command.
    #[instrument(
        skip_all,
        fields(
            repo = %event.repo,
            issue = %event.issue,
            actor = %event.actor,
            token = %command.token
        )
    )]
    pub async fn dispatch_command(
        &self,
        event: &CommentEvent,
        command: Command,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(spec) = self.registry.lookup(&command.token) else {
            debug!("Unknown command ignored");
            return Ok(DispatchOutcome::UnknownCommand {
                token: command.token,
            });
        };

        let github = self.clients.for_repo(&event.repo);

        let actual = match event.actor_permission {
            Some(level) => level,
            None => self.resolve_permission(&github, &event.actor).await,
        };

        if !actual.satisfies(spec.required_permission) {
            if self.config.reply_on_denied {
                let body = format!(
                    "@{} `/{}` requires {} permission on this repository.",
                    event.actor, spec.token, spec.required_permission
                );
                self.best_effort(&github, GitHubEffect::PostComment {
                    issue: event.issue,
                    body,
                })
                .await;
            }
            return Err(DispatchError::InsufficientPermission {
                token: spec.token.clone(),
                actor: event.actor.clone(),
                actual,
                required: spec.required_permission,
            });
        }

        self.best_effort(&github, GitHubEffect::AddReaction {
            comment_id: event.comment_id,
            reaction: self.config.acknowledgement,
        })
        .await;

        let effects = spec.handler.handle(event, &command);
        let count = effects.len();
        debug!(handler = spec.handler.name(), effects = count, "Handler produced effects");

        for effect in effects {
            if let Err(e) = self.execute(&github, effect).await {
                if self.config.report_failures {
                    let body = format!("Sorry @{}, `/{}` failed: {}", event.actor, spec.token, e);
                    self.best_effort(&github, GitHubEffect::PostComment {
                        issue: event.issue,
                        body,
                    })
                    .await;
                }
                return Err(e);
            }
        }

        Ok(DispatchOutcome::Executed {
            token: spec.token.clone(),
            effects: count,
        })
    }

    /// Looks up the actor's permission. A failed lookup counts as no access.
    async fn resolve_permission(
        &self,
        github: &F::Interpreter,
        actor: &str,
    ) -> PermissionLevel {
        let effect = GitHubEffect::GetPermission {
            login: actor.to_string(),
        };
        match self.execute(github, effect).await {
            Ok(GitHubResponse::Permission(level)) => level,
            Ok(other) => {
                warn!(response = ?other, "Unexpected response to permission lookup");
                PermissionLevel::None
            }
            Err(e) => {
                warn!(error = %e, "Permission lookup failed; treating actor as having no access");
                PermissionLevel::None
            }
        }
    }

    /// Executes an effect whose failure is logged and otherwise ignored.
    async fn best_effort(&self, github: &F::Interpreter, effect: GitHubEffect) {
        if let Err(e) = self.execute(github, effect).await {
            warn!(error = %e, "Best-effort GitHub call failed");
        }
    }

    /// Executes one effect under the configured timeout.
    async fn execute(
        &self,
        github: &F::Interpreter,
        effect: GitHubEffect,
    ) -> Result<GitHubResponse, DispatchError> {
        let name = effect.name();
        let timeout = self.config.handler_timeout;

        match tokio::time::timeout(timeout, github.interpret(effect)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(DispatchError::ExternalApi {
                effect: name,
                message: e.to_string(),
            }),
            Err(_) => Err(DispatchError::ExternalApi {
                effect: name,
                message: format!("timed out after {}", HumanDuration(timeout)),
            }),
        }
    }
}

/// Formats a duration as whole seconds when possible, milliseconds otherwise.
struct HumanDuration(Duration);

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.subsec_millis() == 0 {
            write!(f, "{}s", self.0.as_secs())
        } else {
            write!(f, "{}ms", self.0.as_millis())
        }
    }
}
