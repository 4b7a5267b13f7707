//! The command registry.
//!
//! Maps command tokens to the handler that implements them and the minimum
//! permission an actor needs to invoke it. The registry is assembled once at
//! startup with [`RegistryBuilder`] and is immutable afterwards; the
//! dispatcher shares it through an `Arc` and never locks it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::commands::parse_command;
use crate::handlers::CommandHandler;
use crate::types::PermissionLevel;

/// Errors raised while building the registry. All of them are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The token is already registered.
    #[error("command /{0} is already registered")]
    DuplicateCommand(String),

    /// The token could never be produced by the command parser.
    #[error("invalid command token {0:?}")]
    InvalidToken(String),
}

/// A registered command.
#[derive(Clone)]
pub struct HandlerSpec {
    /// The command name without the slash.
    pub token: String,

    /// Minimum permission an actor needs to invoke the command.
    pub required_permission: PermissionLevel,

    /// The handler invoked once the actor is authorized.
    pub handler: Arc<dyn CommandHandler>,
}

impl fmt::Debug for HandlerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSpec")
            .field("token", &self.token)
            .field("required_permission", &self.required_permission)
            .field("handler", &self.handler.name())
            .finish()
    }
}

/// Collects handler registrations before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    specs: HashMap<String, HandlerSpec>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `token`.
    ///
    /// Fails with [`RegistryError::DuplicateCommand`] if the token is taken and
    /// [`RegistryError::InvalidToken`] if it does not match
    /// `[a-zA-Z][a-zA-Z0-9-]*`.
    pub fn register(
        &mut self,
        token: impl Into<String>,
        required_permission: PermissionLevel,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<&mut Self, RegistryError> {
        let token = token.into();

        if !is_valid_token(&token) {
            return Err(RegistryError::InvalidToken(token));
        }
        if self.specs.contains_key(&token) {
            return Err(RegistryError::DuplicateCommand(token));
        }

        self.specs.insert(
            token.clone(),
            HandlerSpec {
                token,
                required_permission,
                handler,
            },
        );
        Ok(self)
    }

    /// Freezes the registrations into an immutable registry.
    pub fn build(self) -> CommandRegistry {
        CommandRegistry { specs: self.specs }
    }
}

/// An immutable token → handler map.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    specs: HashMap<String, HandlerSpec>,
}

impl CommandRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the spec registered for `token`, if any.
    pub fn lookup(&self, token: &str) -> Option<&HandlerSpec> {
        self.specs.get(token)
    }

    /// Registered tokens, sorted.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.specs.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// A token is valid if the parser would produce exactly it from `/<token>`.
fn is_valid_token(token: &str) -> bool {
    parse_command(&format!("/{}", token)).is_some_and(|cmd| cmd.token == token)
}
