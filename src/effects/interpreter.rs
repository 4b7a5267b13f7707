//! Effect interpreter traits.
//!
//! These traits define how effects are executed. The octocrab-backed
//! implementation lives in `crate::github`; tests use a recording mock.

use std::fmt;
use std::future::Future;

use crate::types::RepoId;

use super::github::{GitHubEffect, GitHubResponse};

/// Interprets GitHub effects against the GitHub API.
///
/// Implementations are constructed with a `RepoId`, so all effects executed
/// through a single interpreter instance are scoped to that repository.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct RecordingInterpreter {
///     calls: Arc<Mutex<Vec<GitHubEffect>>>,
/// }
///
/// impl GitHubInterpreter for RecordingInterpreter {
///     type Error = String;
///
///     async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
///         self.calls.lock().unwrap().push(effect);
///         Ok(GitHubResponse::ReactionAdded)
///     }
/// }
/// ```
pub trait GitHubInterpreter {
    /// The error type returned by this interpreter.
    type Error;

    /// Execute a GitHub effect and return its response.
    fn interpret(
        &self,
        effect: GitHubEffect,
    ) -> impl Future<Output = Result<GitHubResponse, Self::Error>> + Send;
}

/// Produces repository-scoped interpreters.
///
/// Webhook deliveries can come from any repository the bot is installed on,
/// so the dispatcher asks for an interpreter per event.
pub trait InterpreterFactory: Send + Sync + 'static {
    /// The interpreter type handed out for each repository.
    type Interpreter: GitHubInterpreter<Error: fmt::Display + Send> + Send + Sync;

    /// Returns an interpreter scoped to `repo`.
    fn for_repo(&self, repo: &RepoId) -> Self::Interpreter;
}
