//! Effects-as-data for GitHub operations.
//!
//! Handlers never call the GitHub API directly. They return effect values
//! describing what should happen, which enables:
//! - Pure handlers that are testable without a network
//! - Mock interpreters that record what would have been done
//! - Uniform timeout, retry and logging around every API call

pub mod github;
pub mod interpreter;

pub use github::{GitHubEffect, GitHubResponse, Reaction, UnknownReaction};
pub use interpreter::{GitHubInterpreter, InterpreterFactory};
