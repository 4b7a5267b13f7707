//! GitHub API client and effect interpreter.
//!
//! This module provides the implementation for executing GitHub effects via the octocrab
//! library. It implements the `GitHubInterpreter` trait defined in the effects module.
//!
//! Key features:
//! - Exponential backoff retry for transient failures
//! - Distinguishes transient vs permanent errors
//! - One repo-scoped client per event, sharing a single authenticated connection pool

mod client;
mod error;
mod interpreter;
mod retry;

pub use client::{GitHubClients, OctocrabClient};
pub use error::{GitHubApiError, GitHubErrorKind};
pub use interpreter::interpret_github_effect;
pub use retry::{RetryConfig, retry_with_backoff};
