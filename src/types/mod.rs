//! Core domain types for the comment dispatcher.
//!
//! Identifiers and permission levels shared by the receiver, the dispatcher
//! and the GitHub client.

pub mod ids;
pub mod permission;

pub use ids::{CommentId, DeliveryId, InvalidRepoName, IssueNumber, RepoId};
pub use permission::{PermissionLevel, UnknownPermissionLevel};
