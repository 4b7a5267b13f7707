//! Comment Dispatch - a GitHub bot that runs slash commands posted in issue
//! and pull request comments.
//!
//! A signed `issue_comment` webhook comes in, the first line of the comment
//! is parsed for `/command args...`, the command is looked up in an immutable
//! registry, the commenter's permission is checked against the command's
//! floor, and the command's handler is executed against the GitHub API.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod effects;
pub mod github;
pub mod handlers;
pub mod registry;
pub mod server;
pub mod types;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod test_utils;
