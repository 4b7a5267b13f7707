//! Command parsing for slash commands.
//!
//! Users interact with the bot by starting an issue or PR comment with a
//! slash command. The parser turns the comment body into a [`Command`];
//! whether the token means anything is decided later by the registry.
//!
//! # Grammar
//!
//! ```text
//! /<token> [args...]
//! token = [a-zA-Z][a-zA-Z0-9-]*
//! ```
//!
//! # Example
//!
//! ```
//! use comment_dispatch::commands::parse_command;
//!
//! let cmd = parse_command("/assignme").unwrap();
//! assert_eq!(cmd.token, "assignme");
//!
//! // Not at the start of the comment
//! assert!(parse_command("Could someone /assignme?").is_none());
//! ```

mod parser;
mod types;

pub use parser::parse_command;
pub use types::Command;
