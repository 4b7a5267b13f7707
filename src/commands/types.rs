//! Command types for slash commands.
//!
//! These are parsed from GitHub issue/PR comment bodies.

use serde::{Deserialize, Serialize};

/// A parsed `/<token> [args...]` command from a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// The command name without the leading slash, e.g. `assignme`.
    pub token: String,

    /// Whitespace-delimited words following the token on the first line.
    pub args: Vec<String>,

    /// The full comment body the command was parsed from.
    pub raw: String,
}

impl Command {
    /// Creates a command with the given token and arguments.
    ///
    /// The raw body is reconstructed as `/<token> <args...>`.
    pub fn new(token: impl Into<String>, args: Vec<String>) -> Self {
        let token = token.into();
        let raw = std::iter::once(format!("/{}", token))
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        Command { token, args, raw }
    }
}
