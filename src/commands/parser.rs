//! Parser for slash commands in comment text.
//!
//! This module provides a pure parser that extracts a structured command from
//! unstructured GitHub comment text.

use super::types::Command;

/// Parses a slash command from the start of a comment body.
///
/// # Parsing Rules
///
/// - Leading whitespace (including blank lines) is skipped
/// - Only the first remaining line is considered
/// - The line must start with `/` immediately followed by a token matching
///   `[a-zA-Z][a-zA-Z0-9-]*`
/// - The token must be followed by whitespace or the end of the line
/// - Tokens are case-sensitive
/// - Arguments are the whitespace-delimited remainder of the line
/// - Returns `None` if the body does not start with a command
///
/// # Examples
///
/// ```
/// use comment_dispatch::commands::parse_command;
///
/// let cmd = parse_command("/assignme").unwrap();
/// assert_eq!(cmd.token, "assignme");
/// assert!(cmd.args.is_empty());
///
/// let cmd = parse_command("/contributing-agreement extra text").unwrap();
/// assert_eq!(cmd.args, vec!["extra", "text"]);
///
/// assert_eq!(parse_command("please /assignme"), None);
/// assert_eq!(parse_command("/1up"), None);
/// ```
pub fn parse_command(body: &str) -> Option<Command> {
    let line = first_line(body.trim_start());
    let after_slash = line.strip_prefix('/')?;

    let token_len = token_length(after_slash)?;
    let (token, rest) = after_slash.split_at(token_len);

    // "/assignme!" or "/assign_me" are not commands.
    if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
        return None;
    }

    Some(Command {
        token: token.to_string(),
        args: rest.split_whitespace().map(str::to_string).collect(),
        raw: body.to_string(),
    })
}

/// Returns the first line of `text`, without its terminator.
fn first_line(text: &str) -> &str {
    let line = text.split('\n').next().unwrap_or("");
    line.strip_suffix('\r').unwrap_or(line)
}

/// Returns the byte length of the token at the start of `text`, if any.
///
/// All token characters are ASCII, so the char count equals the byte length.
fn token_length(text: &str) -> Option<usize> {
    let mut chars = text.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(1 + chars.take_while(|&c| is_token_char(c)).count())
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}
