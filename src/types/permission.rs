//! Repository permission levels.
//!
//! GitHub reports an actor's access to a repository as one of a small set of
//! named roles. The bot only needs to compare them, so they are modelled as a
//! totally ordered enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An actor's access tier on a repository, lowest first.
///
/// The derived `Ord` follows declaration order, so `Read < Write < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// No access (or not a collaborator on a private repository).
    None,
    Read,
    Triage,
    Write,
    Maintain,
    Admin,
}

impl PermissionLevel {
    /// All levels in ascending order.
    pub const ALL: [PermissionLevel; 6] = [
        PermissionLevel::None,
        PermissionLevel::Read,
        PermissionLevel::Triage,
        PermissionLevel::Write,
        PermissionLevel::Maintain,
        PermissionLevel::Admin,
    ];

    /// Returns the name GitHub uses for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::None => "none",
            PermissionLevel::Read => "read",
            PermissionLevel::Triage => "triage",
            PermissionLevel::Write => "write",
            PermissionLevel::Maintain => "maintain",
            PermissionLevel::Admin => "admin",
        }
    }

    /// Returns true if this level meets the `required` floor.
    pub fn satisfies(&self, required: PermissionLevel) -> bool {
        *self >= required
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a permission name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown permission level: {0:?}")]
pub struct UnknownPermissionLevel(pub String);

impl FromStr for PermissionLevel {
    type Err = UnknownPermissionLevel;

    /// Parses a level name case-insensitively.
    ///
    /// `pull` and `push` are accepted as the legacy names for `read` and
    /// `write` that some GitHub endpoints still return.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(PermissionLevel::None),
            "read" | "pull" => Ok(PermissionLevel::Read),
            "triage" => Ok(PermissionLevel::Triage),
            "write" | "push" => Ok(PermissionLevel::Write),
            "maintain" => Ok(PermissionLevel::Maintain),
            "admin" => Ok(PermissionLevel::Admin),
            _ => Err(UnknownPermissionLevel(s.to_string())),
        }
    }
}
