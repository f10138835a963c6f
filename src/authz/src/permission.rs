//! Permission lattice
//!
//! Three totally ordered levels. A higher level contains every lower one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission level held by a grant or requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// View the item
    Read,
    /// Modify the item
    Write,
    /// Manage the item and its sharing
    Admin,
}

impl PermissionLevel {
    /// Every level, lowest first
    pub const ALL: [PermissionLevel; 3] = [Self::Read, Self::Write, Self::Admin];

    /// Whether holding `self` is enough for `need`
    pub fn satisfies(self, need: PermissionLevel) -> bool {
        self >= need
    }

    /// Stored form of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored permission string is not one of the three levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown permission level '{}'", self.0)
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for PermissionLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}
