//! Core identifier types for domain entities.
//!
//! These newtype wrappers keep thread and email identifiers from being
//! mixed up when they travel through queries and caches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a complaint thread (e.g. `CPL001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub String);

impl ThreadId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of an individual email row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailId(pub String);

impl fmt::Display for EmailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EmailId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EmailId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
