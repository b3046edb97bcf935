//! Core identifier types for domain entities.
//!
//! These newtype wrappers keep email and rule identifiers from being mixed
//! up with each other or with sender strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an individual email.
///
/// Opaque to the triage engine; it is only carried through to log entries
/// and rule applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

/// Identifier of an accepted triage rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(pub String);

impl RuleId {
    /// Generates a fresh `rule-<uuid>` identifier.
    pub fn generate() -> Self {
        Self(format!("rule-{}", uuid::Uuid::new_v4()))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RuleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RuleId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
