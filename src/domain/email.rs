//! Email domain types.
//!
//! Only the parts of a message that triage needs: who sent it and whether
//! it has been read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EmailId;

/// An email as seen by the triage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    /// Unique identifier for this email.
    pub id: EmailId,
    /// Sender address.
    pub from: Address,
    /// Email subject line.
    pub subject: Option<String>,
    /// Date and time the email was sent.
    pub date: DateTime<Utc>,
    /// Whether the email has been read.
    pub is_read: bool,
}

impl Email {
    /// Creates an unread email received now.
    pub fn new(id: impl Into<EmailId>, from: Address) -> Self {
        Self {
            id: id.into(),
            from,
            subject: None,
            date: Utc::now(),
            is_read: false,
        }
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Marks the email as read.
    pub fn read(mut self) -> Self {
        self.is_read = true;
        self
    }

    /// Sender identity used for triage matching.
    ///
    /// This is the display name when present, falling back to the bare
    /// address.
    pub fn sender(&self) -> &str {
        self.from.display()
    }
}

/// An email address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Email address.
    pub email: String,
    /// Display name (e.g., "John Doe").
    pub name: Option<String>,
}

impl Address {
    /// Creates a new address with just an email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Creates a new address with email and display name.
    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }

    /// Display name if set, otherwise the address.
    pub fn display(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
