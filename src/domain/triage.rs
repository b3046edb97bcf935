//! Triage domain types.
//!
//! Represents the user's manual archive/delete history and the per-sender
//! automation rules inferred from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmailId, RuleId};

/// A triage action the user can take on an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriageAction {
    /// Move the email to trash.
    Delete,
    /// Remove the email from the inbox.
    Archive,
}

impl TriageAction {
    /// Lowercase verb used in user-facing text and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageAction::Delete => "delete",
            TriageAction::Archive => "archive",
        }
    }
}

impl std::fmt::Display for TriageAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One manual triage action, as recorded by the mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    /// What the user did.
    pub action: TriageAction,
    /// Email the action was applied to.
    pub email_id: EmailId,
    /// Sender display name captured at action time.
    pub sender: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ActionLogEntry {
    /// Creates an entry stamped with the current time.
    pub fn now(action: TriageAction, email_id: EmailId, sender: impl Into<String>) -> Self {
        Self {
            action,
            email_id,
            sender: sender.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// A confirmed automation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageRule {
    /// Unique identifier, assigned on acceptance.
    pub id: RuleId,
    /// Sender display name this rule matches exactly.
    pub sender: String,
    /// Action applied automatically.
    pub action: TriageAction,
    /// When the rule was accepted.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl TriageRule {
    /// Returns true if this rule covers the given sender/action pair.
    pub fn matches(&self, sender: &str, action: TriageAction) -> bool {
        self.sender == sender && self.action == action
    }

    /// Returns true if this rule fires for mail from `sender`.
    pub fn applies_to(&self, sender: &str) -> bool {
        self.sender == sender
    }
}

/// A rule proposed from the action log but not yet accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleSuggestion {
    /// Sender the pattern was observed for.
    pub sender: String,
    /// The action the user consistently took.
    pub action: TriageAction,
}

impl RuleSuggestion {
    /// Creates a suggestion.
    pub fn new(sender: impl Into<String>, action: TriageAction) -> Self {
        Self {
            sender: sender.into(),
            action,
        }
    }

    /// Promotes the suggestion into a rule with the given id.
    pub fn into_rule(self, id: RuleId) -> TriageRule {
        TriageRule {
            id,
            sender: self.sender,
            action: self.action,
            created_at: Utc::now(),
        }
    }

    /// Prompt text shown to the user.
    pub fn prompt(&self) -> String {
        format!(
            "You've {}d several emails from {}. Automatically {} them in the future?",
            self.action, self.sender, self.action
        )
    }
}

/// Whether a suggestion is waiting on the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SuggestionState {
    /// Nothing pending.
    #[default]
    Idle,
    /// A suggestion awaits accept/decline.
    Suggested(RuleSuggestion),
}

impl SuggestionState {
    /// Returns the pending suggestion, if any.
    pub fn pending(&self) -> Option<&RuleSuggestion> {
        match self {
            SuggestionState::Idle => None,
            SuggestionState::Suggested(s) => Some(s),
        }
    }
}

/// Record of a rule firing on an incoming email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleApplication {
    /// Email the rule applied to.
    pub email_id: EmailId,
    /// Rule that fired.
    pub rule_id: RuleId,
    /// Action to perform.
    pub action: TriageAction,
}
