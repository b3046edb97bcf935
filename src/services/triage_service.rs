//! Triage service for learning automation rules from user behavior.
//!
//! The service sits between the mailbox and the rule detector:
//! - Logs manual archive/delete actions that no rule already covers
//! - Surfaces at most one rule suggestion at a time
//! - Turns accepted suggestions into persisted rules
//! - Applies active rules to unread incoming mail

use async_trait::async_trait;
use thiserror::Error;

use super::rule_detector::RuleDetector;
use crate::config::TriageSettings;
use crate::domain::{
    ActionLogEntry, Email, RuleApplication, RuleId, RuleSuggestion, SuggestionState, TriageAction,
    TriageRule,
};

/// Errors that can occur during triage operations.
#[derive(Debug, Error)]
pub enum TriageError {
    /// Accept or decline was called with nothing pending.
    #[error("no rule suggestion is pending")]
    NoPendingSuggestion,

    /// Rule not found.
    #[error("triage rule not found: {0}")]
    RuleNotFound(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for triage operations.
pub type TriageResult<T> = Result<T, TriageError>;

/// Storage trait for triage persistence.
#[async_trait]
pub trait TriageStorage: Send + Sync {
    /// Appends an entry to the action log.
    async fn append_action(&self, entry: &ActionLogEntry) -> TriageResult<()>;

    /// Gets the full action log in append order.
    async fn action_log(&self) -> TriageResult<Vec<ActionLogEntry>>;

    /// Saves a rule.
    async fn save_rule(&self, rule: &TriageRule) -> TriageResult<()>;

    /// Gets all rules in creation order.
    async fn rules(&self) -> TriageResult<Vec<TriageRule>>;

    /// Gets a rule by ID.
    async fn get_rule(&self, id: &RuleId) -> TriageResult<Option<TriageRule>>;

    /// Deletes a rule.
    async fn delete_rule(&self, id: &RuleId) -> TriageResult<()>;

    /// Remembers a suggestion the user turned down.
    async fn record_declined(&self, suggestion: &RuleSuggestion) -> TriageResult<()>;

    /// Gets all declined suggestions.
    async fn declined(&self) -> TriageResult<Vec<RuleSuggestion>>;
}

/// Service for managing triage rules and suggestions.
pub struct TriageService<S: TriageStorage> {
    storage: S,
    detector: RuleDetector,
    enabled: bool,
    state: SuggestionState,
}

impl<S: TriageStorage> TriageService<S> {
    /// Creates a new triage service.
    pub fn new(storage: S, settings: &TriageSettings) -> Self {
        Self {
            storage,
            detector: RuleDetector::new(settings.min_actions_for_rule),
            enabled: settings.enabled,
            state: SuggestionState::Idle,
        }
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the current suggestion state.
    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    /// Returns the pending suggestion, if any.
    pub fn pending(&self) -> Option<&RuleSuggestion> {
        self.state.pending()
    }

    /// Records a manual archive or delete.
    ///
    /// Actions on mail an active rule already covers are not logged. Returns
    /// the suggestion pending after the action, if any.
    pub async fn record_action(
        &mut self,
        action: TriageAction,
        email: &Email,
    ) -> TriageResult<Option<RuleSuggestion>> {
        let sender = email.sender();
        let rules = self.storage.rules().await?;
        if rules.iter().any(|r| r.applies_to(sender)) {
            return Ok(self.pending().cloned());
        }

        let entry = ActionLogEntry::now(action, email.id.clone(), sender);
        self.storage.append_action(&entry).await?;

        self.refresh().await
    }

    /// Re-runs detection when nothing is pending.
    ///
    /// A pending suggestion is returned unchanged until it is accepted or
    /// declined.
    pub async fn refresh(&mut self) -> TriageResult<Option<RuleSuggestion>> {
        if let SuggestionState::Suggested(pending) = &self.state {
            return Ok(Some(pending.clone()));
        }
        if !self.enabled {
            return Ok(None);
        }

        let log = self.storage.action_log().await?;
        let rules = self.storage.rules().await?;
        let declined = self.storage.declined().await?;

        let suggestion = self.detector.detect_excluding(&log, &rules, &declined);
        if let Some(ref s) = suggestion {
            self.state = SuggestionState::Suggested(s.clone());
        }
        Ok(suggestion)
    }

    /// Accepts the pending suggestion, persisting it as a rule.
    pub async fn accept(&mut self) -> TriageResult<TriageRule> {
        let SuggestionState::Suggested(suggestion) = &self.state else {
            return Err(TriageError::NoPendingSuggestion);
        };

        let rule = suggestion.clone().into_rule(RuleId::generate());
        self.storage.save_rule(&rule).await?;
        self.state = SuggestionState::Idle;

        tracing::info!(rule_id = %rule.id, sender = %rule.sender, action = %rule.action, "Triage rule created");
        Ok(rule)
    }

    /// Declines the pending suggestion so it is not proposed again.
    pub async fn decline(&mut self) -> TriageResult<()> {
        let SuggestionState::Suggested(suggestion) = &self.state else {
            return Err(TriageError::NoPendingSuggestion);
        };

        self.storage.record_declined(suggestion).await?;
        tracing::debug!(sender = %suggestion.sender, action = %suggestion.action, "Triage suggestion declined");
        self.state = SuggestionState::Idle;
        Ok(())
    }

    /// Gets all active rules.
    pub async fn rules(&self) -> TriageResult<Vec<TriageRule>> {
        self.storage.rules().await
    }

    /// Deletes a rule.
    pub async fn delete_rule(&self, id: &RuleId) -> TriageResult<()> {
        if self.storage.get_rule(id).await?.is_none() {
            return Err(TriageError::RuleNotFound(id.to_string()));
        }
        self.storage.delete_rule(id).await?;

        tracing::info!(rule_id = %id, "Triage rule deleted");
        Ok(())
    }

    /// Gets the full action log.
    pub async fn action_log(&self) -> TriageResult<Vec<ActionLogEntry>> {
        self.storage.action_log().await
    }

    /// Matches unread emails against active rules.
    ///
    /// The first rule, in creation order, whose sender equals the email's
    /// sender wins. Read emails are left alone.
    pub async fn apply_rules(&self, emails: &[Email]) -> TriageResult<Vec<RuleApplication>> {
        let rules = self.storage.rules().await?;
        if rules.is_empty() {
            return Ok(Vec::new());
        }

        let applied: Vec<RuleApplication> = emails
            .iter()
            .filter(|e| !e.is_read)
            .filter_map(|email| {
                rules
                    .iter()
                    .find(|r| r.applies_to(email.sender()))
                    .map(|rule| RuleApplication {
                        email_id: email.id.clone(),
                        rule_id: rule.id.clone(),
                        action: rule.action,
                    })
            })
            .collect();

        if !applied.is_empty() {
            tracing::info!(count = applied.len(), "Applied triage rules");
        }
        Ok(applied)
    }
}
