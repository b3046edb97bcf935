//! Triage rule detection.
//!
//! Watches the log of manual archive/delete actions and proposes a
//! per-sender automation rule once a sender has been handled the same way
//! enough times. Detection is a pure function of its inputs: the log and
//! rule set are borrowed, never stored, and the same inputs always yield
//! the same suggestion.

use std::collections::HashMap;

use crate::domain::{ActionLogEntry, RuleSuggestion, TriageAction, TriageRule};

/// Number of matching actions required before a rule is suggested.
pub const MIN_ACTIONS_FOR_RULE: usize = 3;

/// Proposes at most one new rule from the action log.
///
/// Shorthand for [`RuleDetector::default`] followed by
/// [`RuleDetector::detect`].
pub fn detect_rule(log: &[ActionLogEntry], active_rules: &[TriageRule]) -> Option<RuleSuggestion> {
    RuleDetector::default().detect(log, active_rules)
}

/// Configurable rule detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDetector {
    min_actions: usize,
}

impl Default for RuleDetector {
    fn default() -> Self {
        Self {
            min_actions: MIN_ACTIONS_FOR_RULE,
        }
    }
}

impl RuleDetector {
    /// Creates a detector with a custom threshold. Zero is treated as one.
    pub fn new(min_actions: usize) -> Self {
        Self {
            min_actions: min_actions.max(1),
        }
    }

    /// Returns the configured threshold.
    pub fn min_actions(&self) -> usize {
        self.min_actions
    }

    /// Proposes a rule for the first sender, in order of first appearance,
    /// whose actions are unanimous and not already covered by a rule.
    pub fn detect(
        &self,
        log: &[ActionLogEntry],
        active_rules: &[TriageRule],
    ) -> Option<RuleSuggestion> {
        self.detect_excluding(log, active_rules, &[])
    }

    /// Like [`detect`](Self::detect), but also skips any sender/action pair
    /// listed in `declined`.
    pub fn detect_excluding(
        &self,
        log: &[ActionLogEntry],
        active_rules: &[TriageRule],
        declined: &[RuleSuggestion],
    ) -> Option<RuleSuggestion> {
        if log.len() < self.min_actions {
            return None;
        }

        for (sender, actions) in group_by_sender(log) {
            if actions.len() < self.min_actions {
                continue;
            }

            let candidate = actions[0];
            if actions.iter().any(|a| *a != candidate) {
                continue;
            }

            let covered = active_rules.iter().any(|r| r.matches(sender, candidate));
            let rejected = declined
                .iter()
                .any(|d| d.sender == sender && d.action == candidate);
            if covered || rejected {
                continue;
            }

            tracing::debug!(sender, action = %candidate, "Detected triage rule candidate");
            return Some(RuleSuggestion::new(sender, candidate));
        }

        None
    }
}

/// Groups actions by sender, keeping senders in order of first appearance
/// and each sender's actions in log order.
fn group_by_sender(log: &[ActionLogEntry]) -> Vec<(&str, Vec<TriageAction>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<TriageAction>)> = Vec::new();

    for entry in log {
        let sender = entry.sender.as_str();
        match index.get(sender).copied() {
            Some(i) => groups[i].1.push(entry.action),
            None => {
                index.insert(sender, groups.len());
                groups.push((sender, vec![entry.action]));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailId, RuleId};
    use pretty_assertions::assert_eq;

    fn entry(action: TriageAction, id: u32, sender: &str) -> ActionLogEntry {
        ActionLogEntry {
            action,
            email_id: EmailId::from(id.to_string()),
            sender: sender.to_string(),
            timestamp: 1_700_000_000_000 + i64::from(id),
        }
    }

    fn rule(id: &str, sender: &str, action: TriageAction) -> TriageRule {
        RuleSuggestion::new(sender, action).into_rule(RuleId::from(id))
    }

    #[test]
    fn below_threshold_yields_nothing() {
        let log = vec![
            entry(TriageAction::Archive, 1, "newsletter@x.com"),
            entry(TriageAction::Archive, 2, "newsletter@x.com"),
        ];

        assert_eq!(detect_rule(&log, &[]), None);
    }

    #[test]
    fn empty_log_yields_nothing() {
        assert_eq!(detect_rule(&[], &[]), None);
    }

    #[test]
    fn unanimous_sender_is_suggested() {
        let log = vec![
            entry(TriageAction::Delete, 1, "spam@y.com"),
            entry(TriageAction::Delete, 2, "spam@y.com"),
            entry(TriageAction::Delete, 3, "spam@y.com"),
        ];

        assert_eq!(
            detect_rule(&log, &[]),
            Some(RuleSuggestion::new("spam@y.com", TriageAction::Delete))
        );
    }

    #[test]
    fn existing_rule_is_not_resuggested() {
        let log = vec![
            entry(TriageAction::Delete, 1, "spam@y.com"),
            entry(TriageAction::Delete, 2, "spam@y.com"),
            entry(TriageAction::Delete, 3, "spam@y.com"),
        ];
        let rules = vec![rule("r1", "spam@y.com", TriageAction::Delete)];

        assert_eq!(detect_rule(&log, &rules), None);
    }

    #[test]
    fn rule_for_other_action_does_not_cover_sender() {
        let log = vec![
            entry(TriageAction::Delete, 1, "spam@y.com"),
            entry(TriageAction::Delete, 2, "spam@y.com"),
            entry(TriageAction::Delete, 3, "spam@y.com"),
        ];
        let rules = vec![rule("r1", "spam@y.com", TriageAction::Archive)];

        assert_eq!(
            detect_rule(&log, &rules),
            Some(RuleSuggestion::new("spam@y.com", TriageAction::Delete))
        );
    }

    #[test]
    fn mixed_actions_disqualify_sender() {
        let log = vec![
            entry(TriageAction::Delete, 1, "a@x.com"),
            entry(TriageAction::Archive, 2, "a@x.com"),
            entry(TriageAction::Delete, 3, "a@x.com"),
        ];

        assert_eq!(detect_rule(&log, &[]), None);
    }

    #[test]
    fn mixed_sender_is_skipped_for_later_qualifier() {
        let log = vec![
            entry(TriageAction::Delete, 1, "a@x.com"),
            entry(TriageAction::Archive, 2, "a@x.com"),
            entry(TriageAction::Delete, 3, "a@x.com"),
            entry(TriageAction::Archive, 4, "b@y.com"),
            entry(TriageAction::Archive, 5, "b@y.com"),
            entry(TriageAction::Archive, 6, "b@y.com"),
        ];

        assert_eq!(
            detect_rule(&log, &[]),
            Some(RuleSuggestion::new("b@y.com", TriageAction::Archive))
        );
    }

    #[test]
    fn first_appearing_sender_wins() {
        let log = vec![
            entry(TriageAction::Archive, 1, "a@x.com"),
            entry(TriageAction::Delete, 2, "b@y.com"),
            entry(TriageAction::Delete, 3, "b@y.com"),
            entry(TriageAction::Delete, 4, "b@y.com"),
            entry(TriageAction::Archive, 5, "a@x.com"),
            entry(TriageAction::Archive, 6, "a@x.com"),
        ];

        assert_eq!(
            detect_rule(&log, &[]),
            Some(RuleSuggestion::new("a@x.com", TriageAction::Archive))
        );
    }

    #[test]
    fn covered_first_sender_falls_through_to_next() {
        let log = vec![
            entry(TriageAction::Archive, 1, "a@x.com"),
            entry(TriageAction::Archive, 2, "a@x.com"),
            entry(TriageAction::Archive, 3, "a@x.com"),
            entry(TriageAction::Delete, 4, "b@y.com"),
            entry(TriageAction::Delete, 5, "b@y.com"),
            entry(TriageAction::Delete, 6, "b@y.com"),
        ];
        let rules = vec![rule("r1", "a@x.com", TriageAction::Archive)];

        assert_eq!(
            detect_rule(&log, &rules),
            Some(RuleSuggestion::new("b@y.com", TriageAction::Delete))
        );
    }

    #[test]
    fn enough_entries_spread_across_senders_yields_nothing() {
        let log = vec![
            entry(TriageAction::Delete, 1, "a@x.com"),
            entry(TriageAction::Delete, 2, "b@x.com"),
            entry(TriageAction::Delete, 3, "c@x.com"),
            entry(TriageAction::Delete, 4, "a@x.com"),
        ];

        assert_eq!(detect_rule(&log, &[]), None);
    }

    #[test]
    fn detection_is_idempotent() {
        let log = vec![
            entry(TriageAction::Delete, 1, "spam@y.com"),
            entry(TriageAction::Delete, 2, "spam@y.com"),
            entry(TriageAction::Delete, 3, "spam@y.com"),
        ];

        let first = detect_rule(&log, &[]);
        let second = detect_rule(&log, &[]);
        assert_eq!(first, second);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn unanimity_ignores_order_within_sender() {
        let forward = vec![
            entry(TriageAction::Delete, 1, "a@x.com"),
            entry(TriageAction::Archive, 2, "a@x.com"),
            entry(TriageAction::Delete, 3, "a@x.com"),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(detect_rule(&forward, &[]), None);
        assert_eq!(detect_rule(&reversed, &[]), None);
    }

    #[test]
    fn custom_threshold() {
        let log = vec![
            entry(TriageAction::Archive, 1, "news"),
            entry(TriageAction::Archive, 2, "news"),
        ];

        assert_eq!(
            RuleDetector::new(2).detect(&log, &[]),
            Some(RuleSuggestion::new("news", TriageAction::Archive))
        );
        assert_eq!(RuleDetector::new(0).min_actions(), 1);
    }

    #[test]
    fn declined_pairs_are_skipped() {
        let log = vec![
            entry(TriageAction::Delete, 1, "a@x.com"),
            entry(TriageAction::Delete, 2, "a@x.com"),
            entry(TriageAction::Delete, 3, "a@x.com"),
            entry(TriageAction::Archive, 4, "b@y.com"),
            entry(TriageAction::Archive, 5, "b@y.com"),
            entry(TriageAction::Archive, 6, "b@y.com"),
        ];
        let declined = vec![RuleSuggestion::new("a@x.com", TriageAction::Delete)];

        assert_eq!(
            RuleDetector::default().detect_excluding(&log, &[], &declined),
            Some(RuleSuggestion::new("b@y.com", TriageAction::Archive))
        );
    }
}
