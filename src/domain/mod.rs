//! Domain layer types for heap-triage.
//!
//! Emails as triage sees them, the user's action log, and the automation
//! rules inferred from it.

mod email;
mod triage;
mod types;

pub use email::{Address, Email};
pub use triage::{
    ActionLogEntry, RuleApplication, RuleSuggestion, SuggestionState, TriageAction, TriageRule,
};
pub use types::{EmailId, RuleId};
