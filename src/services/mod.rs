//! Business services layer.
//!
//! Services sit between the application layer and storage:
//!
//! ```text
//! Application Layer (mailbox UI, commands)
//!          |
//!          v
//!    Services Layer  <-- You are here
//!          |
//!          v
//!       Storage
//! ```
//!
//! - [`detect_rule`] / [`RuleDetector`]: pure rule inference over the action log
//! - [`TriageService`]: suggestion lifecycle and rule application

mod rule_detector;
mod triage_service;

pub use rule_detector::{detect_rule, RuleDetector, MIN_ACTIONS_FOR_RULE};
pub use triage_service::{TriageError, TriageResult, TriageService, TriageStorage};
