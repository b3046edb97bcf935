//! heap-triage - Learns email triage rules from user behavior
//!
//! This crate watches the user's manual archive/delete actions, proposes
//! per-sender automation rules, and applies accepted rules to incoming
//! mail.

pub mod config;
pub mod domain;
pub mod services;
pub mod storage;

pub use services::{detect_rule, TriageService};
