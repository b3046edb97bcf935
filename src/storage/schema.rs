//! SQL schema definitions as const strings.
//!
//! Contains the SQLite schema for the triage action log and rules.

/// SQL to create the action_log table.
///
/// `seq` preserves append order, which decides which sender is suggested
/// first.
pub const CREATE_ACTION_LOG: &str = r#"
CREATE TABLE IF NOT EXISTS action_log (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    action TEXT NOT NULL,
    email_id TEXT NOT NULL,
    sender TEXT NOT NULL,
    timestamp INTEGER NOT NULL
)
"#;

/// SQL to create action log indexes.
pub const CREATE_ACTION_LOG_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_action_log_sender ON action_log(sender)
"#;

/// SQL to create the triage_rules table.
pub const CREATE_TRIAGE_RULES: &str = r#"
CREATE TABLE IF NOT EXISTS triage_rules (
    id TEXT PRIMARY KEY,
    sender TEXT NOT NULL,
    action TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the declined_suggestions table.
pub const CREATE_DECLINED_SUGGESTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS declined_suggestions (
    sender TEXT NOT NULL,
    action TEXT NOT NULL,
    declined_at TEXT NOT NULL,
    PRIMARY KEY (sender, action)
)
"#;

/// Returns all migrations in order.
pub fn all_migrations() -> Vec<&'static str> {
    vec![
        CREATE_ACTION_LOG,
        CREATE_ACTION_LOG_INDEXES,
        CREATE_TRIAGE_RULES,
        CREATE_DECLINED_SUGGESTIONS,
    ]
}
