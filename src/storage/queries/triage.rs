//! Triage database queries.
//!
//! CRUD operations for the action log, triage rules and declined
//! suggestions.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{ActionLogEntry, EmailId, RuleId, RuleSuggestion, TriageAction, TriageRule};

// --- Action log ---

/// Appends an entry to the action log.
pub fn insert_action(conn: &Connection, entry: &ActionLogEntry) -> Result<()> {
    conn.execute(
        "INSERT INTO action_log (action, email_id, sender, timestamp) VALUES (?1, ?2, ?3, ?4)",
        params![
            entry.action.as_str(),
            entry.email_id.0,
            entry.sender,
            entry.timestamp,
        ],
    )?;
    Ok(())
}

/// Gets the action log in append order.
pub fn get_action_log(conn: &Connection) -> Result<Vec<ActionLogEntry>> {
    let mut stmt =
        conn.prepare("SELECT action, email_id, sender, timestamp FROM action_log ORDER BY seq")?;

    let entries = stmt.query_map([], row_to_action)?;
    entries.collect()
}

/// Counts log entries for a sender.
pub fn count_actions_for_sender(conn: &Connection, sender: &str) -> Result<u32> {
    conn.query_row(
        "SELECT COUNT(*) FROM action_log WHERE sender = ?1",
        params![sender],
        |row| row.get(0),
    )
}

// --- Rules ---

/// Inserts a rule, or updates it in place if the id already exists.
///
/// Updating keeps the original row so creation order is preserved.
pub fn upsert_rule(conn: &Connection, rule: &TriageRule) -> Result<()> {
    conn.execute(
        "INSERT INTO triage_rules (id, sender, action, created_at) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET sender = excluded.sender, action = excluded.action",
        params![
            rule.id.0,
            rule.sender,
            rule.action.as_str(),
            rule.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Gets a rule by ID.
pub fn get_rule_by_id(conn: &Connection, id: &RuleId) -> Result<Option<TriageRule>> {
    conn.query_row(
        "SELECT id, sender, action, created_at FROM triage_rules WHERE id = ?1",
        params![id.0],
        row_to_rule,
    )
    .optional()
}

/// Gets all rules in creation order.
pub fn get_all_rules(conn: &Connection) -> Result<Vec<TriageRule>> {
    let mut stmt =
        conn.prepare("SELECT id, sender, action, created_at FROM triage_rules ORDER BY rowid")?;

    let rules = stmt.query_map([], row_to_rule)?;
    rules.collect()
}

/// Deletes a rule.
pub fn delete_rule(conn: &Connection, id: &RuleId) -> Result<()> {
    conn.execute("DELETE FROM triage_rules WHERE id = ?1", params![id.0])?;
    Ok(())
}

// --- Declined suggestions ---

/// Records a declined suggestion. Declining the same pair twice is a no-op.
pub fn insert_declined(conn: &Connection, suggestion: &RuleSuggestion) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO declined_suggestions (sender, action, declined_at) VALUES (?1, ?2, ?3)",
        params![
            suggestion.sender,
            suggestion.action.as_str(),
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Gets all declined suggestions in the order they were declined.
pub fn get_declined(conn: &Connection) -> Result<Vec<RuleSuggestion>> {
    let mut stmt =
        conn.prepare("SELECT sender, action FROM declined_suggestions ORDER BY rowid")?;

    let declined = stmt.query_map([], |row| {
        Ok(RuleSuggestion {
            sender: row.get(0)?,
            action: parse_action(row, 1)?,
        })
    })?;
    declined.collect()
}

// --- Helper functions ---

fn parse_action(row: &rusqlite::Row, idx: usize) -> Result<TriageAction> {
    let value: String = row.get(idx)?;
    match value.as_str() {
        "delete" => Ok(TriageAction::Delete),
        "archive" => Ok(TriageAction::Archive),
        other => Err(rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown triage action: {other}").into(),
        )),
    }
}

fn row_to_action(row: &rusqlite::Row) -> Result<ActionLogEntry> {
    Ok(ActionLogEntry {
        action: parse_action(row, 0)?,
        email_id: EmailId(row.get(1)?),
        sender: row.get(2)?,
        timestamp: row.get(3)?,
    })
}

fn row_to_rule(row: &rusqlite::Row) -> Result<TriageRule> {
    let created_at_str: String = row.get(3)?;

    Ok(TriageRule {
        id: RuleId(row.get(0)?),
        sender: row.get(1)?,
        action: parse_action(row, 2)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        for migration in super::super::super::schema::all_migrations() {
            conn.execute_batch(migration).unwrap();
        }
        conn
    }

    fn make_entry(action: TriageAction, email_id: &str, sender: &str) -> ActionLogEntry {
        ActionLogEntry {
            action,
            email_id: EmailId::from(email_id),
            sender: sender.to_string(),
            timestamp: 1_700_000_000_000,
        }
    }

    fn make_rule(id: &str, sender: &str, action: TriageAction) -> TriageRule {
        RuleSuggestion::new(sender, action).into_rule(RuleId::from(id))
    }

    #[test]
    fn action_log_preserves_append_order() {
        let conn = setup();
        insert_action(&conn, &make_entry(TriageAction::Delete, "e1", "b@y.com")).unwrap();
        insert_action(&conn, &make_entry(TriageAction::Archive, "e2", "a@x.com")).unwrap();
        insert_action(&conn, &make_entry(TriageAction::Delete, "e3", "b@y.com")).unwrap();

        let log = get_action_log(&conn).unwrap();
        let ids: Vec<&str> = log.iter().map(|e| e.email_id.0.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2", "e3"]);
        assert_eq!(log[1].action, TriageAction::Archive);
        assert_eq!(count_actions_for_sender(&conn, "b@y.com").unwrap(), 2);
    }

    #[test]
    fn insert_and_get_rule() {
        let conn = setup();
        let rule = make_rule("r1", "spam@y.com", TriageAction::Delete);

        upsert_rule(&conn, &rule).unwrap();
        let fetched = get_rule_by_id(&conn, &RuleId::from("r1")).unwrap().unwrap();

        assert_eq!(fetched.sender, "spam@y.com");
        assert_eq!(fetched.action, TriageAction::Delete);
    }

    #[test]
    fn upsert_keeps_creation_order() {
        let conn = setup();
        upsert_rule(&conn, &make_rule("r1", "a", TriageAction::Delete)).unwrap();
        upsert_rule(&conn, &make_rule("r2", "b", TriageAction::Archive)).unwrap();
        upsert_rule(&conn, &make_rule("r1", "a", TriageAction::Archive)).unwrap();

        let rules = get_all_rules(&conn).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, RuleId::from("r1"));
        assert_eq!(rules[0].action, TriageAction::Archive);
    }

    #[test]
    fn remove_rule() {
        let conn = setup();
        upsert_rule(&conn, &make_rule("r1", "a", TriageAction::Delete)).unwrap();

        delete_rule(&conn, &RuleId::from("r1")).unwrap();
        assert!(get_rule_by_id(&conn, &RuleId::from("r1")).unwrap().is_none());
    }

    #[test]
    fn declined_pairs_are_deduplicated() {
        let conn = setup();
        let suggestion = RuleSuggestion::new("a@x.com", TriageAction::Delete);

        insert_declined(&conn, &suggestion).unwrap();
        insert_declined(&conn, &suggestion).unwrap();
        insert_declined(&conn, &RuleSuggestion::new("a@x.com", TriageAction::Archive)).unwrap();

        let declined = get_declined(&conn).unwrap();
        assert_eq!(declined.len(), 2);
        assert_eq!(declined[0], suggestion);
    }

    #[test]
    fn unknown_action_is_a_conversion_error() {
        let conn = setup();
        conn.execute(
            "INSERT INTO action_log (action, email_id, sender, timestamp) VALUES ('snooze', 'e1', 'x', 0)",
            [],
        )
        .unwrap();

        assert!(matches!(
            get_action_log(&conn),
            Err(rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _))
        ));
    }
}
