//! SQLite-backed [`TriageStorage`].

use async_trait::async_trait;

use super::database::{Database, DatabaseError};
use super::queries::triage as q;
use crate::domain::{ActionLogEntry, RuleId, RuleSuggestion, TriageRule};
use crate::services::{TriageError, TriageResult, TriageStorage};

impl From<DatabaseError> for TriageError {
    fn from(e: DatabaseError) -> Self {
        TriageError::Storage(e.to_string())
    }
}

/// Triage persistence on top of the local database.
#[derive(Debug, Clone)]
pub struct SqliteTriageStorage {
    db: Database,
}

impl SqliteTriageStorage {
    /// Wraps an open database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns the underlying database.
    pub fn db(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl TriageStorage for SqliteTriageStorage {
    async fn append_action(&self, entry: &ActionLogEntry) -> TriageResult<()> {
        let entry = entry.clone();
        self.db
            .with_conn(move |conn| Ok(q::insert_action(conn, &entry)?))
            .await?;
        Ok(())
    }

    async fn action_log(&self) -> TriageResult<Vec<ActionLogEntry>> {
        Ok(self
            .db
            .with_conn(|conn| Ok(q::get_action_log(conn)?))
            .await?)
    }

    async fn save_rule(&self, rule: &TriageRule) -> TriageResult<()> {
        let rule = rule.clone();
        self.db
            .with_conn(move |conn| Ok(q::upsert_rule(conn, &rule)?))
            .await?;
        Ok(())
    }

    async fn rules(&self) -> TriageResult<Vec<TriageRule>> {
        Ok(self.db.with_conn(|conn| Ok(q::get_all_rules(conn)?)).await?)
    }

    async fn get_rule(&self, id: &RuleId) -> TriageResult<Option<TriageRule>> {
        let id = id.clone();
        Ok(self
            .db
            .with_conn(move |conn| Ok(q::get_rule_by_id(conn, &id)?))
            .await?)
    }

    async fn delete_rule(&self, id: &RuleId) -> TriageResult<()> {
        let id = id.clone();
        self.db
            .with_conn(move |conn| Ok(q::delete_rule(conn, &id)?))
            .await?;
        Ok(())
    }

    async fn record_declined(&self, suggestion: &RuleSuggestion) -> TriageResult<()> {
        let suggestion = suggestion.clone();
        self.db
            .with_conn(move |conn| Ok(q::insert_declined(conn, &suggestion)?))
            .await?;
        Ok(())
    }

    async fn declined(&self) -> TriageResult<Vec<RuleSuggestion>> {
        Ok(self.db.with_conn(|conn| Ok(q::get_declined(conn)?)).await?)
    }
}
