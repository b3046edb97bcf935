//! Local persistence for triage data.
//!
//! - SQLite database holding the action log, rules and declined suggestions
//! - Async-safe database operations via tokio::task::spawn_blocking
//! - [`SqliteTriageStorage`], the database-backed
//!   [`TriageStorage`](crate::services::TriageStorage)

mod database;
pub mod queries;
mod schema;
mod triage_store;

pub use database::{Database, DatabaseError, Result};
pub use triage_store::SqliteTriageStorage;

use std::path::Path;

/// Opens the database at `path` and wraps it as triage storage.
pub async fn open_triage_storage(path: impl AsRef<Path>) -> Result<SqliteTriageStorage> {
    let db = Database::open(path).await?;
    Ok(SqliteTriageStorage::new(db))
}

/// Creates triage storage over an in-memory database for testing.
pub async fn in_memory_triage_storage() -> Result<SqliteTriageStorage> {
    let db = Database::open_in_memory().await?;
    Ok(SqliteTriageStorage::new(db))
}
