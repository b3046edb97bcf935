//! Database query modules for CRUD operations.
//!
//! Each module provides synchronous functions over a `Connection`; callers
//! run them through [`Database::with_conn`](super::Database::with_conn).

pub mod triage;
