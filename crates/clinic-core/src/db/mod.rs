//! Database layer: two independent SQLite stores.
//!
//! [`clinic::ClinicStore`] holds patients, visits, login users and the
//! medicine-usage tally; [`pharmacy::PharmacyStore`] holds the medicine
//! catalog, per-variant stock and the movement ledger. Each store owns its
//! own database file and opens a dedicated connection per operation:
//! open, execute, commit, close, on every exit path. Multi-statement
//! mutations run inside that one connection's transaction, which is the
//! only atomicity guarantee the system provides.

pub mod clinic;
pub mod pharmacy;

pub use clinic::ClinicStore;
pub use pharmacy::PharmacyStore;

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

/// Storage errors shared by both stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Open a connection with foreign-key enforcement on.
pub(crate) fn open_connection(path: &Path) -> StoreResult<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(conn)
}
