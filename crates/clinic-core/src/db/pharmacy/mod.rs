//! Pharmacy store: medicine catalog (master/variant), per-variant stock,
//! the append-only movement ledger, and globule consumables.
//!
//! Contract: every stock mutation writes the counter and a ledger row
//! inside one transaction; both land or neither does.

mod catalog;
mod globules;
mod schema;
mod stock;

pub use schema::SCHEMA;

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::{open_connection, StoreResult};

/// Catalog + stock + ledger store. Holds only the database path; every
/// operation opens its own short-lived connection.
pub struct PharmacyStore {
    db_path: PathBuf,
}

impl PharmacyStore {
    /// Open the store, creating the schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let store = Self {
            db_path: path.as_ref().to_path_buf(),
        };
        let conn = store.connect()?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(path = %store.db_path.display(), "pharmacy store ready");
        Ok(store)
    }

    pub(crate) fn connect(&self) -> StoreResult<Connection> {
        open_connection(&self.db_path)
    }
}
