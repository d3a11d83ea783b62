//! Clinic store: patients, visits, login users, medicine-usage tally, and
//! the aggregate queries the dashboard and reports read.

mod export;
mod patients;
mod schema;
mod stats;
mod tally;
mod users;
mod visits;

pub use schema::SCHEMA;

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::{open_connection, StoreResult};

/// Durable CRUD store for the clinic's day-to-day records.
///
/// Holds only the database path; every operation opens its own short-lived
/// connection and closes it before returning.
pub struct ClinicStore {
    db_path: PathBuf,
}

impl ClinicStore {
    /// Open the store, creating the schema if needed. Seeds the default
    /// `admin`/`admin` account when the users table is empty (see
    /// [`ClinicStore::has_default_credentials`]).
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let store = Self {
            db_path: path.as_ref().to_path_buf(),
        };
        let conn = store.connect()?;
        conn.execute_batch(SCHEMA)?;
        store.seed_default_user(&conn)?;
        tracing::debug!(path = %store.db_path.display(), "clinic store ready");
        Ok(store)
    }

    pub(crate) fn connect(&self) -> StoreResult<Connection> {
        open_connection(&self.db_path)
    }

    fn seed_default_user(&self, conn: &Connection) -> StoreResult<()> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if count == 0 {
            conn.execute(
                "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
                rusqlite::params!["admin", users::hash_password("admin")],
            )?;
            tracing::warn!("seeded default admin credentials; change them on first login");
        }
        Ok(())
    }
}
