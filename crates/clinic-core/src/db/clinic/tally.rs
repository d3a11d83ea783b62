//! Medicine-usage tally operations.
//!
//! One row per distinct medicine name ever written on a visit. The caller
//! (records service) splits a visit's comma-separated medicine text and
//! upserts once per name; this module never parses that text itself.

use rusqlite::{params, OptionalExtension, Row};

use super::ClinicStore;
use crate::db::StoreResult;
use crate::models::MedicineUsage;

const USAGE_COLUMNS: &str = "usage_id, name, description, times_used, last_used, created_at";

fn map_usage(row: &Row<'_>) -> rusqlite::Result<MedicineUsage> {
    Ok(MedicineUsage {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        times_used: row.get(3)?,
        last_used: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl ClinicStore {
    /// Idempotent upsert: create the tally row with a count of 1, or bump
    /// the counter and stamp `last_used`. Call once per distinct name.
    pub fn record_medicine_use(&self, name: &str) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO medicine_usage (name, times_used, last_used)
            VALUES (?1, 1, datetime('now'))
            ON CONFLICT(name) DO UPDATE SET
                times_used = times_used + 1,
                last_used = excluded.last_used
            "#,
            [name],
        )?;
        Ok(())
    }

    /// Add a tally entry by hand (counter starts at zero).
    pub fn add_usage_entry(&self, name: &str, description: Option<&str>) -> StoreResult<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO medicine_usage (name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Rename or re-describe a tally entry.
    pub fn update_usage_entry(
        &self,
        usage_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<bool> {
        let conn = self.connect()?;
        let rows_affected = conn.execute(
            "UPDATE medicine_usage SET name = ?2, description = ?3 WHERE usage_id = ?1",
            params![usage_id, name, description],
        )?;
        Ok(rows_affected > 0)
    }

    /// Remove a tally entry.
    pub fn delete_usage_entry(&self, usage_id: i64) -> StoreResult<bool> {
        let conn = self.connect()?;
        let rows_affected =
            conn.execute("DELETE FROM medicine_usage WHERE usage_id = ?1", [usage_id])?;
        Ok(rows_affected > 0)
    }

    /// Get a tally entry by exact name.
    pub fn get_usage_by_name(&self, name: &str) -> StoreResult<Option<MedicineUsage>> {
        let conn = self.connect()?;
        conn.query_row(
            &format!("SELECT {USAGE_COLUMNS} FROM medicine_usage WHERE name = ?1"),
            [name],
            map_usage,
        )
        .optional()
        .map_err(Into::into)
    }

    /// All tally entries, most used first.
    pub fn list_medicine_usage(&self) -> StoreResult<Vec<MedicineUsage>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USAGE_COLUMNS} FROM medicine_usage ORDER BY times_used DESC, name ASC"
        ))?;
        let rows = stmt.query_map([], map_usage)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Substring search over tally names, most used first.
    pub fn search_medicine_usage(&self, query: &str) -> StoreResult<Vec<MedicineUsage>> {
        let pattern = format!("%{}%", query);
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USAGE_COLUMNS} FROM medicine_usage WHERE name LIKE ?1 ORDER BY times_used DESC"
        ))?;
        let rows = stmt.query_map([pattern], map_usage)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
