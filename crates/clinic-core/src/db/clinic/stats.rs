//! Earnings aggregates for the dashboard and reports.
//!
//! All sums coalesce an empty match to zero, so "no visits" reads as 0
//! earned rather than an error.

use chrono::{Local, NaiveDate};

use super::ClinicStore;
use crate::db::StoreResult;

impl ClinicStore {
    /// Fees collected on one calendar day.
    pub fn earnings_for_date(&self, date: NaiveDate) -> StoreResult<i64> {
        let conn = self.connect()?;
        let total = conn.query_row(
            "SELECT COALESCE(SUM(fees), 0) FROM visits WHERE DATE(visit_date) = ?1",
            [date.format("%Y-%m-%d").to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Fees collected today, on the local wall clock.
    pub fn today_earnings(&self) -> StoreResult<i64> {
        self.earnings_for_date(Local::now().date_naive())
    }

    /// Fees collected in one calendar month.
    pub fn month_earnings(&self, year: i32, month: u32) -> StoreResult<i64> {
        let conn = self.connect()?;
        let total = conn.query_row(
            r#"
            SELECT COALESCE(SUM(fees), 0) FROM visits
            WHERE strftime('%Y', visit_date) = ?1
              AND strftime('%m', visit_date) = ?2
            "#,
            [year.to_string(), format!("{month:02}")],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Fees collected in an inclusive date range.
    pub fn earnings_in_range(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<i64> {
        let conn = self.connect()?;
        let total = conn.query_row(
            "SELECT COALESCE(SUM(fees), 0) FROM visits WHERE DATE(visit_date) BETWEEN ?1 AND ?2",
            [
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string(),
            ],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// All fees ever collected.
    pub fn total_earnings(&self) -> StoreResult<i64> {
        let conn = self.connect()?;
        let total = conn.query_row("SELECT COALESCE(SUM(fees), 0) FROM visits", [], |row| {
            row.get(0)
        })?;
        Ok(total)
    }
}
