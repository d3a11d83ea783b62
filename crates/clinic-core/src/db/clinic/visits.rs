//! Visit operations.
//!
//! Timestamps are stored as `YYYY-MM-DD HH:MM:SS` text so SQLite's `DATE()`
//! and `strftime()` work directly on the column; the row mapper parses them
//! back into [`chrono::NaiveDateTime`] on every read.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{params, Row};

use super::ClinicStore;
use crate::db::{StoreError, StoreResult};
use crate::models::{ActivityEntry, NewVisit, Visit, VisitWithPatient, VISIT_TIMESTAMP_FORMAT};

pub(crate) fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(VISIT_TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(text: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(text, VISIT_TIMESTAMP_FORMAT)
        .map_err(|e| StoreError::Constraint(format!("malformed visit timestamp {text:?}: {e}")))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Intermediate row struct: the timestamp arrives as text and is parsed in
/// the `TryFrom` conversion.
struct VisitRow {
    id: i64,
    patient_id: i64,
    visit_date: String,
    complaints: String,
    medicine: String,
    fees: i64,
    remarks: String,
    patient_name: Option<String>,
}

fn map_visit_row(row: &Row<'_>) -> rusqlite::Result<VisitRow> {
    Ok(VisitRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        visit_date: row.get(2)?,
        complaints: row.get(3)?,
        medicine: row.get(4)?,
        fees: row.get(5)?,
        remarks: row.get(6)?,
        patient_name: None,
    })
}

fn map_visit_row_with_patient(row: &Row<'_>) -> rusqlite::Result<VisitRow> {
    let mut visit = map_visit_row(row)?;
    visit.patient_name = Some(row.get(7)?);
    Ok(visit)
}

impl TryFrom<VisitRow> for Visit {
    type Error = StoreError;

    fn try_from(row: VisitRow) -> Result<Self, Self::Error> {
        Ok(Visit {
            id: row.id,
            patient_id: row.patient_id,
            visited_at: parse_timestamp(&row.visit_date)?,
            complaints: row.complaints,
            medicine: row.medicine,
            fees: row.fees,
            remarks: row.remarks,
        })
    }
}

impl TryFrom<VisitRow> for VisitWithPatient {
    type Error = StoreError;

    fn try_from(row: VisitRow) -> Result<Self, Self::Error> {
        let patient_name = row
            .patient_name
            .clone()
            .ok_or_else(|| StoreError::Constraint("visit row missing patient name".into()))?;
        let visit = Visit::try_from(row)?;
        Ok(VisitWithPatient {
            id: visit.id,
            patient_id: visit.patient_id,
            visited_at: visit.visited_at,
            complaints: visit.complaints,
            medicine: visit.medicine,
            fees: visit.fees,
            remarks: visit.remarks,
            patient_name,
        })
    }
}

const VISIT_COLUMNS: &str = "visit_id, patient_id, visit_date, complaints, medicine, fees, remarks";

const JOINED_COLUMNS: &str = "v.visit_id, v.patient_id, v.visit_date, v.complaints, v.medicine, v.fees, v.remarks, p.name";

impl ClinicStore {
    /// Record a visit and return the new row id.
    pub fn add_visit(&self, visit: &NewVisit) -> StoreResult<i64> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO visits (patient_id, visit_date, complaints, medicine, fees, remarks)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                visit.patient_id,
                format_timestamp(visit.visited_at),
                visit.complaints,
                visit.medicine,
                visit.fees,
                visit.remarks,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Update an existing visit's details. The owning patient never changes.
    pub fn update_visit(&self, visit: &Visit) -> StoreResult<bool> {
        let conn = self.connect()?;
        let rows_affected = conn.execute(
            r#"
            UPDATE visits SET
                visit_date = ?2,
                complaints = ?3,
                medicine = ?4,
                fees = ?5,
                remarks = ?6
            WHERE visit_id = ?1
            "#,
            params![
                visit.id,
                format_timestamp(visit.visited_at),
                visit.complaints,
                visit.medicine,
                visit.fees,
                visit.remarks,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a single visit.
    pub fn delete_visit(&self, visit_id: i64) -> StoreResult<bool> {
        let conn = self.connect()?;
        let rows_affected = conn.execute("DELETE FROM visits WHERE visit_id = ?1", [visit_id])?;
        Ok(rows_affected > 0)
    }

    /// A patient's visits, most recent first, optionally capped.
    pub fn visits_for_patient(
        &self,
        patient_id: i64,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Visit>> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {VISIT_COLUMNS} FROM visits WHERE patient_id = ?1 ORDER BY visit_date DESC LIMIT ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let rows = stmt.query_map(params![patient_id, limit], map_visit_row)?;

        let mut visits = Vec::new();
        for row in rows {
            visits.push(row?.try_into()?);
        }
        Ok(visits)
    }

    /// All visits joined with patient name, latest first.
    pub fn all_visits_with_patient(&self) -> StoreResult<Vec<VisitWithPatient>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM visits v
            JOIN patients p ON v.patient_id = p.patient_id
            ORDER BY v.visit_date DESC
            "#
        ))?;
        let rows = stmt.query_map([], map_visit_row_with_patient)?;

        let mut visits = Vec::new();
        for row in rows {
            visits.push(row?.try_into()?);
        }
        Ok(visits)
    }

    /// Visits on one calendar day, latest first.
    pub fn visits_for_date(&self, date: NaiveDate) -> StoreResult<Vec<VisitWithPatient>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM visits v
            JOIN patients p ON v.patient_id = p.patient_id
            WHERE DATE(v.visit_date) = ?1
            ORDER BY v.visit_date DESC
            "#
        ))?;
        let rows = stmt.query_map([format_date(date)], map_visit_row_with_patient)?;

        let mut visits = Vec::new();
        for row in rows {
            visits.push(row?.try_into()?);
        }
        Ok(visits)
    }

    /// Today's visits, on the local wall clock.
    pub fn today_visits(&self) -> StoreResult<Vec<VisitWithPatient>> {
        self.visits_for_date(Local::now().date_naive())
    }

    /// Visits whose date falls in the inclusive range.
    pub fn visits_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<VisitWithPatient>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM visits v
            JOIN patients p ON v.patient_id = p.patient_id
            WHERE DATE(v.visit_date) BETWEEN ?1 AND ?2
            ORDER BY v.visit_date DESC
            "#
        ))?;
        let rows = stmt.query_map(
            params![format_date(start), format_date(end)],
            map_visit_row_with_patient,
        )?;

        let mut visits = Vec::new();
        for row in rows {
            visits.push(row?.try_into()?);
        }
        Ok(visits)
    }

    /// Latest activity for the dashboard: who came in, when, and why.
    pub fn recent_activity(&self, limit: usize) -> StoreResult<Vec<ActivityEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT v.visit_date, p.name, p.gender, p.age, v.complaints, p.patient_id
            FROM visits v
            JOIN patients p ON v.patient_id = p.patient_id
            ORDER BY v.visit_date DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (visit_date, patient_name, gender, age, complaints, patient_id) = row?;
            entries.push(ActivityEntry {
                visited_at: parse_timestamp(&visit_date)?,
                patient_name,
                gender,
                age,
                complaints,
                patient_id,
            });
        }
        Ok(entries)
    }

    /// Visit count per patient, for list-view badges.
    pub fn visit_count_by_patient(&self) -> StoreResult<HashMap<i64, i64>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT patient_id, COUNT(*) FROM visits GROUP BY patient_id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<HashMap<_, _>, _>>().map_err(Into::into)
    }
}
