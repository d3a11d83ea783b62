//! Patient operations.

use rusqlite::{params, OptionalExtension, Row};

use super::ClinicStore;
use crate::db::StoreResult;
use crate::models::{NewPatient, Patient};

const PATIENT_COLUMNS: &str = "patient_id, name, phone, age, gender, address, notes, created_at";

fn map_patient(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        age: row.get(3)?,
        gender: row.get(4)?,
        address: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl ClinicStore {
    /// Register a patient and return the new row id. The store accepts the
    /// fields as given; required-field checks live in the records service.
    pub fn add_patient(&self, patient: &NewPatient) -> StoreResult<i64> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO patients (name, phone, age, gender, address, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                patient.name,
                patient.phone,
                patient.age,
                patient.gender,
                patient.address,
                patient.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Update an existing patient. Returns false if the id is unknown.
    pub fn update_patient(&self, patient: &Patient) -> StoreResult<bool> {
        let conn = self.connect()?;
        let rows_affected = conn.execute(
            r#"
            UPDATE patients SET
                name = ?2,
                phone = ?3,
                age = ?4,
                gender = ?5,
                address = ?6,
                notes = ?7
            WHERE patient_id = ?1
            "#,
            params![
                patient.id,
                patient.name,
                patient.phone,
                patient.age,
                patient.gender,
                patient.address,
                patient.notes,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a patient. Cascades to all of that patient's visits.
    pub fn delete_patient(&self, patient_id: i64) -> StoreResult<bool> {
        let conn = self.connect()?;
        let rows_affected = conn.execute(
            "DELETE FROM patients WHERE patient_id = ?1",
            [patient_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by id.
    pub fn get_patient_by_id(&self, patient_id: i64) -> StoreResult<Option<Patient>> {
        let conn = self.connect()?;
        conn.query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = ?1"),
            [patient_id],
            map_patient,
        )
        .optional()
        .map_err(Into::into)
    }

    /// All patients, newest registration first.
    pub fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY patient_id DESC"
        ))?;
        let rows = stmt.query_map([], map_patient)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Most recently registered patients.
    pub fn recent_patients(&self, limit: usize) -> StoreResult<Vec<Patient>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY created_at DESC, patient_id DESC LIMIT ?1"
        ))?;
        let rows = stmt.query_map([limit as i64], map_patient)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Substring search over name and phone, ordered by name.
    pub fn search_patients(&self, query: &str) -> StoreResult<Vec<Patient>> {
        let pattern = format!("%{}%", query);
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {PATIENT_COLUMNS} FROM patients
            WHERE name LIKE ?1 OR phone LIKE ?1
            ORDER BY name ASC
            "#
        ))?;
        let rows = stmt.query_map([pattern], map_patient)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Total number of registered patients.
    pub fn total_patients_count(&self) -> StoreResult<i64> {
        let conn = self.connect()?;
        let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Patients whose registration date is today. Both sides of the
    /// comparison use SQLite's clock.
    pub fn new_patients_today(&self) -> StoreResult<i64> {
        let conn = self.connect()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM patients WHERE DATE(created_at) = DATE('now')",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
