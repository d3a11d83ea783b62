//! Patient CSV export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ClinicStore;
use crate::db::StoreResult;

impl ClinicStore {
    /// Stream all patients to a CSV file with a fixed header row, in
    /// registration order. Returns the number of data rows written.
    pub fn export_patients_csv<P: AsRef<Path>>(&self, filepath: P) -> StoreResult<usize> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT patient_id, name, phone, age, gender, address, notes, created_at
            FROM patients
            ORDER BY patient_id ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut writer = BufWriter::new(File::create(filepath)?);
        writeln!(writer, "ID,Name,Phone,Age,Gender,Address,Notes,Created At")?;

        let mut written = 0;
        for row in rows {
            let (id, name, phone, age, gender, address, notes, created_at) = row?;
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{}",
                id,
                escape_csv(&name),
                escape_csv(phone.as_deref().unwrap_or("")),
                age.map(|a| a.to_string()).unwrap_or_default(),
                escape_csv(gender.as_deref().unwrap_or("")),
                escape_csv(address.as_deref().unwrap_or("")),
                escape_csv(notes.as_deref().unwrap_or("")),
                escape_csv(&created_at),
            )?;
            written += 1;
        }
        writer.flush()?;

        tracing::debug!(rows = written, "exported patients to CSV");
        Ok(written)
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::setup_store;
    use super::escape_csv;
    use crate::models::NewPatient;

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_export_patients_csv() {
        let (dir, store) = setup_store();

        let mut first = NewPatient::new("Ali Khan");
        first.phone = Some("0300-1111111".into());
        first.age = Some(30);
        store.add_patient(&first).unwrap();

        let mut second = NewPatient::new("Ahmed, Sara");
        second.notes = Some("allergic to \"sulphur\"".into());
        store.add_patient(&second).unwrap();

        let path = dir.path().join("patients.csv");
        let written = store.export_patients_csv(&path).unwrap();
        assert_eq!(written, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID,Name,Phone,Age,Gender,Address,Notes,Created At");
        assert!(lines[1].starts_with("1,Ali Khan,0300-1111111,30,"));
        assert!(lines[2].contains("\"Ahmed, Sara\""));
        assert!(lines[2].contains("\"allergic to \"\"sulphur\"\"\""));
    }

    #[test]
    fn test_export_to_bad_path_is_io_error() {
        let (dir, store) = setup_store();
        let path = dir.path().join("no-such-dir").join("patients.csv");
        let result = store.export_patients_csv(&path);
        assert!(matches!(result, Err(crate::db::StoreError::Io(_))));
    }
}
