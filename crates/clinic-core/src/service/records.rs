//! Records service: input validation for patients and visits over the
//! clinic store.
//!
//! This is where free-form UI input stops: dates are parsed to a canonical
//! timestamp (unparsable input is rejected, not deferred to read-time
//! filtering), and a visit's comma-separated medicine text is split here,
//! with one tally upsert per distinct name.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{ServiceError, ServiceResult};
use crate::db::ClinicStore;
use crate::models::{NewPatient, NewVisit};

pub struct RecordsService<'a> {
    store: &'a ClinicStore,
}

impl<'a> RecordsService<'a> {
    pub fn new(store: &'a ClinicStore) -> Self {
        Self { store }
    }

    /// Register a patient. The name must be non-blank; it is stored
    /// trimmed.
    pub fn register_patient(&self, patient: &NewPatient) -> ServiceResult<i64> {
        let name = patient.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("patient name is required".into()));
        }

        let mut patient = patient.clone();
        patient.name = name.to_string();
        Ok(self.store.add_patient(&patient)?)
    }

    /// Record a visit from form input. Parses and validates the date
    /// string, rejects negative fees, then upserts the usage tally once
    /// per distinct medicine name in the free-text list.
    pub fn record_visit(
        &self,
        patient_id: i64,
        complaints: &str,
        medicine_text: &str,
        fees: i64,
        remarks: &str,
        date_str: &str,
    ) -> ServiceResult<i64> {
        if fees < 0 {
            return Err(ServiceError::Validation("fees must not be negative".into()));
        }
        let visited_at = parse_visit_timestamp(date_str)?;

        if self.store.get_patient_by_id(patient_id)?.is_none() {
            return Err(ServiceError::Storage(crate::db::StoreError::NotFound(
                format!("patient {patient_id}"),
            )));
        }

        let mut visit = NewVisit::new(patient_id, visited_at);
        visit.complaints = complaints.to_string();
        visit.medicine = medicine_text.to_string();
        visit.fees = fees;
        visit.remarks = remarks.to_string();
        let visit_id = self.store.add_visit(&visit)?;

        for name in split_medicine_names(medicine_text) {
            self.store.record_medicine_use(&name)?;
        }

        Ok(visit_id)
    }
}

/// Parse a visit timestamp from form input. Accepted shapes:
/// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM`, and `YYYY-MM-DD` (midnight).
pub fn parse_visit_timestamp(input: &str) -> ServiceResult<NaiveDateTime> {
    let trimmed = input.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(at);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(ServiceError::Validation(format!(
        "unrecognized visit date: {trimmed:?}"
    )))
}

/// Split a comma-separated medicine list into distinct trimmed names,
/// preserving first-seen order.
pub fn split_medicine_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for raw in text.split(',') {
        let name = raw.trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}
