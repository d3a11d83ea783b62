//! Visit models.
//!
//! A visit's timestamp is a canonical [`NaiveDateTime`] everywhere above the
//! SQL layer; free-form date strings are parsed once, at the service
//! boundary, and never reach disk unvalidated.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Storage format for visit timestamps.
pub const VISIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A recorded patient visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    /// Row id assigned by the clinic store
    pub id: i64,
    /// Owning patient
    pub patient_id: i64,
    /// When the visit took place (caller-settable, backdating allowed)
    pub visited_at: NaiveDateTime,
    /// Free-text complaint / history
    pub complaints: String,
    /// Comma-separated informal medicine list, not normalized
    pub medicine: String,
    /// Consultation fee
    pub fees: i64,
    pub remarks: String,
}

/// Input for recording a new visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVisit {
    pub patient_id: i64,
    pub visited_at: NaiveDateTime,
    pub complaints: String,
    pub medicine: String,
    pub fees: i64,
    pub remarks: String,
}

impl NewVisit {
    /// Create a visit input for a patient at a given time.
    pub fn new(patient_id: i64, visited_at: NaiveDateTime) -> Self {
        Self {
            patient_id,
            visited_at,
            complaints: String::new(),
            medicine: String::new(),
            fees: 0,
            remarks: String::new(),
        }
    }
}

/// A visit joined with the owning patient's name, for list views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitWithPatient {
    pub id: i64,
    pub patient_id: i64,
    pub visited_at: NaiveDateTime,
    pub complaints: String,
    pub medicine: String,
    pub fees: i64,
    pub remarks: String,
    pub patient_name: String,
}

/// A dashboard activity row: who came in, when, and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub visited_at: NaiveDateTime,
    pub patient_name: String,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub complaints: String,
    pub patient_id: i64,
}
