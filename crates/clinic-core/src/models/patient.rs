//! Patient models.

use serde::{Deserialize, Serialize};

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Row id assigned by the clinic store
    pub id: i64,
    /// Patient name (required)
    pub name: String,
    /// Contact phone number
    pub phone: Option<String>,
    /// Age in years
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub address: Option<String>,
    /// Free-text clinical notes
    pub notes: Option<String>,
    /// Creation timestamp (set by the store)
    pub created_at: String,
}

/// Input for registering a new patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub name: String,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl NewPatient {
    /// Create a patient input with the required name; everything else empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient_defaults() {
        let patient = NewPatient::new("Ali Khan");
        assert_eq!(patient.name, "Ali Khan");
        assert!(patient.phone.is_none());
        assert!(patient.notes.is_none());
    }
}
