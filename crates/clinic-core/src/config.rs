//! Application configuration.
//!
//! A small JSON file next to the executable: clinic identity for report
//! headers, and the paths of the two database files. A missing file means
//! defaults; malformed JSON is an error rather than a silent reset.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Clinic name shown on reports and the window title
    pub clinic_name: String,
    /// Doctor name shown on reports
    pub doctor_name: String,
    /// Patients/visits/users database file
    pub clinic_db_path: PathBuf,
    /// Catalog/stock/ledger database file
    pub pharmacy_db_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clinic_name: "Homoeo Clinic".into(),
            doctor_name: String::new(),
            clinic_db_path: PathBuf::from("clinic_data.db"),
            pharmacy_db_path: PathBuf::from("clinic_medicine.db"),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the config as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
