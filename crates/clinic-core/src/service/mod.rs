//! Validation wrappers over the stores.
//!
//! Services guard the store entry points with precondition checks and
//! return a closed set of failure kinds, so callers can tell a business
//! rule rejection from a storage failure.

mod inventory;
mod medicine;
mod records;

pub use inventory::InventoryService;
pub use medicine::MedicineService;
pub use records::{parse_visit_timestamp, split_medicine_names, RecordsService};

use thiserror::Error;

use crate::db::StoreError;

/// Service-level errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InsufficientStock {
                available,
                requested,
            } => ServiceError::InsufficientStock {
                available,
                requested,
            },
            other => ServiceError::Storage(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_is_lifted_from_store_error() {
        let store_err = StoreError::InsufficientStock {
            available: 2,
            requested: 5,
        };
        let service_err: ServiceError = store_err.into();
        assert!(matches!(
            service_err,
            ServiceError::InsufficientStock {
                available: 2,
                requested: 5
            }
        ));
    }

    #[test]
    fn test_other_store_errors_wrap_as_storage() {
        let store_err = StoreError::NotFound("variant 9".into());
        let service_err: ServiceError = store_err.into();
        assert!(matches!(service_err, ServiceError::Storage(_)));
    }
}
