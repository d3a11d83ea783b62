//! Clinic record-keeper core.
//!
//! Persistence and inventory-movement layer for a single-clinic desktop
//! record keeper. Two independent SQLite stores sit side by side:
//!
//! ```text
//! UI / report collaborators (external)
//!                 │
//!                 ▼
//!  RecordsService    MedicineService    InventoryService   (validation)
//!        │                  │                 │
//!        ▼                  ▼                 ▼
//!   ClinicStore            PharmacyStore                    (storage)
//!   patients, visits       catalog (master/variant)
//!   users, usage tally     stock counter + movement ledger
//!   earnings, CSV export   globule consumables
//!        │                      │
//!        ▼                      ▼
//!   clinic_data.db         clinic_medicine.db
//! ```
//!
//! Every store method opens a dedicated connection, commits, and closes it
//! before returning; multi-statement mutations (stock counter + ledger
//! row) run inside that one connection's transaction. There is no pooling
//! and no cross-call transaction.
//!
//! # Modules
//!
//! - [`db`]: the two SQLite stores
//! - [`models`]: named record types returned by every query
//! - [`service`]: input validation wrappers over the stores
//! - [`config`]: application configuration file

pub mod config;
pub mod db;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::{ClinicStore, PharmacyStore, StoreError, StoreResult};
pub use models::{
    ActivityEntry, GlobuleStock, LowStockItem, MedicineCategory, MedicineDetails, MedicineMaster,
    MedicineUsage, MedicineVariant, MovementKind, NewMedicine, NewPatient, NewVariant, NewVisit,
    Patient, ReferenceKind, StockDrift, StockLevel, StockMovement, UserAccount, VariantWithStock,
    Visit, VisitWithPatient,
};
pub use service::{
    InventoryService, MedicineService, RecordsService, ServiceError, ServiceResult,
};
