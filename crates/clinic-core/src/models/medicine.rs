//! Medicine catalog models: the usage tally kept by the clinic store, and
//! the master/variant catalog kept by the pharmacy store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Denormalized per-name usage counter. A popularity index for prescribing,
/// not a source of truth for stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineUsage {
    pub id: i64,
    /// Medicine name as written on visits (uniqueness key)
    pub name: String,
    pub description: Option<String>,
    /// How many visits have recorded this name
    pub times_used: i64,
    /// Timestamp of the most recent use
    pub last_used: Option<String>,
    pub created_at: String,
}

/// Catalog category of a medicine master entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MedicineCategory {
    /// Mother tincture
    Q,
    Dilution,
    Biochemic,
    Complex,
    Nosode,
    Globule,
    Other,
}

impl MedicineCategory {
    /// Stored representation, matching the schema CHECK constraint.
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicineCategory::Q => "Q",
            MedicineCategory::Dilution => "DILUTION",
            MedicineCategory::Biochemic => "BIOCHEMIC",
            MedicineCategory::Complex => "COMPLEX",
            MedicineCategory::Nosode => "NOSODE",
            MedicineCategory::Globule => "GLOBULE",
            MedicineCategory::Other => "OTHER",
        }
    }

    /// Parse the stored representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Q" => Some(MedicineCategory::Q),
            "DILUTION" => Some(MedicineCategory::Dilution),
            "BIOCHEMIC" => Some(MedicineCategory::Biochemic),
            "COMPLEX" => Some(MedicineCategory::Complex),
            "NOSODE" => Some(MedicineCategory::Nosode),
            "GLOBULE" => Some(MedicineCategory::Globule),
            "OTHER" => Some(MedicineCategory::Other),
            _ => None,
        }
    }
}

/// A catalog entry: what a medicine is, independent of sellable form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineMaster {
    pub id: i64,
    pub name: String,
    pub category: MedicineCategory,
    pub manufacturer: Option<String>,
    /// Inactive entries are hidden from search but keep their history
    pub is_active: bool,
    /// Restricted items need explicit sign-off at the dispensing desk
    pub is_restricted: bool,
    pub notes: Option<String>,
}

/// Input for creating a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMedicine {
    pub name: String,
    pub category: MedicineCategory,
    pub manufacturer: Option<String>,
    pub is_restricted: bool,
    pub notes: Option<String>,
}

impl NewMedicine {
    pub fn new(name: impl Into<String>, category: MedicineCategory) -> Self {
        Self {
            name: name.into(),
            category,
            manufacturer: None,
            is_restricted: false,
            notes: None,
        }
    }
}

/// A concrete sellable form of a catalog medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineVariant {
    pub id: i64,
    /// Owning master entry (cascade-deleted with it)
    pub medicine_id: i64,
    /// 6C, 30C, 200C, 1M, Q, ...
    pub potency: Option<String>,
    /// liquid / tablet / globule / ointment
    pub form: Option<String>,
    /// 30ml, 100ml, 450gm, ...
    pub bottle_size: Option<String>,
    /// ml / tablets / pills / gm
    pub unit_type: Option<String>,
    /// Threshold for the low-stock scan
    pub min_stock_level: i64,
    pub expiry_date: Option<NaiveDate>,
}

/// Input for creating a variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVariant {
    pub medicine_id: i64,
    pub potency: Option<String>,
    pub form: Option<String>,
    pub bottle_size: Option<String>,
    pub unit_type: Option<String>,
    pub min_stock_level: i64,
    pub expiry_date: Option<NaiveDate>,
}

impl NewVariant {
    pub fn new(medicine_id: i64) -> Self {
        Self {
            medicine_id,
            potency: None,
            form: None,
            bottle_size: None,
            unit_type: None,
            min_stock_level: 5,
            expiry_date: None,
        }
    }
}

/// A variant joined with its current stock quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantWithStock {
    pub variant: MedicineVariant,
    pub quantity_available: i64,
}

/// A master entry assembled with all its variants and their stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineDetails {
    pub master: MedicineMaster,
    pub variants: Vec<VariantWithStock>,
}
