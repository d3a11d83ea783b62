//! Inventory models: the per-variant stock counter, the append-only
//! movement ledger, and the size-keyed globule consumable counter.

use serde::{Deserialize, Serialize};

/// Kind of a stock movement. `In` and `Return` add to stock; `Out` and
/// `Expired` remove from it. `Adjust` is accepted by the schema for
/// hand-entered corrections but application code records adjustments as
/// `In`/`Out` movements tagged [`ReferenceKind::Adjustment`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MovementKind {
    In,
    Out,
    Expired,
    Adjust,
    Return,
}

impl MovementKind {
    /// Stored representation, matching the schema CHECK constraint.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::In => "IN",
            MovementKind::Out => "OUT",
            MovementKind::Expired => "EXPIRED",
            MovementKind::Adjust => "ADJUST",
            MovementKind::Return => "RETURN",
        }
    }

    /// Parse the stored representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IN" => Some(MovementKind::In),
            "OUT" => Some(MovementKind::Out),
            "EXPIRED" => Some(MovementKind::Expired),
            "ADJUST" => Some(MovementKind::Adjust),
            "RETURN" => Some(MovementKind::Return),
            _ => None,
        }
    }
}

/// Reason-code tag on a stock movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReferenceKind {
    Purchase,
    Prescription,
    Disposal,
    Adjustment,
}

impl ReferenceKind {
    /// Stored representation, matching the schema CHECK constraint.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Purchase => "PURCHASE",
            ReferenceKind::Prescription => "PRESCRIPTION",
            ReferenceKind::Disposal => "DISPOSAL",
            ReferenceKind::Adjustment => "ADJUSTMENT",
        }
    }

    /// Parse the stored representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PURCHASE" => Some(ReferenceKind::Purchase),
            "PRESCRIPTION" => Some(ReferenceKind::Prescription),
            "DISPOSAL" => Some(ReferenceKind::Disposal),
            "ADJUSTMENT" => Some(ReferenceKind::Adjustment),
            _ => None,
        }
    }
}

/// Current stock for one variant. The only mutable "current state" cell in
/// the pharmacy store; everything else is descriptive or historical.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockLevel {
    pub variant_id: i64,
    pub quantity_available: i64,
    pub last_updated: String,
}

/// One append-only ledger row. Never updated or deleted by application
/// logic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockMovement {
    pub id: i64,
    pub variant_id: i64,
    pub kind: MovementKind,
    /// Always positive; direction comes from `kind`
    pub quantity: i64,
    pub reference: ReferenceKind,
    /// Prescription id, purchase order id, or similar free text
    pub reference_id: Option<String>,
    pub notes: String,
    pub recorded_at: String,
}

/// A row from the low-stock threshold scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LowStockItem {
    pub variant_id: i64,
    pub medicine_name: String,
    pub potency: Option<String>,
    pub form: Option<String>,
    pub quantity_available: i64,
    pub min_stock_level: i64,
}

/// Raw globule pellet stock for one size class, independent of the
/// master/variant hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobuleStock {
    /// Numeric size class (20, 30, 40, ...)
    pub size: i64,
    pub quantity_available: i64,
    pub min_level: i64,
}

/// A reconciliation finding: the cached counter disagrees with the net sum
/// of the ledger for this variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockDrift {
    pub variant_id: i64,
    /// Value of the `quantity_available` counter
    pub recorded: i64,
    /// Net sum over the movement ledger
    pub ledger: i64,
}
