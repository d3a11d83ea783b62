//! Stock mutations and the movement ledger.
//!
//! Invariant maintained by construction: the `quantity_available` counter
//! and the ledger are written together inside one transaction, never
//! separately. [`PharmacyStore::check_stock_drift`] verifies the
//! counter-equals-ledger-fold property but repairs nothing.

use rusqlite::{params, OptionalExtension, Row};

use super::PharmacyStore;
use crate::db::{StoreError, StoreResult};
use crate::models::{
    LowStockItem, MovementKind, ReferenceKind, StockDrift, StockLevel, StockMovement,
};

/// Net quantity of a movement row: IN/RETURN/ADJUST add, OUT/EXPIRED remove.
const SIGNED_QUANTITY: &str =
    "CASE WHEN movement_type IN ('OUT', 'EXPIRED') THEN -quantity ELSE quantity END";

fn map_movement(row: &Row<'_>) -> rusqlite::Result<(i64, i64, String, i64, String, Option<String>, String, String)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

impl PharmacyStore {
    /// Increment a variant's stock and append the matching `IN` movement.
    /// Both writes commit together or neither does.
    pub fn add_stock(
        &self,
        variant_id: i64,
        quantity: i64,
        reference: ReferenceKind,
        reference_id: Option<&str>,
        notes: &str,
    ) -> StoreResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let updated = tx.execute(
            r#"
            UPDATE inventory_stock
            SET quantity_available = quantity_available + ?1, last_updated = datetime('now')
            WHERE variant_id = ?2
            "#,
            params![quantity, variant_id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!(
                "no stock row for variant {variant_id}"
            )));
        }

        tx.execute(
            r#"
            INSERT INTO inventory_movements (variant_id, movement_type, quantity, reference_type, reference_id, notes)
            VALUES (?1, 'IN', ?2, ?3, ?4, ?5)
            "#,
            params![variant_id, quantity, reference.as_str(), reference_id, notes],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Decrement a variant's stock and append the matching `OUT` movement.
    /// Fails closed, writing nothing, when the variant has no stock row or
    /// the requested quantity exceeds what is available.
    pub fn deduct_stock(
        &self,
        variant_id: i64,
        quantity: i64,
        reference: ReferenceKind,
        reference_id: Option<&str>,
        notes: &str,
    ) -> StoreResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let available: Option<i64> = tx
            .query_row(
                "SELECT quantity_available FROM inventory_stock WHERE variant_id = ?1",
                [variant_id],
                |row| row.get(0),
            )
            .optional()?;
        let available = available.ok_or_else(|| {
            StoreError::NotFound(format!("no stock row for variant {variant_id}"))
        })?;

        if available < quantity {
            tracing::warn!(variant_id, available, requested = quantity, "deduction refused");
            return Err(StoreError::InsufficientStock {
                available,
                requested: quantity,
            });
        }

        tx.execute(
            r#"
            UPDATE inventory_stock
            SET quantity_available = quantity_available - ?1, last_updated = datetime('now')
            WHERE variant_id = ?2
            "#,
            params![quantity, variant_id],
        )?;
        tx.execute(
            r#"
            INSERT INTO inventory_movements (variant_id, movement_type, quantity, reference_type, reference_id, notes)
            VALUES (?1, 'OUT', ?2, ?3, ?4, ?5)
            "#,
            params![variant_id, quantity, reference.as_str(), reference_id, notes],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// All stock counters with their last-update stamps, for the inventory
    /// overview.
    pub fn stock_levels(&self) -> StoreResult<Vec<StockLevel>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT variant_id, quantity_available, last_updated FROM inventory_stock ORDER BY variant_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StockLevel {
                variant_id: row.get(0)?,
                quantity_available: row.get(1)?,
                last_updated: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Current quantity for a variant, or None when no stock row exists.
    pub fn stock_level(&self, variant_id: i64) -> StoreResult<Option<i64>> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT quantity_available FROM inventory_stock WHERE variant_id = ?1",
            [variant_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(Into::into)
    }

    /// Ledger rows for a variant, newest first, optionally capped.
    pub fn movements_for_variant(
        &self,
        variant_id: i64,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StockMovement>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, variant_id, movement_type, quantity, reference_type, reference_id, notes, recorded_at
            FROM inventory_movements
            WHERE variant_id = ?1
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )?;
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let rows = stmt.query_map(params![variant_id, limit], map_movement)?;

        let mut movements = Vec::new();
        for row in rows {
            let (id, variant_id, kind, quantity, reference, reference_id, notes, recorded_at) =
                row?;
            let kind = MovementKind::parse(&kind)
                .ok_or_else(|| StoreError::Constraint(format!("unknown movement type: {kind}")))?;
            let reference = ReferenceKind::parse(&reference).ok_or_else(|| {
                StoreError::Constraint(format!("unknown reference type: {reference}"))
            })?;
            movements.push(StockMovement {
                id,
                variant_id,
                kind,
                quantity,
                reference,
                reference_id,
                notes,
                recorded_at,
            });
        }
        Ok(movements)
    }

    /// Variants at or below their minimum stock level.
    pub fn low_stock_medicines(&self) -> StoreResult<Vec<LowStockItem>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT v.id, m.name, v.potency, v.form, s.quantity_available, v.min_stock_level
            FROM medicine_variants v
            JOIN inventory_stock s ON v.id = s.variant_id
            JOIN medicine_master m ON v.medicine_id = m.id
            WHERE s.quantity_available <= v.min_stock_level
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(LowStockItem {
                variant_id: row.get(0)?,
                medicine_name: row.get(1)?,
                potency: row.get(2)?,
                form: row.get(3)?,
                quantity_available: row.get(4)?,
                min_stock_level: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Net sum over the movement ledger for one variant.
    pub fn ledger_balance(&self, variant_id: i64) -> StoreResult<i64> {
        let conn = self.connect()?;
        let balance = conn.query_row(
            &format!(
                "SELECT COALESCE(SUM({SIGNED_QUANTITY}), 0) FROM inventory_movements WHERE variant_id = ?1"
            ),
            [variant_id],
            |row| row.get(0),
        )?;
        Ok(balance)
    }

    /// Compare every stock counter against its ledger fold and report the
    /// variants that disagree. Verification only; nothing is repaired.
    pub fn check_stock_drift(&self) -> StoreResult<Vec<StockDrift>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT s.variant_id, s.quantity_available,
                   COALESCE((SELECT SUM({SIGNED_QUANTITY})
                             FROM inventory_movements
                             WHERE variant_id = s.variant_id), 0)
            FROM inventory_stock s
            ORDER BY s.variant_id
            "#
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(StockDrift {
                variant_id: row.get(0)?,
                recorded: row.get(1)?,
                ledger: row.get(2)?,
            })
        })?;

        let mut drifted = Vec::new();
        for row in rows {
            let drift = row?;
            if drift.recorded != drift.ledger {
                tracing::warn!(
                    variant_id = drift.variant_id,
                    recorded = drift.recorded,
                    ledger = drift.ledger,
                    "stock counter disagrees with ledger"
                );
                drifted.push(drift);
            }
        }
        Ok(drifted)
    }
}
