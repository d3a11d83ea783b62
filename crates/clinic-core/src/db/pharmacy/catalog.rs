//! Catalog operations: medicine masters and their sellable variants.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::PharmacyStore;
use crate::db::{StoreError, StoreResult};
use crate::models::{
    MedicineCategory, MedicineMaster, MedicineVariant, NewMedicine, NewVariant, VariantWithStock,
};

const MASTER_COLUMNS: &str = "id, name, category, manufacturer, is_active, is_restricted, notes";

/// Intermediate row struct: category arrives as text and is parsed in the
/// `TryFrom` conversion.
struct MasterRow {
    id: i64,
    name: String,
    category: String,
    manufacturer: Option<String>,
    is_active: bool,
    is_restricted: bool,
    notes: Option<String>,
}

fn map_master_row(row: &Row<'_>) -> rusqlite::Result<MasterRow> {
    Ok(MasterRow {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        manufacturer: row.get(3)?,
        is_active: row.get(4)?,
        is_restricted: row.get(5)?,
        notes: row.get(6)?,
    })
}

impl TryFrom<MasterRow> for MedicineMaster {
    type Error = StoreError;

    fn try_from(row: MasterRow) -> Result<Self, Self::Error> {
        let category = MedicineCategory::parse(&row.category).ok_or_else(|| {
            StoreError::Constraint(format!("unknown medicine category: {}", row.category))
        })?;
        Ok(MedicineMaster {
            id: row.id,
            name: row.name,
            category,
            manufacturer: row.manufacturer,
            is_active: row.is_active,
            is_restricted: row.is_restricted,
            notes: row.notes,
        })
    }
}

fn parse_expiry(text: Option<String>) -> StoreResult<Option<NaiveDate>> {
    text.map(|s| {
        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|e| StoreError::Constraint(format!("malformed expiry date {s:?}: {e}")))
    })
    .transpose()
}

impl PharmacyStore {
    /// Create a catalog entry and return the new row id.
    pub fn create_medicine(&self, medicine: &NewMedicine) -> StoreResult<i64> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO medicine_master (name, category, manufacturer, is_restricted, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                medicine.name,
                medicine.category.as_str(),
                medicine.manufacturer,
                medicine.is_restricted,
                medicine.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a catalog entry by id.
    pub fn get_medicine_master(&self, medicine_id: i64) -> StoreResult<Option<MedicineMaster>> {
        let conn = self.connect()?;
        let result = conn
            .query_row(
                &format!("SELECT {MASTER_COLUMNS} FROM medicine_master WHERE id = ?1"),
                [medicine_id],
                map_master_row,
            )
            .optional()?;
        result.map(|row| row.try_into()).transpose()
    }

    /// Substring search over medicine names, case-insensitive, alphabetical.
    pub fn search_medicines(&self, query: &str) -> StoreResult<Vec<MedicineMaster>> {
        let pattern = format!("%{}%", query);
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {MASTER_COLUMNS} FROM medicine_master
            WHERE name LIKE ?1
            ORDER BY name COLLATE NOCASE ASC
            "#
        ))?;
        let rows = stmt.query_map([pattern], map_master_row)?;

        let mut medicines = Vec::new();
        for row in rows {
            medicines.push(row?.try_into()?);
        }
        Ok(medicines)
    }

    /// All catalog entries, alphabetical.
    pub fn list_medicines(&self, active_only: bool) -> StoreResult<Vec<MedicineMaster>> {
        let sql = if active_only {
            format!(
                "SELECT {MASTER_COLUMNS} FROM medicine_master WHERE is_active = 1 ORDER BY name COLLATE NOCASE ASC"
            )
        } else {
            format!(
                "SELECT {MASTER_COLUMNS} FROM medicine_master ORDER BY name COLLATE NOCASE ASC"
            )
        };

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_master_row)?;

        let mut medicines = Vec::new();
        for row in rows {
            medicines.push(row?.try_into()?);
        }
        Ok(medicines)
    }

    /// Toggle a catalog entry's active flag (soft hide, history kept).
    pub fn set_medicine_active(&self, medicine_id: i64, active: bool) -> StoreResult<bool> {
        let conn = self.connect()?;
        let rows_affected = conn.execute(
            "UPDATE medicine_master SET is_active = ?2 WHERE id = ?1",
            params![medicine_id, active],
        )?;
        Ok(rows_affected > 0)
    }

    /// Create a variant and its zeroed stock row in one transaction, so no
    /// variant ever exists stock-less.
    pub fn create_variant(&self, variant: &NewVariant) -> StoreResult<i64> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO medicine_variants (medicine_id, potency, form, bottle_size, unit_type, min_stock_level, expiry_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                variant.medicine_id,
                variant.potency,
                variant.form,
                variant.bottle_size,
                variant.unit_type,
                variant.min_stock_level,
                variant.expiry_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ],
        )?;
        let variant_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT OR IGNORE INTO inventory_stock (variant_id, quantity_available) VALUES (?1, 0)",
            [variant_id],
        )?;
        tx.commit()?;
        Ok(variant_id)
    }

    /// A medicine's variants with their current stock quantity.
    pub fn variants_for_medicine(&self, medicine_id: i64) -> StoreResult<Vec<VariantWithStock>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT v.id, v.medicine_id, v.potency, v.form, v.bottle_size, v.unit_type,
                   v.min_stock_level, v.expiry_date, COALESCE(s.quantity_available, 0)
            FROM medicine_variants v
            LEFT JOIN inventory_stock s ON v.id = s.variant_id
            WHERE v.medicine_id = ?1
            ORDER BY v.id
            "#,
        )?;
        let rows = stmt.query_map([medicine_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, i64>(8)?,
            ))
        })?;

        let mut variants = Vec::new();
        for row in rows {
            let (id, medicine_id, potency, form, bottle_size, unit_type, min_stock, expiry, qty) =
                row?;
            variants.push(VariantWithStock {
                variant: MedicineVariant {
                    id,
                    medicine_id,
                    potency,
                    form,
                    bottle_size,
                    unit_type,
                    min_stock_level: min_stock,
                    expiry_date: parse_expiry(expiry)?,
                },
                quantity_available: qty,
            });
        }
        Ok(variants)
    }
}
