//! Globule consumable stock, keyed by size class only.

use rusqlite::{params, OptionalExtension};

use super::PharmacyStore;
use crate::db::{StoreError, StoreResult};
use crate::models::GlobuleStock;

impl PharmacyStore {
    /// Apply a signed delta to a size class, creating the row on a first
    /// positive delta. Fails with no write when the result would go below
    /// zero, including a negative delta against a nonexistent size.
    pub fn update_globule_stock(&self, size: i64, delta: i64) -> StoreResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let current: Option<i64> = tx
            .query_row(
                "SELECT quantity_available FROM globule_stock WHERE size = ?1",
                [size],
                |row| row.get(0),
            )
            .optional()?;

        match current {
            Some(quantity) => {
                let next = quantity + delta;
                if next < 0 {
                    return Err(StoreError::InsufficientStock {
                        available: quantity,
                        requested: -delta,
                    });
                }
                tx.execute(
                    "UPDATE globule_stock SET quantity_available = ?1 WHERE size = ?2",
                    params![next, size],
                )?;
            }
            None => {
                if delta < 0 {
                    return Err(StoreError::InsufficientStock {
                        available: 0,
                        requested: -delta,
                    });
                }
                tx.execute(
                    "INSERT INTO globule_stock (size, quantity_available) VALUES (?1, ?2)",
                    params![size, delta],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// All globule size classes, smallest first.
    pub fn globule_stock(&self) -> StoreResult<Vec<GlobuleStock>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT size, quantity_available, min_level FROM globule_stock ORDER BY size ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(GlobuleStock {
                size: row.get(0)?,
                quantity_available: row.get(1)?,
                min_level: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::setup_store;
    use crate::db::StoreError;

    #[test]
    fn test_upsert_by_size() {
        let (_dir, store) = setup_store();

        store.update_globule_stock(30, 100).unwrap();
        store.update_globule_stock(30, 50).unwrap();
        store.update_globule_stock(40, 20).unwrap();

        let stock = store.globule_stock().unwrap();
        assert_eq!(stock.len(), 2);
        assert_eq!(stock[0].size, 30);
        assert_eq!(stock[0].quantity_available, 150);
        assert_eq!(stock[1].size, 40);
        assert_eq!(stock[1].quantity_available, 20);
    }

    #[test]
    fn test_never_goes_negative() {
        let (_dir, store) = setup_store();
        store.update_globule_stock(30, 10).unwrap();

        let result = store.update_globule_stock(30, -11);
        assert!(matches!(
            result,
            Err(StoreError::InsufficientStock {
                available: 10,
                requested: 11
            })
        ));

        // prior quantity unchanged
        let stock = store.globule_stock().unwrap();
        assert_eq!(stock[0].quantity_available, 10);

        store.update_globule_stock(30, -10).unwrap();
        assert_eq!(store.globule_stock().unwrap()[0].quantity_available, 0);
    }

    #[test]
    fn test_negative_delta_on_missing_size_fails() {
        let (_dir, store) = setup_store();
        let result = store.update_globule_stock(20, -5);
        assert!(matches!(result, Err(StoreError::InsufficientStock { .. })));
        assert!(store.globule_stock().unwrap().is_empty());
    }
}
