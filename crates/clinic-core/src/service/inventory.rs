//! Inventory service: quantity guards and movement tagging over the
//! pharmacy store.

use super::{ServiceError, ServiceResult};
use crate::db::PharmacyStore;
use crate::models::{LowStockItem, ReferenceKind};

pub struct InventoryService<'a> {
    store: &'a PharmacyStore,
}

impl<'a> InventoryService<'a> {
    pub fn new(store: &'a PharmacyStore) -> Self {
        Self { store }
    }

    /// Receive purchased stock.
    pub fn add_stock(
        &self,
        variant_id: i64,
        quantity: i64,
        reference_id: Option<&str>,
        notes: &str,
    ) -> ServiceResult<()> {
        require_positive(quantity)?;
        self.store
            .add_stock(variant_id, quantity, ReferenceKind::Purchase, reference_id, notes)?;
        Ok(())
    }

    /// Dispense stock against a prescription.
    pub fn dispense_stock(
        &self,
        variant_id: i64,
        quantity: i64,
        reference_id: Option<&str>,
        notes: &str,
    ) -> ServiceResult<()> {
        require_positive(quantity)?;
        self.store.deduct_stock(
            variant_id,
            quantity,
            ReferenceKind::Prescription,
            reference_id,
            notes,
        )?;
        Ok(())
    }

    /// Write off expired stock.
    pub fn expire_stock(&self, variant_id: i64, quantity: i64, notes: &str) -> ServiceResult<()> {
        require_positive(quantity)?;
        self.store
            .deduct_stock(variant_id, quantity, ReferenceKind::Disposal, None, notes)?;
        Ok(())
    }

    /// Hand correction: positive deltas route to the add path, negative
    /// ones to the dispense path, both tagged as adjustments. A zero delta
    /// is rejected as a no-op.
    pub fn adjust_stock(&self, variant_id: i64, delta: i64, notes: &str) -> ServiceResult<()> {
        if delta == 0 {
            return Err(ServiceError::Validation("no change in quantity".into()));
        }
        if delta > 0 {
            self.store
                .add_stock(variant_id, delta, ReferenceKind::Adjustment, None, notes)?;
        } else {
            self.store
                .deduct_stock(variant_id, -delta, ReferenceKind::Adjustment, None, notes)?;
        }
        Ok(())
    }

    /// Current stock level; a variant without a stock row reads as 0.
    pub fn stock_level(&self, variant_id: i64) -> ServiceResult<i64> {
        Ok(self.store.stock_level(variant_id)?.unwrap_or(0))
    }

    /// Variants at or below their minimum stock level.
    pub fn low_stock(&self) -> ServiceResult<Vec<LowStockItem>> {
        Ok(self.store.low_stock_medicines()?)
    }
}

fn require_positive(quantity: i64) -> ServiceResult<()> {
    if quantity <= 0 {
        return Err(ServiceError::Validation("quantity must be positive".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pharmacy::test_support::setup_store;
    use crate::db::PharmacyStore;
    use crate::models::{MedicineCategory, MovementKind, NewMedicine, NewVariant};

    fn setup_variant() -> (tempfile::TempDir, PharmacyStore, i64) {
        let (dir, store) = setup_store();
        let medicine_id = store
            .create_medicine(&NewMedicine::new("ARNICA MONTANA", MedicineCategory::Dilution))
            .unwrap();
        let variant_id = store.create_variant(&NewVariant::new(medicine_id)).unwrap();
        (dir, store, variant_id)
    }

    #[test]
    fn test_rejects_non_positive_quantities_before_storage() {
        let (_dir, store, variant_id) = setup_variant();
        let service = InventoryService::new(&store);

        for quantity in [0, -3] {
            assert!(matches!(
                service.add_stock(variant_id, quantity, None, ""),
                Err(ServiceError::Validation(_))
            ));
            assert!(matches!(
                service.dispense_stock(variant_id, quantity, None, ""),
                Err(ServiceError::Validation(_))
            ));
            assert!(matches!(
                service.expire_stock(variant_id, quantity, ""),
                Err(ServiceError::Validation(_))
            ));
        }

        // nothing reached the ledger
        assert!(store.movements_for_variant(variant_id, None).unwrap().is_empty());
    }

    #[test]
    fn test_dispense_flow_and_insufficient_stock() {
        let (_dir, store, variant_id) = setup_variant();
        let service = InventoryService::new(&store);

        service.add_stock(variant_id, 10, Some("PO-7"), "").unwrap();
        service.dispense_stock(variant_id, 4, Some("RX-1"), "").unwrap();
        assert_eq!(service.stock_level(variant_id).unwrap(), 6);

        let result = service.dispense_stock(variant_id, 7, None, "");
        assert!(matches!(
            result,
            Err(ServiceError::InsufficientStock {
                available: 6,
                requested: 7
            })
        ));
    }

    #[test]
    fn test_adjust_routes_by_sign() {
        let (_dir, store, variant_id) = setup_variant();
        let service = InventoryService::new(&store);

        assert!(matches!(
            service.adjust_stock(variant_id, 0, "recount"),
            Err(ServiceError::Validation(_))
        ));

        service.adjust_stock(variant_id, 8, "recount up").unwrap();
        service.adjust_stock(variant_id, -3, "recount down").unwrap();
        assert_eq!(service.stock_level(variant_id).unwrap(), 5);

        let movements = store.movements_for_variant(variant_id, None).unwrap();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].kind, MovementKind::Out);
        assert_eq!(movements[0].reference, ReferenceKind::Adjustment);
        assert_eq!(movements[0].quantity, 3);
        assert_eq!(movements[1].kind, MovementKind::In);
        assert_eq!(movements[1].reference, ReferenceKind::Adjustment);
    }

    #[test]
    fn test_expire_tags_disposal() {
        let (_dir, store, variant_id) = setup_variant();
        let service = InventoryService::new(&store);

        service.add_stock(variant_id, 5, None, "").unwrap();
        service.expire_stock(variant_id, 2, "past expiry").unwrap();

        let movements = store.movements_for_variant(variant_id, Some(1)).unwrap();
        assert_eq!(movements[0].reference, ReferenceKind::Disposal);
        assert_eq!(movements[0].notes, "past expiry");
    }

    #[test]
    fn test_stock_level_reads_zero_for_unknown_variant() {
        let (_dir, store) = setup_store();
        let service = InventoryService::new(&store);
        assert_eq!(service.stock_level(99).unwrap(), 0);
    }
}
