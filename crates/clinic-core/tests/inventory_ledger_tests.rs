//! Ledger and counter properties for the pharmacy store, including
//! randomized operation sequences.

use clinic_core::{
    InventoryService, MedicineCategory, MedicineService, MovementKind, NewVariant, PharmacyStore,
    ServiceError,
};
use proptest::prelude::*;

fn setup_variant() -> (tempfile::TempDir, PharmacyStore, i64) {
    let dir = tempfile::tempdir().unwrap();
    let store = PharmacyStore::open(dir.path().join("pharmacy.db")).unwrap();

    let medicines = MedicineService::new(&store);
    let medicine_id = medicines
        .create_medicine("Arnica Montana", MedicineCategory::Dilution, None, false, None)
        .unwrap();
    let mut variant = NewVariant::new(medicine_id);
    variant.potency = Some("30C".into());
    let variant_id = medicines.add_variant(&variant).unwrap();

    (dir, store, variant_id)
}

#[test]
fn dispensing_day_leaves_a_complete_trail() {
    let (_dir, store, variant_id) = setup_variant();
    let inventory = InventoryService::new(&store);

    inventory.add_stock(variant_id, 30, Some("PO-100"), "opening stock").unwrap();
    inventory.dispense_stock(variant_id, 5, Some("RX-1"), "").unwrap();
    inventory.dispense_stock(variant_id, 3, Some("RX-2"), "").unwrap();
    inventory.expire_stock(variant_id, 2, "past expiry").unwrap();
    inventory.adjust_stock(variant_id, -1, "breakage").unwrap();

    assert_eq!(inventory.stock_level(variant_id).unwrap(), 19);
    assert_eq!(store.ledger_balance(variant_id).unwrap(), 19);
    assert!(store.check_stock_drift().unwrap().is_empty());

    let movements = store.movements_for_variant(variant_id, None).unwrap();
    assert_eq!(movements.len(), 5);
    assert_eq!(
        movements.iter().filter(|m| m.kind == MovementKind::In).count(),
        1
    );
    assert_eq!(
        movements.iter().filter(|m| m.kind == MovementKind::Out).count(),
        4
    );
}

#[test]
fn failed_deduction_changes_nothing() {
    let (_dir, store, variant_id) = setup_variant();
    let inventory = InventoryService::new(&store);

    inventory.add_stock(variant_id, 4, None, "").unwrap();

    let before_level = inventory.stock_level(variant_id).unwrap();
    let before_rows = store.movements_for_variant(variant_id, None).unwrap().len();

    let result = inventory.dispense_stock(variant_id, 9, None, "");
    assert!(matches!(
        result,
        Err(ServiceError::InsufficientStock {
            available: 4,
            requested: 9
        })
    ));

    assert_eq!(inventory.stock_level(variant_id).unwrap(), before_level);
    assert_eq!(
        store.movements_for_variant(variant_id, None).unwrap().len(),
        before_rows
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// After any sequence of add/dispense calls the counter equals the
    /// ledger fold, and a refused dispense reports the true availability.
    #[test]
    fn counter_always_equals_ledger_fold(
        ops in prop::collection::vec((any::<bool>(), 1i64..40), 1..24),
    ) {
        let (_dir, store, variant_id) = setup_variant();
        let inventory = InventoryService::new(&store);

        let mut expected = 0i64;
        for (is_add, quantity) in ops {
            if is_add {
                inventory.add_stock(variant_id, quantity, None, "").unwrap();
                expected += quantity;
            } else {
                match inventory.dispense_stock(variant_id, quantity, None, "") {
                    Ok(()) => expected -= quantity,
                    Err(ServiceError::InsufficientStock { available, requested }) => {
                        prop_assert_eq!(available, expected);
                        prop_assert_eq!(requested, quantity);
                        prop_assert!(quantity > expected);
                    }
                    Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {e}"))),
                }
            }

            prop_assert!(expected >= 0);
            prop_assert_eq!(store.stock_level(variant_id).unwrap(), Some(expected));
            prop_assert_eq!(store.ledger_balance(variant_id).unwrap(), expected);
        }

        prop_assert!(store.check_stock_drift().unwrap().is_empty());
    }

    /// The globule counter never goes negative, and every refused call
    /// leaves the prior quantity in place.
    #[test]
    fn globule_counter_never_negative(
        deltas in prop::collection::vec(-30i64..60, 1..24),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let store = PharmacyStore::open(dir.path().join("pharmacy.db")).unwrap();

        let mut expected: Option<i64> = None;
        for delta in deltas {
            let result = store.update_globule_stock(30, delta);
            match expected {
                None if delta < 0 => prop_assert!(result.is_err()),
                None => {
                    prop_assert!(result.is_ok());
                    expected = Some(delta);
                }
                Some(current) if current + delta < 0 => {
                    prop_assert!(result.is_err());
                }
                Some(current) => {
                    prop_assert!(result.is_ok());
                    expected = Some(current + delta);
                }
            }

            let stock = store.globule_stock().unwrap();
            match expected {
                None => prop_assert!(stock.is_empty()),
                Some(quantity) => {
                    prop_assert_eq!(stock.len(), 1);
                    prop_assert!(quantity >= 0);
                    prop_assert_eq!(stock[0].quantity_available, quantity);
                }
            }
        }
    }
}
