//! Medicine service: catalog input normalization over the pharmacy store.

use super::{ServiceError, ServiceResult};
use crate::db::PharmacyStore;
use crate::models::{MedicineCategory, MedicineDetails, MedicineMaster, NewMedicine, NewVariant};

pub struct MedicineService<'a> {
    store: &'a PharmacyStore,
}

impl<'a> MedicineService<'a> {
    pub fn new(store: &'a PharmacyStore) -> Self {
        Self { store }
    }

    /// Create a catalog entry. The name is trimmed and upper-cased for
    /// display consistency; this is the only normalization rule in the
    /// system.
    pub fn create_medicine(
        &self,
        name: &str,
        category: MedicineCategory,
        manufacturer: Option<&str>,
        is_restricted: bool,
        notes: Option<&str>,
    ) -> ServiceResult<i64> {
        let name = name.trim().to_uppercase();
        if name.is_empty() {
            return Err(ServiceError::Validation("medicine name is required".into()));
        }

        let mut medicine = NewMedicine::new(name, category);
        medicine.manufacturer = manufacturer.map(str::to_string);
        medicine.is_restricted = is_restricted;
        medicine.notes = notes.map(str::to_string);

        Ok(self.store.create_medicine(&medicine)?)
    }

    /// Add a sellable variant; the store pairs it with a zeroed stock row.
    pub fn add_variant(&self, variant: &NewVariant) -> ServiceResult<i64> {
        Ok(self.store.create_variant(variant)?)
    }

    /// A master entry assembled with its variants and their stock, or None
    /// when the id is unknown.
    pub fn medicine_details(&self, medicine_id: i64) -> ServiceResult<Option<MedicineDetails>> {
        let Some(master) = self.store.get_medicine_master(medicine_id)? else {
            return Ok(None);
        };
        let variants = self.store.variants_for_medicine(medicine_id)?;
        Ok(Some(MedicineDetails { master, variants }))
    }

    /// Substring search over catalog names.
    pub fn search(&self, query: &str) -> ServiceResult<Vec<MedicineMaster>> {
        Ok(self.store.search_medicines(query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pharmacy::test_support::setup_store;

    #[test]
    fn test_name_is_trimmed_and_uppercased() {
        let (_dir, store) = setup_store();
        let service = MedicineService::new(&store);

        let id = service
            .create_medicine("  arnica montana ", MedicineCategory::Dilution, None, false, None)
            .unwrap();

        let master = store.get_medicine_master(id).unwrap().unwrap();
        assert_eq!(master.name, "ARNICA MONTANA");
    }

    #[test]
    fn test_blank_name_rejected() {
        let (_dir, store) = setup_store();
        let service = MedicineService::new(&store);

        let result =
            service.create_medicine("   ", MedicineCategory::Other, None, false, None);
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert!(store.list_medicines(false).unwrap().is_empty());
    }

    #[test]
    fn test_medicine_details_assembles_variants() {
        let (_dir, store) = setup_store();
        let service = MedicineService::new(&store);

        let id = service
            .create_medicine("Arnica", MedicineCategory::Dilution, Some("SBL"), false, None)
            .unwrap();

        let mut variant = NewVariant::new(id);
        variant.potency = Some("30C".into());
        let variant_id = service.add_variant(&variant).unwrap();
        store
            .add_stock(variant_id, 12, crate::models::ReferenceKind::Purchase, None, "")
            .unwrap();

        let details = service.medicine_details(id).unwrap().unwrap();
        assert_eq!(details.master.name, "ARNICA");
        assert_eq!(details.variants.len(), 1);
        assert_eq!(details.variants[0].quantity_available, 12);

        assert!(service.medicine_details(999).unwrap().is_none());
    }
}
