//! Development seed data generator.
//!
//! Populates both clinic databases with a small, realistic data set for
//! manual testing of the UI collaborators.
//!
//! ```bash
//! cargo run -p clinic-core --bin seed
//! cargo run -p clinic-core --bin seed -- --clinic-db ./clinic_data.db --pharmacy-db ./clinic_medicine.db
//! ```

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use clinic_core::{
    ClinicStore, InventoryService, MedicineCategory, MedicineService, NewPatient, NewVariant,
    PharmacyStore, RecordsService,
};

const CATALOG: &[(&str, MedicineCategory, &[&str])] = &[
    ("Arnica Montana", MedicineCategory::Dilution, &["30C", "200C"]),
    ("Belladonna", MedicineCategory::Dilution, &["30C", "200C", "1M"]),
    ("Nux Vomica", MedicineCategory::Dilution, &["30C", "200C"]),
    ("Calendula", MedicineCategory::Q, &["Q"]),
    ("Kali Phos", MedicineCategory::Biochemic, &["6X"]),
    ("Five Phos", MedicineCategory::Complex, &["6X"]),
];

const GLOBULE_SIZES: &[(i64, i64)] = &[(20, 500), (30, 400), (40, 250)];

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("seed failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut clinic_db = String::from("./clinic_data.db");
    let mut pharmacy_db = String::from("./clinic_medicine.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--clinic-db" => {
                if i + 1 < args.len() {
                    clinic_db = args[i + 1].clone();
                    i += 1;
                }
            }
            "--pharmacy-db" => {
                if i + 1 < args.len() {
                    pharmacy_db = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Clinic seed data generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --clinic-db <PATH>    Clinic database file (default: ./clinic_data.db)");
                println!("  --pharmacy-db <PATH>  Pharmacy database file (default: ./clinic_medicine.db)");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let clinic = ClinicStore::open(&clinic_db)
        .with_context(|| format!("opening clinic store at {clinic_db}"))?;
    let pharmacy = PharmacyStore::open(&pharmacy_db)
        .with_context(|| format!("opening pharmacy store at {pharmacy_db}"))?;

    if clinic.total_patients_count()? > 0 {
        tracing::warn!("clinic database already has patients; skipping seed to avoid duplicates");
        return Ok(());
    }

    seed_pharmacy(&pharmacy)?;
    seed_clinic(&clinic)?;

    let drift = pharmacy.check_stock_drift()?;
    anyhow::ensure!(drift.is_empty(), "seeded stock drifted from its ledger");

    tracing::info!("seed complete");
    Ok(())
}

fn seed_pharmacy(pharmacy: &PharmacyStore) -> anyhow::Result<()> {
    let medicines = MedicineService::new(pharmacy);
    let inventory = InventoryService::new(pharmacy);

    let mut variants = 0;
    for (index, (name, category, potencies)) in CATALOG.iter().enumerate() {
        let medicine_id = medicines.create_medicine(name, *category, Some("SBL"), false, None)?;

        for potency in *potencies {
            let mut variant = NewVariant::new(medicine_id);
            variant.potency = Some((*potency).to_string());
            variant.form = Some("liquid".to_string());
            variant.bottle_size = Some("30ml".to_string());
            variant.unit_type = Some("ml".to_string());
            let variant_id = medicines.add_variant(&variant)?;

            // deterministic but varied starting stock
            let opening = 6 + ((index * 7 + variants) % 20) as i64;
            inventory.add_stock(variant_id, opening, Some("PO-SEED"), "opening stock")?;
            variants += 1;
        }
    }

    for (size, quantity) in GLOBULE_SIZES {
        pharmacy.update_globule_stock(*size, *quantity)?;
    }

    tracing::info!(medicines = CATALOG.len(), variants, "pharmacy seeded");
    Ok(())
}

fn seed_clinic(clinic: &ClinicStore) -> anyhow::Result<()> {
    let records = RecordsService::new(clinic);

    let mut patient = NewPatient::new("Ali Khan");
    patient.phone = Some("0300-1111111".into());
    patient.age = Some(30);
    patient.gender = Some("Male".into());
    patient.address = Some("Karachi".into());
    let ali = records.register_patient(&patient)?;

    let mut patient = NewPatient::new("Sara Ahmed");
    patient.phone = Some("0321-9999999".into());
    patient.age = Some(42);
    patient.gender = Some("Female".into());
    let sara = records.register_patient(&patient)?;

    records.record_visit(
        ali,
        "recurring headache",
        "Belladonna 200C, Kali Phos 6X",
        500,
        "review in two weeks",
        "2024-01-10 10:00",
    )?;
    records.record_visit(
        ali,
        "follow-up, improving",
        "Belladonna 200C",
        300,
        "",
        "2024-01-24 11:30",
    )?;
    records.record_visit(
        sara,
        "joint pain",
        "Arnica Montana 30C",
        500,
        "",
        "2024-01-24 12:00",
    )?;

    tracing::info!(
        patients = clinic.total_patients_count()?,
        earnings = clinic.total_earnings()?,
        "clinic seeded"
    );
    Ok(())
}
