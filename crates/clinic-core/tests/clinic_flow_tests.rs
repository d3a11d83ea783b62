//! End-to-end scenarios over the clinic store and records service, the way
//! the desktop collaborators drive them.

use chrono::NaiveDate;
use clinic_core::{ClinicStore, NewPatient, RecordsService, ServiceError};

fn setup_clinic() -> (tempfile::TempDir, ClinicStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ClinicStore::open(dir.path().join("clinic.db")).unwrap();
    (dir, store)
}

#[test]
fn first_patient_and_visit_flow() {
    let (_dir, store) = setup_clinic();
    let records = RecordsService::new(&store);

    let mut patient = NewPatient::new("Ali Khan");
    patient.phone = Some("0300-1111111".into());
    patient.age = Some(30);
    patient.gender = Some("Male".into());
    let patient_id = records.register_patient(&patient).unwrap();

    records
        .record_visit(
            patient_id,
            "recurring headache",
            "Arnica 30C, Belladonna 200C",
            500,
            "review in two weeks",
            "2024-01-10 10:00",
        )
        .unwrap();

    let jan10 = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    assert_eq!(store.earnings_for_date(jan10).unwrap(), 500);
    assert_eq!(store.total_patients_count().unwrap(), 1);

    let visits = store.visits_for_patient(patient_id, None).unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].patient_id, patient_id);
    assert_eq!(visits[0].complaints, "recurring headache");
    assert_eq!(visits[0].medicine, "Arnica 30C, Belladonna 200C");
    assert_eq!(visits[0].fees, 500);
    assert_eq!(visits[0].remarks, "review in two weeks");
    assert_eq!(visits[0].visited_at, jan10.and_hms_opt(10, 0, 0).unwrap());

    // each prescribed name landed in the usage tally once
    let tally = store.list_medicine_usage().unwrap();
    assert_eq!(tally.len(), 2);
    assert!(tally.iter().all(|entry| entry.times_used == 1));

    // the day's visit list shows the joined patient name
    let day = store.visits_for_date(jan10).unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].patient_name, "Ali Khan");
}

#[test]
fn login_lifecycle_on_a_fresh_store() {
    let (_dir, store) = setup_clinic();

    // seeded default credentials
    assert!(store.verify_login("admin", "admin").unwrap());
    assert!(!store.verify_login("admin", "wrong").unwrap());
    assert!(store.has_default_credentials().unwrap());

    // change once; old password stops working
    assert!(store.change_password("admin", "admin", "newpass").unwrap());
    assert!(!store.verify_login("admin", "admin").unwrap());
    assert!(store.verify_login("admin", "newpass").unwrap());

    // duplicate username is refused without altering the existing account
    assert!(!store.add_user("admin", "x", "admin").unwrap());
    assert!(store.verify_login("admin", "newpass").unwrap());
}

#[test]
fn deleting_a_patient_takes_their_history_along() {
    let (_dir, store) = setup_clinic();
    let records = RecordsService::new(&store);

    let ali = records.register_patient(&NewPatient::new("Ali Khan")).unwrap();
    let sara = records.register_patient(&NewPatient::new("Sara Ahmed")).unwrap();

    records
        .record_visit(ali, "", "", 500, "", "2024-01-10 10:00")
        .unwrap();
    records
        .record_visit(ali, "", "", 300, "", "2024-02-05 09:30")
        .unwrap();
    records
        .record_visit(sara, "", "", 700, "", "2024-02-05 11:00")
        .unwrap();

    assert_eq!(store.total_earnings().unwrap(), 1500);

    assert!(store.delete_patient(ali).unwrap());

    // Ali's visits are gone, Sara's remain, and the aggregates follow
    assert!(store.visits_for_patient(ali, None).unwrap().is_empty());
    assert_eq!(store.visits_for_patient(sara, None).unwrap().len(), 1);
    assert_eq!(store.total_earnings().unwrap(), 700);
    assert_eq!(store.total_patients_count().unwrap(), 1);

    let all = store.all_visits_with_patient().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].patient_name, "Sara Ahmed");
}

#[test]
fn month_report_figures_add_up() {
    let (_dir, store) = setup_clinic();
    let records = RecordsService::new(&store);
    let patient_id = records.register_patient(&NewPatient::new("Ali Khan")).unwrap();

    for (date, fees) in [
        ("2024-01-05 09:00", 400),
        ("2024-01-20 15:30", 600),
        ("2024-02-02 10:00", 350),
    ] {
        records.record_visit(patient_id, "", "", fees, "", date).unwrap();
    }

    assert_eq!(store.month_earnings(2024, 1).unwrap(), 1000);
    assert_eq!(store.month_earnings(2024, 2).unwrap(), 350);
    assert_eq!(store.month_earnings(2024, 3).unwrap(), 0);

    let january = store
        .visits_in_range(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
    assert_eq!(january.len(), 2);
    assert_eq!(
        store
            .earnings_in_range(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            )
            .unwrap(),
        1350
    );
}

#[test]
fn rejected_input_never_reaches_disk() {
    let (_dir, store) = setup_clinic();
    let records = RecordsService::new(&store);
    let patient_id = records.register_patient(&NewPatient::new("Ali Khan")).unwrap();

    let result = records.record_visit(patient_id, "", "Arnica 30C", 500, "", "whenever");
    assert!(matches!(result, Err(ServiceError::Validation(_))));

    assert!(store.visits_for_patient(patient_id, None).unwrap().is_empty());
    assert!(store.list_medicine_usage().unwrap().is_empty());
    assert_eq!(store.total_earnings().unwrap(), 0);
}

#[test]
fn csv_export_after_a_working_week() {
    let (dir, store) = setup_clinic();
    let records = RecordsService::new(&store);

    for name in ["Ali Khan", "Sara Ahmed", "Bilal, Junior"] {
        records.register_patient(&NewPatient::new(name)).unwrap();
    }

    let path = dir.path().join("patients.csv");
    let written = store.export_patients_csv(&path).unwrap();
    assert_eq!(written, 3);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "ID,Name,Phone,Age,Gender,Address,Notes,Created At");
    assert_eq!(lines.len(), 4);
    assert!(lines[3].contains("\"Bilal, Junior\""));
}
