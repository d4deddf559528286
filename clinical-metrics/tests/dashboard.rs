//! Dashboard snapshot assembly, including isolated failures.

use chrono::NaiveDate;
use clinical_core::{DashboardField, MetricsError, MetricsSnapshot};
use clinical_metrics::{build_snapshot, DashboardSnapshotBuilder, DashboardSource, Record, RecordSets};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
}

struct FlakyRooms;

impl DashboardSource for FlakyRooms {
    fn total_patients(&self) -> Result<u64, MetricsError> {
        Ok(120)
    }
    fn todays_appointments(&self) -> Result<u64, MetricsError> {
        Ok(14)
    }
    fn active_visits(&self) -> Result<u64, MetricsError> {
        Ok(35)
    }
    fn available_rooms(&self) -> Result<u64, MetricsError> {
        Err(MetricsError::SourceUnavailable {
            dataset: "rooms".to_string(),
            reason: "connection refused".to_string(),
        })
    }
    fn staff_members(&self) -> Result<u64, MetricsError> {
        Ok(48)
    }
    fn todays_revenue(&self) -> Result<f64, MetricsError> {
        Ok(300.0)
    }
}

#[test]
fn one_failing_field_does_not_abort_snapshot() {
    let snapshot = build_snapshot(&FlakyRooms);
    assert_eq!(
        snapshot,
        MetricsSnapshot {
            total_patients: 120,
            todays_appointments: 14,
            active_visits: 35,
            available_rooms: 0,
            staff_members: 48,
            todays_revenue: 300.0,
            degraded: vec![DashboardField::AvailableRooms],
        }
    );
    assert!(snapshot.is_degraded(DashboardField::AvailableRooms));
    assert!(!snapshot.is_degraded(DashboardField::TotalPatients));
}

#[test]
fn builder_tolerates_all_zero_and_all_failed() {
    let zeros = DashboardSnapshotBuilder::new()
        .total_patients(Ok(0))
        .todays_appointments(Ok(0))
        .active_visits(Ok(0))
        .available_rooms(Ok(0))
        .staff_members(Ok(0))
        .todays_revenue(Ok(0.0))
        .build();
    assert_eq!(zeros, MetricsSnapshot::default());

    let failed = DashboardSnapshotBuilder::new()
        .total_patients(Err(MetricsError::MissingData))
        .todays_appointments(Err(MetricsError::MissingData))
        .active_visits(Err(MetricsError::MissingData))
        .available_rooms(Err(MetricsError::MissingData))
        .staff_members(Err(MetricsError::MissingData))
        .todays_revenue(Err(MetricsError::MissingData))
        .build();
    assert_eq!(failed.degraded, DashboardField::ALL.to_vec());
    assert_eq!(failed.todays_revenue, 0.0);
}

#[test]
fn setting_a_field_again_clears_its_failure() {
    let snapshot = DashboardSnapshotBuilder::new()
        .staff_members(Err(MetricsError::MissingData))
        .staff_members(Ok(12))
        .build();
    assert_eq!(snapshot.staff_members, 12);
    assert!(snapshot.degraded.is_empty());
}

#[test]
fn record_sets_reproduce_dashboard_counts() {
    let mut sets = RecordSets::new(today());
    sets.patients = Some(vec![Record::new(), Record::new(), Record::new()]);
    sets.appointments = Some(vec![
        Record::new().with("appointment_time", "2024-05-02T09:00:00"),
        Record::new().with("appointment_time", "2024-05-02T16:45:00"),
        Record::new().with("appointment_time", "2024-05-03T09:00:00"),
        Record::new(),
    ]);
    sets.visits = Some(vec![
        Record::new().with("status", "Active"),
        Record::new().with("status", "Discharged"),
        Record::new().with("status", "Active"),
    ]);
    sets.rooms = Some(vec![
        Record::new().with("status", "Available"),
        Record::new().with("status", "Occupied"),
    ]);
    sets.employees = Some(vec![Record::new(); 5]);
    sets.payments = Some(vec![
        Record::new()
            .with("payment_date", "2024-05-02T10:00:00")
            .with("amount", 150.25),
        Record::new()
            .with("payment_date", "2024-05-02")
            .with("amount", "49.75"),
        Record::new()
            .with("payment_date", "2024-05-01T23:59:00")
            .with("amount", 1000),
    ]);

    let snapshot = build_snapshot(&sets);
    assert_eq!(snapshot.total_patients, 3);
    assert_eq!(snapshot.todays_appointments, 2);
    assert_eq!(snapshot.active_visits, 2);
    assert_eq!(snapshot.available_rooms, 1);
    assert_eq!(snapshot.staff_members, 5);
    assert!((snapshot.todays_revenue - 200.0).abs() < 1e-9);
    assert!(snapshot.degraded.is_empty());
}

#[test]
fn revenue_defaults_to_zero_without_payments_today() {
    let mut sets = RecordSets::new(today());
    sets.payments = Some(Vec::new());

    let snapshot = build_snapshot(&sets);
    assert_eq!(snapshot.todays_revenue, 0.0);
    assert!(!snapshot.is_degraded(DashboardField::TodaysRevenue));
    assert!(snapshot.is_degraded(DashboardField::TotalPatients));
}

#[test]
fn record_sets_deserialize_with_missing_sources() {
    let sets: RecordSets = serde_json::from_str(
        r#"{
            "today": "2024-05-02",
            "patients": [{ "patientId": 1 }],
            "rooms": null
        }"#,
    )
    .expect("record sets should deserialize");

    let snapshot = build_snapshot(&sets);
    assert_eq!(snapshot.total_patients, 1);
    assert_eq!(snapshot.degraded.len(), 5);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["degraded"][0], "todays_appointments");
    assert_eq!(json["available_rooms"], 0);
}
