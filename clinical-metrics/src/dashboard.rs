//! Consolidated dashboard counters with per-field failure isolation.

use chrono::NaiveDate;
use clinical_core::{DashboardField, MetricsError, MetricsSnapshot};
use serde::Deserialize;

use crate::record::Record;

/// Supplies each dashboard scalar independently.
///
/// An error from one method only zeroes that field in the snapshot.
pub trait DashboardSource {
    fn total_patients(&self) -> Result<u64, MetricsError>;
    fn todays_appointments(&self) -> Result<u64, MetricsError>;
    fn active_visits(&self) -> Result<u64, MetricsError>;
    fn available_rooms(&self) -> Result<u64, MetricsError>;
    fn staff_members(&self) -> Result<u64, MetricsError>;
    fn todays_revenue(&self) -> Result<f64, MetricsError>;
}

/// Collects scalar results, zeroing and flagging the ones that failed.
#[derive(Debug, Default)]
pub struct DashboardSnapshotBuilder {
    snapshot: MetricsSnapshot,
}

impl DashboardSnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_patients(mut self, result: Result<u64, MetricsError>) -> Self {
        let value = self.settle(DashboardField::TotalPatients, result);
        self.snapshot.total_patients = value;
        self
    }

    pub fn todays_appointments(mut self, result: Result<u64, MetricsError>) -> Self {
        let value = self.settle(DashboardField::TodaysAppointments, result);
        self.snapshot.todays_appointments = value;
        self
    }

    pub fn active_visits(mut self, result: Result<u64, MetricsError>) -> Self {
        let value = self.settle(DashboardField::ActiveVisits, result);
        self.snapshot.active_visits = value;
        self
    }

    pub fn available_rooms(mut self, result: Result<u64, MetricsError>) -> Self {
        let value = self.settle(DashboardField::AvailableRooms, result);
        self.snapshot.available_rooms = value;
        self
    }

    pub fn staff_members(mut self, result: Result<u64, MetricsError>) -> Self {
        let value = self.settle(DashboardField::StaffMembers, result);
        self.snapshot.staff_members = value;
        self
    }

    pub fn todays_revenue(mut self, result: Result<f64, MetricsError>) -> Self {
        let value = self.settle(DashboardField::TodaysRevenue, result);
        self.snapshot.todays_revenue = value;
        self
    }

    pub fn build(self) -> MetricsSnapshot {
        self.snapshot
    }

    fn settle<T: Default>(&mut self, field: DashboardField, result: Result<T, MetricsError>) -> T {
        self.snapshot.degraded.retain(|existing| *existing != field);
        match result {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(field = field.as_str(), error = %err, "dashboard metric unavailable");
                self.snapshot.degraded.push(field);
                T::default()
            }
        }
    }
}

/// Query every field of `source` independently and assemble the snapshot.
pub fn build_snapshot(source: &impl DashboardSource) -> MetricsSnapshot {
    DashboardSnapshotBuilder::new()
        .total_patients(source.total_patients())
        .todays_appointments(source.todays_appointments())
        .active_visits(source.active_visits())
        .available_rooms(source.available_rooms())
        .staff_members(source.staff_members())
        .todays_revenue(source.todays_revenue())
        .build()
}

/// In-memory data sets for the dashboard, one optional list per source.
///
/// A `None` list stands for a source that could not be fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordSets {
    pub today: NaiveDate,
    #[serde(default)]
    pub patients: Option<Vec<Record>>,
    #[serde(default)]
    pub appointments: Option<Vec<Record>>,
    #[serde(default)]
    pub visits: Option<Vec<Record>>,
    #[serde(default)]
    pub rooms: Option<Vec<Record>>,
    #[serde(default)]
    pub employees: Option<Vec<Record>>,
    #[serde(default)]
    pub payments: Option<Vec<Record>>,
}

impl RecordSets {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            patients: None,
            appointments: None,
            visits: None,
            rooms: None,
            employees: None,
            payments: None,
        }
    }
}

fn available<'a>(
    records: &'a Option<Vec<Record>>,
    dataset: &str,
) -> Result<&'a [Record], MetricsError> {
    records
        .as_deref()
        .ok_or_else(|| MetricsError::SourceUnavailable {
            dataset: dataset.to_string(),
            reason: "no records supplied".to_string(),
        })
}

fn count_with_status(records: &[Record], status: &str) -> u64 {
    records
        .iter()
        .filter(|record| record.text("status").as_deref() == Some(status))
        .count() as u64
}

impl DashboardSource for RecordSets {
    fn total_patients(&self) -> Result<u64, MetricsError> {
        Ok(available(&self.patients, "patients")?.len() as u64)
    }

    fn todays_appointments(&self) -> Result<u64, MetricsError> {
        let appointments = available(&self.appointments, "appointments")?;
        Ok(appointments
            .iter()
            .filter(|record| record.date("appointment_time") == Some(self.today))
            .count() as u64)
    }

    fn active_visits(&self) -> Result<u64, MetricsError> {
        Ok(count_with_status(available(&self.visits, "visits")?, "Active"))
    }

    fn available_rooms(&self) -> Result<u64, MetricsError> {
        Ok(count_with_status(available(&self.rooms, "rooms")?, "Available"))
    }

    fn staff_members(&self) -> Result<u64, MetricsError> {
        Ok(available(&self.employees, "employees")?.len() as u64)
    }

    fn todays_revenue(&self) -> Result<f64, MetricsError> {
        let payments = available(&self.payments, "payments")?;
        Ok(payments
            .iter()
            .filter(|record| record.date("payment_date") == Some(self.today))
            .filter_map(|record| record.number("amount"))
            .sum::<f64>())
    }
}
