//! Chart series for the visit and staffing report pages.

use chrono::{DateTime, Utc};
use clinical_core::{AggregationBucket, ChartSeries};
use serde::{Deserialize, Serialize};

use crate::duration::visit_duration_days;
use crate::group::{count_by, count_by_field, UNSPECIFIED_KEY};
use crate::record::Record;

const VISIT_DATE: &str = "visitDate";
const VISIT_TYPE: &str = "visitType";

/// All series drawn on the patient-visits report.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VisitReport {
    pub visits_by_day: ChartSeries,
    pub visit_types: ChartSeries,
    pub visit_durations: ChartSeries,
}

impl VisitReport {
    pub fn build(visits: &[Record], now: DateTime<Utc>) -> Self {
        Self {
            visits_by_day: visits_by_day(visits),
            visit_types: ChartSeries::from(count_by_field(visits, VISIT_TYPE)),
            visit_durations: visit_durations(visits, now),
        }
    }
}

/// Visit counts per calendar day of `visitDate`, formatted `YYYY-MM-DD`.
pub fn visits_by_day(visits: &[Record]) -> ChartSeries {
    ChartSeries::from(count_by(visits, |visit| {
        visit
            .date(VISIT_DATE)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| UNSPECIFIED_KEY.to_string())
    }))
}

/// Length of stay per visit, labeled `Visit 1`, `Visit 2`, ... in input order.
///
/// Open visits are measured to `now`. Visits without a readable admission date
/// are skipped and do not consume a label number.
pub fn visit_durations(visits: &[Record], now: DateTime<Utc>) -> ChartSeries {
    let buckets = visits
        .iter()
        .filter_map(|visit| visit_duration_days(visit, now))
        .enumerate()
        .map(|(position, days)| AggregationBucket {
            key: format!("Visit {}", position + 1),
            value: days as f64,
        })
        .collect::<Vec<_>>();
    ChartSeries::from(buckets)
}

pub fn doctors_by_specialization(doctors: &[Record]) -> ChartSeries {
    ChartSeries::from(count_by_field(doctors, "specializationName"))
}

pub fn nurses_by_shift_day(assignments: &[Record]) -> ChartSeries {
    ChartSeries::from(count_by_field(assignments, "shiftDay"))
}

pub fn nurses_by_specialization(assignments: &[Record]) -> ChartSeries {
    ChartSeries::from(count_by_field(assignments, "specialization"))
}
