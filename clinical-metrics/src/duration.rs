//! Elapsed whole days between two instants.

use chrono::{DateTime, Utc};

use crate::record::Record;

const VISIT_DATE: &str = "visitDate";
const DISCHARGE_DATE: &str = "dischargeDate";

/// Whole days from `start` to `end`, or to `now` when `end` is absent.
///
/// Partial days are truncated toward zero and a negative span is returned as is.
pub fn duration_days(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    end.unwrap_or(now).signed_duration_since(start).num_days()
}

/// Length of stay for a visit record, `None` when `visitDate` is unreadable.
pub fn visit_duration_days(visit: &Record, now: DateTime<Utc>) -> Option<i64> {
    let admitted = visit.timestamp(VISIT_DATE)?;
    Some(duration_days(admitted, visit.timestamp(DISCHARGE_DATE), now))
}
