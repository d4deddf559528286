//! Classification and aggregation of hospital record lists into chart series,
//! severity tiers and dashboard counters.
//!
//! Every operation is pure over already-fetched records. Malformed or missing
//! inputs degrade to sentinel values (`Unknown` tiers, omitted cards, zeroed
//! counters) instead of errors.

pub mod dashboard;
pub mod department;
pub mod duration;
pub mod group;
pub mod labs;
pub mod range;
pub mod record;
pub mod reports;
pub mod vitals;

pub use dashboard::{build_snapshot, DashboardSnapshotBuilder, DashboardSource, RecordSets};
pub use department::{department_tier, DepartmentLoadClassifier};
pub use duration::{duration_days, visit_duration_days};
pub use group::{count_by, count_by_field, sum_by, sum_by_field, BucketAccumulator};
pub use labs::{classify_lab_attribute, group_lab_results};
pub use range::{classify_text, classify_value, parse_range};
pub use record::{records_from_str, records_from_value, Record};
pub use reports::VisitReport;
pub use vitals::{VitalKind, VitalSpec, VitalsClassifier, VITAL_CATALOG};
