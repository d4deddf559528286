//! Department pressure tiers from active-patient counts.

use clinical_core::{DepartmentLoad, LoadTier, MetricsConfig, MetricsError};

use crate::group::BucketAccumulator;
use crate::record::Record;

const DEPARTMENT_NAME: &str = "department_name";
const ACTIVE_PATIENTS: &str = "active_patients";
const VISIT_STATUS: &str = "status";
const ACTIVE_STATUS: &str = "Active";

/// Tier for a count using the default thresholds.
pub fn department_tier(count: u32) -> LoadTier {
    DepartmentLoadClassifier::default().tier(count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentLoadClassifier {
    high: u32,
    normal: u32,
}

impl Default for DepartmentLoadClassifier {
    fn default() -> Self {
        let config = MetricsConfig::default();
        Self {
            high: config.department_high_threshold,
            normal: config.department_normal_threshold,
        }
    }
}

impl DepartmentLoadClassifier {
    pub fn from_config(config: &MetricsConfig) -> Result<Self, MetricsError> {
        config.validate()?;
        Ok(Self {
            high: config.department_high_threshold,
            normal: config.department_normal_threshold,
        })
    }

    /// First matching threshold wins, checked from the highest down.
    pub fn tier(&self, count: u32) -> LoadTier {
        if count >= self.high {
            LoadTier::High
        } else if count >= self.normal {
            LoadTier::Normal
        } else {
            LoadTier::Low
        }
    }

    /// Rank department query rows by descending active-patient count.
    ///
    /// Rows without a name or a non-negative count are skipped. Ties keep their
    /// input order.
    pub fn rank(&self, rows: &[Record]) -> Vec<DepartmentLoad> {
        let counts = rows
            .iter()
            .filter_map(|row| {
                let name = row.text(DEPARTMENT_NAME);
                let count = row
                    .integer(ACTIVE_PATIENTS)
                    .and_then(|value| u32::try_from(value).ok());
                match (name, count) {
                    (Some(name), Some(count)) => Some((name, count)),
                    _ => {
                        tracing::debug!(?row, "department row skipped");
                        None
                    }
                }
            })
            .collect();
        self.rank_counts(counts)
    }

    pub fn rank_counts(&self, counts: Vec<(String, u32)>) -> Vec<DepartmentLoad> {
        let mut loads: Vec<DepartmentLoad> = counts
            .into_iter()
            .map(|(name, active_patients)| DepartmentLoad {
                name,
                active_patients,
                tier: self.tier(active_patients),
            })
            .collect();
        loads.sort_by(|a, b| b.active_patients.cmp(&a.active_patients));
        loads
    }

    /// Count visits with status `Active` per department, then rank.
    pub fn active_by_department(&self, visits: &[Record]) -> Vec<DepartmentLoad> {
        let mut acc = BucketAccumulator::new();
        for visit in visits {
            if visit.text(VISIT_STATUS).as_deref() != Some(ACTIVE_STATUS) {
                continue;
            }
            let Some(name) = visit.text(DEPARTMENT_NAME) else {
                continue;
            };
            acc.add(name, 1.0);
        }

        let counts = acc
            .finish()
            .into_iter()
            .map(|bucket| (bucket.key, bucket.value as u32))
            .collect();
        self.rank_counts(counts)
    }
}
