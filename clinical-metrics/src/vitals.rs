//! Vital-sign cards driven by a fixed reference catalog.

use std::collections::HashMap;

use clinical_core::{MetricsError, RangeBound, SeverityTier, Urgency, VitalCard};

use crate::range::classify_value;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VitalKind {
    BodyTemperature,
    BloodPressure,
    HeartRate,
    RespiratoryRate,
    BloodOxygen,
}

impl VitalKind {
    pub const ALL: [VitalKind; 5] = [
        VitalKind::BodyTemperature,
        VitalKind::BloodPressure,
        VitalKind::HeartRate,
        VitalKind::RespiratoryRate,
        VitalKind::BloodOxygen,
    ];
}

/// One catalog row: where to read the value and how to grade it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalSpec {
    pub kind: VitalKind,
    pub label: &'static str,
    pub field: &'static str,
    pub unit: &'static str,
    pub bound: RangeBound,
    pub low: Urgency,
    pub high: Urgency,
}

impl VitalSpec {
    pub fn urgency(&self, tier: SeverityTier) -> Urgency {
        match tier {
            SeverityTier::Normal => Urgency::Normal,
            SeverityTier::Low => self.low,
            SeverityTier::High => self.high,
            SeverityTier::Unknown => Urgency::Info,
        }
    }
}

const DIASTOLIC_FIELD: &str = "bloodPressureDiastolic";
const BLOOD_TYPE_FIELD: &str = "bloodType";

pub const VITAL_CATALOG: [VitalSpec; 5] = [
    VitalSpec {
        kind: VitalKind::BodyTemperature,
        label: "Body Temperature",
        field: "bodyTemperature",
        unit: "°C",
        bound: RangeBound { min: 36.1, max: 37.2 },
        low: Urgency::Warning,
        high: Urgency::Warning,
    },
    VitalSpec {
        kind: VitalKind::BloodPressure,
        label: "Blood Pressure",
        field: "bloodPressureSystolic",
        unit: "mmHg",
        bound: RangeBound { min: 90.0, max: 120.0 },
        low: Urgency::Danger,
        high: Urgency::Danger,
    },
    VitalSpec {
        kind: VitalKind::HeartRate,
        label: "Heart Rate",
        field: "heartRate",
        unit: "bpm",
        bound: RangeBound { min: 60.0, max: 100.0 },
        low: Urgency::Warning,
        high: Urgency::Danger,
    },
    VitalSpec {
        kind: VitalKind::RespiratoryRate,
        label: "Respiratory Rate",
        field: "respiratoryRate",
        unit: "breaths/min",
        bound: RangeBound { min: 12.0, max: 20.0 },
        low: Urgency::Danger,
        high: Urgency::Danger,
    },
    // Saturation cannot exceed the upper bound; the high mapping is never shown.
    VitalSpec {
        kind: VitalKind::BloodOxygen,
        label: "Blood Oxygen",
        field: "bloodOxygenLevel",
        unit: "%",
        bound: RangeBound { min: 95.0, max: 100.0 },
        low: Urgency::Danger,
        high: Urgency::Info,
    },
];

/// Classifies a vitals record against a catalog checked once for completeness.
#[derive(Debug, Clone)]
pub struct VitalsClassifier {
    specs: HashMap<VitalKind, VitalSpec>,
    order: Vec<VitalKind>,
}

impl VitalsClassifier {
    pub fn new() -> Result<Self, MetricsError> {
        Self::from_catalog(&VITAL_CATALOG)
    }

    /// Build from an arbitrary catalog, rejecting gaps, duplicates and bad bounds.
    pub fn from_catalog(catalog: &[VitalSpec]) -> Result<Self, MetricsError> {
        let mut specs = HashMap::with_capacity(catalog.len());
        let mut order = Vec::with_capacity(catalog.len());

        for spec in catalog {
            if !spec.bound.is_valid() {
                return Err(MetricsError::Catalog(format!(
                    "{} has an invalid bound {}-{}",
                    spec.label, spec.bound.min, spec.bound.max
                )));
            }
            if specs.insert(spec.kind, *spec).is_some() {
                return Err(MetricsError::Catalog(format!(
                    "{:?} is listed more than once",
                    spec.kind
                )));
            }
            order.push(spec.kind);
        }

        if let Some(missing) = VitalKind::ALL.iter().find(|kind| !specs.contains_key(*kind)) {
            return Err(MetricsError::Catalog(format!("{missing:?} has no entry")));
        }

        Ok(Self { specs, order })
    }

    pub fn spec(&self, kind: VitalKind) -> &VitalSpec {
        // Construction guarantees every kind is present.
        &self.specs[&kind]
    }

    /// Cards for every vital present in the record, in catalog order.
    ///
    /// Vitals without a numeric value are left out entirely. A recorded blood
    /// type is appended as an informational card.
    pub fn classify(&self, record: &Record) -> Vec<VitalCard> {
        let mut cards: Vec<VitalCard> = self
            .order
            .iter()
            .filter_map(|kind| self.card(self.spec(*kind), record))
            .collect();

        if let Some(blood_type) = record.text(BLOOD_TYPE_FIELD) {
            cards.push(VitalCard {
                name: "Blood Type".to_string(),
                value: blood_type,
                unit: None,
                range: None,
                tier: SeverityTier::Unknown,
                urgency: Urgency::Info,
            });
        }

        cards
    }

    fn card(&self, spec: &VitalSpec, record: &Record) -> Option<VitalCard> {
        let Some(value) = record.number(spec.field) else {
            tracing::debug!(vital = spec.label, "vital value absent, card omitted");
            return None;
        };

        let display = match spec.kind {
            VitalKind::BloodPressure => match record.number(DIASTOLIC_FIELD) {
                Some(diastolic) => format!("{value}/{diastolic}"),
                None => value.to_string(),
            },
            _ => value.to_string(),
        };

        let tier = classify_value(Some(value), Some(&spec.bound));

        Some(VitalCard {
            name: spec.label.to_string(),
            value: display,
            unit: Some(spec.unit.to_string()),
            range: Some(spec.bound),
            tier,
            urgency: spec.urgency(tier),
        })
    }
}
