//! Loosely typed rows handed over by the persistence layer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clinical_core::MetricsError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flat mapping from field name to scalar value.
///
/// Call sites read fields by name; a `null` or blank string reads as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|value| !value.is_null())
    }

    /// String form of a field. Numbers and booleans are rendered as text.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    /// Numeric value of a field, accepting numeric strings.
    pub fn number(&self, field: &str) -> Option<f64> {
        let value = match self.get(field)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => parse_decimal(text),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        match self.get(field)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64)),
            Value::String(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        match self.get(field)? {
            Value::String(text) => parse_timestamp(text),
            _ => None,
        }
    }

    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        self.timestamp(field).map(|ts| ts.date_naive())
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Parse a JSON array of objects into records.
pub fn records_from_str(json: &str) -> Result<Vec<Record>, MetricsError> {
    serde_json::from_str(json).map_err(|err| MetricsError::Parse(err.to_string()))
}

/// Parse a JSON value that must be an array of objects.
pub fn records_from_value(value: &Value) -> Result<Vec<Record>, MetricsError> {
    let items = value.as_array().ok_or(MetricsError::MissingData)?;
    items
        .iter()
        .map(|item| match item {
            Value::Object(map) => Ok(Record(map.clone())),
            other => Err(MetricsError::Parse(format!(
                "Expected an object record, received {other}"
            ))),
        })
        .collect()
}

pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn blank_and_null_fields_read_as_absent() {
        let record = Record::new()
            .with("bloodType", "  ")
            .with("dischargeDate", Value::Null);
        assert_eq!(record.text("bloodType"), None);
        assert_eq!(record.timestamp("dischargeDate"), None);
        assert_eq!(record.text("missing"), None);
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let record = Record::new()
            .with("attributeValue", " 5.4 ")
            .with("heartRate", 72)
            .with("note", "n/a");
        assert_eq!(record.number("attributeValue"), Some(5.4));
        assert_eq!(record.number("heartRate"), Some(72.0));
        assert_eq!(record.number("note"), None);
        assert_eq!(record.integer("heartRate"), Some(72));
    }

    #[test]
    fn timestamps_accept_common_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 8, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T08:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 08:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-01"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn records_from_value_rejects_non_objects() {
        let value = serde_json::json!([{ "visitType": "Emergency" }, 3]);
        assert!(matches!(
            records_from_value(&value),
            Err(MetricsError::Parse(_))
        ));
        assert!(matches!(
            records_from_value(&serde_json::json!({})),
            Err(MetricsError::MissingData)
        ));
    }
}
