//! First-seen ordered grouping of record lists into chart buckets.

use std::collections::HashMap;
use std::fmt::Display;

use clinical_core::AggregationBucket;

use crate::record::Record;

/// Label used for records that lack the grouping field.
pub const UNSPECIFIED_KEY: &str = "Unspecified";

/// Entries keyed by label, kept in the order their keys first appeared.
#[derive(Debug)]
pub(crate) struct FirstSeen<V> {
    index: HashMap<String, usize>,
    entries: Vec<V>,
}

impl<V> Default for FirstSeen<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> FirstSeen<V> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The entry for `key`, created with `make` the first time the key is seen.
    pub(crate) fn entry(&mut self, key: String, make: impl FnOnce(&str) -> V) -> &mut V {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.entries.push(make(&key));
                self.index.insert(key, position);
                position
            }
        };
        &mut self.entries[position]
    }

    pub(crate) fn into_vec(self) -> Vec<V> {
        self.entries
    }
}

/// Accumulates values per key while remembering the order keys first appeared.
#[derive(Debug, Default)]
pub struct BucketAccumulator {
    buckets: FirstSeen<AggregationBucket>,
}

impl BucketAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, amount: f64) {
        let bucket = self.buckets.entry(key.into(), |key| AggregationBucket {
            key: key.to_string(),
            value: 0.0,
        });
        bucket.value += amount;
    }

    pub fn finish(self) -> Vec<AggregationBucket> {
        self.buckets.into_vec()
    }
}

/// Count items per derived key.
pub fn count_by<T, K, F>(items: &[T], mut key: F) -> Vec<AggregationBucket>
where
    F: FnMut(&T) -> K,
    K: Display,
{
    let mut acc = BucketAccumulator::new();
    for item in items {
        acc.add(key(item).to_string(), 1.0);
    }
    acc.finish()
}

/// Sum a numeric projection per derived key.
pub fn sum_by<T, K, F, V>(items: &[T], mut key: F, mut value: V) -> Vec<AggregationBucket>
where
    F: FnMut(&T) -> K,
    K: Display,
    V: FnMut(&T) -> f64,
{
    let mut acc = BucketAccumulator::new();
    for item in items {
        acc.add(key(item).to_string(), value(item));
    }
    acc.finish()
}

pub fn count_by_field(records: &[Record], field: &str) -> Vec<AggregationBucket> {
    count_by(records, |record| field_key(record, field))
}

/// Sum `value_field` per `key_field`; missing or non-numeric amounts add zero.
pub fn sum_by_field(
    records: &[Record],
    key_field: &str,
    value_field: &str,
) -> Vec<AggregationBucket> {
    sum_by(
        records,
        |record| field_key(record, key_field),
        |record| record.number(value_field).unwrap_or(0.0),
    )
}

fn field_key(record: &Record, field: &str) -> String {
    record
        .text(field)
        .unwrap_or_else(|| UNSPECIFIED_KEY.to_string())
}
