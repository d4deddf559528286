//! Lab attribute rows classified against their own reference ranges.

use clinical_core::{ClassifiedAttribute, LabPanel};

use crate::group::FirstSeen;
use crate::range::classify_text;
use crate::record::Record;

const TEST_NAME: &str = "testName";
const ATTRIBUTE_NAME: &str = "attributeName";
const ATTRIBUTE_VALUE: &str = "attributeValue";
const NORMAL_RANGE: &str = "normalRange";
const RESULT_DATE: &str = "resultDate";

/// Classify one lab attribute record.
///
/// Missing value or range text degrades to `Unknown`, never to an error.
pub fn classify_lab_attribute(record: &Record) -> ClassifiedAttribute {
    let value = record.text(ATTRIBUTE_VALUE).unwrap_or_default();
    let range = record.text(NORMAL_RANGE).unwrap_or_default();
    let tier = classify_text(&value, &range);

    ClassifiedAttribute {
        name: record.text(ATTRIBUTE_NAME).unwrap_or_default(),
        value,
        range,
        tier,
    }
}

/// Group lab attribute records into one panel per `testName`, in first-seen order.
pub fn group_lab_results(records: &[Record]) -> Vec<LabPanel> {
    let mut panels: FirstSeen<LabPanel> = FirstSeen::new();

    for record in records {
        let test_name = record.text(TEST_NAME).unwrap_or_else(|| "Unnamed test".to_string());
        let attribute = classify_lab_attribute(record);

        panels
            .entry(test_name, |name| LabPanel {
                test_name: name.to_string(),
                result_date: record.timestamp(RESULT_DATE),
                attributes: Vec::new(),
            })
            .attributes
            .push(attribute);
    }

    panels.into_vec()
}
