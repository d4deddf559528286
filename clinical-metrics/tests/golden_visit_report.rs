use std::fs;

use chrono::{TimeZone, Utc};
use clinical_metrics::{records_from_str, VisitReport};
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn visit_report_matches_golden() {
    let visits = fs::read_to_string(fixture_path("patient_visits.json"))
        .expect("Không đọc được danh sách lượt khám mẫu");
    let visits = records_from_str(&visits).expect("Danh sách lượt khám không hợp lệ");

    let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let report = VisitReport::build(&visits, now);

    let actual = serde_json::to_value(report).expect("Không serialize báo cáo");

    let expected = fs::read_to_string(fixture_path("patient_visits_report.json"))
        .expect("Không đọc được golden report");
    let expected: Value = serde_json::from_str(&expected).expect("Golden không hợp lệ");

    assert_eq!(actual, expected);
}
