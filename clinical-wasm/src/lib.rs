//! Bridge WASM <-> JavaScript cho bảng điều khiển bệnh viện.

use chrono::{DateTime, Utc};
use clinical_core::{MetricsConfig, MetricsError};
use clinical_metrics::{
    build_snapshot, group_lab_results, records_from_value, DepartmentLoadClassifier, Record,
    RecordSets, VisitReport, VitalsClassifier,
};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsMetricsConfig {
    #[serde(default)]
    department_high_threshold: Option<u32>,
    #[serde(default)]
    department_normal_threshold: Option<u32>,
}

impl From<JsMetricsConfig> for MetricsConfig {
    fn from(cfg: JsMetricsConfig) -> Self {
        let mut base = MetricsConfig::default();
        if let Some(high) = cfg.department_high_threshold {
            base.department_high_threshold = high;
        }
        if let Some(normal) = cfg.department_normal_threshold {
            base.department_normal_threshold = normal;
        }
        base
    }
}

/// Nhóm kết quả xét nghiệm theo tên xét nghiệm và phân loại từng thuộc tính.
#[wasm_bindgen]
pub fn lab_panels(records: JsValue) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let records = read_records(records)?;
    serialize(&group_lab_results(&records))
}

/// Thẻ chỉ số sống cho một bản ghi sinh hiệu.
#[wasm_bindgen]
pub fn vital_cards(record: JsValue) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let record: Record = from_value(record)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được bản ghi sinh hiệu: {err}")))?;
    let classifier = VitalsClassifier::new().map_err(metrics_error)?;
    serialize(&classifier.classify(&record))
}

/// Các chuỗi biểu đồ của báo cáo lượt khám; `now` là mốc thời gian RFC 3339.
#[wasm_bindgen]
pub fn visit_report(records: JsValue, now: String) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let records = read_records(records)?;
    let now = DateTime::parse_from_rfc3339(&now)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| JsValue::from_str(&format!("Mốc thời gian không hợp lệ: {err}")))?;
    serialize(&VisitReport::build(&records, now))
}

/// Bảng tải khoa, sắp xếp giảm dần theo số bệnh nhân đang điều trị.
#[wasm_bindgen]
pub fn department_status(rows: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let rows = read_records(rows)?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsMetricsConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            MetricsConfig::from(cfg)
        }
        None => MetricsConfig::default(),
    };

    let classifier = DepartmentLoadClassifier::from_config(&cfg).map_err(metrics_error)?;
    serialize(&classifier.rank(&rows))
}

/// Số liệu tổng quan; nguồn nào thiếu thì trường tương ứng về 0.
#[wasm_bindgen]
pub fn dashboard_snapshot(sources: JsValue) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let sources: RecordSets = from_value(sources)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được nguồn dữ liệu: {err}")))?;
    serialize(&build_snapshot(&sources))
}

fn read_records(input: JsValue) -> Result<Vec<Record>, JsValue> {
    let value = from_value::<serde_json::Value>(input)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON: {err}")))?;
    records_from_value(&value).map_err(metrics_error)
}

fn serialize<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

fn metrics_error(err: MetricsError) -> JsValue {
    JsValue::from_str(&format!("Metrics error: {err}"))
}

fn init_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}
