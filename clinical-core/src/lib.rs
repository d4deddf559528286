//! Kiểu dữ liệu lõi cho bộ phân loại và tổng hợp chỉ số lâm sàng.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cấu hình ngưỡng tải khoa.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetricsConfig {
    /// Số bệnh nhân đang điều trị từ mức này trở lên là tải cao.
    pub department_high_threshold: u32,
    /// Số bệnh nhân đang điều trị từ mức này trở lên là tải bình thường.
    pub department_normal_threshold: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            department_high_threshold: 15,
            department_normal_threshold: 8,
        }
    }
}

impl MetricsConfig {
    /// Kiểm tra thứ tự ngưỡng trước khi dùng.
    pub fn validate(&self) -> Result<(), MetricsError> {
        if self.department_normal_threshold > self.department_high_threshold {
            return Err(MetricsError::Config(format!(
                "department_normal_threshold ({}) exceeds department_high_threshold ({})",
                self.department_normal_threshold, self.department_high_threshold
            )));
        }
        Ok(())
    }
}

/// Khoảng tham chiếu đóng `[min, max]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RangeBound {
    pub min: f64,
    pub max: f64,
}

impl RangeBound {
    /// Trả về `None` khi giới hạn không hữu hạn hoặc `min > max`.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if min.is_finite() && max.is_finite() && min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn is_valid(&self) -> bool {
        Self::new(self.min, self.max).is_some()
    }
}

/// Mức phân loại một giá trị đo so với khoảng tham chiếu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Low,
    Normal,
    High,
    /// Không có khoảng tham chiếu hoặc thiếu giá trị.
    Unknown,
}

/// Mức cảnh báo hiển thị trên thẻ chỉ số sống.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    Warning,
    Danger,
    Info,
}

/// Mức tải của khoa theo số bệnh nhân đang điều trị.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LoadTier {
    High,
    Normal,
    Low,
}

/// Một nhóm tổng hợp: nhãn và giá trị đếm/cộng dồn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregationBucket {
    pub key: String,
    pub value: f64,
}

/// Chuỗi dữ liệu sẵn sàng cho biểu đồ.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl From<Vec<AggregationBucket>> for ChartSeries {
    fn from(buckets: Vec<AggregationBucket>) -> Self {
        let (labels, values) = buckets
            .into_iter()
            .map(|bucket| (bucket.key, bucket.value))
            .unzip();
        Self { labels, values }
    }
}

/// Một dòng thuộc tính xét nghiệm đã phân loại.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedAttribute {
    pub name: String,
    pub value: String,
    pub range: String,
    pub tier: SeverityTier,
}

/// Nhóm thuộc tính của cùng một xét nghiệm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabPanel {
    pub test_name: String,
    pub result_date: Option<DateTime<Utc>>,
    pub attributes: Vec<ClassifiedAttribute>,
}

/// Thẻ chỉ số sống.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalCard {
    pub name: String,
    pub value: String,
    pub unit: Option<String>,
    pub range: Option<RangeBound>,
    pub tier: SeverityTier,
    pub urgency: Urgency,
}

/// Một dòng bảng tải khoa.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentLoad {
    pub name: String,
    pub active_patients: u32,
    pub tier: LoadTier,
}

/// Tên các trường của bảng số liệu tổng quan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DashboardField {
    TotalPatients,
    TodaysAppointments,
    ActiveVisits,
    AvailableRooms,
    StaffMembers,
    TodaysRevenue,
}

impl DashboardField {
    pub const ALL: [DashboardField; 6] = [
        DashboardField::TotalPatients,
        DashboardField::TodaysAppointments,
        DashboardField::ActiveVisits,
        DashboardField::AvailableRooms,
        DashboardField::StaffMembers,
        DashboardField::TodaysRevenue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardField::TotalPatients => "total_patients",
            DashboardField::TodaysAppointments => "todays_appointments",
            DashboardField::ActiveVisits => "active_visits",
            DashboardField::AvailableRooms => "available_rooms",
            DashboardField::StaffMembers => "staff_members",
            DashboardField::TodaysRevenue => "todays_revenue",
        }
    }
}

/// Số liệu tổng quan, mỗi trường được tính độc lập.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub total_patients: u64,
    pub todays_appointments: u64,
    pub active_visits: u64,
    pub available_rooms: u64,
    pub staff_members: u64,
    pub todays_revenue: f64,
    /// Các trường không tính được và đã về 0.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<DashboardField>,
}

impl MetricsSnapshot {
    pub fn is_degraded(&self, field: DashboardField) -> bool {
        self.degraded.contains(&field)
    }
}

/// Lỗi chung của bộ chỉ số.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Nguồn dữ liệu {dataset} không khả dụng: {reason}")]
    SourceUnavailable { dataset: String, reason: String },
    #[error("Danh mục chỉ số không hợp lệ: {0}")]
    Catalog(String),
    #[error("Cấu hình không hợp lệ: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bound_rejects_inverted_and_non_finite() {
        assert!(RangeBound::new(90.0, 120.0).is_some());
        assert!(RangeBound::new(5.0, 5.0).is_some());
        assert!(RangeBound::new(120.0, 90.0).is_none());
        assert!(RangeBound::new(f64::NAN, 1.0).is_none());
        assert!(RangeBound::new(1.0, f64::INFINITY).is_none());
    }

    #[test]
    fn range_bound_is_inclusive() {
        let bound = RangeBound::new(36.1, 37.2).unwrap();
        assert!(bound.contains(36.1));
        assert!(bound.contains(37.2));
        assert!(!bound.contains(36.0));
    }

    #[test]
    fn chart_series_keeps_bucket_order() {
        let series = ChartSeries::from(vec![
            AggregationBucket {
                key: "Tue".to_string(),
                value: 1.0,
            },
            AggregationBucket {
                key: "Mon".to_string(),
                value: 2.0,
            },
        ]);
        assert_eq!(series.labels, vec!["Tue", "Mon"]);
        assert_eq!(series.values, vec![1.0, 2.0]);
    }

    #[test]
    fn wire_names_match_dashboard_contract() {
        let tier = serde_json::to_value(LoadTier::High).unwrap();
        assert_eq!(tier, "High");

        let severity = serde_json::to_value(SeverityTier::Unknown).unwrap();
        assert_eq!(severity, "unknown");

        let row = serde_json::to_value(DepartmentLoad {
            name: "Cardiology".to_string(),
            active_patients: 9,
            tier: LoadTier::Normal,
        })
        .unwrap();
        assert_eq!(row["activePatients"], 9);

        let snapshot = serde_json::to_value(MetricsSnapshot::default()).unwrap();
        assert!(snapshot.get("degraded").is_none());
        assert_eq!(snapshot["todays_revenue"], 0.0);
    }

    #[test]
    fn config_rejects_crossed_thresholds() {
        assert!(MetricsConfig::default().validate().is_ok());
        let crossed = MetricsConfig {
            department_high_threshold: 5,
            department_normal_threshold: 10,
        };
        assert!(matches!(crossed.validate(), Err(MetricsError::Config(_))));
    }
}
