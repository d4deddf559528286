use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use clinical_core::MetricsConfig;
use clinical_metrics::{
    build_snapshot, group_lab_results, records_from_str, DepartmentLoadClassifier, Record,
    RecordSets, VisitReport, VitalsClassifier,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "clinical-cli",
    about = "Phân loại và tổng hợp chỉ số lâm sàng từ file JSON."
)]
struct Cli {
    /// File JSON cấu hình ngưỡng (tuỳ chọn).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Nhóm và phân loại kết quả xét nghiệm
    Labs {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Thẻ chỉ số sống cho từng bản ghi sinh hiệu
    Vitals {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Bảng tải khoa
    Departments {
        #[arg(short, long)]
        input: PathBuf,
        /// Đầu vào là danh sách lượt khám thay vì kết quả truy vấn theo khoa
        #[arg(long)]
        from_visits: bool,
    },
    /// Biểu đồ báo cáo lượt khám
    Visits {
        #[arg(short, long)]
        input: PathBuf,
        /// Mốc "hiện tại" RFC 3339; mặc định là đồng hồ hệ thống
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Số liệu tổng quan của bệnh viện
    Dashboard {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clinical_metrics=info,clinical_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let output = match cli.command {
        Commands::Labs { input } => {
            let records = read_records(&input)?;
            serde_json::to_value(group_lab_results(&records))?
        }
        Commands::Vitals { input } => {
            let records = read_records(&input)?;
            let classifier = VitalsClassifier::new()?;
            let cards: Vec<_> = records
                .iter()
                .map(|record| classifier.classify(record))
                .collect();
            serde_json::to_value(cards)?
        }
        Commands::Departments { input, from_visits } => {
            let records = read_records(&input)?;
            let classifier = DepartmentLoadClassifier::from_config(&config)?;
            let loads = if from_visits {
                classifier.active_by_department(&records)
            } else {
                classifier.rank(&records)
            };
            serde_json::to_value(loads)?
        }
        Commands::Visits { input, now } => {
            let records = read_records(&input)?;
            let now = now.unwrap_or_else(Utc::now);
            tracing::info!(visits = records.len(), %now, "building visit report");
            serde_json::to_value(VisitReport::build(&records, now))?
        }
        Commands::Dashboard { input } => {
            let data = read_file(&input)?;
            let sources: RecordSets = serde_json::from_str(&data)
                .with_context(|| format!("Không đọc được nguồn dữ liệu trong {:?}", input))?;
            let snapshot = build_snapshot(&sources);
            if !snapshot.degraded.is_empty() {
                tracing::warn!(degraded = ?snapshot.degraded, "snapshot is incomplete");
            }
            serde_json::to_value(snapshot)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MetricsConfig> {
    let Some(path) = path else {
        return Ok(MetricsConfig::default());
    };
    let data = read_file(path)?;
    let config: MetricsConfig = serde_json::from_str(&data)
        .with_context(|| format!("Cấu hình không hợp lệ trong {:?}", path))?;
    config.validate()?;
    tracing::info!(?config, "loaded threshold config");
    Ok(config)
}

fn read_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let data = read_file(path)?;
    let records = records_from_str(&data)
        .with_context(|| format!("Không đọc được danh sách bản ghi trong {:?}", path))?;
    tracing::debug!(count = records.len(), path = %path.display(), "records loaded");
    Ok(records)
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Không đọc được file {:?}", path))
}
