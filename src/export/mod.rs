pub mod excel;

use crate::error::Result;
use ai_scraper_common::export::csv_core::generate_csv_string;
use ai_scraper_common::export::json_core::generate_json_string;
use ai_scraper_common::export::{export_file_name, ExportKind};
use ai_scraper_common::ProductRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// エクスポート結果
#[derive(Debug, Default)]
pub struct ExportReport {
    /// 書き出したファイル
    pub written: Vec<PathBuf>,
    /// 失敗した形式とメッセージ（Excelのみ）
    pub failures: Vec<(ExportKind, String)>,
}

impl ExportReport {
    pub fn is_empty(&self) -> bool {
        self.written.is_empty() && self.failures.is_empty()
    }
}

/// 現在時刻で書き出す
pub fn export_records(records: &[ProductRecord], kinds: &[ExportKind], output_dir: &Path) -> Result<ExportReport> {
    export_records_at(records, kinds, output_dir, Utc::now())
}

/// 指定時刻のファイル名で書き出す
///
/// 生データが0件なら何もしない。Excelの失敗はログに残して続行する。
pub fn export_records_at(
    records: &[ProductRecord],
    kinds: &[ExportKind],
    output_dir: &Path,
    timestamp: DateTime<Utc>,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();
    if records.is_empty() || kinds.is_empty() {
        if records.is_empty() {
            info!("エクスポート対象のデータがありません");
        }
        return Ok(report);
    }

    std::fs::create_dir_all(output_dir)?;
    let iso = timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);

    for &kind in kinds {
        let output_path = output_dir.join(export_file_name(kind, &iso));
        println!("- {}を生成中...", kind.label());

        match kind {
            ExportKind::Csv => {
                let content = generate_csv_string(records)?;
                std::fs::write(&output_path, content)?;
            }
            ExportKind::Json => {
                let content = generate_json_string(records)?;
                std::fs::write(&output_path, content)?;
            }
            ExportKind::Excel => {
                if let Err(e) = excel::generate_excel(records, &output_path) {
                    error!("Excel export failed: {}", e);
                    println!("✗ Excel出力に失敗: {}", e);
                    report.failures.push((kind, e.to_string()));
                    continue;
                }
            }
        }

        println!("✔ {}出力: {}", kind.label(), output_path.display());
        report.written.push(output_path);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_zero_records_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let report = export_records(&[], &ExportKind::ALL, &out).unwrap();
        assert!(report.is_empty());
        assert!(!out.exists(), "0件のときはディレクトリも作らない");
    }

    #[test]
    fn test_file_names_use_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let ts = Utc.with_ymd_and_hms(2026, 1, 18, 9, 30, 15).unwrap();
        let records = vec![ProductRecord::new().with("name", "Mug")];
        let report = export_records_at(&records, &[ExportKind::Csv], dir.path(), ts).unwrap();
        assert_eq!(
            report.written,
            vec![dir.path().join("scraped_results_2026-01-18T09-30-15-000Z.csv")]
        );
    }
}
