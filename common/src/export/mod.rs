//! Export core modules shared across the CLI and other front-ends.
//!
//! どの形式も「生データ」を入力とし、共通のクリーニング規則を通してから出力する。

pub mod clean;
pub mod csv_core;
pub mod json_core;

#[cfg(feature = "excel")]
pub mod excel_core;

pub use clean::{clean_record, clean_records, export_headers};

/// 出力ファイル名の接頭辞
pub const FILE_PREFIX: &str = "scraped_results";

/// エクスポート形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Csv,
    Json,
    Excel,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [ExportKind::Csv, ExportKind::Json, ExportKind::Excel];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Csv => "csv",
            ExportKind::Json => "json",
            ExportKind::Excel => "xlsx",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::Csv => "CSV",
            ExportKind::Json => "JSON",
            ExportKind::Excel => "Excel",
        }
    }
}

/// ISO 8601 タイムスタンプをファイル名用に変換（`:` と `.` を `-` に）
pub fn file_timestamp(iso: &str) -> String {
    iso.replace([':', '.'], "-")
}

/// `scraped_results_<timestamp>.<ext>`
pub fn export_file_name(kind: ExportKind, iso_timestamp: &str) -> String {
    format!("{}_{}.{}", FILE_PREFIX, file_timestamp(iso_timestamp), kind.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        let ts = "2026-01-18T09:30:15.123Z";
        assert_eq!(
            export_file_name(ExportKind::Csv, ts),
            "scraped_results_2026-01-18T09-30-15-123Z.csv"
        );
        assert_eq!(
            export_file_name(ExportKind::Excel, ts),
            "scraped_results_2026-01-18T09-30-15-123Z.xlsx"
        );
    }
}
