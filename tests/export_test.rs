//! CSV/JSON/Excel出力の統合テスト

use ai_scraper::export::{excel, export_records_at};
use ai_scraper_common::export::excel_core::SHEET_NAME;
use ai_scraper_common::export::ExportKind;
use ai_scraper_common::ProductRecord;
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::tempdir;

fn create_test_record(index: usize) -> ProductRecord {
    ProductRecord::new()
        .with("name", format!("Product {}", index))
        .with("price", format!("${}.00", index * 10))
        .with("Main Image URL", format!("https://cdn.example.com/{}.jpg", index))
        .with("error", Value::Null)
}

#[test]
fn test_export_all_formats() {
    let dir = tempdir().expect("Failed to create temp dir");
    let ts = Utc.with_ymd_and_hms(2026, 1, 18, 9, 30, 15).unwrap();
    let records: Vec<ProductRecord> = (1..=3).map(create_test_record).collect();

    let report = export_records_at(&records, &ExportKind::ALL, dir.path(), ts)
        .expect("エクスポートに失敗");

    assert!(report.failures.is_empty(), "失敗がある: {:?}", report.failures);
    assert_eq!(report.written.len(), 3);
    for path in &report.written {
        assert!(path.exists(), "ファイルが作成されていない: {}", path.display());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("scraped_results_2026-01-18T09-30-15-000Z."));
    }
}

#[test]
fn test_csv_file_content() {
    let dir = tempdir().expect("Failed to create temp dir");
    let ts = Utc.with_ymd_and_hms(2026, 1, 18, 0, 0, 0).unwrap();
    let records = vec![
        ProductRecord::new().with("name", r#"12" Pizza"#).with("price", 9.5),
        ProductRecord::new().with("name", "Salad").with("size", "L"),
    ];

    let report = export_records_at(&records, &[ExportKind::Csv], dir.path(), ts).unwrap();
    let content = std::fs::read_to_string(&report.written[0]).unwrap();

    let lines: Vec<&str> = content.split('\n').collect();
    assert_eq!(lines[0], r#""name","price","size""#);
    assert_eq!(lines[1], r#""12"" Pizza","9.5","""#);
    assert_eq!(lines[2], r#""Salad","","L""#);
    assert_eq!(lines.len(), 3, "末尾に改行がない");
}

#[test]
fn test_json_file_is_cleaned() {
    let dir = tempdir().expect("Failed to create temp dir");
    let ts = Utc.with_ymd_and_hms(2026, 1, 18, 0, 0, 0).unwrap();
    let records = vec![create_test_record(1)];

    let report = export_records_at(&records, &[ExportKind::Json], dir.path(), ts).unwrap();
    let content = std::fs::read_to_string(&report.written[0]).unwrap();
    let parsed: Value = serde_json::from_str(&content).unwrap();

    assert_eq!(
        parsed,
        json!([{
            "name": "Product 1",
            "price": "$10.00",
            "Image URL": "https://cdn.example.com/1.jpg"
        }])
    );
    assert!(content.contains("\n  {"), "2スペースのインデントになっていない");
}

#[test]
fn test_excel_readback() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("test_output.xlsx");
    let records = vec![
        create_test_record(1),
        ProductRecord::new().with("name", "No image").with("stock", 4),
    ];

    excel::generate_excel(&records, &output_path).expect("Excel生成に失敗");
    assert!(output_path.exists(), "Excelファイルが作成されていない");

    let mut workbook: Xlsx<_> = open_workbook(&output_path).expect("Excelを開けない");
    assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

    let range = workbook.worksheet_range(SHEET_NAME).expect("シートが読めない");
    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();

    assert_eq!(
        rows[0],
        vec![
            Data::String("name".into()),
            Data::String("price".into()),
            Data::String("Image URL".into()),
            Data::String("stock".into()),
        ]
    );
    assert_eq!(rows[1][2], Data::String("https://cdn.example.com/1.jpg".into()));
    assert_eq!(rows[2][0], Data::String("No image".into()));
    assert_eq!(rows[2][3], Data::Float(4.0));
}

#[test]
fn test_zero_records_writes_nothing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let ts = Utc.with_ymd_and_hms(2026, 1, 18, 0, 0, 0).unwrap();

    let report = export_records_at(&[], &ExportKind::ALL, dir.path(), ts).unwrap();
    assert!(report.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
