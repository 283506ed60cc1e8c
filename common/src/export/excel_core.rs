//! Excel生成（共通ライブラリ）
//!
//! シート "Scraped Data" 1枚。1行目がヘッダー（キーの和集合）、
//! 以降はヘッダーに揃えて値を書き込む（欠損は空文字）。

use super::clean::{clean_records, export_headers};
use crate::error::{Error, Result};
use crate::types::ProductRecord;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde_json::Value;

/// シート名
pub const SHEET_NAME: &str = "Scraped Data";

fn xlsx_error(context: &str) -> impl Fn(XlsxError) -> Error + '_ {
    move |e| Error::Spreadsheet(format!("{}: {}", context, e))
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| Error::Spreadsheet(format!("列数が多すぎます: {}", col + 1)))
}

fn row_index(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| Error::Spreadsheet(format!("行数が多すぎます: {}", row + 1)))
}

/// 値の型に応じてセルに書き込む
fn write_value(worksheet: &mut Worksheet, row: u32, col: u16, value: Option<&Value>) -> Result<()> {
    match value {
        None | Some(Value::Null) => {
            worksheet
                .write_string(row, col, "")
                .map_err(xlsx_error("値書き込みエラー"))?;
        }
        Some(Value::String(s)) => {
            worksheet
                .write_string(row, col, s)
                .map_err(xlsx_error("値書き込みエラー"))?;
        }
        Some(Value::Bool(b)) => {
            worksheet
                .write_boolean(row, col, *b)
                .map_err(xlsx_error("値書き込みエラー"))?;
        }
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) => {
                worksheet
                    .write_number(row, col, f)
                    .map_err(xlsx_error("値書き込みエラー"))?;
            }
            None => {
                worksheet
                    .write_string(row, col, n.to_string())
                    .map_err(xlsx_error("値書き込みエラー"))?;
            }
        },
        Some(other) => {
            worksheet
                .write_string(row, col, other.to_string())
                .map_err(xlsx_error("値書き込みエラー"))?;
        }
    }
    Ok(())
}

/// 生データからExcelをバッファに生成
pub fn generate_excel_buffer(records: &[ProductRecord]) -> Result<Vec<u8>> {
    let cleaned = clean_records(records);
    let headers = export_headers(&cleaned);

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(xlsx_error("シート名設定エラー"))?;

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, column_index(col)?, header, &header_format)
            .map_err(xlsx_error("ヘッダー書き込みエラー"))?;
    }

    for (idx, record) in cleaned.iter().enumerate() {
        let row = row_index(idx + 1)?;
        for (col, header) in headers.iter().enumerate() {
            write_value(worksheet, row, column_index(col)?, record.get(header))?;
        }
    }

    worksheet.autofit();

    workbook
        .save_to_buffer()
        .map_err(xlsx_error("Excel保存エラー"))
}
