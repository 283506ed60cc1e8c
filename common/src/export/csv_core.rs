//! CSV生成
//!
//! 全フィールドをダブルクォートで囲み、`"` は `""` にエスケープする。
//! 行区切りは `\n`（末尾の改行なし）。

use super::clean::{clean_records, export_headers};
use crate::error::{Error, Result};
use crate::types::{value_to_text, ProductRecord};
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// 生データからCSV文字列を生成（0件なら空文字）
pub fn generate_csv_string(records: &[ProductRecord]) -> Result<String> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let cleaned = clean_records(records);
    let headers = export_headers(&cleaned);

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&headers)?;
    for record in &cleaned {
        writer.write_record(
            headers
                .iter()
                .map(|h| record.get(h).map(value_to_text).unwrap_or_default()),
        )?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
