//! JSON生成（2スペースインデント）

use super::clean::clean_records;
use crate::error::Result;
use crate::types::ProductRecord;

/// 生データからJSON文字列を生成
pub fn generate_json_string(records: &[ProductRecord]) -> Result<String> {
    let cleaned = clean_records(records);
    Ok(serde_json::to_string_pretty(&cleaned)?)
}
