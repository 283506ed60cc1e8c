//! Excel生成（CLI版）
//!
//! 共通ライブラリでバッファを作り、ファイルに書き出す

use crate::error::Result;
use ai_scraper_common::export::excel_core::generate_excel_buffer;
use ai_scraper_common::ProductRecord;
use std::path::Path;

pub fn generate_excel(records: &[ProductRecord], output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(records)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
