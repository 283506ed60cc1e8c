//! 結果の表示

use ai_scraper_common::normalizer::PLACEHOLDER_IMAGE;
use ai_scraper_common::{DisplayRow, ErrorInfo, FormState};
use std::collections::HashMap;

/// セル幅（文字数）
pub const CELL_WIDTH: usize = 28;

const PLACEHOLDER_LABEL: &str = "(placeholder)";

/// 改行を詰めて幅に収める
pub fn truncate(text: &str, width: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if flat.chars().count() <= width {
        return flat;
    }
    let mut cut: String = flat.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn cell_text(column: &str, row: &DisplayRow) -> String {
    let value = row.cell(column).unwrap_or_default();
    if column == ai_scraper_common::alias::IMAGE_COLUMN && value == PLACEHOLDER_IMAGE.as_str() {
        PLACEHOLDER_LABEL.to_string()
    } else {
        value.to_string()
    }
}

/// 表を文字列にする
pub fn render_table(columns: &[String], rows: &[DisplayRow]) -> String {
    if columns.is_empty() {
        return String::new();
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .map(|c| format!("{:<width$}", truncate(c, CELL_WIDTH), width = CELL_WIDTH))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(columns.to_vec()));
    out.push(
        columns
            .iter()
            .map(|_| "-".repeat(CELL_WIDTH))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in rows {
        out.push(line(columns.iter().map(|c| cell_text(c, row)).collect()));
    }
    out.join("\n")
}

/// 入力URLの一覧（失敗したものに印を付ける）
pub fn render_form_summary(form: &FormState, failed_urls: &HashMap<String, ErrorInfo>) -> String {
    let mut out = Vec::new();
    for (i, url) in form.urls().iter().enumerate() {
        let url = url.trim();
        if url.is_empty() {
            continue;
        }
        match failed_urls.get(url) {
            Some(info) => {
                out.push(format!("  ✗ {:>2}. {}", i + 1, url));
                out.push(format!("       {}", info.message));
                if let Some(reason) = info.reason.as_deref().filter(|r| !r.is_empty()) {
                    out.push(format!("       Reason: {}", reason));
                }
            }
            None => out.push(format!("  ✔ {:>2}. {}", i + 1, url)),
        }
    }
    out.join("\n")
}
