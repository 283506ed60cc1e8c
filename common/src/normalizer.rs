//! レスポンス正規化モジュール
//!
//! バッチ結果を表示用の表形式に整える。
//!
//! ## 処理フロー
//! 1. `error` 付きレコードをURL単位のエラーとして抽出
//! 2. `status == "success"` かつエラーなしのレコードを生データとして保持
//! 3. キーの和集合から表示カラムを推定（エイリアス→正規カラム）
//! 4. 画像URLを解決して表示行を生成（生データは変更しない、`reason` 付きは表示しない）

use crate::alias::{
    self, DESCRIPTION_COLUMN, DISPLAY_PREVIEW_KEY, IMAGE_COLUMN, IMAGE_FIELD_ALIASES, NAME_COLUMN,
    PRICE_COLUMN,
};
use crate::types::{value_to_text, BatchResult, ErrorInfo, ProductRecord};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use url::{Host, Url};

const PLACEHOLDER_SVG: &str = r##"<svg width="80" height="80" xmlns="http://www.w3.org/2000/svg"><rect width="80" height="80" fill="#f0f0f0"/><text x="50%" y="50%" font-family="Arial, sans-serif" font-size="12" text-anchor="middle" dy=".3em" fill="#999999">No Image</text></svg>"##;

lazy_static::lazy_static! {
    /// 画像が無い・不正な場合の表示用プレースホルダー（data URI）
    pub static ref PLACEHOLDER_IMAGE: String =
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(PLACEHOLDER_SVG));
}

pub const DEFAULT_NAME: &str = "Unknown Name";
pub const DEFAULT_PRICE: &str = "N/A";
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// 画像URLの解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolution {
    /// 値を見つけたキー
    pub source_key: Option<String>,
    /// 見つけた値（加工前）
    pub discovered: Option<String>,
    /// 妥当なURLと判定されたか
    pub valid: bool,
    /// 表示用URL（不正ならプレースホルダー）
    pub display: String,
}

impl ImageResolution {
    /// エクスポートに載せる値（妥当な場合のみ、加工前の値）
    pub fn export_value(&self) -> Option<&str> {
        if self.valid {
            self.discovered.as_deref()
        } else {
            None
        }
    }
}

/// 表示行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// 画像カラムがある場合のみ Some
    pub image: Option<String>,
    pub name: String,
    pub price: String,
    pub description: String,
    /// 追加カラム（カラム名, 値）
    pub extra: Vec<(String, String)>,
}

impl DisplayRow {
    /// カラム名でセル値を取得
    pub fn cell(&self, column: &str) -> Option<&str> {
        match column {
            IMAGE_COLUMN => self.image.as_deref(),
            NAME_COLUMN => Some(&self.name),
            PRICE_COLUMN => Some(&self.price),
            DESCRIPTION_COLUMN => Some(&self.description),
            _ => self
                .extra
                .iter()
                .find(|(key, _)| key == column)
                .map(|(_, value)| value.as_str()),
        }
    }
}

/// 正規化結果
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// レコード単位のエラー
    pub errors: Vec<ErrorInfo>,
    /// URL → エラー（フォームの入力欄に印を付ける用）
    pub failed_urls: HashMap<String, ErrorInfo>,
    /// エクスポート用の生データ
    pub raw_records: Vec<ProductRecord>,
    /// 表示カラム
    pub columns: Vec<String>,
    /// 表示行
    pub rows: Vec<DisplayRow>,
}

/// バッチ結果を正規化する
pub fn normalize_batch(results: &[BatchResult]) -> NormalizedBatch {
    let errors = extract_errors(results);
    let failed_urls = failed_url_map(&errors);
    let raw_records = successful_records(results);

    if raw_records.is_empty() {
        return NormalizedBatch {
            errors,
            failed_urls,
            ..Default::default()
        };
    }

    let columns = infer_columns(&raw_records);
    // `reason` だけが付いたレコードはエクスポートには残すが表示しない
    let displayable: Vec<ProductRecord> = raw_records
        .iter()
        .filter(|record| record.reason().is_none())
        .cloned()
        .collect();
    let rows = build_rows(&displayable, &columns);

    NormalizedBatch {
        errors,
        failed_urls,
        raw_records,
        columns,
        rows,
    }
}

/// `error` が真値のレコードを抽出
///
/// 非成功の結果自体に `error` がある場合もエラーとして扱う。
pub fn extract_errors(results: &[BatchResult]) -> Vec<ErrorInfo> {
    let mut errors = Vec::new();

    for result in results {
        for record in &result.data {
            if let Some(message) = record.error_message() {
                errors.push(ErrorInfo {
                    url: result.url.clone(),
                    message,
                    reason: record.reason(),
                });
            }
        }

        if !result.is_success() {
            if let Some(message) = truthy_text(result.error.as_ref()) {
                errors.push(ErrorInfo {
                    url: result.url.clone(),
                    message,
                    reason: truthy_text(result.reason.as_ref()),
                });
            }
        }
    }

    errors
}

fn truthy_text(value: Option<&Value>) -> Option<String> {
    value
        .filter(|v| crate::types::is_truthy(v))
        .map(value_to_text)
}

/// URL → エラー（同一URLは後勝ち）
pub fn failed_url_map(errors: &[ErrorInfo]) -> HashMap<String, ErrorInfo> {
    errors
        .iter()
        .map(|e| (e.url.clone(), e.clone()))
        .collect()
}

/// 成功結果のうちエラーなしのレコード（そのまま複製）
pub fn successful_records(results: &[BatchResult]) -> Vec<ProductRecord> {
    results
        .iter()
        .filter(|r| r.is_success())
        .flat_map(|r| r.data.iter())
        .filter(|record| !record.has_error())
        .cloned()
        .collect()
}

/// 全レコードのキーの和集合（初出順）
pub fn collect_keys(records: &[ProductRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    match (alias::canonical_column(a), alias::canonical_column(b)) {
        (Some(ca), Some(cb)) => alias::canonical_rank(ca).cmp(&alias::canonical_rank(cb)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// 表示カラムを推定
///
/// 先頭は固定（画像があれば Image、続いて Name / Price / Description）、
/// 以降は追加カラムを辞書順。重複は除去する。
pub fn infer_columns(records: &[ProductRecord]) -> Vec<String> {
    let mut keys: Vec<String> = collect_keys(records)
        .into_iter()
        .filter(|k| !alias::is_error_key(k) && k != DISPLAY_PREVIEW_KEY)
        .collect();
    keys.sort_by(|a, b| compare_keys(a, b));

    let has_image = keys.iter().any(|k| alias::is_image_key(k));

    let mut columns: Vec<String> = Vec::with_capacity(keys.len() + 4);
    if has_image {
        columns.push(IMAGE_COLUMN.to_string());
    }
    for base in [NAME_COLUMN, PRICE_COLUMN, DESCRIPTION_COLUMN] {
        columns.push(base.to_string());
    }

    let mut seen: HashSet<String> = columns.iter().cloned().collect();
    for key in keys {
        let display = alias::canonical_column(&key)
            .map(str::to_string)
            .unwrap_or(key);
        if seen.insert(display.clone()) {
            columns.push(display);
        }
    }

    columns
}

/// 画像URL候補を探す（既知エイリアス → 部分一致）
pub fn find_image_candidate(record: &ProductRecord) -> Option<(&str, &str)> {
    for key in IMAGE_FIELD_ALIASES {
        if let Some(value) = record.non_empty_str(key) {
            return Some((key, value));
        }
    }

    record.iter().find_map(|(key, value)| {
        if alias::is_error_key(key) || key == DISPLAY_PREVIEW_KEY || !alias::matches_image_hint(key) {
            return None;
        }
        match value {
            Value::String(s) if !s.trim().is_empty() => Some((key, s.as_str())),
            _ => None,
        }
    })
}

/// レコードの画像URLを解決
pub fn resolve_image(record: &ProductRecord) -> ImageResolution {
    let Some((key, value)) = find_image_candidate(record) else {
        return ImageResolution {
            source_key: None,
            discovered: None,
            valid: false,
            display: PLACEHOLDER_IMAGE.clone(),
        };
    };

    let display = display_image_url(value);
    ImageResolution {
        source_key: Some(key.to_string()),
        discovered: Some(value.to_string()),
        valid: display.is_some(),
        display: display.unwrap_or_else(|| PLACEHOLDER_IMAGE.clone()),
    }
}

/// 画像URLを検証し、表示用に整える
///
/// 妥当性は元の値で判定する。スキーム付きはそのまま、
/// スキームなしのホスト（`example.com/x.jpg`, `//cdn.example.com/x.jpg`）は
/// 妥当と判定した後で `https://` を付ける。
pub fn display_image_url(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return None;
    }

    if value.starts_with("data:image/") {
        return Url::parse(value).ok().map(|_| value.to_string());
    }

    if value.contains("://") {
        return Url::parse(value)
            .ok()
            .filter(|u| u.has_host())
            .map(|_| value.to_string());
    }

    let rest = value.strip_prefix("//").unwrap_or(value);
    let candidate = format!("https://{}", rest);
    let url = Url::parse(&candidate).ok()?;
    match url.host() {
        Some(Host::Domain(domain)) if domain.contains('.') || domain == "localhost" => {
            Some(candidate)
        }
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Some(candidate),
        _ => None,
    }
}

/// 大小無視でキーを引く
fn lookup_ci<'a>(record: &'a ProductRecord, key: &str) -> Option<&'a Value> {
    record.get(key).or_else(|| {
        record
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn text_or(record: &ProductRecord, key: &str, default: &str) -> String {
    let text = lookup_ci(record, key).map(value_to_text).unwrap_or_default();
    if text.is_empty() {
        default.to_string()
    } else {
        text
    }
}

/// 1件のレコードを表示行に変換
pub fn build_row(record: &ProductRecord, columns: &[String]) -> DisplayRow {
    let has_image = columns.iter().any(|c| c == IMAGE_COLUMN);

    let extra = columns
        .iter()
        .filter(|c| alias::canonical_rank(c).is_none())
        .map(|c| {
            let value = record.get(c).map(value_to_text).unwrap_or_default();
            (c.clone(), value)
        })
        .collect();

    DisplayRow {
        image: has_image.then(|| resolve_image(record).display),
        name: text_or(record, "name", DEFAULT_NAME),
        price: text_or(record, "price", DEFAULT_PRICE),
        description: text_or(record, "description", DEFAULT_DESCRIPTION),
        extra,
    }
}

/// 表示行を生成
pub fn build_rows(records: &[ProductRecord], columns: &[String]) -> Vec<DisplayRow> {
    records.iter().map(|r| build_row(r, columns)).collect()
}

/// 画面に出すメッセージを組み立てる
///
/// * `failed` - 失敗したURL数（重複除去後）
/// * `active` - 送信したURL数
/// * `records` - 成功レコード数
pub fn outcome_message(failed: usize, active: usize, records: usize) -> Option<String> {
    if failed > 0 {
        if failed >= active {
            Some(format!("All {} URL(s) failed to process", failed))
        } else {
            Some(format!("{} out of {} URL(s) failed to process", failed, active))
        }
    } else if records == 0 {
        Some("No product data successfully extracted".to_string())
    } else {
        None
    }
}
