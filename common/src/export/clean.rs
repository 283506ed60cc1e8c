//! エクスポート前のクリーニング
//!
//! - `error` / `reason` / 表示専用プレビューを除外
//! - 画像系フィールドを `"Image URL"` 1つに集約（元の値、妥当な場合のみ）
//! - 画像系でないフィールド（`product_url`, `image_count`, `image_alt` など）はそのまま残す

use crate::alias::{self, DISPLAY_PREVIEW_KEY, EXPORT_IMAGE_KEY};
use crate::normalizer::{collect_keys, display_image_url, resolve_image};
use crate::types::ProductRecord;
use serde_json::{Map, Value};

/// `"Image URL"` に集約するフィールドか
///
/// 既知エイリアスは常に対象。`image` / `img` を含むその他のキーは
/// 値が画像URLとして妥当な文字列の場合のみ対象。
pub fn is_export_image_field(key: &str, value: &Value) -> bool {
    if alias::is_image_alias(key) {
        return true;
    }
    if !alias::is_image_key(key) {
        return false;
    }
    matches!(value, Value::String(s) if display_image_url(s).is_some())
}

/// エクスポートする画像URL（加工前の値）
///
/// 表示と同じ候補を使うが、候補が画像系キーでない場合（`product_url` など）は
/// 採用せず、集約対象のフィールドから探し直す。
fn export_image(record: &ProductRecord) -> Option<String> {
    let resolution = resolve_image(record);
    match resolution.source_key.as_deref() {
        Some(key) if alias::is_image_key(key) => resolution.export_value().map(str::to_string),
        _ => record.iter().find_map(|(key, value)| match value {
            Value::String(s) if is_export_image_field(key, value) && display_image_url(s).is_some() => {
                Some(s.clone())
            }
            _ => None,
        }),
    }
}

/// 1件をクリーニング
///
/// `"Image URL"` は最初の画像系フィールドの位置に置く。
pub fn clean_record(record: &ProductRecord) -> ProductRecord {
    let export_image = export_image(record);

    let mut cleaned = Map::new();
    let mut image_placed = false;

    for (key, value) in record.iter() {
        if alias::is_error_key(key) || key == DISPLAY_PREVIEW_KEY {
            continue;
        }

        if is_export_image_field(key, value) {
            if !image_placed {
                if let Some(url) = &export_image {
                    cleaned.insert(EXPORT_IMAGE_KEY.to_string(), Value::String(url.clone()));
                }
                image_placed = true;
            }
            continue;
        }

        cleaned.insert(key.to_string(), value.clone());
    }

    cleaned.into()
}

pub fn clean_records(records: &[ProductRecord]) -> Vec<ProductRecord> {
    records.iter().map(clean_record).collect()
}

/// クリーニング済みレコードのヘッダー（キーの和集合、初出順）
pub fn export_headers(cleaned: &[ProductRecord]) -> Vec<String> {
    collect_keys(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drops_error_fields_and_preview() {
        let record = ProductRecord::new()
            .with("name", "Mug")
            .with("error", Value::Null)
            .with("reason", "")
            .with(DISPLAY_PREVIEW_KEY, "data:image/png;base64,AAAA");
        let cleaned = clean_record(&record);
        let keys: Vec<&str> = cleaned.keys().collect();
        assert_eq!(keys, vec!["name"]);
    }

    #[test]
    fn test_collapses_image_aliases_in_place() {
        let record = ProductRecord::new()
            .with("name", "Mug")
            .with("Main Image URL", "https://cdn.example/a.jpg")
            .with("price", "$5")
            .with("image_url", "https://cdn.example/b.jpg");
        let cleaned = clean_record(&record);
        let keys: Vec<&str> = cleaned.keys().collect();
        assert_eq!(keys, vec!["name", EXPORT_IMAGE_KEY, "price"]);
        assert_eq!(cleaned.get(EXPORT_IMAGE_KEY), Some(&json!("https://cdn.example/a.jpg")));
    }

    #[test]
    fn test_invalid_image_is_omitted() {
        let record = ProductRecord::new()
            .with("name", "Mug")
            .with("image_url", "not a url");
        let cleaned = clean_record(&record);
        assert!(!cleaned.contains_key(EXPORT_IMAGE_KEY));
        assert!(!cleaned.contains_key("image_url"));
    }

    #[test]
    fn test_schemeless_image_keeps_original_value() {
        let record = ProductRecord::new().with("img", "example.com/x.jpg");
        let cleaned = clean_record(&record);
        assert_eq!(cleaned.get(EXPORT_IMAGE_KEY), Some(&json!("example.com/x.jpg")));
    }

    #[test]
    fn test_non_image_fields_survive() {
        let record = ProductRecord::new()
            .with("name", "Mug")
            .with("product_url", "https://shop.example/p/1")
            .with("image_url", "https://cdn.example/a.jpg")
            .with("image_count", 3)
            .with("image_alt", "A red mug");
        let cleaned = clean_record(&record);
        let keys: Vec<&str> = cleaned.keys().collect();
        assert_eq!(keys, vec!["name", "product_url", EXPORT_IMAGE_KEY, "image_count", "image_alt"]);
        assert_eq!(cleaned.get("product_url"), Some(&json!("https://shop.example/p/1")));
        assert_eq!(cleaned.get("image_count"), Some(&json!(3)));
        assert_eq!(cleaned.get("image_alt"), Some(&json!("A red mug")));
        assert_eq!(cleaned.get(EXPORT_IMAGE_KEY), Some(&json!("https://cdn.example/a.jpg")));
    }

    #[test]
    fn test_product_url_is_not_renamed() {
        // 画像フィールドがなくても product_url は画像扱いしない
        let record = ProductRecord::new()
            .with("name", "Mug")
            .with("product_url", "https://shop.example/p/1");
        let cleaned = clean_record(&record);
        assert_eq!(cleaned, record);
    }

    #[test]
    fn test_unlisted_image_key_with_url_is_collapsed() {
        let record = ProductRecord::new()
            .with("product_url", "https://shop.example/p/1")
            .with("hero_image", "https://cdn.example/hero.jpg")
            .with("image_alt", "Hero shot");
        let cleaned = clean_record(&record);
        let keys: Vec<&str> = cleaned.keys().collect();
        assert_eq!(keys, vec!["product_url", EXPORT_IMAGE_KEY, "image_alt"]);
        assert_eq!(cleaned.get(EXPORT_IMAGE_KEY), Some(&json!("https://cdn.example/hero.jpg")));
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let record = ProductRecord::new()
            .with("name", "Mug")
            .with("image_url", "https://cdn.example/a.jpg")
            .with("reason", "n/a");
        let once = clean_record(&record);
        assert_eq!(clean_record(&once), once);
    }

    #[test]
    fn test_headers_union() {
        let cleaned = clean_records(&[
            ProductRecord::new().with("name", "A").with("sku", "1"),
            ProductRecord::new().with("name", "B").with("color", "red"),
        ]);
        assert_eq!(export_headers(&cleaned), vec!["name", "sku", "color"]);
    }
}
