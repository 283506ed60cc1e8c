//! フィールド名エイリアス
//!
//! サービスが返すフィールド名の表記ゆれを表示用の正規カラムに対応付ける。
//! 画像URLは2段階で探す:
//! 1. 既知エイリアス（`IMAGE_FIELD_ALIASES` の順）
//! 2. 残りのキーを `image` / `img` / `url` の部分一致（大小無視）で走査

/// 正規カラム名
pub const IMAGE_COLUMN: &str = "Image";
pub const NAME_COLUMN: &str = "Name";
pub const PRICE_COLUMN: &str = "Price";
pub const DESCRIPTION_COLUMN: &str = "Description";

/// 正規カラムの並び順
pub const CANONICAL_ORDER: [&str; 4] = [IMAGE_COLUMN, NAME_COLUMN, PRICE_COLUMN, DESCRIPTION_COLUMN];

/// エクスポート時に画像フィールドを集約するキー
pub const EXPORT_IMAGE_KEY: &str = "Image URL";

/// 表示専用のプレビューフィールド（エクスポートでは常に除外）
pub const DISPLAY_PREVIEW_KEY: &str = "__display_image";

/// エラー系フィールド（カラム・エクスポートから除外）
pub const ERROR_KEYS: [&str; 2] = ["error", "reason"];

/// 画像URLの既知エイリアス（優先順）
pub const IMAGE_FIELD_ALIASES: [&str; 12] = [
    "Main_Image_URL",
    "Main Image URL",
    "image_url",
    EXPORT_IMAGE_KEY,
    "imageUrl",
    "image",
    "Image",
    "img",
    "img_url",
    "thumbnail",
    "src",
    "url",
];

/// フォールバック走査で使う部分一致パターン
const IMAGE_KEY_HINTS: [&str; 3] = ["image", "img", "url"];

/// エラー系フィールドか
pub fn is_error_key(key: &str) -> bool {
    ERROR_KEYS.iter().any(|k| key.eq_ignore_ascii_case(k))
}

/// 既知の画像エイリアスか
pub fn is_image_alias(key: &str) -> bool {
    IMAGE_FIELD_ALIASES.contains(&key)
}

/// 画像カラムに寄せるキーか
///
/// 既知エイリアスに加えて `image` / `img` を含むキーも対象。
/// `url` の部分一致（`product_url` など）は画像カラムには寄せない。
pub fn is_image_key(key: &str) -> bool {
    if is_image_alias(key) {
        return true;
    }
    let lower = key.to_lowercase();
    lower.contains("image") || lower.contains("img")
}

/// フォールバック走査の対象か
pub fn matches_image_hint(key: &str) -> bool {
    let lower = key.to_lowercase();
    IMAGE_KEY_HINTS.iter().any(|hint| lower.contains(hint))
}

/// キーを正規カラム名に変換（対応がなければ None）
pub fn canonical_column(key: &str) -> Option<&'static str> {
    if key == DISPLAY_PREVIEW_KEY {
        return None;
    }
    if is_image_key(key) {
        return Some(IMAGE_COLUMN);
    }
    match key.to_lowercase().as_str() {
        "name" => Some(NAME_COLUMN),
        "price" => Some(PRICE_COLUMN),
        "description" => Some(DESCRIPTION_COLUMN),
        _ => None,
    }
}

/// 正規カラムの順位
pub fn canonical_rank(column: &str) -> Option<usize> {
    CANONICAL_ORDER.iter().position(|c| *c == column)
}
