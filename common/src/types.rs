//! バッチスクレイピングAPIの型定義
//!
//! CLIと将来のフロントエンドで共有される型:
//! - ProductRecord: 抽出された1件のレコード（スキーマなし）
//! - BatchResult: 送信URLごとの結果
//! - BatchResponse: `/api/batch-process` のレスポンス全体

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 抽出レコード
///
/// サービスが返すフィールドをそのまま保持する（キー順も維持）。
/// よく使われるキー（`name`, `price`, `description`, 画像URL系, `error`/`reason`）
/// にはアクセサを用意している。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRecord(Map<String, Value>);

impl ProductRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// テスト・組み立て用のビルダー
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// 抽出失敗を示す `error` が真値か
    pub fn has_error(&self) -> bool {
        self.0.get("error").is_some_and(is_truthy)
    }

    /// `error` の文言（真値の場合のみ）
    pub fn error_message(&self) -> Option<String> {
        self.0
            .get("error")
            .filter(|v| is_truthy(v))
            .map(value_to_text)
    }

    /// `reason` の文言（真値の場合のみ）
    pub fn reason(&self) -> Option<String> {
        self.0
            .get("reason")
            .filter(|v| is_truthy(v))
            .map(value_to_text)
    }

    /// 文字列値（空白のみは除外）
    pub fn non_empty_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for ProductRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for ProductRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// JSONの真偽判定（null / false / 0 / 空文字 は偽）
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// セル表示・CSV用の文字列化
///
/// 文字列はそのまま、null は空文字、配列・オブジェクトはJSON表記。
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// 送信URLごとの結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub status: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<ProductRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Value>,
}

impl BatchResult {
    pub const STATUS_SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status == Self::STATUS_SUCCESS
    }
}

/// バッチのメタデータ（サービス側で付与）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchMetadata {
    #[serde(default)]
    pub batch_id: Option<String>,

    #[serde(default)]
    pub processing_time_seconds: Option<f64>,

    #[serde(default)]
    pub timestamp_utc: Option<String>,

    /// 上記以外（environment, optimization_mode など）
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `data` 部
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchData {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<BatchResult>,

    #[serde(default)]
    pub metadata: BatchMetadata,

    #[serde(default)]
    pub failed: usize,

    #[serde(default)]
    pub successful: usize,

    #[serde(default)]
    pub total: usize,
}

/// `success: false` 時の `error` オブジェクト
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

/// `/api/batch-process` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub success: bool,

    #[serde(default)]
    pub data: Option<BatchData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

/// リクエストオプション
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOptions {
    pub parallel: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_production: Option<bool>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: DEFAULT_PARALLEL,
            is_production: None,
        }
    }
}

/// 同時処理数の既定値
pub const DEFAULT_PARALLEL: usize = 3;

/// 指示が空のときに送るプロンプト
pub const DEFAULT_PROMPT: &str =
    "Extract product name, price, description and image URL from these product pages, format as JSON";

/// `/api/batch-process` のリクエストボディ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub urls: Vec<String>,
    pub prompt: String,
    pub options: BatchOptions,
}

impl BatchRequest {
    /// 空の指示は既定プロンプトに置き換える
    pub fn new(urls: Vec<String>, instruction: &str, options: BatchOptions) -> Self {
        let prompt = if instruction.trim().is_empty() {
            DEFAULT_PROMPT.to_string()
        } else {
            instruction.to_string()
        };
        Self { urls, prompt, options }
    }
}

/// URL単位のエラー情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub url: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// 保存済みバッチ（`--save-raw` の出力、またはレスポンス全体）
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SavedBatch {
    Response(BatchResponse),
    Data(BatchData),
    Results(Vec<BatchResult>),
}

impl SavedBatch {
    pub fn into_results(self) -> Vec<BatchResult> {
        match self {
            SavedBatch::Response(response) => {
                response.data.map(|d| d.results).unwrap_or_default()
            }
            SavedBatch::Data(data) => data.results,
            SavedBatch::Results(results) => results,
        }
    }
}
