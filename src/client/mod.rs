//! バッチ処理サービスへの送信
//!
//! `POST <base>/api/batch-process` を1回だけ送る。リトライはしない。

pub mod progress;

pub use progress::{BarReporter, ProgressGauge, ProgressReporter, ProgressTracker, SilentReporter};

use crate::error::{Result, ScraperError};
use ai_scraper_common::progress::{RESPONSE_PARSED, RESPONSE_RECEIVED};
use ai_scraper_common::{BatchData, BatchRequest, BatchResponse};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// バッチ処理のパス
pub const BATCH_PATH: &str = "/api/batch-process";

/// バッチ送信の抽象（テストでは差し替える）
#[allow(async_fn_in_trait)]
pub trait BatchTransport {
    async fn process(&self, request: &BatchRequest, progress: &mut ProgressTracker) -> Result<BatchData>;
}

/// reqwest によるHTTP送信
pub struct BatchClient {
    http: reqwest::Client,
    base_url: String,
}

impl BatchClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, BATCH_PATH)
    }
}

impl BatchTransport for BatchClient {
    async fn process(&self, request: &BatchRequest, progress: &mut ProgressTracker) -> Result<BatchData> {
        let endpoint = self.endpoint();
        debug!(%endpoint, urls = request.urls.len(), "バッチ送信");

        let response = self.http.post(&endpoint).json(request).send().await?;
        progress.set(RESPONSE_RECEIVED);

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                message: server_error_message(&body),
            });
        }

        let parsed: BatchResponse =
            serde_json::from_str(&body).map_err(|e| ScraperError::ResponseParse(e.to_string()))?;
        progress.set(RESPONSE_PARSED);

        interpret_response(parsed)
    }
}

/// エラーボディ `{"error": {"message": ...}}` からメッセージを取り出す
fn server_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// レスポンスを検証して `data` を取り出す
pub fn interpret_response(response: BatchResponse) -> Result<BatchData> {
    if !response.success {
        let message = match (response.error.and_then(|e| e.message), &response.data) {
            (Some(message), _) => message,
            (None, Some(data)) => {
                format!("API request failed: {} URL(s) failed to process", data.failed)
            }
            (None, None) => "API request failed".to_string(),
        };
        return Err(ScraperError::BatchFailed(message));
    }

    let data = response
        .data
        .ok_or_else(|| ScraperError::ResponseParse("data がありません".into()))?;

    let metadata = &data.metadata;
    info!(
        batch_id = metadata.batch_id.as_deref().unwrap_or("-"),
        processing_time_seconds = metadata.processing_time_seconds.unwrap_or_default(),
        timestamp_utc = metadata.timestamp_utc.as_deref().unwrap_or("-"),
        total = data.total,
        successful = data.successful,
        failed = data.failed,
        "バッチ処理完了"
    );
    for (key, value) in &metadata.extra {
        debug!(key = key.as_str(), value = %value, "メタデータ");
    }

    Ok(data)
}
