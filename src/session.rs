//! スクレイプ・セッション
//!
//! フォーム・進捗・結果・エラーをまとめて保持する。送信は常に1件だけ。

use crate::client::{BatchTransport, ProgressGauge, ProgressReporter, ProgressTracker, SilentReporter};
use ai_scraper_common::progress::{ProgressEstimator, DEFAULT_PER_URL_ESTIMATE};
use ai_scraper_common::{
    normalize_batch, outcome_message, BatchData, BatchMetadata, BatchOptions, BatchRequest,
    DisplayRow, ErrorInfo, FormState, ProductRecord,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

pub struct ScrapeSession {
    form: FormState,
    options: BatchOptions,
    per_url_estimate: Duration,
    reporter: Arc<dyn ProgressReporter>,
    gauge: ProgressGauge,
    error: Option<String>,
    url_errors: Vec<ErrorInfo>,
    failed_urls: HashMap<String, ErrorInfo>,
    raw_records: Vec<ProductRecord>,
    columns: Vec<String>,
    rows: Vec<DisplayRow>,
    batch: Option<BatchData>,
}

impl ScrapeSession {
    pub fn new(form: FormState) -> Self {
        Self {
            form,
            options: BatchOptions::default(),
            per_url_estimate: DEFAULT_PER_URL_ESTIMATE,
            reporter: Arc::new(SilentReporter),
            gauge: ProgressGauge::new(),
            error: None,
            url_errors: Vec::new(),
            failed_urls: HashMap::new(),
            raw_records: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
            batch: None,
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_per_url_estimate(mut self, estimate: Duration) -> Self {
        self.per_url_estimate = estimate;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn is_running(&self) -> bool {
        self.gauge.is_running()
    }

    pub fn progress(&self) -> f64 {
        self.gauge.percent()
    }

    /// 送信中に別タスクから進捗を読むためのハンドル
    pub fn gauge(&self) -> ProgressGauge {
        self.gauge.clone()
    }

    /// 画面に出す1件のメッセージ
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn url_errors(&self) -> &[ErrorInfo] {
        &self.url_errors
    }

    pub fn failed_urls(&self) -> &HashMap<String, ErrorInfo> {
        &self.failed_urls
    }

    pub fn raw_records(&self) -> &[ProductRecord] {
        &self.raw_records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    /// 直近の成功レスポンス（`--save-raw` 用）
    pub fn batch(&self) -> Option<&BatchData> {
        self.batch.as_ref()
    }

    pub fn metadata(&self) -> Option<&BatchMetadata> {
        self.batch.as_ref().map(|b| &b.metadata)
    }

    fn reset_results(&mut self) {
        self.gauge.store_percent(0.0);
        self.error = None;
        self.url_errors.clear();
        self.failed_urls.clear();
        self.raw_records.clear();
        self.columns.clear();
        self.rows.clear();
        self.batch = None;
    }

    /// フォームの内容を送信する
    ///
    /// 有効なURLが無い場合は何もせず false を返す。
    /// 失敗は `error()` に1件のメッセージとして残り、呼び出し側には返さない。
    /// `&mut self` を取るので同じセッションで送信が重なることはない。
    pub async fn submit<T: BatchTransport>(&mut self, transport: &T) -> bool {
        let urls = self.form.active_urls();
        if urls.is_empty() {
            return false;
        }

        let _running = self.gauge.begin_run();
        self.reset_results();

        let url_count = urls.len();
        let request = BatchRequest::new(urls, self.form.instruction(), self.options.clone());

        self.reporter.begin(url_count);
        let estimator = ProgressEstimator::new(url_count, self.per_url_estimate);
        let mut tracker =
            ProgressTracker::with_gauge(Arc::clone(&self.reporter), estimator, self.gauge.clone());
        let outcome = transport.process(&request, &mut tracker).await;
        tracker.finish();

        match outcome {
            Ok(data) => self.apply(data, url_count),
            Err(e) => {
                error!("バッチ処理に失敗: {}", e);
                self.error = Some(e.to_string());
            }
        }

        true
    }

    fn apply(&mut self, data: BatchData, active: usize) {
        let normalized = normalize_batch(&data.results);

        self.error = outcome_message(
            normalized.failed_urls.len(),
            active,
            normalized.raw_records.len(),
        );
        self.url_errors = normalized.errors;
        self.failed_urls = normalized.failed_urls;
        self.raw_records = normalized.raw_records;
        self.columns = normalized.columns;
        self.rows = normalized.rows;
        self.batch = Some(data);
    }
}
