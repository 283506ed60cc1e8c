//! 送信中の進捗表示
//!
//! サーバーから進捗は返ってこないので、表示しているのは
//! `ProgressEstimator` による経過時間ベースの見積もりにすぎない。
//! ティッカーは `ProgressTracker` の Drop で必ず止まり、最後に 100% になる。

use ai_scraper_common::progress::{ProgressEstimator, COMPLETE, TICK_INTERVAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// 進捗の表示先
pub trait ProgressReporter: Send + Sync {
    /// 送信開始
    fn begin(&self, _url_count: usize) {}

    fn set_percent(&self, percent: f64);

    /// 成功・失敗問わず呼ばれる
    fn finish(&self) {}
}

/// 何も表示しない
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn set_percent(&self, _percent: f64) {}
}

/// indicatif の進捗バー
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template("{spinner} [{elapsed_precise}] [{bar:40}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarReporter {
    fn begin(&self, url_count: usize) {
        self.bar.reset();
        self.bar.set_message(format!("{} URL(s) を処理中...", url_count));
        self.bar.enable_steady_tick(TICK_INTERVAL);
    }

    fn set_percent(&self, percent: f64) {
        self.bar.set_position(percent.clamp(0.0, COMPLETE).round() as u64);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// 送信状況の共有ハンドル
///
/// 送信中も別タスクから進捗率と送信中フラグを読める。
#[derive(Debug, Clone, Default)]
pub struct ProgressGauge {
    percent: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
}

impl ProgressGauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> f64 {
        f64::from_bits(self.percent.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn store_percent(&self, percent: f64) {
        self.percent.store(percent.to_bits(), Ordering::Release);
    }

    /// 送信中にする（ガードの Drop で必ず解除）
    pub(crate) fn begin_run(&self) -> RunGuard {
        self.running.store(true, Ordering::Release);
        RunGuard {
            running: Arc::clone(&self.running),
        }
    }
}

/// 送信中フラグの解除ガード
///
/// 送信の future が途中で破棄されても送信中のまま残らない。
pub(crate) struct RunGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// 1回の送信分の進捗
///
/// 作成時にティッカーを起動する。マイルストーン（90% / 95%）を
/// 設定した時点でティッカーは止まり、以降は見積もりで上書きされない。
pub struct ProgressTracker {
    reporter: Arc<dyn ProgressReporter>,
    gauge: ProgressGauge,
    ticker: Option<JoinHandle<()>>,
    percent: f64,
}

impl ProgressTracker {
    /// tokio ランタイム上で呼ぶこと
    pub fn start(reporter: Arc<dyn ProgressReporter>, estimator: ProgressEstimator) -> Self {
        Self::with_gauge(reporter, estimator, ProgressGauge::new())
    }

    /// 進捗率を `gauge` にも反映する
    pub fn with_gauge(
        reporter: Arc<dyn ProgressReporter>,
        estimator: ProgressEstimator,
        gauge: ProgressGauge,
    ) -> Self {
        reporter.set_percent(0.0);
        gauge.store_percent(0.0);

        let tick_reporter = Arc::clone(&reporter);
        let tick_gauge = gauge.clone();
        let ticker = tokio::spawn(async move {
            let started = Instant::now();
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                interval.tick().await;
                let percent = estimator.percent(started.elapsed());
                tick_gauge.store_percent(percent);
                tick_reporter.set_percent(percent);
            }
        });

        Self {
            reporter,
            gauge,
            ticker: Some(ticker),
            percent: 0.0,
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// マイルストーンを設定（下がる方向の値は無視）
    pub fn set(&mut self, percent: f64) {
        self.stop_ticker();
        if percent > self.percent {
            self.percent = percent;
            self.gauge.store_percent(percent);
            self.reporter.set_percent(percent);
        }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// 完了（Drop でも同じ処理が走る）
    pub fn finish(self) {}
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.stop_ticker();
        self.gauge.store_percent(COMPLETE);
        self.reporter.set_percent(COMPLETE);
        self.reporter.finish();
    }
}
