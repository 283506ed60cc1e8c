//! 進捗の見積もり
//!
//! サーバー側の進捗は取得できないため、経過時間と
//! 「URL数 × 1件あたりの想定時間」から進捗率を推定するだけの近似。
//! レスポンス到着までは `ESTIMATE_CAP` で頭打ちにする。

use std::time::Duration;

/// 1URLあたりの想定処理時間
pub const DEFAULT_PER_URL_ESTIMATE: Duration = Duration::from_millis(2000);

/// 更新間隔
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// レスポンス到着前の上限（%）
pub const ESTIMATE_CAP: f64 = 85.0;

/// HTTPレスポンス受信時
pub const RESPONSE_RECEIVED: f64 = 90.0;

/// ボディのパース完了時
pub const RESPONSE_PARSED: f64 = 95.0;

/// 完了（成功・失敗問わず）
pub const COMPLETE: f64 = 100.0;

/// 経過時間ベースの進捗見積もり
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEstimator {
    total_estimate: Duration,
}

impl ProgressEstimator {
    pub fn new(url_count: usize, per_url: Duration) -> Self {
        let count = u32::try_from(url_count.max(1)).unwrap_or(u32::MAX);
        Self {
            total_estimate: per_url.saturating_mul(count),
        }
    }

    pub fn total_estimate(&self) -> Duration {
        self.total_estimate
    }

    /// 経過時間から進捗率（0〜85%）を算出
    pub fn percent(&self, elapsed: Duration) -> f64 {
        let total = self.total_estimate.as_secs_f64();
        if total <= 0.0 {
            return ESTIMATE_CAP;
        }
        (elapsed.as_secs_f64() / total * ESTIMATE_CAP).min(ESTIMATE_CAP)
    }
}
