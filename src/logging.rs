//! 診断ログ（tracing）
//!
//! 利用者向けの進捗は `println!` と進捗バー、診断は stderr へ。
//! `RUST_LOG` があればそれを優先し、無ければ `--verbose` で debug、通常は info。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(format!("warn,ai_scraper={level},ai_scraper_common={level}"))
}

/// ロガーを初期化（2回目以降は無視）
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
        .try_init();
}
