//! AI Scraper
//!
//! 指示文とURLリストをバッチ処理サービスに送り、結果を表として表示・出力する

pub mod cli;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod form_prompt;
pub mod logging;
pub mod session;
