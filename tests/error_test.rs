//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use ai_scraper::error::ScraperError;
use ai_scraper::form_prompt;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないURLリストファイル
#[test]
fn test_missing_urls_file() {
    let result = form_prompt::read_urls_file(Path::new("/nonexistent/path/urls.txt"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, ScraperError::FileNotFound(_)));
}

/// コメントだけのURLリストファイルは空
#[test]
fn test_urls_file_only_comments() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("urls.txt");
    std::fs::write(&path, "# nothing yet\n\n").unwrap();

    let result = form_prompt::read_urls_file(&path);
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// ScraperErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ScraperError::Config("テスト設定エラー".to_string()),
        ScraperError::FileNotFound("urls.txt".to_string()),
        ScraperError::Transport("connection refused".to_string()),
        ScraperError::BatchFailed("API request failed".to_string()),
        ScraperError::ResponseParse("expected value".to_string()),
        ScraperError::Interactive("not a terminal".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// HTTPステータスのメッセージ
#[test]
fn test_http_status_message() {
    let err = ScraperError::HttpStatus { status: 500, message: None };
    assert_eq!(err.to_string(), "HTTP error! Status: 500");

    let err = ScraperError::HttpStatus {
        status: 400,
        message: Some("URLs must be a non-empty list".to_string()),
    };
    assert_eq!(
        err.to_string(),
        "HTTP error! Status: 400 (URLs must be a non-empty list)"
    );
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = ScraperError::Config("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("テスト"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ScraperError = io_err.into();

    assert!(matches!(err, ScraperError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: ScraperError = json_err.into();

    assert!(matches!(err, ScraperError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = ai_scraper_common::Error::Spreadsheet("シート名が不正".to_string());
    let err: ScraperError = common_err.into();

    assert!(matches!(err, ScraperError::Common(_)));
    // 透過的エラーなのでメッセージがそのまま表示される
    assert!(err.to_string().contains("シート名が不正"));
}
