use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("接続エラー: {0}")]
    Transport(String),

    /// 非2xx。サーバーが `error.message` を返した場合は併記する
    #[error("HTTP error! Status: {status}{}", server_message(.message))]
    HttpStatus { status: u16, message: Option<String> },

    /// `success: false`
    #[error("{0}")]
    BatchFailed(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ResponseParse(String),

    #[error("入力エラー: {0}")]
    Interactive(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] ai_scraper_common::Error),
}

impl From<reqwest::Error> for ScraperError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ScraperError::ResponseParse(e.to_string())
        } else {
            ScraperError::Transport(e.to_string())
        }
    }
}

impl From<dialoguer::Error> for ScraperError {
    fn from(e: dialoguer::Error) -> Self {
        ScraperError::Interactive(e.to_string())
    }
}

fn server_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({})", m))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ScraperError>;
