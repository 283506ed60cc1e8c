use crate::error::{Result, ScraperError};
use ai_scraper_common::progress::DEFAULT_PER_URL_ESTIMATE;
use ai_scraper_common::types::DEFAULT_PARALLEL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// エンドポイントの上書き
pub const ENDPOINT_ENV: &str = "AI_SCRAPER_ENDPOINT";
/// 環境の上書き（local / production）
pub const ENVIRONMENT_ENV: &str = "AI_SCRAPER_ENV";

pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost:5000";

/// 接続先の環境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "dev" | "development" => Ok(Environment::Local),
            "production" | "prod" | "deployed" => Ok(Environment::Production),
            _ => Err(format!("Unknown environment: {}. Use local or production", s)),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub local_endpoint: String,
    pub deployed_endpoint: Option<String>,
    pub environment: Environment,
    pub parallel: usize,
    pub timeout_seconds: u64,
    pub per_url_estimate_ms: u64,
    pub default_output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込む（無ければ既定値）
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ScraperError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ai-scraper").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            local_endpoint: DEFAULT_LOCAL_ENDPOINT.into(),
            deployed_endpoint: None,
            environment: Environment::Local,
            parallel: DEFAULT_PARALLEL,
            timeout_seconds: 300,
            per_url_estimate_ms: DEFAULT_PER_URL_ESTIMATE.as_millis() as u64,
            default_output_dir: None,
        }
    }

    /// 有効な環境（環境変数 > `--production` > 設定ファイル）
    pub fn effective_environment(&self, production_flag: bool) -> Result<Environment> {
        if let Ok(value) = std::env::var(ENVIRONMENT_ENV) {
            if !value.trim().is_empty() {
                return value.parse().map_err(ScraperError::Config);
            }
        }
        if production_flag {
            return Ok(Environment::Production);
        }
        Ok(self.environment)
    }

    /// ベースURLを決定する
    ///
    /// `--endpoint` > `AI_SCRAPER_ENDPOINT` > 環境ごとの設定値
    pub fn resolve_endpoint(&self, flag: Option<&str>, environment: Environment) -> Result<String> {
        let env_value = std::env::var(ENDPOINT_ENV).ok();
        self.resolve_endpoint_with(flag, env_value.as_deref(), environment)
    }

    pub fn resolve_endpoint_with(
        &self,
        flag: Option<&str>,
        env_value: Option<&str>,
        environment: Environment,
    ) -> Result<String> {
        let configured = match environment {
            Environment::Local => Some(self.local_endpoint.as_str()),
            Environment::Production => self.deployed_endpoint.as_deref(),
        };

        let raw = [flag, env_value, configured]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .ok_or_else(|| {
                ScraperError::Config(
                    "本番エンドポイントが未設定です。`ai-scraper config --set-deployed-endpoint URL` で設定してください".into(),
                )
            })?;

        let parsed = url::Url::parse(raw)
            .map_err(|e| ScraperError::Config(format!("エンドポイントが不正です: {} ({})", raw, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScraperError::Config(format!(
                "エンドポイントは http(s) で指定してください: {}",
                raw
            )));
        }

        Ok(raw.trim_end_matches('/').to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn per_url_estimate(&self) -> Duration {
        Duration::from_millis(self.per_url_estimate_ms)
    }

    pub fn set_endpoint(&mut self, url: String) -> Result<()> {
        self.resolve_endpoint_with(Some(&url), None, Environment::Local)?;
        self.local_endpoint = url;
        self.save()
    }

    pub fn set_deployed_endpoint(&mut self, url: String) -> Result<()> {
        self.resolve_endpoint_with(Some(&url), None, Environment::Production)?;
        self.deployed_endpoint = Some(url);
        self.save()
    }

    pub fn set_environment(&mut self, environment: Environment) -> Result<()> {
        self.environment = environment;
        self.save()
    }

    pub fn set_parallel(&mut self, parallel: usize) -> Result<()> {
        if parallel == 0 {
            return Err(ScraperError::Config("並列数は1以上を指定してください".into()));
        }
        self.parallel = parallel;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.local_endpoint, DEFAULT_LOCAL_ENDPOINT);
        assert_eq!(config.parallel, 3);
        assert_eq!(config.per_url_estimate(), Duration::from_millis(2000));
        assert_eq!(config.environment, Environment::Local);
    }

    #[test]
    fn test_resolution_order() {
        let config = Config::default();
        let flag = config
            .resolve_endpoint_with(Some("http://flag:1/"), Some("http://env:2"), Environment::Local)
            .unwrap();
        assert_eq!(flag, "http://flag:1");

        let env = config
            .resolve_endpoint_with(None, Some("http://env:2"), Environment::Local)
            .unwrap();
        assert_eq!(env, "http://env:2");

        let configured = config.resolve_endpoint_with(None, None, Environment::Local).unwrap();
        assert_eq!(configured, DEFAULT_LOCAL_ENDPOINT);
    }

    #[test]
    fn test_production_requires_endpoint() {
        let mut config = Config::default();
        assert!(config
            .resolve_endpoint_with(None, None, Environment::Production)
            .is_err());

        config.deployed_endpoint = Some("https://scraper.example.com".into());
        assert_eq!(
            config
                .resolve_endpoint_with(None, None, Environment::Production)
                .unwrap(),
            "https://scraper.example.com"
        );
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let config = Config::default();
        assert!(config
            .resolve_endpoint_with(Some("ftp://host"), None, Environment::Local)
            .is_err());
        assert!(config
            .resolve_endpoint_with(Some("not a url"), None, Environment::Local)
            .is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"parallel": 5, "environment": "production"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.parallel, 5);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.local_endpoint, DEFAULT_LOCAL_ENDPOINT);
        assert_eq!(config.timeout_seconds, 300);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::default();
        config.deployed_endpoint = Some("https://scraper.example.com".into());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("local".parse::<Environment>().unwrap(), Environment::Local);
        assert!("staging".parse::<Environment>().is_err());
    }
}
