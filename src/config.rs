use crate::error::{DocscanError, Result};
use docscan_common::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// バックエンドURLを上書きする環境変数
pub const API_URL_ENV: &str = "DOCSCAN_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub timeout_seconds: u64,
    /// レポートの保存先（未設定ならカレント）
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout_seconds: 120,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DocscanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("docscan").join("config.json"))
    }

    /// 実際に使うURL: 引数 > 環境変数 > 設定ファイル
    pub fn resolve_api_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(API_URL_ENV).ok();
        pick_api_url(cli_override, env_value.as_deref(), &self.api_url)
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        validate_api_url(&url)?;
        self.api_url = url;
        self.save()
    }
}

fn pick_api_url(cli: Option<&str>, env: Option<&str>, configured: &str) -> String {
    [cli, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(configured)
        .trim_end_matches('/')
        .to_string()
}

pub fn validate_api_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(DocscanError::Config(format!(
            "URLは http:// または https:// で始めてください: {}",
            url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.timeout_seconds, 120);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"api_url": "http://scan.local:9000"}"#).unwrap();
        assert_eq!(config.api_url, "http://scan.local:9000");
        assert_eq!(config.timeout_seconds, 120);
    }

    #[test]
    fn test_api_url_precedence() {
        assert_eq!(
            pick_api_url(Some("http://cli:1/"), Some("http://env:2"), "http://file:3"),
            "http://cli:1"
        );
        assert_eq!(pick_api_url(None, Some("http://env:2"), "http://file:3"), "http://env:2");
        assert_eq!(pick_api_url(None, Some("  "), "http://file:3/"), "http://file:3");
    }

    #[test]
    fn test_validate_api_url() {
        assert!(validate_api_url("https://scan.example.com").is_ok());
        assert!(validate_api_url("scan.example.com").is_err());
    }
}
