use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default config file path.
pub const CONFIG_PATH: &str = "config.toml";

/// Review API endpoint returning the user's homework statuses.
pub const PRACTICUM_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Telegram Bot API base URL.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Top-level application config deserialized from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// Runtime settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    /// Seconds to sleep between polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_telegram_api_base")]
    pub telegram_api_base: String,
    /// Per-request timeout for both the review API and Telegram.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// File the log is appended to.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_poll_interval() -> u64 {
    600
}

fn default_endpoint() -> String {
    PRACTICUM_ENDPOINT.to_string()
}

fn default_telegram_api_base() -> String {
    TELEGRAM_API_BASE.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_file() -> PathBuf {
    PathBuf::from("main.log")
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            endpoint: default_endpoint(),
            telegram_api_base: default_telegram_api_base(),
            request_timeout_secs: default_request_timeout(),
            log_file: default_log_file(),
        }
    }
}

impl SettingsConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl AppConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load config from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.settings.poll_interval_secs, 600);
        assert_eq!(config.settings.endpoint, PRACTICUM_ENDPOINT);
        assert_eq!(config.settings.telegram_api_base, TELEGRAM_API_BASE);
        assert_eq!(config.settings.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.settings.log_file, PathBuf::from("main.log"));
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [settings]
            poll_interval_secs = 60
            log_file = "/var/log/homework.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.settings.poll_interval(), Duration::from_secs(60));
        assert_eq!(config.settings.log_file, PathBuf::from("/var/log/homework.log"));
        assert_eq!(config.settings.endpoint, PRACTICUM_ENDPOINT);
    }

    #[test]
    fn malformed_value_is_rejected() {
        let result: std::result::Result<AppConfig, _> =
            toml::from_str("[settings]\npoll_interval_secs = \"ten\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new("/nonexistent/homework-bot/config.toml");
        let config = AppConfig::load_or_default(path).unwrap();
        assert_eq!(config.settings.poll_interval_secs, 600);
    }

    #[test]
    fn load_reports_path_on_error() {
        let path = Path::new("/nonexistent/homework-bot/config.toml");
        let err = AppConfig::load(path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
