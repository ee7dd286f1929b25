//! Configuration loader and validator for the homework status bot.
//!
//! Non-secret settings come from an optional YAML file; the three credentials
//! come from the environment (a `.env` file is honoured by the binary).
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const ENV_PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
/// Older deployments export the API token under this name.
pub const ENV_PRACTICUM_TOKEN_LEGACY: &str = "YANDEX_TOKEN";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_LOOKBACK_DAYS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration. Built once at startup and only borrowed afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub practicum: Practicum,
    #[serde(default)]
    pub telegram: Telegram,
}

/// Polling behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct App {
    pub endpoint: String,
    pub retry_interval_secs: u64,
    pub lookback_days: u64,
    /// Move the `from_date` watermark to the API's `current_date` after each
    /// clean poll. Off by default: every poll re-reads the startup window.
    pub advance_watermark: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry_interval_secs: DEFAULT_RETRY_INTERVAL_SECS,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            advance_watermark: false,
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Practicum {
    pub token: String,
}

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Telegram {
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for Practicum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Practicum").finish_non_exhaustive()
    }
}

impl fmt::Debug for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telegram")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Overlay credentials from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay credentials using `lookup`; blank values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(token) = get(ENV_PRACTICUM_TOKEN).or_else(|| get(ENV_PRACTICUM_TOKEN_LEGACY)) {
            self.practicum.token = token;
        }
        if let Some(token) = get(ENV_TELEGRAM_TOKEN) {
            self.telegram.bot_token = token;
        }
        if let Some(chat_id) = get(ENV_TELEGRAM_CHAT_ID) {
            self.telegram.chat_id = chat_id;
        }
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.app.retry_interval_secs)
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.app.endpoint).map_err(|_| ConfigError::Invalid("app.endpoint must be a valid URL"))
    }
}

/// Load configuration from an optional YAML file, overlay the environment and
/// validate the result.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut cfg = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str(&content)?
        }
        None => Config::default(),
    };
    cfg.apply_env();
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance. Missing credentials are reported by the
/// environment variable that supplies them.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.practicum.token.trim().is_empty() {
        return Err(ConfigError::Missing(ENV_PRACTICUM_TOKEN));
    }
    if cfg.telegram.bot_token.trim().is_empty() {
        return Err(ConfigError::Missing(ENV_TELEGRAM_TOKEN));
    }
    if cfg.telegram.chat_id.trim().is_empty() {
        return Err(ConfigError::Missing(ENV_TELEGRAM_CHAT_ID));
    }

    cfg.endpoint_url()?;
    if cfg.app.retry_interval_secs == 0 {
        return Err(ConfigError::Invalid("app.retry_interval_secs must be > 0"));
    }

    Ok(())
}

/// Sample YAML with every setting spelled out.
pub fn example() -> &'static str {
    r#"app:
  endpoint: "https://practicum.yandex.ru/api/user_api/homework_statuses/"
  retry_interval_secs: 600
  lookback_days: 30
  advance_watermark: false

# Credentials may also live here, but PRACTICUM_TOKEN, TELEGRAM_TOKEN and
# TELEGRAM_CHAT_ID in the environment take precedence.
practicum:
  token: "YOUR_PRACTICUM_OAUTH_TOKEN"

telegram:
  bot_token: "YOUR_TELEGRAM_BOT_TOKEN"
  chat_id: "123456789"
"#
}
