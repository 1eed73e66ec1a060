//! Config - 起動時に一度だけ組み立てる設定
//!
//! フラグ・環境変数の解析は CLI 側（clap）で行い、ここでは値の保持と検証のみ。

use std::time::Duration;

use thiserror::Error;

use crate::app::PollPolicy;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("telegram token and chat id are required")]
    MissingTelegramCredentials,

    #[error("gateway endpoint is required")]
    MissingEndpoint,

    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("invalid duration {0:?}: expected e.g. 500ms, 5s, 2m, 1h")]
    InvalidDuration(String),
}

/// sms-gammu-gateway connection settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL; the reader requests `<endpoint>/getsms`.
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// Telegram Bot API settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
    /// Bot API base URL, overridable for tests and self-hosted API servers.
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            chat_id: String::new(),
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl TelegramConfig {
    /// `<api_url>/bot<token>/sendMessage`
    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.token
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub telegram: TelegramConfig,
    pub poll: PollPolicy,
}

impl Config {
    /// Fail fast on settings the bridge cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.token.trim().is_empty() || self.telegram.chat_id.trim().is_empty() {
            return Err(ConfigError::MissingTelegramCredentials);
        }
        if self.gateway.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.poll.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

/// Parse `500ms`, `5s`, `2m`, `1h` or a bare number of seconds.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let s = input.trim();
    let invalid = || ConfigError::InvalidDuration(input.to_string());

    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    if digits.is_empty() {
        return Err(invalid());
    }
    let value: u64 = digits.parse().map_err(|_| invalid())?;

    let duration = match unit {
        "" | "s" => Duration::from_secs(value),
        "ms" => Duration::from_millis(value),
        "m" => Duration::from_secs(value.checked_mul(60).ok_or_else(invalid)?),
        "h" => Duration::from_secs(value.checked_mul(3600).ok_or_else(invalid)?),
        _ => return Err(invalid()),
    };
    Ok(duration)
}
