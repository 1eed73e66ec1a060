//! BridgeBuilder - Bridge の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() 時に reader / sender が揃っているかチェック
//! - from_config() は Config::validate() を通してから HTTP クライアントを組み立てる

use std::sync::Arc;

use super::{Bridge, PollLoop, PollPolicy};
use crate::config::{Config, ConfigError};
use crate::impls::{GammuClient, TelegramClient};
use crate::ports::{SmsReader, TelegramSender};

pub const DEFAULT_STARTUP_MESSAGE: &str = "smsbridge started";

/// BuildError はブリッジ構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no SmsReader configured")]
    MissingReader,

    #[error("no TelegramSender configured")]
    MissingSender,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("building http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// # 使用例
/// ```ignore
/// let bridge = BridgeBuilder::from_config(&config)?.build()?;
/// let report = bridge.run(shutdown_rx).await?;
/// ```
#[derive(Default)]
pub struct BridgeBuilder {
    reader: Option<Arc<dyn SmsReader>>,
    sender: Option<Arc<dyn TelegramSender>>,
    policy: PollPolicy,
    startup_message: Option<String>,
}

impl BridgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the gateway and Telegram HTTP clients described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, BuildError> {
        config.validate()?;

        let reader = GammuClient::new(&config.gateway)?;
        let startup_message = format!(
            "{DEFAULT_STARTUP_MESSAGE}: polling {} every {:?}",
            reader.endpoint(),
            config.poll.interval
        );
        let sender = TelegramClient::new(&config.telegram)?;

        Ok(Self::new()
            .reader(Arc::new(reader))
            .sender(Arc::new(sender))
            .policy(config.poll.clone())
            .startup_message(startup_message))
    }

    pub fn reader(mut self, reader: Arc<dyn SmsReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn sender(mut self, sender: Arc<dyn TelegramSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn startup_message(mut self, message: impl Into<String>) -> Self {
        self.startup_message = Some(message.into());
        self
    }

    pub fn build(self) -> Result<Bridge, BuildError> {
        let reader = self.reader.ok_or(BuildError::MissingReader)?;
        let sender = self.sender.ok_or(BuildError::MissingSender)?;
        let startup_message = self
            .startup_message
            .unwrap_or_else(|| DEFAULT_STARTUP_MESSAGE.to_string());

        let poll = PollLoop::new(reader, Arc::clone(&sender), self.policy);
        Ok(Bridge::new(sender, poll, startup_message))
    }
}
