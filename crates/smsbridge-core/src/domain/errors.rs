//! Errors - エラー型と分類
//!
//! - **FetchError**: SmsReader の失敗（NoNewMessages は正常系として扱う）
//! - **DeliveryError**: TelegramSender の失敗（エスカレーション対象外）
//! - **BridgeError**: 起動時の致命的エラー

use std::fmt;

use thiserror::Error;

/// Required gateway field that was absent from a non-empty record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingField {
    Date,
    Number,
    State,
    Text,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MissingField::Date => "date",
            MissingField::Number => "number",
            MissingField::State => "state",
            MissingField::Text => "text",
        };
        f.write_str(name)
    }
}

/// Failure reaching the gateway or understanding its answer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("sending request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("unexpected status code: {0}")]
    Status(u16),

    #[error("decoding response: {0}")]
    Decode(String),
}

/// Result of a fetch that produced no deliverable messages.
#[derive(Debug, Error)]
pub enum FetchError {
    /// 新着なし。エラーではなく定常状態
    #[error("no new messages")]
    NoNewMessages,

    #[error("{0} is required")]
    Validation(MissingField),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl FetchError {
    pub fn is_no_new_messages(&self) -> bool {
        matches!(self, FetchError::NoNewMessages)
    }
}

/// Telegram rejected the message or could not be reached.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("sending request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("unexpected status: {status}. {description}")]
    Rejected { status: u16, description: String },

    #[error("malformed acknowledgment: {0}")]
    MalformedAck(String),

    #[error("{0}")]
    Other(String),
}

/// Fatal conditions surfaced to the process.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("startup notification failed: {0}")]
    StartupDelivery(#[source] DeliveryError),
}
