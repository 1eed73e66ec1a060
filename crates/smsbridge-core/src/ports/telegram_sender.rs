//! TelegramSender port - 通知の送信先

use async_trait::async_trait;

use crate::domain::DeliveryError;

/// TelegramSender sends one text message to a fixed chat.
///
/// Returns `Ok(())` only once the destination has acknowledged the message.
#[async_trait]
pub trait TelegramSender: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<(), DeliveryError>;
}
