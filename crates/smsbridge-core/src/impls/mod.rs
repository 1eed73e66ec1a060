//! Impls - ports の実装
//!
//! - **GammuClient**: sms-gammu-gateway（本番用 SmsReader）
//! - **TelegramClient**: Telegram Bot API（本番用 TelegramSender）
//! - **memory**: ScriptedReader / RecordingSender（テスト用）

pub mod gammu;
pub mod memory;
pub mod telegram;

pub use self::gammu::GammuClient;
pub use self::memory::{Exhausted, RecordingSender, ScriptedReader};
pub use self::telegram::TelegramClient;
