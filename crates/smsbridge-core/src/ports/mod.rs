//! Ports - 抽象化レイヤー
//!
//! PollLoop が依存する外部システムへのインターフェースです。
//! 実装（HTTP クライアント、インメモリ版）は `impls` にあります。

pub mod sms_reader;
pub mod telegram_sender;

pub use self::sms_reader::SmsReader;
pub use self::telegram_sender::TelegramSender;
