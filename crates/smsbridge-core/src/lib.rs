//! smsbridge-core
//!
//! sms-gammu-gateway の新着 SMS を Telegram チャットへ転送するための部品。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Sms, エラー分類）
//! - **ports**: 抽象化レイヤー（SmsReader, TelegramSender）
//! - **impls**: 実装（GammuClient, TelegramClient, インメモリ版）
//! - **app**: アプリケーションロジック（PollLoop, Bridge, BridgeBuilder）
//! - **config**: 起動時設定
//! - **observability**: セッション統計

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use app::{Bridge, BridgeBuilder, PollLoop, PollPolicy, PollReport, ShutdownHandle, StopReason};
pub use config::Config;
pub use domain::{DeliveryError, FetchError, Sms};
