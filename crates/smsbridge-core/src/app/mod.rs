//! App - アプリケーション層
//!
//! ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **BridgeBuilder**: 構築とワイヤリング
//! - **Bridge**: 起動通知 + PollLoop
//! - **PollLoop**: fetch→send ループ（固定間隔、連続失敗でエスカレーション）
//! - **PollPolicy**: interval と失敗上限

pub mod bridge;
pub mod builder;
pub mod policy;
pub mod poll_loop;

pub use self::bridge::Bridge;
pub use self::builder::{BridgeBuilder, BuildError};
pub use self::policy::PollPolicy;
pub use self::poll_loop::{PollLoop, PollReport, ShutdownHandle, StopReason};
