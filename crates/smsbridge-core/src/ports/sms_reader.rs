//! SmsReader port - SMS の取得元

use async_trait::async_trait;

use crate::domain::{FetchError, Sms};

/// SmsReader は保留中の SMS を取得する
///
/// # 契約
/// - 新着なし → `FetchError::NoNewMessages`
/// - 必須フィールド欠落 → `FetchError::Validation`
/// - 通信・ステータス・デコード失敗 → `FetchError::Transport`
/// - 空の `Ok(vec![])` も成功として扱われる
///
/// 呼び出しごとのタイムアウトは実装側の責任です。
#[async_trait]
pub trait SmsReader: Send + Sync {
    async fn read_sms(&self) -> Result<Vec<Sms>, FetchError>;
}
