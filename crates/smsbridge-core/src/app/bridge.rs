//! Bridge - 起動通知を送ってからポーリングを開始する
//!
//! 起動通知の送信失敗だけは致命的（ループに入らずに終了）。
//! ループ開始後の送信失敗はログに残すだけ。

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use super::{PollLoop, PollReport};
use crate::domain::BridgeError;
use crate::ports::TelegramSender;

pub struct Bridge {
    sender: Arc<dyn TelegramSender>,
    poll: PollLoop,
    startup_message: String,
}

impl Bridge {
    pub(crate) fn new(
        sender: Arc<dyn TelegramSender>,
        poll: PollLoop,
        startup_message: String,
    ) -> Self {
        Self {
            sender,
            poll,
            startup_message,
        }
    }

    pub fn startup_message(&self) -> &str {
        &self.startup_message
    }

    /// Announce startup, then poll until cancelled or escalated.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> Result<PollReport, BridgeError> {
        self.sender
            .send_message(&self.startup_message)
            .await
            .map_err(BridgeError::StartupDelivery)?;

        info!(
            interval = ?self.poll.policy().interval,
            max_failures = self.poll.policy().max_consecutive_failures,
            "startup notification sent, polling"
        );
        Ok(self.poll.run(shutdown).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::app::{BridgeBuilder, PollPolicy, ShutdownHandle, StopReason};
    use crate::domain::Sms;
    use crate::impls::{RecordingSender, ScriptedReader};

    #[tokio::test(start_paused = true)]
    async fn failed_startup_notification_skips_polling() {
        let reader = Arc::new(ScriptedReader::new(vec![Ok(vec![Sms::new(
            "+1", "2022-01-01", "received", "hi",
        )])]));
        let sender = Arc::new(RecordingSender::failing());
        let bridge = BridgeBuilder::new()
            .reader(reader.clone())
            .sender(sender.clone())
            .build()
            .unwrap();
        let (_handle, rx) = ShutdownHandle::channel();

        let err = bridge.run(rx).await.unwrap_err();

        assert!(matches!(err, BridgeError::StartupDelivery(_)));
        assert_eq!(reader.calls(), 0);
        assert_eq!(sender.attempts().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn startup_notification_precedes_relayed_messages() {
        let sms = Sms::new("+123456789", "2022-01-01", "received", "Test SMS");
        let reader = Arc::new(ScriptedReader::new(vec![Ok(vec![sms])]).when_exhausted(
            crate::impls::Exhausted::Status(500),
        ));
        let sender = Arc::new(RecordingSender::new());
        let bridge = BridgeBuilder::new()
            .reader(reader)
            .sender(sender.clone())
            .policy(PollPolicy::new(Duration::from_millis(10)))
            .startup_message("up")
            .build()
            .unwrap();
        let (_handle, rx) = ShutdownHandle::channel();

        let report = bridge.run(rx).await.unwrap();

        assert_eq!(
            sender.attempts().await,
            vec!["up", "+123456789 sent on 2022-01-01 (received)\nTest SMS"]
        );
        assert_eq!(report.reason, StopReason::TooManyFailures { consecutive: 6 });
    }
}
