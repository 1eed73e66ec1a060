//! PollLoop - SMS 取得 → Telegram 転送ループ
//!
//! # フロー（1 イテレーション）
//! 1. shutdown が来ていたら即終了（fetch も sleep もしない）
//! 2. SmsReader::read_sms()
//!    - NoNewMessages → 失敗カウンタを 0 に戻す
//!    - その他のエラー → カウンタ +1、上限超過なら TooManyFailures で終了
//!    - 成功 → カウンタを 0 に戻し、取得順に 1 件ずつ送信
//! 3. interval だけ sleep（shutdown が来たら早めに起きる）
//!
//! 送信失敗はログに残すだけで、カウンタにもループにも影響しない。

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info, warn};

use super::PollPolicy;
use crate::domain::{FetchError, Sms};
use crate::observability::PollStats;
use crate::ports::{SmsReader, TelegramSender};

/// Why a poll session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    TooManyFailures { consecutive: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub reason: StopReason,
    pub stats: PollStats,
}

/// Sending half of the cancellation signal.
///
/// Dropping it does not cancel the loop; only [`ShutdownHandle::shutdown`] does.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn channel() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    pub fn shutdown(&self) {
        // send_replace: succeeds even when every receiver is gone
        self.tx.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }
}

pub struct PollLoop {
    reader: Arc<dyn SmsReader>,
    sender: Arc<dyn TelegramSender>,
    policy: PollPolicy,
}

impl PollLoop {
    pub fn new(
        reader: Arc<dyn SmsReader>,
        sender: Arc<dyn TelegramSender>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            reader,
            sender,
            policy,
        }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Run one poll session until cancelled or the failure budget runs out.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> PollReport {
        let mut stats = PollStats::default();
        let mut consecutive_failures: u32 = 0;

        let reason = loop {
            if *shutdown.borrow_and_update() {
                info!("stopping the polling");
                break StopReason::Cancelled;
            }
            stats.iterations += 1;

            match self.reader.read_sms().await {
                Ok(messages) => {
                    consecutive_failures = 0;
                    self.relay(&messages, &mut stats).await;
                }
                Err(FetchError::NoNewMessages) => {
                    consecutive_failures = 0;
                    debug!("no new messages");
                }
                Err(e) => {
                    consecutive_failures = consecutive_failures.saturating_add(1);
                    stats.fetch_failures += 1;
                    warn!(
                        error = %e,
                        consecutive = consecutive_failures,
                        "error fetching sms"
                    );
                    if self.policy.exhausted(consecutive_failures) {
                        error!(
                            consecutive = consecutive_failures,
                            "too many consecutive fetch failures, giving up"
                        );
                        break StopReason::TooManyFailures {
                            consecutive: consecutive_failures,
                        };
                    }
                }
            }

            self.pause(&mut shutdown).await;
        };

        info!(?reason, ?stats, "poll session ended");
        PollReport { reason, stats }
    }

    async fn relay(&self, messages: &[Sms], stats: &mut PollStats) {
        for sms in messages {
            info!(number = %sms.number, date = %sms.date, "got new sms");
            match self.sender.send_message(&sms.to_string()).await {
                Ok(()) => stats.relayed += 1,
                Err(e) => {
                    stats.delivery_failures += 1;
                    error!(error = %e, number = %sms.number, "error sending telegram message");
                }
            }
        }
    }

    /// Sleep for one interval, waking early on shutdown.
    async fn pause(&self, shutdown: &mut watch::Receiver<bool>) {
        let deadline = Instant::now() + self.policy.interval;
        loop {
            if *shutdown.borrow() {
                return;
            }
            tokio::select! {
                _ = sleep_until(deadline) => return,
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        // nobody can cancel any more
                        sleep_until(deadline).await;
                        return;
                    }
                }
            }
        }
    }
}
