//! インメモリ実装 - テスト・開発用の SmsReader / TelegramSender
//!
//! # 使用例
//! ```ignore
//! let reader = ScriptedReader::new(vec![Ok(vec![sms]), Err(FetchError::NoNewMessages)]);
//! let sender = RecordingSender::new().fail_on(2);
//! ```

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DeliveryError, FetchError, Sms, TransportError};
use crate::ports::{SmsReader, TelegramSender};

/// What a [`ScriptedReader`] answers once its script is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhausted {
    NoNewMessages,
    /// Keep failing with the given HTTP status.
    Status(u16),
}

/// Replays a fixed sequence of fetch results, then a fallback forever.
pub struct ScriptedReader {
    script: Mutex<VecDeque<Result<Vec<Sms>, FetchError>>>,
    exhausted: Exhausted,
    calls: AtomicUsize,
}

impl ScriptedReader {
    pub fn new(script: Vec<Result<Vec<Sms>, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            exhausted: Exhausted::NoNewMessages,
            calls: AtomicUsize::new(0),
        }
    }

    /// A reader whose gateway is permanently down.
    pub fn always_failing(status: u16) -> Self {
        Self::new(Vec::new()).when_exhausted(Exhausted::Status(status))
    }

    pub fn when_exhausted(mut self, exhausted: Exhausted) -> Self {
        self.exhausted = exhausted;
        self
    }

    /// Number of `read_sms` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsReader for ScriptedReader {
    async fn read_sms(&self) -> Result<Vec<Sms>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.script.lock().await.pop_front() {
            return next;
        }
        match self.exhausted {
            Exhausted::NoNewMessages => Err(FetchError::NoNewMessages),
            Exhausted::Status(code) => Err(TransportError::Status(code).into()),
        }
    }
}

/// Records every text it is asked to send.
///
/// Attempts listed via [`RecordingSender::fail_on`] (1-based) are recorded
/// and then reported as failed.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<String>>,
    fail_on: HashSet<usize>,
    fail_all: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn fail_on(mut self, attempt: usize) -> Self {
        self.fail_on.insert(attempt);
        self
    }

    /// Every attempted text, failed ones included, in call order.
    pub async fn attempts(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl TelegramSender for RecordingSender {
    async fn send_message(&self, text: &str) -> Result<(), DeliveryError> {
        let mut sent = self.sent.lock().await;
        sent.push(text.to_string());
        let attempt = sent.len();

        if self.fail_all || self.fail_on.contains(&attempt) {
            return Err(DeliveryError::Other(format!(
                "intentional failure (attempt={attempt})"
            )));
        }
        Ok(())
    }
}
