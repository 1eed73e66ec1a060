//! Poll policy: pacing and failure budget for the poll loop.

use std::time::Duration;

/// Fixed-delay polling policy.
///
/// Every iteration ends with a sleep of `interval`, regardless of outcome.
/// There is no exponential backoff: a failing gateway is retried at the same
/// cadence until the failure budget runs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between iterations.
    pub interval: Duration,

    /// Consecutive fetch failures tolerated before polling stops.
    /// The failure that pushes the count past this value ends the session.
    pub max_consecutive_failures: u32,
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_consecutive_failures: Self::DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }

    pub fn with_max_consecutive_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = max;
        self
    }

    /// Whether `consecutive` failures exhaust the budget.
    ///
    /// With the default budget of 5 the sixth failure in a row escalates.
    pub fn exhausted(&self, consecutive: u32) -> bool {
        consecutive > self.max_consecutive_failures
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
