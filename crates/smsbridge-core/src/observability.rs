use serde::{Deserialize, Serialize};

/// Counters for one poll session. In-memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollStats {
    pub iterations: u64,
    pub fetch_failures: u64,
    pub relayed: u64,
    pub delivery_failures: u64,
}
