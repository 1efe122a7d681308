//! Session clock on unix millisecond timestamps

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Unix time in milliseconds
pub type Timestamp = u64;

/// Current wall-clock time; 0 if the system clock is before the epoch
pub fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClock {
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

impl SessionClock {
    pub fn start(now: Timestamp) -> Self {
        Self {
            started_at: now,
            finished_at: None,
        }
    }

    /// Stop the clock. Only the first call has an effect.
    pub fn freeze(&mut self, now: Timestamp) {
        if self.finished_at.is_none() {
            self.finished_at = Some(now.max(self.started_at));
        }
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn elapsed_millis(&self, now: Timestamp) -> u64 {
        let end = self.finished_at.unwrap_or(now);
        end.saturating_sub(self.started_at)
    }

    pub fn elapsed_seconds(&self, now: Timestamp) -> u64 {
        self.elapsed_millis(now) / 1000
    }
}
