//! Poll trigger that records invocations.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::info;

use triggergate_protocols::{JobSystemError, PollTrigger};

/// Records every poll so operators (and tests) can see that it ran.
#[derive(Debug, Default)]
pub struct RecordingPollTrigger {
    polls: AtomicU64,
    last_polled_at: Mutex<Option<DateTime<Utc>>>,
}

impl RecordingPollTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of polls so far.
    pub fn poll_count(&self) -> u64 {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn last_polled_at(&self) -> Option<DateTime<Utc>> {
        *self.last_polled_at.lock()
    }
}

#[async_trait]
impl PollTrigger for RecordingPollTrigger {
    async fn poll(&self, job: &str) -> Result<(), JobSystemError> {
        let count = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_polled_at.lock() = Some(Utc::now());
        info!("Polling {} (poll #{})", job, count);
        Ok(())
    }
}
