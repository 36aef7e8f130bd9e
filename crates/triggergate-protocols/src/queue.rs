//! Scheduling contract between the gateway and the build queue.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::JobSystemError;
use crate::job::Job;
use crate::parameter::ParameterValue;

/// Why a build was started: a remote trigger from `remote_addr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    pub remote_addr: String,
    pub note: Option<String>,
}

impl Cause {
    pub fn remote(remote_addr: impl Into<String>, note: Option<String>) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            note: note.filter(|n| !n.is_empty()),
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Started by remote host {}", self.remote_addr)?;
        if let Some(note) = &self.note {
            write!(f, " with note: {}", note)?;
        }
        Ok(())
    }
}

/// A request to put a job on the queue.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub job: Arc<dyn Job>,
    pub delay: Duration,
    pub cause: Cause,
    pub parameters: Option<Vec<ParameterValue>>,
}

/// Reference to a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItemRef {
    pub id: u64,
}

impl QueueItemRef {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    /// URL of the entry relative to the server root.
    pub fn url(&self) -> String {
        format!("queue/item/{}/", self.id)
    }
}

/// Outcome of a schedule request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleResult {
    /// The queue refused the item.
    Rejected { reason: String },
    /// A fresh queue entry was created.
    CreatedNew(QueueItemRef),
    /// The request was folded into an equivalent entry that has not started.
    MergedExisting(QueueItemRef),
}

/// Accepts schedule requests. De-duplication and concurrency control
/// between concurrent requests are the implementation's responsibility.
#[async_trait]
pub trait ScheduleQueue: Send + Sync {
    async fn schedule(&self, request: ScheduleRequest) -> Result<ScheduleResult, JobSystemError>;
}

/// Lifecycle state of a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueItemState {
    /// Inside its quiet period.
    Waiting,
    /// Due, but held back (e.g. a non-concurrent build is running).
    Blocked,
    /// Due and waiting for a free executor.
    Buildable,
    /// Left the queue as a build.
    Started,
    Cancelled,
}

/// Read-only view of a queue entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItemStatus {
    pub id: u64,
    pub job: String,
    pub state: QueueItemState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_number: Option<u64>,
    pub causes: Vec<String>,
}

/// Inspection and cancellation of queue entries.
#[async_trait]
pub trait QueueAdmin: Send + Sync {
    async fn item_status(&self, id: u64) -> Option<QueueItemStatus>;

    /// Cancel a pending entry. Returns `false` if nothing was pending under `id`.
    async fn cancel(&self, id: u64) -> Result<bool, JobSystemError>;
}
