//! Queue entries.

use std::sync::Arc;

use tokio::time::Instant;

use triggergate_protocols::{Cause, Job, ParameterValue, QueueItemRef, ScheduleRequest};

/// A pending entry: either waiting out its quiet period or ready to start.
#[derive(Debug)]
pub(crate) struct QueueItem {
    pub id: u64,
    pub job: Arc<dyn Job>,
    pub due: Instant,
    pub causes: Vec<Cause>,
    pub parameters: Option<Vec<ParameterValue>>,
}

impl QueueItem {
    pub fn new(id: u64, request: ScheduleRequest, due: Instant) -> Self {
        Self {
            id,
            job: request.job,
            due,
            causes: vec![request.cause],
            parameters: request.parameters,
        }
    }

    pub fn item_ref(&self) -> QueueItemRef {
        QueueItemRef::new(self.id)
    }

    /// Same job with the same parameters.
    pub fn is_equivalent(&self, request: &ScheduleRequest) -> bool {
        self.job.full_name() == request.job.full_name() && self.parameters == request.parameters
    }

    /// Fold another request into this entry. The earlier due time wins.
    pub fn absorb(&mut self, cause: Cause, due: Instant) {
        if due < self.due {
            self.due = due;
        }
        self.causes.push(cause);
    }
}

/// How an entry left the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Departure {
    Started { build_number: u64 },
    Cancelled,
}

/// An entry that is no longer pending, kept for inspection.
#[derive(Debug, Clone)]
pub(crate) struct DepartedItem {
    pub id: u64,
    pub job: String,
    pub causes: Vec<String>,
    pub departure: Departure,
}

impl DepartedItem {
    pub fn from_item(item: &QueueItem, departure: Departure) -> Self {
        Self {
            id: item.id,
            job: item.job.full_name().to_string(),
            causes: item.causes.iter().map(ToString::to_string).collect(),
            departure,
        }
    }
}
