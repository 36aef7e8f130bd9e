//! Errors reported by job-system collaborators.

use thiserror::Error;

/// Failure inside the job system or queue that is not a scheduling decision.
///
/// A queue *refusing* an item is not an error; it is reported through
/// [`ScheduleResult::Rejected`](crate::ScheduleResult::Rejected).
#[derive(Debug, Error)]
pub enum JobSystemError {
    /// The queue could not be reached or is shutting down.
    #[error("Queue unavailable: {0}")]
    QueueUnavailable(String),

    /// A poll trigger failed to start.
    #[error("Polling failed for {job}: {reason}")]
    PollFailed { job: String, reason: String },
}
