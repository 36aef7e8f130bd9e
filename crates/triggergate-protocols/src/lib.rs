//! # TriggerGate Protocols
//!
//! Interface definitions shared between the gateway and the job system it
//! fronts. Contains only contracts and small value types - no engines.
//!
//! ## Core Traits
//!
//! - [`Job`] - A schedulable unit of work and its optional capability facets
//! - [`ItemLookup`] - Resolves jobs by full path for the ambient identity
//! - [`PollTrigger`] - Synchronous "check for changes" hook on a job
//! - [`ScheduleQueue`] - Accepts schedule requests and reports the outcome
//! - [`QueueAdmin`] - Inspection and cancellation of queue items

pub mod error;
pub mod job;
pub mod parameter;
pub mod queue;
pub mod security;

pub use error::JobSystemError;
pub use job::{AuthToken, ItemLookup, Job, PollTrigger};
pub use parameter::{
    ParameterData, ParameterDefinition, ParameterError, ParameterKind, ParameterValue,
};
pub use queue::{
    Cause, QueueAdmin, QueueItemRef, QueueItemState, QueueItemStatus, ScheduleQueue,
    ScheduleRequest, ScheduleResult,
};
pub use security::{Identity, as_system, current_identity, with_identity};
