//! # TriggerGate Core
//!
//! Reference job system behind the gateway: a folder-aware item registry
//! whose lookups honour the ambient identity, plus the job and poll trigger
//! types the server builds from configuration.

pub mod error;
pub mod job;
pub mod poll;
pub mod registry;

pub use error::RegistryError;
pub use job::{ConfiguredJob, ConfiguredJobBuilder};
pub use poll::RecordingPollTrigger;
pub use registry::JobRegistry;
