//! # TriggerGate Queue
//!
//! Build queue backing the gateway.
//!
//! ## Features
//!
//! - Quiet periods: items wait out their delay before they may start
//! - De-duplication: an equivalent pending item absorbs new requests
//! - Non-concurrent jobs stay blocked while one of their builds runs
//! - Bounded executor pool
//! - Per-job build history with sequential build numbers

pub mod build;
pub mod config;
pub mod error;
mod item;
pub mod queue;
pub mod runner;

pub use build::{Build, BuildHistory, BuildStatus};
pub use config::QueueConfig;
pub use error::QueueError;
pub use queue::BuildQueue;
pub use runner::{BuildRunner, CommandRunner, NoopRunner};
