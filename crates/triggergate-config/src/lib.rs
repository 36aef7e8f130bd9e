//! # TriggerGate Config
//!
//! TOML configuration for the TriggerGate server: listener, gateway route
//! prefix, queue sizing, logging and the job table.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
