//! Queue configuration.

use serde::{Deserialize, Serialize};

/// Queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of pending items (0 = unlimited).
    #[serde(default)]
    pub max_pending: usize,

    /// Number of builds that may run at once.
    #[serde(default = "default_max_executors")]
    pub max_executors: usize,

    /// How many departed items stay inspectable.
    #[serde(default = "default_retained_items")]
    pub retained_items: usize,

    /// Builds kept per job; running builds are never dropped.
    #[serde(default = "default_retained_builds")]
    pub retained_builds: usize,
}

fn default_max_executors() -> usize {
    2
}

fn default_retained_items() -> usize {
    256
}

fn default_retained_builds() -> usize {
    100
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_pending: 0,
            max_executors: default_max_executors(),
            retained_items: default_retained_items(),
            retained_builds: default_retained_builds(),
        }
    }
}
