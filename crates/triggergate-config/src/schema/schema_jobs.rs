//! Job table configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One `[[jobs]]` entry.
#[derive(Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Full slash-separated path, e.g. `dir/sub/p`.
    pub path: String,

    /// Remote trigger token. Without one the job cannot be triggered.
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_quiet_period", with = "humantime_serde")]
    pub quiet_period: Duration,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default)]
    pub concurrent: bool,

    /// Visible to anonymous callers.
    #[serde(default)]
    pub anonymous_read: bool,

    /// Shell command run for each build.
    #[serde(default)]
    pub command: Option<String>,

    /// Accept `/polling` requests.
    #[serde(default)]
    pub pollable: bool,

    #[serde(default)]
    pub parameters: Vec<ParameterConfig>,
}

impl std::fmt::Debug for JobConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobConfig")
            .field("path", &self.path)
            .field("token", &self.token.as_ref().map(|_| "****"))
            .field("quiet_period", &self.quiet_period)
            .field("disabled", &self.disabled)
            .field("concurrent", &self.concurrent)
            .field("anonymous_read", &self.anonymous_read)
            .field("command", &self.command)
            .field("pollable", &self.pollable)
            .field("parameters", &self.parameters)
            .finish()
    }
}

fn default_quiet_period() -> Duration {
    Duration::from_secs(5)
}

/// One `[[jobs.parameters]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterConfig {
    pub name: String,

    #[serde(default)]
    pub kind: ParameterKindName,

    #[serde(default)]
    pub default: Option<String>,

    /// Allowed values for `choice` parameters.
    #[serde(default)]
    pub choices: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKindName {
    #[default]
    String,
    Text,
    Boolean,
    Choice,
    Password,
}
