//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_jobs;

pub use schema_jobs::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub jobs: Vec<JobConfig>,
}

/// Server configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally visible root URL, used in `Location` headers.
    #[serde(default)]
    pub public_url: Option<String>,

    /// Bearer token for the queue inspection routes.
    #[serde(default)]
    pub admin_token: Option<String>,

    /// Key for crumb derivation. Random per process when unset.
    #[serde(default)]
    pub crumb_secret: Option<String>,
}

impl ServerConfig {
    /// Root URL, always ending in `/`.
    pub fn root_url(&self) -> String {
        let mut url = self
            .public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}/", self.host, self.port));
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("public_url", &self.public_url)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "****"))
            .field("crumb_secret", &self.crumb_secret.as_ref().map(|_| "****"))
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
            admin_token: None,
            crumb_secret: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Trigger route configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Route prefix, e.g. `/buildByToken`.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Limit for form-encoded request bodies.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_prefix() -> String {
    "/buildByToken".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

/// Queue sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum pending items (0 = unlimited).
    #[serde(default)]
    pub max_pending: usize,

    #[serde(default = "default_max_executors")]
    pub max_executors: usize,

    /// Builds kept in history per job.
    #[serde(default = "default_retained_builds")]
    pub retained_builds: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_pending: 0,
            max_executors: default_max_executors(),
            retained_builds: default_retained_builds(),
        }
    }
}

fn default_max_executors() -> usize {
    2
}

fn default_retained_builds() -> usize {
    100
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for rolling log files. Defaults to the platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: Option<String>,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
