//! Application state.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use triggergate_protocols::{AuthToken, Identity, ItemLookup, QueueAdmin, ScheduleQueue};

use crate::error::GatewayError;
use crate::gateway::TokenGateway;
use crate::http::csrf::{CrumbIssuer, CsrfBypassRule};

/// Identity granted to callers presenting the admin bearer token.
pub const ADMIN_USER: &str = "admin";

/// Settings for the HTTP surface.
#[derive(Clone)]
pub struct GatewaySettings {
    /// Trigger route prefix, e.g. `/buildByToken`.
    pub prefix: String,
    /// Root URL used to build `Location` headers.
    pub root_url: String,
    pub max_body_bytes: usize,
    pub admin_token: Option<String>,
    /// Crumb key; a random one is generated when unset.
    pub crumb_secret: Option<String>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            prefix: "/buildByToken".to_string(),
            root_url: "http://127.0.0.1:8080/".to_string(),
            max_body_bytes: 64 * 1024,
            admin_token: None,
            crumb_secret: None,
        }
    }
}

impl fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("prefix", &self.prefix)
            .field("root_url", &self.root_url)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("has_admin_token", &self.admin_token.is_some())
            .field("has_crumb_secret", &self.crumb_secret.is_some())
            .finish()
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub gateway: TokenGateway,
    pub queue_admin: Arc<dyn QueueAdmin>,
    pub crumbs: CrumbIssuer,
    pub csrf_bypass: CsrfBypassRule,
    prefix: String,
    max_body_bytes: usize,
    admin_token: Option<AuthToken>,
    start_time: Instant,
}

impl AppState {
    pub fn new(
        settings: GatewaySettings,
        items: Arc<dyn ItemLookup>,
        queue: Arc<dyn ScheduleQueue>,
        queue_admin: Arc<dyn QueueAdmin>,
    ) -> Result<Self, GatewayError> {
        let crumbs = match settings.crumb_secret.as_deref() {
            Some(secret) => CrumbIssuer::new(secret)?,
            None => CrumbIssuer::random()?,
        };
        Ok(Self {
            gateway: TokenGateway::new(items, queue, settings.root_url),
            queue_admin,
            crumbs,
            csrf_bypass: CsrfBypassRule::new(settings.prefix.clone()),
            prefix: settings.prefix,
            max_body_bytes: settings.max_body_bytes,
            admin_token: settings
                .admin_token
                .map(AuthToken::new)
                .filter(|t| !t.is_empty()),
            start_time: Instant::now(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Caller identity from the `Authorization: Bearer` header.
    pub fn identify(&self, headers: &HeaderMap) -> Identity {
        let Some(expected) = &self.admin_token else {
            return Identity::Anonymous;
        };
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        match bearer {
            Some(token) if expected.matches(token) => Identity::User(ADMIN_USER.to_string()),
            _ => Identity::Anonymous,
        }
    }
}
