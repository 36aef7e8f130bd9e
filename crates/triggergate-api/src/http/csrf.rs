//! CSRF crumbs and the trigger-route bypass.
//!
//! State-changing requests must carry a crumb in the `X-Crumb` header. A
//! crumb is the hex HMAC-SHA256 of the client address under a server key,
//! so it can be checked without storing anything. Trigger routes authenticate
//! with their own token and are exempt.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::http::request::client_address;
use crate::state::AppState;

pub const CRUMB_HEADER: &str = "X-Crumb";

type HmacSha256 = Hmac<Sha256>;

/// Exempts the trigger prefix from the crumb check.
#[derive(Debug, Clone)]
pub struct CsrfBypassRule {
    prefix: String,
}

impl CsrfBypassRule {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// `path` is the prefix itself or lies below it.
    pub fn is_exempt(&self, path: &str) -> bool {
        path.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

/// Issues and checks crumbs.
#[derive(Clone)]
pub struct CrumbIssuer {
    mac: HmacSha256,
}

impl CrumbIssuer {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, GatewayError> {
        HmacSha256::new_from_slice(secret.as_ref())
            .map(|mac| Self { mac })
            .map_err(|e| GatewayError::Internal(format!("invalid crumb key: {}", e)))
    }

    /// Issuer with a key that lives only as long as the process.
    pub fn random() -> Result<Self, GatewayError> {
        let mut key = Vec::with_capacity(32);
        key.extend_from_slice(Uuid::new_v4().as_bytes());
        key.extend_from_slice(Uuid::new_v4().as_bytes());
        Self::new(key)
    }

    pub fn issue(&self, client: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(client.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    pub fn validate(&self, client: &str, crumb: &str) -> bool {
        let Ok(supplied) = hex::decode(crumb) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(client.as_bytes());
        mac.verify_slice(&supplied).is_ok()
    }
}

impl std::fmt::Debug for CrumbIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CrumbIssuer(****)")
    }
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Reject unsafe requests without a valid crumb, except on exempt paths.
pub async fn crumb_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if is_safe_method(request.method()) || state.csrf_bypass.is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let client = client_address(&request);
    let valid = request
        .headers()
        .get(CRUMB_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|crumb| state.crumbs.validate(&client, crumb));
    if !valid {
        debug!("No valid crumb for {} {}", request.method(), request.uri().path());
        return (
            StatusCode::FORBIDDEN,
            "No valid crumb was included in the request\n",
        )
            .into_response();
    }
    next.run(request).await
}

#[cfg(test)]
#[path = "csrf_tests.rs"]
mod tests;
