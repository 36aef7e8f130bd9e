//! Job abstraction and capability facets.
//!
//! A job exposes optional facets (schedulable, parameterized, pollable)
//! that callers query explicitly instead of downcasting to concrete types.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use subtle::ConstantTimeEq;

use crate::error::JobSystemError;
use crate::parameter::ParameterDefinition;
use crate::security::Identity;

/// Shared secret that lets remote callers trigger a job.
#[derive(Clone)]
pub struct AuthToken {
    secret: String,
}

impl AuthToken {
    /// Create a token from its secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Whether the secret is empty. An empty token never grants access.
    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }

    /// Compare a caller-supplied value against the secret in constant time.
    pub fn matches(&self, supplied: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        self.secret.as_bytes().ct_eq(supplied.as_bytes()).unwrap_u8() == 1
    }

    /// Length of the secret, used by configuration checks.
    pub fn len(&self) -> usize {
        self.secret.len()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(****)")
    }
}

/// A named, independently schedulable unit of work.
pub trait Job: Send + Sync + fmt::Debug {
    /// Hierarchical full path, e.g. `folder/sub/name`.
    fn full_name(&self) -> &str;

    /// Remote-trigger token; `None` means remote triggering is disabled.
    fn auth_token(&self) -> Option<&AuthToken>;

    /// Whether the job can be handed to the queue at all.
    fn is_schedulable(&self) -> bool;

    /// Whether the job currently accepts new builds (not disabled).
    fn is_buildable(&self) -> bool;

    /// Whether several builds of this job may run at once.
    fn allows_concurrent_builds(&self) -> bool {
        false
    }

    /// Default delay between a schedule request and execution.
    fn quiet_period(&self) -> Duration;

    /// Declared parameters; `None` when the job takes no parameters.
    fn parameter_definitions(&self) -> Option<&[ParameterDefinition]>;

    /// Poll hook, present only for jobs that can check for changes.
    fn poll_trigger(&self) -> Option<Arc<dyn PollTrigger>>;

    /// Read permission check used by lookups.
    fn can_read(&self, identity: &Identity) -> bool;
}

/// Looks up jobs by full path on behalf of the ambient identity.
///
/// Implementations must consult [`current_identity`](crate::current_identity)
/// and hide items the identity may not read.
pub trait ItemLookup: Send + Sync {
    fn item_by_full_name(&self, full_name: &str) -> Option<Arc<dyn Job>>;
}

/// Runs a job's "check for changes" routine.
#[async_trait]
pub trait PollTrigger: Send + Sync {
    /// Invoke the poll. Findings are the trigger's business; the returned
    /// value only reports whether the poll could be started.
    async fn poll(&self, job: &str) -> Result<(), JobSystemError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_matches_exact_secret() {
        let token = AuthToken::new("secret");
        assert!(token.matches("secret"));
        assert!(!token.matches("socket"));
        assert!(!token.matches("secret "));
        assert!(!token.matches(""));
    }

    #[test]
    fn test_empty_token_never_matches() {
        let token = AuthToken::new("");
        assert!(token.is_empty());
        assert!(!token.matches(""));
    }

    #[test]
    fn test_token_debug_hides_secret() {
        let token = AuthToken::new("hunter2");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("hunter2"));
    }
}
