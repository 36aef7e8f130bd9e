//! Ambient caller identity.
//!
//! Each request runs inside a task-local identity scope. Code that must
//! see past the caller's permissions wraps the call in [`as_system`], which
//! installs the System identity for the closure only and restores the
//! previous identity on every exit path, unwinding included.

use std::future::Future;

tokio::task_local! {
    static IDENTITY: Identity;
}

/// Who the current code runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User(String),
    System,
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }
}

/// The identity of the current scope; `Anonymous` outside of any scope.
pub fn current_identity() -> Identity {
    IDENTITY
        .try_with(|identity| identity.clone())
        .unwrap_or(Identity::Anonymous)
}

/// Run `fut` with `identity` as the ambient identity.
pub async fn with_identity<F>(identity: Identity, fut: F) -> F::Output
where
    F: Future,
{
    IDENTITY.scope(identity, fut).await
}

/// Run `f` as the System identity.
pub fn as_system<R>(f: impl FnOnce() -> R) -> R {
    IDENTITY.sync_scope(Identity::System, f)
}
