//! Per-request identity scope.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use triggergate_protocols::with_identity;

use crate::state::AppState;

/// Run the rest of the request inside the caller's identity scope.
pub async fn identity_scope(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let identity = state.identify(request.headers());
    with_identity(identity, next.run(request)).await
}
