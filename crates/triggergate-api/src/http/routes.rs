//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::http::csrf::crumb_guard;
use crate::http::handlers;
use crate::http::host;
use crate::http::identity::identity_scope;
use crate::state::AppState;

/// Create the router.
///
/// ## Route Structure
///
/// ```text
/// {prefix}                         (CSRF exempt, token authorized)
///   GET|POST {prefix}/build
///   GET|POST {prefix}/buildWithParameters
///   GET|POST {prefix}/polling
///
/// /queue                           (authenticated callers)
///   GET    /queue/item/{id}
///   POST   /queue/item/{id}/cancel (crumb required)
///
/// /crumbIssuer - crumb for the calling address
/// /livez       - Liveness check
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let trigger_routes = Router::new()
        .route("/build", get(handlers::build).post(handlers::build))
        .route(
            "/buildWithParameters",
            get(handlers::build_with_parameters).post(handlers::build_with_parameters),
        )
        .route("/polling", get(handlers::polling).post(handlers::polling));

    let queue_routes = Router::new()
        .route("/item/{id}", get(host::queue_item))
        .route("/item/{id}/", get(host::queue_item))
        .route("/item/{id}/cancel", post(host::cancel_item));

    Router::new()
        .nest(state.prefix(), trigger_routes)
        .nest("/queue", queue_routes)
        .route("/crumbIssuer", get(host::crumb_issuer))
        .route("/livez", get(host::livez))
        .layer(middleware::from_fn_with_state(state.clone(), crumb_guard))
        .layer(middleware::from_fn_with_state(state.clone(), identity_scope))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
