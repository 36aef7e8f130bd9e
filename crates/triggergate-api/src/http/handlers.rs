//! Trigger route handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::Response;

use crate::error::GatewayError;
use crate::gateway::BuildRoute;
use crate::http::request::read_trigger_call;
use crate::state::AppState;

/// GET|POST {prefix}/build
pub async fn build(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, GatewayError> {
    let call = read_trigger_call(request, state.max_body_bytes()).await?;
    state.gateway.build(BuildRoute::Build, call).await
}

/// GET|POST {prefix}/buildWithParameters
pub async fn build_with_parameters(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, GatewayError> {
    let call = read_trigger_call(request, state.max_body_bytes()).await?;
    state
        .gateway
        .build(BuildRoute::BuildWithParameters, call)
        .await
}

/// GET|POST {prefix}/polling
pub async fn polling(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, GatewayError> {
    let call = read_trigger_call(request, state.max_body_bytes()).await?;
    state.gateway.poll(call).await
}
