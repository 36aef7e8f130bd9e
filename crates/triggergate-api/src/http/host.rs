//! Host routes: liveness, crumb issuing and queue item inspection.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Request, State};
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::json;

use triggergate_protocols::{QueueItemStatus, current_identity};

use crate::error::GatewayError;
use crate::http::csrf::CRUMB_HEADER;
use crate::http::request::client_address;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// Liveness check.
///
/// GET /livez
pub async fn livez(State(state): State<Arc<AppState>>) -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime().as_secs(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrumbResponse {
    pub crumb_request_field: &'static str,
    pub crumb: String,
}

/// Crumb for the calling address.
///
/// GET /crumbIssuer
pub async fn crumb_issuer(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Json<CrumbResponse> {
    let client = client_address(&request);
    Json(CrumbResponse {
        crumb_request_field: CRUMB_HEADER,
        crumb: state.crumbs.issue(&client),
    })
}

/// GET /queue/item/{id}
pub async fn queue_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<QueueItemStatus>, GatewayError> {
    require_authenticated()?;
    state
        .queue_admin
        .item_status(id)
        .await
        .map(Json)
        .ok_or(GatewayError::NotFound)
}

/// POST /queue/item/{id}/cancel
pub async fn cancel_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, GatewayError> {
    require_authenticated()?;
    if state.queue_admin.cancel(id).await? {
        Ok(Json(json!({ "id": id, "cancelled": true })))
    } else {
        Err(GatewayError::NotFound)
    }
}

fn require_authenticated() -> Result<(), GatewayError> {
    if current_identity().is_anonymous() {
        return Err(GatewayError::Forbidden(
            "queue routes need an authenticated caller".to_string(),
        ));
    }
    Ok(())
}
