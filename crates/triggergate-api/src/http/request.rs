//! Reading trigger calls off HTTP requests.

use std::net::SocketAddr;

use axum::body::to_bytes;
use axum::extract::{ConnectInfo, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method};

use crate::error::GatewayError;
use crate::gateway::{RequestFields, TriggerCall};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Peer IP of the connection, or `unknown` when the server was not started
/// with connect info (e.g. in-process tests).
pub fn client_address(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Collect fields from the query string and, for form POSTs, the body.
pub async fn read_trigger_call(
    request: Request,
    max_body_bytes: usize,
) -> Result<TriggerCall, GatewayError> {
    let remote_addr = client_address(&request);
    let mut fields = RequestFields::from_query(request.uri().query());

    if request.method() == Method::POST && is_form(request.headers()) {
        let body = to_bytes(request.into_body(), max_body_bytes)
            .await
            .map_err(|_| GatewayError::PayloadTooLarge {
                limit: max_body_bytes,
            })?;
        fields.extend_encoded(&body);
    }

    Ok(TriggerCall::new(remote_addr, fields))
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn test_query_and_form_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/build?job=p&token=t")
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from("delay=0sec&cause=from+body"))
            .unwrap();
        let call = read_trigger_call(request, 1024).await.unwrap();
        assert_eq!(call.job(), Some("p"));
        assert_eq!(call.token(), Some("t"));
        assert_eq!(call.delay(), Some("0sec"));
        assert_eq!(call.cause(), Some("from body"));
        assert_eq!(call.remote_addr, "unknown");
    }

    #[tokio::test]
    async fn test_oversized_form_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/build?job=p")
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from(format!("token={}", "x".repeat(64))))
            .unwrap();
        let err = read_trigger_call(request, 16).await.unwrap_err();
        assert!(matches!(err, GatewayError::PayloadTooLarge { limit: 16 }));
        assert_eq!(err.status(), axum::http::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_non_form_body_ignored() {
        let request = Request::builder()
            .method("POST")
            .uri("/build?job=p")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"token\":\"t\"}"))
            .unwrap();
        let call = read_trigger_call(request, 1024).await.unwrap();
        assert_eq!(call.token(), None);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let request = Request::builder()
            .method("POST")
            .uri("/build")
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from(format!("cause={}", "x".repeat(64))))
            .unwrap();
        let err = read_trigger_call(request, 16).await.unwrap_err();
        assert!(matches!(err, GatewayError::BadRequest(_)));
    }

    #[test]
    fn test_client_address_from_connect_info() {
        let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let addr: SocketAddr = "192.0.2.10:51234".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(client_address(&request), "192.0.2.10");
    }
}
