//! Gateway error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, error, warn};

use triggergate_protocols::{JobSystemError, ParameterError};

/// Body shared by every 404 so a missing job and a job without a token
/// cannot be told apart.
const NOT_FOUND_BODY: &str = "Not Found\n";
const FORBIDDEN_BODY: &str = "Forbidden\n";
const TOO_LARGE_BODY: &str = "Payload Too Large\n";
const INTERNAL_BODY: &str = "Internal Server Error\n";

/// Gateway error types.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No visible job, or the job has no trigger token.
    #[error("Not found")]
    NotFound,

    /// Wrong or missing token. The reason is logged, never returned.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request shape or field problem; the message is returned verbatim.
    #[error("{0}")]
    BadRequest(String),

    /// Form body longer than the configured limit.
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The queue refused the item.
    #[error("Queue refused {job}: {reason}")]
    QueueRejected { job: String, reason: String },

    /// Job system failure. Detail is logged, never returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        GatewayError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Forbidden(_) | GatewayError::QueueRejected { .. } => {
                StatusCode::FORBIDDEN
            }
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JobSystemError> for GatewayError {
    fn from(err: JobSystemError) -> Self {
        GatewayError::Internal(err.to_string())
    }
}

impl From<ParameterError> for GatewayError {
    fn from(err: ParameterError) -> Self {
        GatewayError::BadRequest(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            GatewayError::NotFound => (status, NOT_FOUND_BODY).into_response(),
            GatewayError::Forbidden(reason) => {
                debug!("Denied: {}", reason);
                (status, FORBIDDEN_BODY).into_response()
            }
            GatewayError::BadRequest(message) => (status, format!("{}\n", message)).into_response(),
            GatewayError::PayloadTooLarge { limit } => {
                debug!("Rejected body over {} bytes", limit);
                (status, TOO_LARGE_BODY).into_response()
            }
            GatewayError::QueueRejected { job, reason } => {
                warn!("Queue refused {}: {}", job, reason);
                (status, FORBIDDEN_BODY).into_response()
            }
            GatewayError::Internal(detail) => {
                error!("Trigger failed: {}", detail);
                (status, INTERNAL_BODY).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header::CONTENT_TYPE;

    async fn body_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = GatewayError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_of(response).await, NOT_FOUND_BODY);
    }

    #[tokio::test]
    async fn test_forbidden_hides_reason() {
        let response = GatewayError::Forbidden("token mismatch on p".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_of(response).await, FORBIDDEN_BODY);
    }

    #[tokio::test]
    async fn test_bad_request_returns_message() {
        let response = GatewayError::bad_request("use build for this job").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await, "use build for this job\n");
    }

    #[tokio::test]
    async fn test_payload_too_large() {
        let response = GatewayError::PayloadTooLarge { limit: 16 }.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_of(response).await, TOO_LARGE_BODY);
    }

    #[tokio::test]
    async fn test_internal_hides_detail() {
        let err: GatewayError = JobSystemError::QueueUnavailable("db down".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body_of(response).await.contains("db down"));
    }

    #[test]
    fn test_queue_rejected_is_forbidden() {
        let err = GatewayError::QueueRejected {
            job: "p".into(),
            reason: "p is not buildable".into(),
        };
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_parameter_error_is_bad_request() {
        let err: GatewayError = ParameterError::MultipleValues {
            name: "foo".into(),
            count: 2,
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
