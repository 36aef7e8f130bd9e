//! Maps schedule outcomes to HTTP responses.

use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};

use triggergate_protocols::{QueueItemRef, ScheduleResult};

use crate::error::GatewayError;

pub struct ResponseMapper {
    root_url: String,
}

impl ResponseMapper {
    pub fn new(root_url: impl Into<String>) -> Self {
        let mut root_url = root_url.into();
        if !root_url.ends_with('/') {
            root_url.push('/');
        }
        Self { root_url }
    }

    /// Absolute URL of a queue item.
    pub fn location(&self, item: &QueueItemRef) -> String {
        format!("{}{}", self.root_url, item.url())
    }

    pub fn map(&self, job: &str, result: ScheduleResult) -> Result<Response, GatewayError> {
        match result {
            ScheduleResult::Rejected { reason } => Err(GatewayError::QueueRejected {
                job: job.to_string(),
                reason,
            }),
            ScheduleResult::CreatedNew(item) => Ok((
                StatusCode::CREATED,
                [(LOCATION, self.location(&item))],
                "Scheduled.\n",
            )
                .into_response()),
            ScheduleResult::MergedExisting(item) => {
                Ok((StatusCode::SEE_OTHER, [(LOCATION, self.location(&item))]).into_response())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_new() {
        let mapper = ResponseMapper::new("http://ci.example.com");
        let response = mapper
            .map("p", ScheduleResult::CreatedNew(QueueItemRef::new(12)))
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[LOCATION],
            "http://ci.example.com/queue/item/12/"
        );
    }

    #[test]
    fn test_merged_existing() {
        let mapper = ResponseMapper::new("http://ci.example.com/");
        let response = mapper
            .map("p", ScheduleResult::MergedExisting(QueueItemRef::new(3)))
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            "http://ci.example.com/queue/item/3/"
        );
    }

    #[test]
    fn test_rejected() {
        let mapper = ResponseMapper::new("http://ci.example.com/");
        let err = mapper
            .map(
                "p",
                ScheduleResult::Rejected {
                    reason: "queue is full".into(),
                },
            )
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
