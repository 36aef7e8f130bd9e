//! Token check.

use tracing::debug;

use triggergate_protocols::Job;

use crate::error::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The job has no token: behave as if it did not exist.
    NotFound,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Allow,
    Deny(Denial),
}

impl Authorization {
    pub fn into_result(self, job: &str) -> Result<(), GatewayError> {
        match self {
            Authorization::Allow => Ok(()),
            Authorization::Deny(Denial::NotFound) => Err(GatewayError::NotFound),
            Authorization::Deny(Denial::Forbidden) => {
                Err(GatewayError::Forbidden(format!("token mismatch on {}", job)))
            }
        }
    }
}

pub struct TokenAuthorizer;

impl TokenAuthorizer {
    pub fn authorize(job: &dyn Job, supplied: Option<&str>) -> Authorization {
        let Some(expected) = job.auth_token().filter(|t| !t.is_empty()) else {
            debug!("No token on {}", job.full_name());
            return Authorization::Deny(Denial::NotFound);
        };

        match supplied {
            Some(token) if expected.matches(token) => Authorization::Allow,
            _ => {
                debug!("Denied {}", job.full_name());
                Authorization::Deny(Denial::Forbidden)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triggergate_core::ConfiguredJob;

    #[test]
    fn test_no_token_configured_is_not_found() {
        let job = ConfiguredJob::builder("p").build();
        assert_eq!(
            TokenAuthorizer::authorize(&job, Some("anything")),
            Authorization::Deny(Denial::NotFound)
        );
        assert_eq!(
            TokenAuthorizer::authorize(&job, None),
            Authorization::Deny(Denial::NotFound)
        );
    }

    #[test]
    fn test_empty_token_configured_is_not_found() {
        let job = ConfiguredJob::builder("p").token("").build();
        assert_eq!(
            TokenAuthorizer::authorize(&job, Some("")),
            Authorization::Deny(Denial::NotFound)
        );
    }

    #[test]
    fn test_token_match() {
        let job = ConfiguredJob::builder("p").token("secret").build();
        assert_eq!(
            TokenAuthorizer::authorize(&job, Some("secret")),
            Authorization::Allow
        );
        assert_eq!(
            TokenAuthorizer::authorize(&job, Some("Secret")),
            Authorization::Deny(Denial::Forbidden)
        );
        assert_eq!(
            TokenAuthorizer::authorize(&job, None),
            Authorization::Deny(Denial::Forbidden)
        );
    }

    #[test]
    fn test_into_result() {
        assert!(Authorization::Allow.into_result("p").is_ok());
        assert!(matches!(
            Authorization::Deny(Denial::NotFound).into_result("p"),
            Err(GatewayError::NotFound)
        ));
        assert!(matches!(
            Authorization::Deny(Denial::Forbidden).into_result("p"),
            Err(GatewayError::Forbidden(_))
        ));
    }
}
