//! The token gateway: the three trigger operations.

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use triggergate_protocols::{Cause, ItemLookup, ScheduleQueue};

use super::authorizer::TokenAuthorizer;
use super::binder::{ParameterBinder, RequestFields};
use super::delay::parse_delay;
use super::gate::SchedulingGate;
use super::resolver::{JobResolver, Operation};
use super::response::ResponseMapper;
use crate::error::GatewayError;

/// Which build route was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildRoute {
    Build,
    BuildWithParameters,
}

impl fmt::Display for BuildRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildRoute::Build => f.write_str("build"),
            BuildRoute::BuildWithParameters => f.write_str("buildWithParameters"),
        }
    }
}

/// One trigger request, decoupled from HTTP.
#[derive(Clone)]
pub struct TriggerCall {
    pub remote_addr: String,
    pub fields: RequestFields,
}

impl TriggerCall {
    pub fn new(remote_addr: impl Into<String>, fields: RequestFields) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            fields,
        }
    }

    pub fn job(&self) -> Option<&str> {
        self.fields.first("job")
    }

    pub fn token(&self) -> Option<&str> {
        self.fields.first("token")
    }

    pub fn delay(&self) -> Option<&str> {
        self.fields.first("delay")
    }

    pub fn cause(&self) -> Option<&str> {
        self.fields.first("cause")
    }
}

impl fmt::Debug for TriggerCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerCall")
            .field("remote_addr", &self.remote_addr)
            .field("job", &self.job())
            .field("has_token", &self.token().is_some())
            .finish()
    }
}

pub struct TokenGateway {
    resolver: JobResolver,
    gate: SchedulingGate,
    mapper: ResponseMapper,
}

impl TokenGateway {
    pub fn new(
        items: Arc<dyn ItemLookup>,
        queue: Arc<dyn ScheduleQueue>,
        root_url: impl Into<String>,
    ) -> Self {
        Self {
            resolver: JobResolver::new(items),
            gate: SchedulingGate::new(queue),
            mapper: ResponseMapper::new(root_url),
        }
    }

    /// `build` / `buildWithParameters`.
    pub async fn build(&self, route: BuildRoute, call: TriggerCall) -> Result<Response, GatewayError> {
        debug!("{} on {:?}", route, call.job());
        let job = self.resolver.resolve(call.job(), Operation::Build)?;
        TokenAuthorizer::authorize(job.as_ref(), call.token()).into_result(job.full_name())?;

        let definitions = job.parameter_definitions().filter(|defs| !defs.is_empty());
        let parameters = match (route, definitions) {
            (BuildRoute::Build, None) => None,
            (BuildRoute::Build, Some(_)) => {
                debug!("Wrong kind: {} is parameterized", job.full_name());
                return Err(GatewayError::bad_request(
                    "use buildWithParameters for this job",
                ));
            }
            (BuildRoute::BuildWithParameters, None) => {
                debug!("Wrong kind: {} is not parameterized", job.full_name());
                return Err(GatewayError::bad_request("use build for this job"));
            }
            (BuildRoute::BuildWithParameters, Some(defs)) => {
                Some(ParameterBinder::bind(defs, &call.fields)?)
            }
        };

        let delay = call.delay().map(parse_delay).transpose()?;
        let cause = Cause::remote(call.remote_addr.clone(), call.cause().map(str::to_string));

        let result = self
            .gate
            .schedule(Arc::clone(&job), delay, cause, parameters)
            .await?;
        self.mapper.map(job.full_name(), result)
    }

    /// `polling`: run the job's poll trigger now.
    pub async fn poll(&self, call: TriggerCall) -> Result<Response, GatewayError> {
        debug!("polling on {:?}", call.job());
        let job = self.resolver.resolve(call.job(), Operation::Poll)?;
        TokenAuthorizer::authorize(job.as_ref(), call.token()).into_result(job.full_name())?;
        if !job.is_buildable() {
            debug!("{} is not buildable", job.full_name());
            return Err(GatewayError::Forbidden(format!(
                "{} is not buildable",
                job.full_name()
            )));
        }

        let Some(trigger) = job.poll_trigger() else {
            return Err(GatewayError::bad_request(format!(
                "{} does not implement polling",
                job.full_name()
            )));
        };
        trigger.poll(job.full_name()).await?;
        Ok((StatusCode::OK, "Polling scheduled.\n").into_response())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
