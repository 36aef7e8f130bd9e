//! Job lookup with existence hiding.

use std::sync::Arc;

use tracing::debug;

use triggergate_protocols::{ItemLookup, Job, as_system};

use crate::error::GatewayError;

/// What the caller intends to do with the resolved job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Build,
    Poll,
}

/// Finds the target job. The lookup itself runs as System so that whether a
/// job exists never depends on who is asking; the token check decides that.
pub struct JobResolver {
    items: Arc<dyn ItemLookup>,
}

impl JobResolver {
    pub fn new(items: Arc<dyn ItemLookup>) -> Self {
        Self { items }
    }

    pub fn resolve(&self, path: Option<&str>, op: Operation) -> Result<Arc<dyn Job>, GatewayError> {
        let Some(path) = path.filter(|p| !p.is_empty()) else {
            debug!("No job parameter");
            return Err(GatewayError::NotFound);
        };

        let Some(job) = as_system(|| self.items.item_by_full_name(path)) else {
            debug!("No such job {}", path);
            return Err(GatewayError::NotFound);
        };

        if op == Operation::Build && !job.is_schedulable() {
            debug!("{} cannot be scheduled", path);
            return Err(GatewayError::NotFound);
        }
        Ok(job)
    }
}
