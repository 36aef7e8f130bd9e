//! Hands authorized requests to the queue.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use triggergate_protocols::{
    Cause, Job, ParameterValue, ScheduleQueue, ScheduleRequest, ScheduleResult,
};

use crate::error::GatewayError;

pub struct SchedulingGate {
    queue: Arc<dyn ScheduleQueue>,
}

impl SchedulingGate {
    pub fn new(queue: Arc<dyn ScheduleQueue>) -> Self {
        Self { queue }
    }

    /// Schedule `job` once. Without an explicit delay the job's quiet period applies.
    pub async fn schedule(
        &self,
        job: Arc<dyn Job>,
        delay: Option<Duration>,
        cause: Cause,
        parameters: Option<Vec<ParameterValue>>,
    ) -> Result<ScheduleResult, GatewayError> {
        let delay = delay.unwrap_or_else(|| job.quiet_period());
        let name = job.full_name().to_string();
        let request = ScheduleRequest {
            job,
            delay,
            cause,
            parameters,
        };

        let result = self.queue.schedule(request).await?;
        match &result {
            ScheduleResult::CreatedNew(item) => {
                info!("Scheduled {} as queue item {} in {:?}", name, item.id, delay)
            }
            ScheduleResult::MergedExisting(item) => {
                info!("Merged trigger for {} into queue item {}", name, item.id)
            }
            ScheduleResult::Rejected { reason } => info!("Queue refused {}: {}", name, reason),
        }
        Ok(result)
    }
}
