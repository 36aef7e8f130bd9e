//! The build queue.
//!
//! Pending items wait out their quiet period, then start as builds when an
//! executor is free and, for non-concurrent jobs, no build of the same job
//! is running. A dispatcher task drives this; it wakes on new items, on
//! finished builds and when the next quiet period expires.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use triggergate_protocols::{
    Job, JobSystemError, QueueAdmin, QueueItemState, QueueItemStatus, ScheduleQueue,
    ScheduleRequest, ScheduleResult,
};

use crate::build::{Build, BuildHistory, BuildStatus};
use crate::config::QueueConfig;
use crate::item::{DepartedItem, Departure, QueueItem};
use crate::runner::BuildRunner;

#[derive(Default)]
struct QueueState {
    next_id: u64,
    pending: Vec<QueueItem>,
    running: HashMap<String, usize>,
    departed: VecDeque<DepartedItem>,
}

impl QueueState {
    fn is_blocked(&self, job: &dyn Job) -> bool {
        !job.allows_concurrent_builds() && self.running.contains_key(job.full_name())
    }

    fn depart(&mut self, item: DepartedItem, retained: usize) {
        self.departed.push_back(item);
        while self.departed.len() > retained {
            self.departed.pop_front();
        }
    }
}

/// In-memory build queue.
pub struct BuildQueue {
    config: QueueConfig,
    state: Mutex<QueueState>,
    history: BuildHistory,
    runner: Arc<dyn BuildRunner>,
    executors: Arc<Semaphore>,
    wake: Notify,
}

impl BuildQueue {
    pub fn new(config: QueueConfig, runner: Arc<dyn BuildRunner>) -> Arc<Self> {
        let executors = Arc::new(Semaphore::new(config.max_executors.max(1)));
        let history = BuildHistory::new(config.retained_builds);
        Arc::new(Self {
            config,
            state: Mutex::new(QueueState::default()),
            history,
            runner,
            executors,
            wake: Notify::new(),
        })
    }

    /// Spawn the dispatcher. Items only start while it runs.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        info!(
            "Build queue started with {} executors",
            self.config.max_executors.max(1)
        );
        let queue = Arc::clone(self);
        tokio::spawn(async move { queue.dispatch_loop().await })
    }

    pub fn history(&self) -> &BuildHistory {
        &self.history
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Add a request, folding it into an equivalent pending item if one exists.
    pub fn enqueue(&self, request: ScheduleRequest) -> ScheduleResult {
        let job_name = request.job.full_name().to_string();
        if !request.job.is_buildable() {
            debug!("Refusing {}: not buildable", job_name);
            return ScheduleResult::Rejected {
                reason: format!("{} is not buildable", job_name),
            };
        }
        let Some(due) = Instant::now().checked_add(request.delay) else {
            return ScheduleResult::Rejected {
                reason: format!("delay {:?} is out of range", request.delay),
            };
        };

        let result = {
            let mut state = self.state.lock();
            if let Some(item) = state.pending.iter_mut().find(|i| i.is_equivalent(&request)) {
                item.absorb(request.cause, due);
                debug!("Merged request for {} into queue item {}", job_name, item.id);
                ScheduleResult::MergedExisting(item.item_ref())
            } else if self.config.max_pending > 0 && state.pending.len() >= self.config.max_pending
            {
                warn!("Queue full, refusing {}", job_name);
                return ScheduleResult::Rejected {
                    reason: "queue is full".to_string(),
                };
            } else {
                state.next_id += 1;
                let item = QueueItem::new(state.next_id, request, due);
                debug!("Queued {} as item {}", job_name, item.id);
                let item_ref = item.item_ref();
                state.pending.push(item);
                ScheduleResult::CreatedNew(item_ref)
            }
        };

        self.wake.notify_one();
        result
    }

    /// Wait until nothing is pending or running.
    pub async fn wait_until_idle(&self) {
        loop {
            {
                let state = self.state.lock();
                if state.pending.is_empty() && state.running.is_empty() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    async fn dispatch_loop(self: Arc<Self>) {
        loop {
            match self.dispatch_ready() {
                Some(next_due) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(next_due) => {}
                        _ = self.wake.notified() => {}
                    }
                }
                None => self.wake.notified().await,
            }
        }
    }

    /// Start every due item that may start now. Returns when the next
    /// waiting item becomes due, if any.
    fn dispatch_ready(self: &Arc<Self>) -> Option<Instant> {
        let now = Instant::now();
        let mut started = Vec::new();

        let next_due = {
            let mut state = self.state.lock();
            state.pending.sort_by_key(|item| (item.due, item.id));

            let mut index = 0;
            while index < state.pending.len() {
                let candidate = &state.pending[index];
                if candidate.due > now || state.is_blocked(candidate.job.as_ref()) {
                    index += 1;
                    continue;
                }
                let Ok(permit) = Arc::clone(&self.executors).try_acquire_owned() else {
                    break;
                };

                let item = state.pending.remove(index);
                let job_name = item.job.full_name().to_string();
                *state.running.entry(job_name.clone()).or_default() += 1;
                let build = self.history.begin(
                    &job_name,
                    item.id,
                    item.causes.clone(),
                    item.parameters.clone(),
                );
                let departed = DepartedItem::from_item(
                    &item,
                    Departure::Started {
                        build_number: build.number,
                    },
                );
                state.depart(departed, self.config.retained_items);
                started.push((item.job, build, permit));
            }

            state
                .pending
                .iter()
                .filter(|item| item.due > now)
                .map(|item| item.due)
                .min()
        };

        for (job, build, permit) in started {
            self.spawn_build(job, build, permit);
        }
        next_due
    }

    fn spawn_build(self: &Arc<Self>, job: Arc<dyn Job>, build: Build, permit: OwnedSemaphorePermit) {
        let queue = Arc::clone(self);
        tokio::spawn(async move {
            info!("Started {} #{} ({})", build.job, build.number, describe_causes(&build));
            // Runner panics arrive here as a JoinError; the bookkeeping below must run.
            let runner = Arc::clone(&queue.runner);
            let running = build.clone();
            let outcome =
                tokio::spawn(async move { runner.run(job.as_ref(), &running).await }).await;
            let status = match outcome {
                Ok(Ok(())) => {
                    info!("{} #{} succeeded", build.job, build.number);
                    BuildStatus::Succeeded
                }
                Ok(Err(e)) => {
                    warn!("{} #{} failed: {}", build.job, build.number, e);
                    BuildStatus::Failed(e.to_string())
                }
                Err(e) => {
                    error!("{} #{} aborted: {}", build.job, build.number, e);
                    BuildStatus::Failed(format!("runner aborted: {}", e))
                }
            };
            queue.history.finish(&build.job, build.number, status);

            {
                let mut state = queue.state.lock();
                if let Some(count) = state.running.get_mut(&build.job) {
                    *count -= 1;
                    if *count == 0 {
                        state.running.remove(&build.job);
                    }
                }
            }
            drop(permit);
            queue.wake.notify_one();
        });
    }
}

fn describe_causes(build: &Build) -> String {
    build
        .causes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[async_trait]
impl ScheduleQueue for BuildQueue {
    async fn schedule(&self, request: ScheduleRequest) -> Result<ScheduleResult, JobSystemError> {
        Ok(self.enqueue(request))
    }
}

#[async_trait]
impl QueueAdmin for BuildQueue {
    async fn item_status(&self, id: u64) -> Option<QueueItemStatus> {
        let now = Instant::now();
        let state = self.state.lock();

        if let Some(item) = state.pending.iter().find(|item| item.id == id) {
            let item_state = if item.due > now {
                QueueItemState::Waiting
            } else if state.is_blocked(item.job.as_ref()) {
                QueueItemState::Blocked
            } else {
                QueueItemState::Buildable
            };
            return Some(QueueItemStatus {
                id,
                job: item.job.full_name().to_string(),
                state: item_state,
                build_number: None,
                causes: item.causes.iter().map(ToString::to_string).collect(),
            });
        }

        state.departed.iter().find(|item| item.id == id).map(|item| {
            let (item_state, build_number) = match item.departure {
                Departure::Started { build_number } => (QueueItemState::Started, Some(build_number)),
                Departure::Cancelled => (QueueItemState::Cancelled, None),
            };
            QueueItemStatus {
                id,
                job: item.job.clone(),
                state: item_state,
                build_number,
                causes: item.causes.clone(),
            }
        })
    }

    async fn cancel(&self, id: u64) -> Result<bool, JobSystemError> {
        let mut state = self.state.lock();
        let Some(index) = state.pending.iter().position(|item| item.id == id) else {
            return Ok(false);
        };
        let item = state.pending.remove(index);
        info!("Cancelled queue item {} ({})", id, item.job.full_name());
        let departed = DepartedItem::from_item(&item, Departure::Cancelled);
        state.depart(departed, self.config.retained_items);
        Ok(true)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
