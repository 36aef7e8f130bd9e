//! Build execution.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use triggergate_protocols::Job;

use crate::build::Build;
use crate::error::QueueError;

/// Executes a build once it leaves the queue.
#[async_trait]
pub trait BuildRunner: Send + Sync {
    async fn run(&self, job: &dyn Job, build: &Build) -> Result<(), QueueError>;
}

/// Completes every build immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRunner;

#[async_trait]
impl BuildRunner for NoopRunner {
    async fn run(&self, _job: &dyn Job, _build: &Build) -> Result<(), QueueError> {
        Ok(())
    }
}

/// Runs a shell command per job. Parameters are exported as environment
/// variables alongside `BUILD_NUMBER` and `JOB_NAME`.
#[derive(Debug, Default, Clone)]
pub struct CommandRunner {
    commands: HashMap<String, String>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the command for a job path.
    pub fn with_command(mut self, job: impl Into<String>, command: impl Into<String>) -> Self {
        self.commands.insert(job.into(), command.into());
        self
    }

    pub fn command_for(&self, job: &str) -> Option<&str> {
        self.commands.get(job).map(String::as_str)
    }

    fn environment(build: &Build) -> Vec<(String, String)> {
        let mut env = vec![
            ("BUILD_NUMBER".to_string(), build.number.to_string()),
            ("JOB_NAME".to_string(), build.job.clone()),
        ];
        if let Some(params) = &build.parameters {
            env.extend(params.iter().map(|p| (p.name.clone(), p.as_env_value())));
        }
        env
    }
}

#[async_trait]
impl BuildRunner for CommandRunner {
    async fn run(&self, job: &dyn Job, build: &Build) -> Result<(), QueueError> {
        let Some(command) = self.command_for(job.full_name()) else {
            debug!("{} #{} has no command", build.job, build.number);
            return Ok(());
        };

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .envs(Self::environment(build))
            .kill_on_drop(true)
            .output()
            .await?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!("{} #{}: {}", build.job, build.number, line);
        }

        if output.status.success() {
            Ok(())
        } else {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            Err(QueueError::ExecutionFailed(format!("exit status {}", code)))
        }
    }
}
