//! Builds the job registry and build runner from the `[[jobs]]` table.

use std::sync::Arc;

use triggergate_config::{JobConfig, ParameterConfig, ParameterKindName};
use triggergate_core::{ConfiguredJob, JobRegistry, RecordingPollTrigger, RegistryError};
use triggergate_protocols::{ParameterDefinition, ParameterKind};
use triggergate_queue::CommandRunner;

pub(crate) fn parameter_definition(config: &ParameterConfig) -> ParameterDefinition {
    let kind = match config.kind {
        ParameterKindName::String => ParameterKind::String,
        ParameterKindName::Text => ParameterKind::Text,
        ParameterKindName::Boolean => ParameterKind::Boolean,
        ParameterKindName::Choice => ParameterKind::Choice(config.choices.clone()),
        ParameterKindName::Password => ParameterKind::Password,
    };
    let mut definition = ParameterDefinition::new(&config.name, kind);
    if let Some(ref default) = config.default {
        definition = definition.with_default(default);
    }
    if let Some(ref description) = config.description {
        definition = definition.with_description(description);
    }
    definition
}

pub(crate) fn configured_job(config: &JobConfig) -> ConfiguredJob {
    let mut builder = ConfiguredJob::builder(&config.path)
        .disabled(config.disabled)
        .concurrent(config.concurrent)
        .anonymous_read(config.anonymous_read)
        .quiet_period(config.quiet_period);
    if let Some(ref token) = config.token {
        builder = builder.token(token);
    }
    if !config.parameters.is_empty() {
        builder = builder.parameters(config.parameters.iter().map(parameter_definition).collect());
    }
    if config.pollable {
        builder = builder.poll_trigger(Arc::new(RecordingPollTrigger::new()));
    }
    builder.build()
}

pub(crate) fn build_registry(jobs: &[JobConfig]) -> Result<JobRegistry, RegistryError> {
    let registry = JobRegistry::new();
    for job in jobs {
        registry.register(Arc::new(configured_job(job)))?;
    }
    Ok(registry)
}

pub(crate) fn build_runner(jobs: &[JobConfig]) -> CommandRunner {
    jobs.iter().fold(CommandRunner::new(), |runner, job| match job.command {
        Some(ref command) => runner.with_command(&job.path, command),
        None => runner,
    })
}
