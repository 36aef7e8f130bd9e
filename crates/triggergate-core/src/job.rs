//! Job implementation backed by static configuration.

use std::sync::Arc;
use std::time::Duration;

use triggergate_protocols::{AuthToken, Identity, Job, ParameterDefinition, PollTrigger};

/// Quiet period applied when none is configured.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(5);

/// A job whose capabilities are fixed at construction time.
#[derive(Clone)]
pub struct ConfiguredJob {
    full_name: String,
    auth_token: Option<AuthToken>,
    schedulable: bool,
    disabled: bool,
    concurrent: bool,
    anonymous_read: bool,
    quiet_period: Duration,
    parameters: Option<Vec<ParameterDefinition>>,
    poll_trigger: Option<Arc<dyn PollTrigger>>,
}

impl ConfiguredJob {
    pub fn builder(full_name: impl Into<String>) -> ConfiguredJobBuilder {
        ConfiguredJobBuilder::new(full_name)
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit('/')
            .next()
            .unwrap_or(&self.full_name)
    }
}

impl std::fmt::Debug for ConfiguredJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredJob")
            .field("full_name", &self.full_name)
            .field("has_token", &self.auth_token.is_some())
            .field("schedulable", &self.schedulable)
            .field("disabled", &self.disabled)
            .field("concurrent", &self.concurrent)
            .field("quiet_period", &self.quiet_period)
            .field("parameters", &self.parameters)
            .field("pollable", &self.poll_trigger.is_some())
            .finish()
    }
}

impl Job for ConfiguredJob {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn auth_token(&self) -> Option<&AuthToken> {
        self.auth_token.as_ref()
    }

    fn is_schedulable(&self) -> bool {
        self.schedulable
    }

    fn is_buildable(&self) -> bool {
        self.schedulable && !self.disabled
    }

    fn allows_concurrent_builds(&self) -> bool {
        self.concurrent
    }

    fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    fn parameter_definitions(&self) -> Option<&[ParameterDefinition]> {
        self.parameters.as_deref()
    }

    fn poll_trigger(&self) -> Option<Arc<dyn PollTrigger>> {
        self.poll_trigger.clone()
    }

    fn can_read(&self, identity: &Identity) -> bool {
        match identity {
            Identity::System | Identity::User(_) => true,
            Identity::Anonymous => self.anonymous_read,
        }
    }
}

/// Builder for [`ConfiguredJob`].
pub struct ConfiguredJobBuilder {
    job: ConfiguredJob,
}

impl ConfiguredJobBuilder {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            job: ConfiguredJob {
                full_name: full_name.into(),
                auth_token: None,
                schedulable: true,
                disabled: false,
                concurrent: false,
                anonymous_read: false,
                quiet_period: DEFAULT_QUIET_PERIOD,
                parameters: None,
                poll_trigger: None,
            },
        }
    }

    pub fn token(mut self, secret: impl Into<String>) -> Self {
        self.job.auth_token = Some(AuthToken::new(secret));
        self
    }

    pub fn schedulable(mut self, schedulable: bool) -> Self {
        self.job.schedulable = schedulable;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.job.disabled = disabled;
        self
    }

    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.job.concurrent = concurrent;
        self
    }

    pub fn anonymous_read(mut self, anonymous_read: bool) -> Self {
        self.job.anonymous_read = anonymous_read;
        self
    }

    pub fn quiet_period(mut self, quiet_period: Duration) -> Self {
        self.job.quiet_period = quiet_period;
        self
    }

    pub fn parameters(mut self, parameters: Vec<ParameterDefinition>) -> Self {
        self.job.parameters = Some(parameters);
        self
    }

    pub fn poll_trigger(mut self, trigger: Arc<dyn PollTrigger>) -> Self {
        self.job.poll_trigger = Some(trigger);
        self
    }

    pub fn build(self) -> ConfiguredJob {
        self.job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let job = ConfiguredJob::builder("p").build();
        assert_eq!(job.full_name(), "p");
        assert!(job.auth_token().is_none());
        assert!(job.is_schedulable());
        assert!(job.is_buildable());
        assert!(!job.allows_concurrent_builds());
        assert_eq!(job.quiet_period(), DEFAULT_QUIET_PERIOD);
        assert!(job.parameter_definitions().is_none());
        assert!(job.poll_trigger().is_none());
    }

    #[test]
    fn test_disabled_job_not_buildable() {
        let job = ConfiguredJob::builder("p").disabled(true).build();
        assert!(job.is_schedulable());
        assert!(!job.is_buildable());
    }

    #[test]
    fn test_anonymous_read_permission() {
        let hidden = ConfiguredJob::builder("p").build();
        assert!(!hidden.can_read(&Identity::Anonymous));
        assert!(hidden.can_read(&Identity::System));
        assert!(hidden.can_read(&Identity::User("alice".to_string())));

        let public = ConfiguredJob::builder("p").anonymous_read(true).build();
        assert!(public.can_read(&Identity::Anonymous));
    }

    #[test]
    fn test_name_is_last_segment() {
        let job = ConfiguredJob::builder("dir/sub/prj").build();
        assert_eq!(job.name(), "prj");
    }

    #[test]
    fn test_debug_hides_token() {
        let job = ConfiguredJob::builder("p").token("secret").build();
        let debug = format!("{:?}", job);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("has_token: true"));
    }
}
