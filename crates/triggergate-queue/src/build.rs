//! Builds and per-job build history.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use triggergate_protocols::{Cause, ParameterValue};

/// Build status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Running,
    Succeeded,
    Failed(String),
}

/// One execution of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub job: String,
    /// Sequential per job, starting at 1.
    pub number: u64,
    /// Queue entry this build came from.
    pub queue_id: u64,
    pub causes: Vec<Cause>,
    pub parameters: Option<Vec<ParameterValue>>,
    pub status: BuildStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Build {
    /// Look up a bound parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters
            .as_ref()
            .and_then(|params| params.iter().find(|p| p.name == name))
    }

    pub fn is_running(&self) -> bool {
        self.status == BuildStatus::Running
    }
}

/// Builds recorded per job path, capped at `retained` per job.
pub struct BuildHistory {
    builds: DashMap<String, Vec<Build>>,
    retained: usize,
}

impl BuildHistory {
    pub fn new(retained: usize) -> Self {
        Self {
            builds: DashMap::new(),
            retained: retained.max(1),
        }
    }

    /// Record a new running build and assign it the next number.
    pub(crate) fn begin(
        &self,
        job: &str,
        queue_id: u64,
        causes: Vec<Cause>,
        parameters: Option<Vec<ParameterValue>>,
    ) -> Build {
        let mut builds = self.builds.entry(job.to_string()).or_default();
        let number = builds.last().map_or(1, |b| b.number + 1);
        let build = Build {
            job: job.to_string(),
            number,
            queue_id,
            causes,
            parameters,
            status: BuildStatus::Running,
            started_at: Utc::now(),
            finished_at: None,
        };
        builds.push(build.clone());

        while builds.len() > self.retained {
            let Some(oldest) = builds.iter().position(|b| !b.is_running()) else {
                break;
            };
            builds.remove(oldest);
        }
        build
    }

    pub(crate) fn finish(&self, job: &str, number: u64, status: BuildStatus) {
        if let Some(mut builds) = self.builds.get_mut(job) {
            if let Some(build) = builds.iter_mut().find(|b| b.number == number) {
                build.status = status;
                build.finished_at = Some(Utc::now());
            }
        }
    }

    /// All builds of `job`, oldest first.
    pub fn builds(&self, job: &str) -> Vec<Build> {
        self.builds
            .get(job)
            .map(|builds| builds.clone())
            .unwrap_or_default()
    }

    /// Retained builds of `job`.
    pub fn count(&self, job: &str) -> usize {
        self.builds.get(job).map_or(0, |builds| builds.len())
    }

    pub fn build(&self, job: &str, number: u64) -> Option<Build> {
        self.builds
            .get(job)
            .and_then(|builds| builds.iter().find(|b| b.number == number).cloned())
    }

    pub fn last_build(&self, job: &str) -> Option<Build> {
        self.builds.get(job).and_then(|builds| builds.last().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cause() -> Vec<Cause> {
        vec![Cause::remote("127.0.0.1", None)]
    }

    #[test]
    fn test_build_numbers_are_sequential_per_job() {
        let history = BuildHistory::new(10);
        assert_eq!(history.begin("a", 1, cause(), None).number, 1);
        assert_eq!(history.begin("a", 2, cause(), None).number, 2);
        assert_eq!(history.begin("b", 3, cause(), None).number, 1);
        assert_eq!(history.count("a"), 2);
        assert_eq!(history.count("b"), 1);
        assert_eq!(history.count("missing"), 0);
    }

    #[test]
    fn test_finish_records_status() {
        let history = BuildHistory::new(10);
        let build = history.begin("a", 1, cause(), None);
        assert!(history.last_build("a").unwrap().is_running());

        history.finish("a", build.number, BuildStatus::Failed("exit status 2".into()));
        let finished = history.build("a", 1).unwrap();
        assert_eq!(finished.status, BuildStatus::Failed("exit status 2".into()));
        assert!(finished.finished_at.is_some());
    }

    #[test]
    fn test_retention_drops_oldest_finished() {
        let history = BuildHistory::new(2);
        for queue_id in 1..=3 {
            let build = history.begin("a", queue_id, cause(), None);
            history.finish("a", build.number, BuildStatus::Succeeded);
        }
        let numbers: Vec<u64> = history.builds("a").iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(history.begin("a", 4, cause(), None).number, 4);
    }

    #[test]
    fn test_retention_keeps_running_builds() {
        let history = BuildHistory::new(1);
        history.begin("a", 1, cause(), None);
        history.begin("a", 2, cause(), None);
        assert_eq!(history.count("a"), 2);

        history.finish("a", 1, BuildStatus::Succeeded);
        history.begin("a", 3, cause(), None);
        let numbers: Vec<u64> = history.builds("a").iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn test_parameter_lookup() {
        let history = BuildHistory::new(10);
        let params = vec![ParameterValue::string("foo", "baz")];
        let build = history.begin("a", 1, cause(), Some(params));
        assert_eq!(build.parameter("foo").unwrap().as_env_value(), "baz");
        assert!(build.parameter("bar").is_none());
    }
}
