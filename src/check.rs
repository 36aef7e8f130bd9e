//! `check` command: validate the configuration and show the job table.

use triggergate_config::{Config, ConfigValidator, JobConfig};

pub(crate) fn run_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config)?;

    for err in &result.errors {
        println!("error   {}: {}", err.path, err.message);
    }
    for warning in &result.warnings {
        println!("warning {}: {}", warning.path, warning.message);
    }
    println!();
    print!("{}", job_table(&config.jobs));
    println!();
    println!(
        "Trigger routes under {} on {}",
        config.gateway.prefix,
        config.server.root_url()
    );

    if result.is_valid() {
        Ok(())
    } else {
        Err(format!("{} configuration error(s)", result.errors.len()).into())
    }
}

fn job_table(jobs: &[JobConfig]) -> String {
    let width = jobs
        .iter()
        .map(|j| j.path.len())
        .max()
        .unwrap_or(0)
        .max("JOB".len());

    let mut out = format!(
        "{:<width$}  {:<8}  {:<10}  {:<5}  {}\n",
        "JOB", "TOKEN", "PARAMS", "POLL", "QUIET",
    );
    for job in jobs {
        let token = match job.token.as_deref() {
            None | Some("") => "none",
            Some(_) => "set",
        };
        let params = if job.parameters.is_empty() {
            "-".to_string()
        } else {
            job.parameters.len().to_string()
        };
        let state = if job.disabled { " (disabled)" } else { "" };
        out.push_str(&format!(
            "{:<width$}  {:<8}  {:<10}  {:<5}  {:?}{}\n",
            job.path,
            token,
            params,
            if job.pollable { "yes" } else { "no" },
            job.quiet_period,
            state,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use triggergate_config::ConfigLoader;

    #[test]
    fn test_job_table_hides_tokens() {
        let config = ConfigLoader::load_str(
            r#"
            [[jobs]]
            path = "dir/deploy"
            token = "very-secret-token"
            pollable = true

            [[jobs]]
            path = "off"
            disabled = true
            "#,
        )
        .unwrap();
        let table = job_table(&config.jobs);
        assert!(table.starts_with("JOB"));
        assert!(table.contains("dir/deploy"));
        assert!(table.contains("(disabled)"));
        assert!(!table.contains("very-secret-token"));
        assert_eq!(table.lines().count(), 3);
    }

    #[test]
    fn test_check_fails_on_errors() {
        let config = ConfigLoader::load_str("[gateway]\nprefix = \"nope\"").unwrap();
        assert!(run_check(&config).is_err());
        assert!(run_check(&Config::default()).is_ok());
    }
}
