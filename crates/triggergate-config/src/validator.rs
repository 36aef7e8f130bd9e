//! Configuration validation.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::schema::{Config, JobConfig, ParameterKindName};

/// Tokens shorter than this draw a warning.
const MIN_TOKEN_LEN: usize = 16;

/// Characters the router treats as path captures or wildcards.
const PREFIX_RESERVED_CHARS: &[char] = &['{', '}', '*', ':'];

/// Paths served outside the trigger prefix.
const HOST_ROUTES: &[&str] = &["/queue", "/crumbIssuer", "/livez"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_gateway(config, &mut result);
        Self::validate_queue(config, &mut result);
        Self::validate_jobs(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }

        if let Some(ref url) = config.server.public_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "server.public_url",
                    "public_url must start with http:// or https://",
                ));
            }
        }

        if config.server.admin_token.as_deref() == Some("") {
            result.add_error(ValidationError::new(
                "server.admin_token",
                "admin_token cannot be empty; omit it to disable the queue routes",
            ));
        }
    }

    fn validate_gateway(config: &Config, result: &mut ValidationResult) {
        let prefix = &config.gateway.prefix;
        if !prefix.starts_with('/') {
            result.add_error(ValidationError::new(
                "gateway.prefix",
                "prefix must start with '/'",
            ));
        } else if prefix == "/" {
            result.add_error(ValidationError::new(
                "gateway.prefix",
                "prefix cannot be the server root",
            ));
        } else if prefix.ends_with('/') {
            result.add_error(ValidationError::new(
                "gateway.prefix",
                "prefix must not end with '/'",
            ));
        } else if prefix.contains("//") {
            result.add_error(ValidationError::new(
                "gateway.prefix",
                "prefix must not contain empty segments",
            ));
        } else if let Some(c) = prefix.chars().find(|c| PREFIX_RESERVED_CHARS.contains(c)) {
            result.add_error(ValidationError::new(
                "gateway.prefix",
                format!("prefix must not contain '{}'", c),
            ));
        } else if HOST_ROUTES
            .iter()
            .any(|route| prefix == route || prefix.starts_with(&format!("{}/", route)))
        {
            result.add_error(ValidationError::new(
                "gateway.prefix",
                format!("prefix '{}' collides with a built-in route", prefix),
            ));
        }

        if config.gateway.max_body_bytes == 0 {
            result.add_error(ValidationError::new(
                "gateway.max_body_bytes",
                "max_body_bytes must be greater than 0",
            ));
        }
    }

    fn validate_queue(config: &Config, result: &mut ValidationResult) {
        if config.queue.max_executors == 0 {
            result.add_error(ValidationError::new(
                "queue.max_executors",
                "max_executors must be greater than 0",
            ));
        }
        if config.queue.retained_builds == 0 {
            result.add_error(ValidationError::new(
                "queue.retained_builds",
                "retained_builds must be greater than 0",
            ));
        }
    }

    fn validate_jobs(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();
        for (index, job) in config.jobs.iter().enumerate() {
            let base = format!("jobs[{}]", index);

            if job.path.is_empty() || job.path.split('/').any(str::is_empty) {
                result.add_error(ValidationError::new(
                    format!("{}.path", base),
                    format!("invalid job path '{}'", job.path),
                ));
            } else if !seen.insert(job.path.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}.path", base),
                    format!("duplicate job path '{}'", job.path),
                ));
            }

            Self::validate_token(job, &base, result);
            Self::validate_parameters(job, &base, result);
        }
    }

    fn validate_token(job: &JobConfig, base: &str, result: &mut ValidationResult) {
        match job.token.as_deref() {
            None | Some("") => result.add_warning(ValidationWarning::new(
                format!("{}.token", base),
                format!("{} has no token; remote triggers will answer 404", job.path),
            )),
            Some(token) if token.len() < MIN_TOKEN_LEN => {
                result.add_warning(ValidationWarning::new(
                    format!("{}.token", base),
                    format!("token is shorter than {} characters", MIN_TOKEN_LEN),
                ))
            }
            Some(_) => {}
        }
    }

    fn validate_parameters(job: &JobConfig, base: &str, result: &mut ValidationResult) {
        let mut names = HashSet::new();
        for (index, param) in job.parameters.iter().enumerate() {
            let path = format!("{}.parameters[{}]", base, index);

            if param.name.is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.name", path),
                    "parameter name cannot be empty",
                ));
            } else if !names.insert(param.name.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}.name", path),
                    format!("duplicate parameter '{}'", param.name),
                ));
            }

            match param.kind {
                ParameterKindName::Choice => {
                    if param.choices.is_empty() {
                        result.add_error(ValidationError::new(
                            format!("{}.choices", path),
                            "choice parameters need at least one choice",
                        ));
                    } else if let Some(ref default) = param.default {
                        if !param.choices.contains(default) {
                            result.add_error(ValidationError::new(
                                format!("{}.default", path),
                                format!("default '{}' is not one of the choices", default),
                            ));
                        }
                    }
                }
                _ if !param.choices.is_empty() => {
                    result.add_warning(ValidationWarning::new(
                        format!("{}.choices", path),
                        "choices are ignored for non-choice parameters",
                    ));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
