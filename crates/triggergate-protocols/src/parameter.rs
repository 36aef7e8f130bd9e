//! Parameter definitions and submitted values.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while converting submitted values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("Illegal number of parameter values for {name}: {count}")]
    MultipleValues { name: String, count: usize },

    #[error("Illegal choice for parameter {name}: {value}")]
    InvalidChoice { name: String, value: String },
}

/// Value kinds a job may declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    String,
    Text,
    Boolean,
    Choice(Vec<String>),
    Password,
}

/// A declared job parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            description: None,
        }
    }

    /// Shorthand for a string parameter without default.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::String)
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Value used when the request carries no field for this parameter.
    ///
    /// `None` means the parameter is simply left out of the build.
    pub fn default_value(&self) -> Option<ParameterValue> {
        match &self.kind {
            ParameterKind::String | ParameterKind::Text => self
                .default
                .as_ref()
                .map(|d| ParameterValue::string(&self.name, d.clone())),
            ParameterKind::Password => self
                .default
                .as_ref()
                .map(|d| ParameterValue::password(&self.name, d.clone())),
            ParameterKind::Boolean => Some(ParameterValue::boolean(
                &self.name,
                self.default.as_deref().is_some_and(parse_bool),
            )),
            ParameterKind::Choice(choices) => self
                .default
                .as_ref()
                .or_else(|| choices.first())
                .map(|d| ParameterValue::string(&self.name, d.clone())),
        }
    }

    /// Build a value from every submitted field carrying this parameter's name.
    pub fn create_value(
        &self,
        submitted: &[&str],
    ) -> Result<Option<ParameterValue>, ParameterError> {
        match submitted {
            [] => Ok(self.default_value()),
            [single] => self.convert(single).map(Some),
            many => Err(ParameterError::MultipleValues {
                name: self.name.clone(),
                count: many.len(),
            }),
        }
    }

    fn convert(&self, raw: &str) -> Result<ParameterValue, ParameterError> {
        match &self.kind {
            ParameterKind::String | ParameterKind::Text => {
                Ok(ParameterValue::string(&self.name, raw))
            }
            ParameterKind::Password => Ok(ParameterValue::password(&self.name, raw)),
            ParameterKind::Boolean => Ok(ParameterValue::boolean(&self.name, parse_bool(raw))),
            ParameterKind::Choice(choices) => {
                if choices.iter().any(|c| c == raw) {
                    Ok(ParameterValue::string(&self.name, raw))
                } else {
                    Err(ParameterError::InvalidChoice {
                        name: self.name.clone(),
                        value: raw.to_string(),
                    })
                }
            }
        }
    }
}

fn parse_bool(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

/// Payload of a bound parameter.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParameterData {
    String(String),
    Boolean(bool),
    Password(String),
}

impl fmt::Debug for ParameterData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Self::Password(_) => f.write_str("Password(****)"),
        }
    }
}

/// A parameter value attached to a scheduled build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterValue {
    pub name: String,
    pub data: ParameterData,
}

impl ParameterValue {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: ParameterData::String(value.into()),
        }
    }

    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            data: ParameterData::Boolean(value),
        }
    }

    pub fn password(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: ParameterData::Password(value.into()),
        }
    }

    /// Plain string form, as exported to build environments.
    pub fn as_env_value(&self) -> String {
        match &self.data {
            ParameterData::String(s) | ParameterData::Password(s) => s.clone(),
            ParameterData::Boolean(b) => b.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "parameter_tests.rs"]
mod tests;
