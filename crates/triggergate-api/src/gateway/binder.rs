//! Request fields and parameter binding.

use url::form_urlencoded;

use triggergate_protocols::{ParameterDefinition, ParameterValue};

use crate::error::GatewayError;

/// Every name/value pair of a request: query string first, then any
/// form-encoded body. Names may repeat.
#[derive(Debug, Default, Clone)]
pub struct RequestFields {
    entries: Vec<(String, String)>,
}

impl RequestFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_query(query: Option<&str>) -> Self {
        let mut fields = Self::new();
        if let Some(query) = query {
            fields.extend_encoded(query.as_bytes());
        }
        fields
    }

    /// Append pairs from an `application/x-www-form-urlencoded` payload.
    pub fn extend_encoded(&mut self, encoded: &[u8]) {
        self.entries.extend(
            form_urlencoded::parse(encoded).map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct ParameterBinder;

impl ParameterBinder {
    /// Bind declared parameters from `fields`. Undeclared fields are ignored;
    /// a declared parameter with no field and no default is left out.
    pub fn bind(
        definitions: &[ParameterDefinition],
        fields: &RequestFields,
    ) -> Result<Vec<ParameterValue>, GatewayError> {
        let mut values = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let submitted = fields.all(&definition.name);
            if let Some(value) = definition.create_value(&submitted)? {
                values.push(value);
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
#[path = "binder_tests.rs"]
mod tests;
