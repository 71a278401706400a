use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mapping key whose value names the recipient in output file names.
pub const NAME_KEY: &str = "name";

/// Mapping key whose value carries the registration id in output file names.
pub const REG_ID_KEY: &str = "reg-id";

/// Template variable → data column.
///
/// Serialized as a plain JSON object, e.g.
/// `{"name": "Full Name", "reg-id": "Registration"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableMapping(BTreeMap<String, String>);

impl VariableMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variable: impl Into<String>, column: impl Into<String>) {
        self.0.insert(variable.into(), column.into());
    }

    /// Parse a `variable=column` pair. Whitespace around either side is trimmed.
    pub fn parse_entry(entry: &str) -> Result<(String, String), CoreError> {
        let (variable, column) = entry
            .split_once('=')
            .ok_or_else(|| CoreError::InvalidMappingEntry(entry.to_string()))?;
        let (variable, column) = (variable.trim(), column.trim());
        if variable.is_empty() || column.is_empty() {
            return Err(CoreError::InvalidMappingEntry(entry.to_string()));
        }
        Ok((variable.to_string(), column.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fails when either of the naming keys is absent.
    pub fn validate(&self) -> Result<(), CoreError> {
        for key in [NAME_KEY, REG_ID_KEY] {
            if !self.0.contains_key(key) {
                return Err(CoreError::MissingMappingKey(key.to_string()));
            }
        }
        Ok(())
    }

    pub fn column_for(&self, variable: &str) -> Option<&str> {
        self.0.get(variable).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(v, c)| (v.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for VariableMapping {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
