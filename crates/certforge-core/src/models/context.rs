use crate::error::CoreError;
use crate::models::dataset::Row;
use crate::models::mapping::VariableMapping;

/// Per-row substitution values, in mapping order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    values: Vec<(String, String)>,
}

impl RenderContext {
    /// Join a mapping with one row. Fails if a mapped column is missing.
    pub fn build(mapping: &VariableMapping, row: &Row) -> Result<Self, CoreError> {
        let values = mapping
            .iter()
            .map(|(variable, column)| {
                row.get(column)
                    .map(|value| (variable.to_string(), value.to_string()))
                    .ok_or_else(|| CoreError::MissingColumn(column.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }

    pub fn get(&self, variable: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(v, _)| v == variable)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(v, value)| (v.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for RenderContext {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
