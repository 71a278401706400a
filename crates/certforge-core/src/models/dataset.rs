use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::CoreError;

/// Tabular recipient data: ordered, unique column names and ordered rows.
///
/// Every value is already coerced to text by the reader that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct DataSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

/// One recipient: column name → text value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl DataSet {
    /// Build a dataset from a header and positional records.
    ///
    /// Records shorter than the header get empty strings for the missing
    /// trailing cells; extra cells beyond the header are ignored.
    pub fn from_records<I>(columns: Vec<String>, records: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(CoreError::DuplicateColumn(column.clone()));
            }
        }

        let rows = records
            .into_iter()
            .map(|record| {
                let mut values = record.into_iter();
                let cells = columns
                    .iter()
                    .map(|c| (c.clone(), values.next().unwrap_or_default()))
                    .collect();
                Row { cells }
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
