//! certforge-tabular
//!
//! Recipient data loading: CSV files and spreadsheet workbooks, both exposed
//! through the same [`DataSet`] model.

use std::path::Path;

use certforge_core::error::CoreError;
use certforge_core::models::dataset::DataSet;
use certforge_core::models::format::DataFormat;
use tracing::info;

pub mod csv_source;
pub mod error;
pub mod workbook;

use crate::error::TabularError;

/// Load every row of a data file.
pub fn read(path: &Path) -> Result<DataSet, TabularError> {
    let format = classify(path)?;
    let data = match format {
        DataFormat::Csv => csv_source::read_csv(path)?,
        DataFormat::Spreadsheet => workbook::read_workbook(path)?,
    };
    info!(
        path = %path.display(),
        columns = data.columns().len(),
        rows = data.len(),
        "loaded data file"
    );
    Ok(data)
}

/// Column names of a data file, in file order.
pub fn columns(path: &Path) -> Result<Vec<String>, TabularError> {
    Ok(read(path)?.columns().to_vec())
}

fn classify(path: &Path) -> Result<DataFormat, TabularError> {
    DataFormat::from_path(path).map_err(|e| match e {
        CoreError::UnsupportedFormat(ext) => TabularError::UnsupportedFormat(ext),
        other => TabularError::data_format(path, other),
    })
}

/// Shared by both readers: duplicate headers surface as a data format error.
pub(crate) fn build_dataset(
    path: &Path,
    columns: Vec<String>,
    records: Vec<Vec<String>>,
) -> Result<DataSet, TabularError> {
    if columns.is_empty() {
        return Err(TabularError::data_format(path, "no header row"));
    }
    DataSet::from_records(columns, records).map_err(|e| TabularError::data_format(path, e))
}
