use std::fs::File;
use std::path::Path;

use certforge_core::models::dataset::DataSet;

use crate::error::TabularError;

/// Read a comma-separated file. The first record is the header.
///
/// Fields are kept verbatim (no numeric re-interpretation). Every record must
/// have as many fields as the header.
pub fn read_csv(path: &Path) -> Result<DataSet, TabularError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(file);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| TabularError::data_format(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| TabularError::data_format(path, e))?;
        records.push(record.iter().map(str::to_string).collect());
    }

    crate::build_dataset(path, columns, records)
}
