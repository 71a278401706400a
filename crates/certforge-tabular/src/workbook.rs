use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};
use certforge_core::models::dataset::DataSet;

use crate::error::TabularError;

/// Read the first worksheet of a workbook. The first row is the header.
///
/// Blank header cells are named `Unnamed: <index>`; rows whose cells are all
/// empty are skipped wherever they occur.
pub fn read_workbook(path: &Path) -> Result<DataSet, TabularError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| TabularError::data_format(path, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TabularError::data_format(path, "workbook has no worksheets"))?
        .map_err(|e| TabularError::data_format(path, e))?;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let name = cell_text(cell);
                if name.is_empty() {
                    format!("Unnamed: {i}")
                } else {
                    name
                }
            })
            .collect(),
        None => Vec::new(),
    };

    let records = rows
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    crate::build_dataset(path, columns, records)
}

/// Coerce one cell to the text used for substitution.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_text(*f),
        Data::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// Integral floats lose their fractional part; spreadsheets store every
/// number as a float, so `7` would otherwise surface as `7.0`. Very large and
/// very small magnitudes use exponent form, e.g. `1e+20` and `1e-05`.
fn float_text(f: f64) -> String {
    if !f.is_finite() {
        return f.to_string();
    }
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return exponent_text(f);
    }
    if f.fract() == 0.0 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// `1.5e20` as `1.5e+20`: signed exponent, at least two digits.
fn exponent_text(f: f64) -> String {
    let plain = format!("{f:e}");
    let Some((mantissa, exponent)) = plain.split_once('e') else {
        return plain;
    };
    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        Err(_) => plain,
    }
}
