use thiserror::Error;

use certforge_core::error::CoreError;
use certforge_export::error::{ConversionError, ExportError};
use certforge_tabular::error::TabularError;

/// Terminal failures of a generation run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("variable mapping is missing required key: {0}")]
    MissingMappingKey(String),

    #[error("mapped column `{column}` (for variable `{variable}`) is not in the data file")]
    UnknownColumn { variable: String, column: String },

    #[error("{0}")]
    DataFormat(String),

    #[error("no certificates were generated ({attempted} rows attempted)")]
    NoCertificatesGenerated { attempted: usize },

    #[error("failed to write archive: {0}")]
    Archive(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for BatchError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnsupportedFormat(ext) => BatchError::UnsupportedFormat(ext),
            CoreError::MissingMappingKey(key) => BatchError::MissingMappingKey(key),
            other => BatchError::DataFormat(other.to_string()),
        }
    }
}

impl From<TabularError> for BatchError {
    fn from(e: TabularError) -> Self {
        match e {
            TabularError::UnsupportedFormat(ext) => BatchError::UnsupportedFormat(ext),
            TabularError::Io(io) => BatchError::Io(io),
            other => BatchError::DataFormat(other.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for BatchError {
    fn from(e: zip::result::ZipError) -> Self {
        BatchError::Archive(e.to_string())
    }
}

/// Why a single row was skipped. Never escapes the row loop.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("{0}")]
    Context(#[from] CoreError),

    #[error("{0}")]
    Export(#[from] ExportError),

    #[error("PDF conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
