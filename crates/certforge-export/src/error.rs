use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported template format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid template {path}: {reason}")]
    InvalidTemplate { path: String, reason: String },

    #[error("template rendering failed: {0}")]
    Render(String),

    #[error("PDF conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub(crate) fn invalid_template(path: &std::path::Path, reason: impl ToString) -> Self {
        ExportError::InvalidTemplate {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("conversion tool `{binary}` is not installed or not on PATH")]
    ToolNotInstalled { binary: String },

    #[error("conversion tool exited with {status}: {output}")]
    Failed { status: String, output: String },

    #[error("conversion tool reported success but {0} was not created")]
    MissingOutput(PathBuf),

    #[error("conversion tool timed out after {0:?}")]
    Timeout(Duration),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
