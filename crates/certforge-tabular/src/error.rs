use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("unsupported data file format: {0}")]
    UnsupportedFormat(String),

    #[error("could not read data file {path}: {reason}")]
    DataFormat { path: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TabularError {
    pub(crate) fn data_format(path: &std::path::Path, reason: impl ToString) -> Self {
        TabularError::DataFormat {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
