use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("variable mapping is missing required key: {0}")]
    MissingMappingKey(String),

    #[error("column not found in row: {0}")]
    MissingColumn(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("invalid mapping entry (expected `variable=column`): {0}")]
    InvalidMappingEntry(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
