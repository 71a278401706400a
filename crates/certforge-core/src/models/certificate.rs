use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One successfully rendered and converted certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCertificate {
    /// 1-based position of the source row in the dataset.
    pub row: usize,
    pub base_name: String,
    /// Member name inside the archive (`<base_name>.pdf`).
    pub file_name: String,
}

/// A row that could not be turned into a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    pub row: usize,
    pub reason: String,
}

/// The zip produced by one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateArchive {
    pub batch_id: Uuid,
    pub path: PathBuf,
    pub certificates: Vec<GeneratedCertificate>,
    pub failures: Vec<RowFailure>,
    pub generated_at: jiff::Timestamp,
}
