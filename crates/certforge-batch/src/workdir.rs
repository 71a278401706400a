//! Per-run scratch directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::BatchError;

/// A fresh temporary directory holding every intermediate file of one run.
///
/// Removed on drop, whichever way the run ends. Removal is best-effort:
/// failures are logged and never reported to the caller.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    removed: bool,
}

impl WorkDir {
    pub fn create() -> Result<Self, BatchError> {
        let dir = tempfile::Builder::new().prefix("certforge-").tempdir()?;
        let path = dir.keep();
        debug!(path = %path.display(), "created working directory");
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Remove every entry, then the directory itself.
    pub fn cleanup(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;

        match std::fs::read_dir(&self.path) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    let result = if path.is_dir() {
                        std::fs::remove_dir_all(&path)
                    } else {
                        std::fs::remove_file(&path)
                    };
                    if let Err(e) = result {
                        warn!(path = %path.display(), error = %e, "failed to remove temporary file");
                    }
                }
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to list working directory");
            }
        }

        if let Err(e) = std::fs::remove_dir(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove working directory");
        } else {
            debug!(path = %self.path.display(), "removed working directory");
        }
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        self.remove();
    }
}
