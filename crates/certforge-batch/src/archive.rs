//! Zip packaging of generated PDFs.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::BatchError;

/// Write `files` into a zip at `dest`, each under its bare file name.
///
/// The archive is assembled under a temporary sibling name and renamed into
/// place, so `dest` either holds a complete archive or does not exist.
pub fn write_archive(dest: &Path, files: &[PathBuf]) -> Result<(), BatchError> {
    let partial = dest.with_extension("zip.partial");
    if let Err(e) = write_zip(&partial, files) {
        if let Err(cleanup) = std::fs::remove_file(&partial) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!(path = %partial.display(), error = %cleanup, "failed to remove partial archive");
            }
        }
        return Err(e);
    }
    std::fs::rename(&partial, dest)?;

    info!(path = %dest.display(), files = files.len(), "wrote certificate archive");
    Ok(())
}

fn write_zip(path: &Path, files: &[PathBuf]) -> Result<(), BatchError> {
    let mut zip = ZipWriter::new(BufWriter::new(File::create(path)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| BatchError::Archive(format!("invalid file name: {}", file.display())))?;
        zip.start_file(name, options)?;
        let mut source = File::open(file)?;
        io::copy(&mut source, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}
