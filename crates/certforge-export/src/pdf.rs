//! PDF conversion through a headless office suite.
//!
//! There is no native DOCX/PPTX layout engine in this workspace, so both
//! template formats are handed to LibreOffice (or any binary accepting the
//! same `--convert-to pdf --outdir` interface).

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use crate::error::ConversionError;

pub const DEFAULT_OFFICE_BINARY: &str = "soffice";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Turns one rendered document into one PDF.
pub trait PdfConverter: Send + Sync {
    /// Convert `input` and return `<out_dir>/<input stem>.pdf`, which must
    /// exist when this returns `Ok`.
    fn convert(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, ConversionError>;
}

/// Where a converter is expected to put the PDF for `input`.
pub fn expected_pdf_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{stem}.pdf"))
}

/// Runs `<binary> --headless --convert-to pdf --outdir <dir> <input>`.
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    binary: PathBuf,
    timeout: Duration,
}

impl Default for OfficeConverter {
    fn default() -> Self {
        Self::new(DEFAULT_OFFICE_BINARY, DEFAULT_TIMEOUT)
    }
}

impl OfficeConverter {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl PdfConverter for OfficeConverter {
    fn convert(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, ConversionError> {
        let input = std::path::absolute(input)?;
        std::fs::create_dir_all(out_dir)?;
        let out_dir = std::path::absolute(out_dir)?;
        let expected = expected_pdf_path(&input, &out_dir);

        info!(
            input = %input.display(),
            output = %expected.display(),
            binary = %self.binary.display(),
            "converting document to PDF"
        );

        // Output goes to anonymous files rather than pipes: helpers the tool
        // forks may keep pipes open long after the tool itself exits.
        let mut stdout_log = tempfile::tempfile()?;
        let mut stderr_log = tempfile::tempfile()?;

        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(&out_dir)
            .arg(&input)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_log.try_clone()?))
            .stderr(Stdio::from(stderr_log.try_clone()?));
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConversionError::ToolNotInstalled {
                binary: self.binary.display().to_string(),
            },
            _ => ConversionError::Io(e),
        })?;
        let group = child.id();

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                warn!(timeout = ?self.timeout, "conversion tool timed out, killing it");
                kill_group(group);
                if let Err(e) = child.kill() {
                    debug!(error = %e, "conversion tool already gone");
                }
                child.wait()?;
                return Err(ConversionError::Timeout(self.timeout));
            }
        };

        // Anything the tool left running in its group would hold the
        // office profile lock for the next row.
        kill_group(group);

        let stdout = read_log(&mut stdout_log)?;
        let stderr = read_log(&mut stderr_log)?;
        debug!(%status, stdout = %stdout.trim(), stderr = %stderr.trim(), "conversion tool exited");

        if !status.success() {
            let output = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(ConversionError::Failed {
                status: status.to_string(),
                output: output.trim().to_string(),
            });
        }

        if !expected.exists() {
            return Err(ConversionError::MissingOutput(expected));
        }

        Ok(expected)
    }
}

fn read_log(file: &mut File) -> std::io::Result<String> {
    let mut buf = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// SIGKILL every process left in the tool's process group.
#[cfg(unix)]
fn kill_group(group: u32) {
    let Ok(pgid) = libc::pid_t::try_from(group) else {
        return;
    };
    // SAFETY: killpg only sends a signal; an empty group yields ESRCH.
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            warn!(group, error = %err, "failed to kill conversion process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_group(_group: u32) {}
