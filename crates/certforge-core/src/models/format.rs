use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The two template families a certificate can be authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateFormat {
    /// Word-processing document (`.docx`).
    FlowDocument,
    /// Presentation (`.ppt`, `.pptx`).
    SlideDeck,
}

impl TemplateFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "docx" => Some(Self::FlowDocument),
            "ppt" | "pptx" => Some(Self::SlideDeck),
            _ => None,
        }
    }
}

/// A template file on disk, classified once by extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    path: PathBuf,
    format: TemplateFormat,
    extension: String,
}

impl Template {
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let extension = lowercase_extension(&path);
        let format = TemplateFormat::from_extension(&extension)
            .ok_or_else(|| CoreError::UnsupportedFormat(display_extension(&extension)))?;
        Ok(Self {
            path,
            format,
            extension,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> TemplateFormat {
        self.format
    }

    /// Lowercased native extension without the dot, e.g. `pptx`.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

/// Tabular data file families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    Csv,
    /// Any workbook the spreadsheet reader understands (`.xlsx` and friends).
    Spreadsheet,
}

impl DataFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let extension = lowercase_extension(path);
        Self::from_extension(&extension)
            .ok_or_else(|| CoreError::UnsupportedFormat(display_extension(&extension)))
    }
}

fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

fn display_extension(ext: &str) -> String {
    if ext.is_empty() {
        "(no extension)".to_string()
    } else {
        format!(".{ext}")
    }
}
