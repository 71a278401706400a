//! Output file naming conventions.
//!
//! Pure string functions. Every certificate is named
//! `<sanitized name>_<sanitized reg-id>` with `.pdf` appended in the archive.

use std::collections::HashSet;

/// Replace every non-alphanumeric character with `_`.
///
/// Length (in characters) and case are preserved.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Base name (no extension) for one recipient. Values are trimmed first.
pub fn base_name(name: &str, reg_id: &str) -> String {
    format!("{}_{}", sanitize(name.trim()), sanitize(reg_id.trim()))
}

pub fn pdf_file_name(base_name: &str) -> String {
    format!("{base_name}.pdf")
}

pub fn archive_file_name(batch_id: uuid::Uuid) -> String {
    format!("certificates-{batch_id}.zip")
}

/// Tracks base names already used in one run.
///
/// A repeated base name gets `_2`, `_3`, … appended so archive members never
/// overwrite each other. Names are compared case-insensitively, as they would
/// be on a case-insensitive filesystem.
#[derive(Debug, Default)]
pub struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// The name `base` would receive, without reserving it.
    pub fn resolve(&self, base: &str) -> String {
        if !self.is_taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.is_taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn reserve(&mut self, name: impl AsRef<str>) {
        self.taken.insert(name.as_ref().to_lowercase());
    }

    fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(&name.to_lowercase())
    }
}
