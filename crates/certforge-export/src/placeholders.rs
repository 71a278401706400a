//! `{{variable}}` discovery.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::error::ExportError;
use crate::render;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// One `{{ ... }}` occurrence in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Byte offset of the opening `{{`.
    pub start: usize,
    /// Byte offset just past the closing `}}`.
    pub end: usize,
    /// Text between the markers, trimmed.
    pub name: String,
}

/// Scan left to right for non-overlapping placeholders.
///
/// An opening marker without a closing marker ends the scan.
pub fn find_placeholders(text: &str) -> Vec<Placeholder> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(open) = text[cursor..].find(OPEN) {
        let start = cursor + open;
        let inner = start + OPEN.len();
        let Some(close) = text[inner..].find(CLOSE) else {
            break;
        };
        let end = inner + close + CLOSE.len();
        found.push(Placeholder {
            start,
            end,
            name: text[inner..inner + close].trim().to_string(),
        });
        cursor = end;
    }

    found
}

/// Distinct placeholder names in `text`.
pub fn placeholder_names(text: &str) -> BTreeSet<String> {
    find_placeholders(text).into_iter().map(|p| p.name).collect()
}

/// Distinct variable names referenced by a template file.
pub fn extract_variables(path: &Path) -> Result<BTreeSet<String>, ExportError> {
    let template = render::classify(path)?;
    let text = render::template_text(&template)?;
    let names = placeholder_names(&text);
    info!(path = %path.display(), count = names.len(), "extracted template variables");
    Ok(names)
}
