use std::path::{Path, PathBuf};

use certforge_core::error::CoreError;
use certforge_core::models::context::RenderContext;
use certforge_core::models::format::{Template, TemplateFormat};
use tracing::{debug, warn};

use crate::docx;
use crate::error::ExportError;
use crate::package::Package;
use crate::pptx;

/// Classify a template path, mapping the core error into this crate's.
pub fn classify(path: &Path) -> Result<Template, ExportError> {
    Template::from_path(path).map_err(|e| match e {
        CoreError::UnsupportedFormat(ext) => ExportError::UnsupportedFormat(ext),
        other => ExportError::invalid_template(path, other),
    })
}

/// The text placeholders are discovered in.
pub fn template_text(template: &Template) -> Result<String, ExportError> {
    let mut package = Package::open(template.path())?;
    match template.format() {
        TemplateFormat::FlowDocument => docx::document_text(&mut package),
        TemplateFormat::SlideDeck => pptx::deck_text(&mut package),
    }
}

/// Render `template` for one row into `dest`, in the template's own format.
///
/// The template file is only read. Any failure is reported as a render error
/// carrying its cause.
pub fn render(
    template: &Template,
    context: &RenderContext,
    dest: &Path,
) -> Result<PathBuf, ExportError> {
    let result = match template.format() {
        TemplateFormat::FlowDocument => docx::render_docx(template.path(), context, dest),
        TemplateFormat::SlideDeck => pptx::render_pptx(template.path(), context, dest),
    };

    match result {
        Ok(()) => {
            debug!(dest = %dest.display(), "rendered template");
            Ok(dest.to_path_buf())
        }
        Err(e) => {
            // Never leave a half-written document behind for the converter.
            if let Err(cleanup) = std::fs::remove_file(dest) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %dest.display(), error = %cleanup, "failed to remove partial document");
                }
            }
            Err(match e {
                ExportError::Render(msg) => ExportError::Render(msg),
                other => ExportError::Render(other.to_string()),
            })
        }
    }
}
