use std::path::{Path, PathBuf};

use certforge_core::models::certificate::{CertificateArchive, GeneratedCertificate, RowFailure};
use certforge_core::models::context::RenderContext;
use certforge_core::models::dataset::Row;
use certforge_core::models::format::Template;
use certforge_core::models::mapping::{NAME_KEY, REG_ID_KEY, VariableMapping};
use certforge_core::naming::{self, UniqueNames};
use certforge_export::pdf::PdfConverter;
use certforge_export::render;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::archive::write_archive;
use crate::error::{BatchError, RowError};
use crate::workdir::WorkDir;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Where the archive is written. Defaults to the template's directory.
    pub output_dir: Option<PathBuf>,
}

/// Turns a template and a data file into a zip of per-row PDFs.
pub struct Generator {
    converter: Box<dyn PdfConverter>,
    options: GenerateOptions,
}

impl Generator {
    pub fn new(converter: Box<dyn PdfConverter>, options: GenerateOptions) -> Self {
        Self { converter, options }
    }

    /// Run one batch.
    ///
    /// Input problems (format, mapping, data shape) fail the whole run before
    /// anything is rendered. After that, each row either yields a PDF or a
    /// [`RowFailure`]; the run only fails if no row succeeded or the archive
    /// cannot be written.
    pub fn generate(
        &self,
        template_path: &Path,
        data_path: &Path,
        mapping: &VariableMapping,
    ) -> Result<CertificateArchive, BatchError> {
        let batch_id = Uuid::new_v4();
        let span = info_span!("generate", batch_id = %batch_id);
        let _enter = span.enter();

        let template = Template::from_path(template_path)?;
        mapping.validate()?;

        let data = certforge_tabular::read(data_path)?;
        for (variable, column) in mapping.iter() {
            if !data.has_column(column) {
                return Err(BatchError::UnknownColumn {
                    variable: variable.to_string(),
                    column: column.to_string(),
                });
            }
        }

        info!(
            template = %template.path().display(),
            data = %data_path.display(),
            rows = data.len(),
            "starting certificate generation"
        );

        let workdir = WorkDir::create()?;
        let mut names = UniqueNames::new();
        let mut certificates = Vec::new();
        let mut failures = Vec::new();
        let mut pdfs = Vec::new();

        for (index, row) in data.rows().iter().enumerate() {
            let row_number = index + 1;
            match self.generate_row(&template, mapping, row, &workdir, &names) {
                Ok((base_name, pdf)) => {
                    info!(row = row_number, base_name = %base_name, "generated certificate");
                    names.reserve(&base_name);
                    certificates.push(GeneratedCertificate {
                        row: row_number,
                        file_name: naming::pdf_file_name(&base_name),
                        base_name,
                    });
                    pdfs.push(pdf);
                }
                Err(e) => {
                    error!(row = row_number, error = %e, "failed to generate certificate");
                    failures.push(RowFailure {
                        row: row_number,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if certificates.is_empty() {
            warn!(attempted = data.len(), "no certificates generated");
            return Err(BatchError::NoCertificatesGenerated {
                attempted: data.len(),
            });
        }

        let output_dir = self.output_dir(template.path());
        std::fs::create_dir_all(&output_dir)?;
        let path = output_dir.join(naming::archive_file_name(batch_id));
        write_archive(&path, &pdfs)?;

        workdir.cleanup();

        info!(
            path = %path.display(),
            generated = certificates.len(),
            failed = failures.len(),
            "certificate generation finished"
        );

        Ok(CertificateArchive {
            batch_id,
            path,
            certificates,
            failures,
            generated_at: jiff::Timestamp::now(),
        })
    }

    /// Render and convert one row. Returns the base name used and the PDF path.
    fn generate_row(
        &self,
        template: &Template,
        mapping: &VariableMapping,
        row: &Row,
        workdir: &WorkDir,
        names: &UniqueNames,
    ) -> Result<(String, PathBuf), RowError> {
        let context = RenderContext::build(mapping, row)?;
        let base = naming::base_name(
            context.get(NAME_KEY).unwrap_or_default(),
            context.get(REG_ID_KEY).unwrap_or_default(),
        );
        let base = names.resolve(&base);

        let document = workdir.join(&format!("{base}.{}", template.extension()));
        render::render(template, &context, &document)?;

        let converted = self.converter.convert(&document, workdir.path())?;
        let pdf = workdir.join(&naming::pdf_file_name(&base));
        if converted != pdf {
            std::fs::rename(&converted, &pdf)?;
        }

        Ok((base, pdf))
    }

    fn output_dir(&self, template: &Path) -> PathBuf {
        match &self.options.output_dir {
            Some(dir) => dir.clone(),
            None => template
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
