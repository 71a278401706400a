use std::path::{Path, PathBuf};

use certforge_batch::{GenerateOptions, Generator};
use certforge_core::models::certificate::CertificateArchive;
use certforge_core::models::mapping::VariableMapping;
use serde::Serialize;

use crate::config::CertforgeConfig;

#[derive(Debug, Serialize)]
pub struct VariablesReport {
    pub variables: Vec<String>,
    pub template: String,
}

#[derive(Debug, Serialize)]
pub struct ColumnsReport {
    pub columns: Vec<String>,
    pub data: String,
}

/// Arguments of `certforge generate`, already parsed.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub template: PathBuf,
    pub data: PathBuf,
    /// `variable=column` pairs; these win over the mapping file.
    pub map: Vec<String>,
    pub mapping_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn variables(template: &Path) -> eyre::Result<VariablesReport> {
    let variables = certforge_export::placeholders::extract_variables(template)?;
    Ok(VariablesReport {
        variables: variables.into_iter().collect(),
        template: file_name(template),
    })
}

pub fn columns(data: &Path) -> eyre::Result<ColumnsReport> {
    Ok(ColumnsReport {
        columns: certforge_tabular::columns(data)?,
        data: file_name(data),
    })
}

/// Merge `--mapping-file` and `--map` into one mapping.
pub fn build_mapping(
    mapping_file: Option<&Path>,
    entries: &[String],
) -> eyre::Result<VariableMapping> {
    let mut mapping = match mapping_file {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| {
                eyre::eyre!("failed to read mapping file {}: {e}", path.display())
            })?;
            VariableMapping::from_json(&json)?
        }
        None => VariableMapping::new(),
    };
    for entry in entries {
        let (variable, column) = VariableMapping::parse_entry(entry)?;
        mapping.insert(variable, column);
    }
    Ok(mapping)
}

pub fn generate(
    config: &CertforgeConfig,
    request: &GenerateRequest,
) -> eyre::Result<CertificateArchive> {
    let mapping = build_mapping(request.mapping_file.as_deref(), &request.map)?;
    let options = GenerateOptions {
        output_dir: request
            .output_dir
            .clone()
            .or_else(|| config.output_dir.clone()),
    };
    let generator = Generator::new(Box::new(config.converter()), options);
    Ok(generator.generate(&request.template, &request.data, &mapping)?)
}
