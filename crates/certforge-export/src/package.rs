//! OOXML package access (`.docx` / `.pptx` are zip containers of XML parts).

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::ExportError;

/// An opened template package. Read-only: rendering writes a new package.
pub struct Package {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl Package {
    pub fn open(path: &Path) -> Result<Self, ExportError> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| ExportError::invalid_template(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read a part as UTF-8. `Ok(None)` when the part does not exist.
    pub fn read_part(&mut self, name: &str) -> Result<Option<String>, ExportError> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(ExportError::invalid_template(&self.path, e)),
        };
        let mut contents = String::new();
        entry
            .read_to_string(&mut contents)
            .map_err(|e| ExportError::invalid_template(&self.path, format!("{name}: {e}")))?;
        Ok(Some(contents))
    }

    /// Read a part that must exist.
    pub fn require_part(&mut self, name: &str) -> Result<String, ExportError> {
        self.read_part(name)?
            .ok_or_else(|| ExportError::invalid_template(&self.path, format!("missing part {name}")))
    }

    /// Write a copy of this package to `dest`, replacing the given parts.
    ///
    /// Replaced parts keep their original compression method; every other
    /// entry is copied without recompression.
    pub fn write_with_parts(
        &mut self,
        dest: &Path,
        replacements: &BTreeMap<String, String>,
    ) -> Result<(), ExportError> {
        let out = File::create(dest)?;
        let mut writer = ZipWriter::new(out);

        for index in 0..self.archive.len() {
            let entry = self
                .archive
                .by_index(index)
                .map_err(|e| ExportError::Render(e.to_string()))?;

            match replacements.get(entry.name()) {
                Some(contents) => {
                    let name = entry.name().to_string();
                    let options =
                        SimpleFileOptions::default().compression_method(entry.compression());
                    drop(entry);
                    writer
                        .start_file(name, options)
                        .map_err(|e| ExportError::Render(e.to_string()))?;
                    writer.write_all(contents.as_bytes())?;
                }
                None => writer
                    .raw_copy_file(entry)
                    .map_err(|e| ExportError::Render(e.to_string()))?,
            }
        }

        writer
            .finish()
            .map_err(|e| ExportError::Render(e.to_string()))?;
        Ok(())
    }
}
