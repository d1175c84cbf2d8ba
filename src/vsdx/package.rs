//! Archive packaging
//!
//! Parts are rendered in memory, zipped into a scratch directory created next
//! to the destination, then renamed into place. The scratch directory is
//! removed when it goes out of scope, so a failed write never leaves a partial
//! archive at the output path.

use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::{Compression, ConverterConfig};
use crate::diagram::Diagram;
use crate::error::{ConvertError, Result};
use crate::vsdx::page::page_part;
use crate::vsdx::parts::{
    app_part, content_types_part, core_part, document_part, masters_part, pages_part,
    relative_target, DocumentPart, Relationships,
};
use crate::vsdx::schema::{path, rel_type};

/// Per-call knobs that are not part of the converter configuration
#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    /// `dcterms:created` value; `None` uses the current time
    pub created: Option<DateTime<Utc>>,
}

pub struct VsdxWriter<'a> {
    config: &'a ConverterConfig,
    options: DocumentOptions,
}

impl<'a> VsdxWriter<'a> {
    pub fn new(config: &'a ConverterConfig) -> Self {
        Self {
            config,
            options: DocumentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DocumentOptions) -> Self {
        self.options = options;
        self
    }

    /// Renders every part of the package, in archive order
    pub fn build_parts(&self, diagram: &Diagram) -> Result<Vec<DocumentPart>> {
        let document = &self.config.document;
        let page = &self.config.page;
        let created = self.options.created.unwrap_or_else(Utc::now);

        let mut root_rels = Relationships::new();
        root_rels.add(rel_type::EXTENDED_PROPERTIES, relative_target("", path::APP));
        root_rels.add(rel_type::CORE_PROPERTIES, relative_target("", path::CORE));
        root_rels.add(rel_type::DOCUMENT, relative_target("", path::DOCUMENT));

        let mut document_rels = Relationships::new();
        document_rels.add(rel_type::PAGES, relative_target(path::DOCUMENT, path::PAGES));
        document_rels.add(rel_type::MASTERS, relative_target(path::DOCUMENT, path::MASTERS));

        let mut pages_rels = Relationships::new();
        let page_rel_id = pages_rels.add(rel_type::PAGE, relative_target(path::PAGES, path::PAGE1));

        let parts = vec![
            root_rels.to_part("")?,
            app_part(document)?,
            core_part(document, created)?,
            document_part(document, page)?,
            document_rels.to_part(path::DOCUMENT)?,
            pages_part(page, &page_rel_id)?,
            pages_rels.to_part(path::PAGES)?,
            page_part(diagram, page)?,
            masters_part()?,
        ];

        let mut all = Vec::with_capacity(parts.len() + 1);
        all.push(content_types_part(&parts)?);
        all.extend(parts);
        Ok(all)
    }

    /// Writes the package to `output_path`, replacing any existing file
    pub fn write(&self, diagram: &Diagram, output_path: &Path) -> Result<()> {
        let parts = self.build_parts(diagram)?;

        let parent = match output_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let scratch = tempfile::Builder::new()
            .prefix(".vsdx-")
            .tempdir_in(&parent)
            .map_err(|e| ConvertError::io(&parent, e))?;
        let staged = scratch.path().join("package.vsdx");

        self.write_archive(&parts, &staged)?;
        fs::rename(&staged, output_path).map_err(|e| ConvertError::io(output_path, e))?;

        if let Err(e) = scratch.close() {
            log::warn!("Failed to remove scratch directory: {}", e);
        }
        log::info!(
            "Wrote {} ({} parts, {} shapes, {} connectors)",
            output_path.display(),
            parts.len(),
            diagram.shapes.len(),
            diagram.connectors.len()
        );
        Ok(())
    }

    fn write_archive(&self, parts: &[DocumentPart], staged: &Path) -> Result<()> {
        let file = File::create(staged).map_err(|e| ConvertError::io(staged, e))?;
        let mut zip = ZipWriter::new(BufWriter::new(file));

        let method = match self.config.document.compression {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        };
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(zip::DateTime::default());

        for part in parts {
            zip.start_file(part.path.as_str(), options)?;
            zip.write_all(&part.content).map_err(|e| ConvertError::io(staged, e))?;
        }

        let writer = zip.finish()?;
        let file = writer
            .into_inner()
            .map_err(|e| ConvertError::io(staged, e.into_error()))?;
        file.sync_all().map_err(|e| ConvertError::io(staged, e))?;
        Ok(())
    }
}

/// Writes `diagram` to `output_path` with the default configuration
pub fn create_document(diagram: &Diagram, output_path: impl AsRef<Path>) -> Result<()> {
    let config = ConverterConfig::default();
    VsdxWriter::new(&config).write(diagram, output_path.as_ref())
}
