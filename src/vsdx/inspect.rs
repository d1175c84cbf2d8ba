//! Reads a written package back into a summary

use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;

use crate::parse_xml::{parse_xml_reader, XmlNode};
use crate::vsdx::schema::{path, OBJ_TYPE_CONNECTOR};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentTypeOverride {
    pub part_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectSummary {
    pub connector: u32,
    /// `BeginX` or `EndX`
    pub from_cell: String,
    pub shape: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentSummary {
    /// Entry names in archive order
    pub parts: Vec<String>,
    pub overrides: Vec<ContentTypeOverride>,
    pub shape_ids: Vec<u32>,
    pub connector_ids: Vec<u32>,
    pub connects: Vec<ConnectSummary>,
    pub created: Option<String>,
}

fn read_part<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, name: &str) -> anyhow::Result<XmlNode> {
    let entry = archive
        .by_name(name)
        .map_err(|e| anyhow::anyhow!("missing part {}: {}", name, e))?;
    parse_xml_reader(BufReader::new(entry))
}

fn parse_id(node: &XmlNode, attr: &str) -> anyhow::Result<u32> {
    let raw = node
        .get(attr)
        .ok_or_else(|| anyhow::anyhow!("<{}> has no {} attribute", node.name, attr))?;
    raw.parse()
        .map_err(|e| anyhow::anyhow!("bad {} '{}' on <{}>: {}", attr, raw, node.name, e))
}

fn is_connector(shape: &XmlNode) -> bool {
    shape
        .find_all("Cell")
        .any(|c| c.get("N") == Some("ObjType") && c.get("V") == Some(OBJ_TYPE_CONNECTOR))
}

/// Opens a `.vsdx` archive and lists its parts, identifiers and glue
pub fn inspect_document(archive_path: impl AsRef<Path>) -> anyhow::Result<DocumentSummary> {
    let archive_path = archive_path.as_ref();
    let file = File::open(archive_path)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", archive_path.display(), e))?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let mut summary = DocumentSummary::default();
    for i in 0..archive.len() {
        summary.parts.push(archive.by_index(i)?.name().to_string());
    }

    let types = read_part(&mut archive, path::CONTENT_TYPES)?;
    summary.overrides = types
        .find_all("Override")
        .map(|o| ContentTypeOverride {
            part_name: o.get("PartName").unwrap_or_default().to_string(),
            content_type: o.get("ContentType").unwrap_or_default().to_string(),
        })
        .collect();

    let core = read_part(&mut archive, path::CORE)?;
    summary.created = core.find("dcterms:created").map(|n| n.text_content.clone());

    let page = read_part(&mut archive, path::PAGE1)?;
    if let Some(shapes) = page.find("Shapes") {
        for shape in shapes.find_all("Shape") {
            let id = parse_id(shape, "ID")?;
            if is_connector(shape) {
                summary.connector_ids.push(id);
            } else {
                summary.shape_ids.push(id);
            }
        }
    }
    if let Some(connects) = page.find("Connects") {
        for connect in connects.find_all("Connect") {
            summary.connects.push(ConnectSummary {
                connector: parse_id(connect, "FromSheet")?,
                from_cell: connect.get("FromCell").unwrap_or_default().to_string(),
                shape: parse_id(connect, "ToSheet")?,
            });
        }
    }

    log::debug!(
        "Inspected {}: {} parts, {} shapes, {} connectors",
        archive_path.display(),
        summary.parts.len(),
        summary.shape_ids.len(),
        summary.connector_ids.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConverterConfig;
    use crate::diagram::Diagram;
    use crate::vsdx::package::VsdxWriter;

    #[test]
    fn test_inspect_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("empty.vsdx");
        let config = ConverterConfig::default();
        VsdxWriter::new(&config).write(&Diagram::default(), &output).unwrap();

        let summary = inspect_document(&output).unwrap();
        assert_eq!(summary.parts.len(), 10);
        assert!(summary.shape_ids.is_empty());
        assert!(summary.connector_ids.is_empty());
        assert!(summary.created.is_some());
        assert!(summary
            .overrides
            .iter()
            .any(|o| o.part_name == "/visio/pages/page1.xml"
                && o.content_type == "application/vnd.ms-visio.page+xml"));
    }

    #[test]
    fn test_inspect_rejects_non_archive() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.vsdx");
        std::fs::write(&bogus, b"not a zip").unwrap();
        assert!(inspect_document(&bogus).is_err());
    }
}
