//! Document parts and the fixed skeleton around the page
//!
//! Every part is rendered to bytes up front; the package writer only decides
//! where the bytes go.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;

use crate::config::{DocumentConfig, PageConfig};
use crate::error::{ConvertError, Result, SerializationError};
use crate::parse_xml::XmlNode;
use crate::serialize_xml::xml_node_to_bytes;
use crate::vsdx::geometry::format_number;
use crate::vsdx::schema::{self, content_type, path};

/// One named entry of the output archive
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPart {
    /// Archive path, without a leading slash
    pub path: String,
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

impl DocumentPart {
    pub fn from_xml(path: impl Into<String>, content_type: &'static str, root: &XmlNode) -> Result<Self> {
        let path = path.into();
        let content = xml_node_to_bytes(root).map_err(|source| {
            ConvertError::Serialization(SerializationError::Xml {
                part: path.clone(),
                source,
            })
        })?;
        Ok(Self {
            path,
            content,
            content_type,
        })
    }

    pub fn extension(&self) -> &str {
        let file_name = self.path.rsplit('/').next().unwrap_or(self.path.as_str());
        match file_name.rfind('.') {
            Some(dot) => &file_name[dot + 1..],
            None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    /// Target path relative to the source part's folder
    pub target: String,
}

/// Relationships of one source part; IDs are `rId1`, `rId2`, ... in insertion order
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a relationship and returns its ID
    pub fn add(&mut self, rel_type: &'static str, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type,
            target: target.into(),
        });
        id
    }

    /// Renders the relationships part belonging to `source_part`
    /// (an empty source means the package root)
    pub fn to_part(&self, source_part: &str) -> Result<DocumentPart> {
        let mut root = XmlNode::new("Relationships").attr("xmlns", schema::NS_PACKAGE_RELATIONSHIPS);
        for rel in &self.entries {
            root.push(
                XmlNode::new("Relationship")
                    .attr("Id", rel.id.as_str())
                    .attr("Type", rel.rel_type)
                    .attr("Target", rel.target.as_str()),
            );
        }
        DocumentPart::from_xml(rels_path_for(source_part), content_type::RELATIONSHIPS, &root)
    }
}

/// `visio/document.xml` -> `visio/_rels/document.xml.rels`; `""` -> `_rels/.rels`
pub fn rels_path_for(part: &str) -> String {
    match part.rfind('/') {
        Some(slash) => format!("{}/_rels/{}.rels", &part[..slash], &part[slash + 1..]),
        None => format!("_rels/{}.rels", part),
    }
}

fn default_content_type(extension: &str) -> &'static str {
    match extension {
        "rels" => content_type::RELATIONSHIPS,
        _ => content_type::XML,
    }
}

/// Builds `[Content_Types].xml` from the parts that will be packed
pub fn content_types_part(parts: &[DocumentPart]) -> Result<DocumentPart> {
    let mut defaults: IndexMap<&str, &'static str> = IndexMap::new();
    defaults.insert("rels", content_type::RELATIONSHIPS);
    defaults.insert("xml", content_type::XML);
    for part in parts {
        let extension = part.extension();
        if !extension.is_empty() && !defaults.contains_key(extension) {
            defaults.insert(extension, default_content_type(extension));
        }
    }

    let mut root = XmlNode::new("Types").attr("xmlns", schema::NS_CONTENT_TYPES);
    for (extension, media_type) in &defaults {
        root.push(
            XmlNode::new("Default")
                .attr("Extension", *extension)
                .attr("ContentType", *media_type),
        );
    }
    for part in parts {
        if defaults.get(part.extension()) != Some(&part.content_type) {
            root.push(
                XmlNode::new("Override")
                    .attr("PartName", format!("/{}", part.path))
                    .attr("ContentType", part.content_type),
            );
        }
    }
    DocumentPart::from_xml(path::CONTENT_TYPES, content_type::XML, &root)
}

/// Extended properties (`docProps/app.xml`)
pub fn app_part(document: &DocumentConfig) -> Result<DocumentPart> {
    let root = XmlNode::new("Properties")
        .attr("xmlns", schema::NS_EXTENDED_PROPERTIES)
        .child(XmlNode::new("Application").text(document.application.as_str()))
        .child(XmlNode::new("Template").text(document.template.as_str()));
    DocumentPart::from_xml(path::APP, content_type::EXTENDED_PROPERTIES, &root)
}

/// Core properties (`docProps/core.xml`)
pub fn core_part(document: &DocumentConfig, created: DateTime<Utc>) -> Result<DocumentPart> {
    let root = XmlNode::new("cp:coreProperties")
        .attr("xmlns:cp", schema::NS_CORE_PROPERTIES)
        .attr("xmlns:dc", schema::NS_DC)
        .attr("xmlns:dcterms", schema::NS_DCTERMS)
        .attr("xmlns:xsi", schema::NS_XSI)
        .child(XmlNode::new("dc:creator").text(document.creator.as_str()))
        .child(
            XmlNode::new("dcterms:created")
                .attr("xsi:type", "dcterms:W3CDTF")
                .text(created.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
    DocumentPart::from_xml(path::CORE, content_type::CORE_PROPERTIES, &root)
}

fn page_entry(page: &PageConfig) -> XmlNode {
    XmlNode::new("Page")
        .attr("ID", "0")
        .attr("NameU", page.name.as_str())
        .attr("Name", page.name.as_str())
}

/// Main document part (`visio/document.xml`)
pub fn document_part(document: &DocumentConfig, page: &PageConfig) -> Result<DocumentPart> {
    let root = XmlNode::new("VisioDocument")
        .attr("xmlns", schema::NS_VISIO)
        .attr("xmlns:r", schema::NS_RELATIONSHIPS)
        .child(
            XmlNode::new("DocumentProperties")
                .child(XmlNode::new("Creator").text(document.creator.as_str())),
        )
        .child(XmlNode::new("Pages").child(page_entry(page)));
    DocumentPart::from_xml(path::DOCUMENT, content_type::DOCUMENT, &root)
}

/// Pages collection (`visio/pages/pages.xml`); `page_rel_id` points at the page part
pub fn pages_part(page: &PageConfig, page_rel_id: &str) -> Result<DocumentPart> {
    let cell = |name: &str, value: f64| {
        XmlNode::new("Cell")
            .attr("N", name)
            .attr("V", format_number(value))
            .attr("U", "IN")
    };
    let entry = page_entry(page)
        .child(
            XmlNode::new("PageSheet")
                .child(cell("PageWidth", page.width))
                .child(cell("PageHeight", page.height)),
        )
        .child(XmlNode::new("Rel").attr("r:id", page_rel_id));
    let root = XmlNode::new("Pages")
        .attr("xmlns", schema::NS_VISIO)
        .attr("xmlns:r", schema::NS_RELATIONSHIPS)
        .child(entry);
    DocumentPart::from_xml(path::PAGES, content_type::PAGES, &root)
}

/// Empty stencil collection (`visio/masters/masters.xml`)
pub fn masters_part() -> Result<DocumentPart> {
    let root = XmlNode::new("Masters").attr("xmlns", schema::NS_VISIO);
    DocumentPart::from_xml(path::MASTERS, content_type::MASTERS, &root)
}

/// Target of `to` as seen from the folder of `from`; both are archive paths
pub fn relative_target(from: &str, to: &str) -> String {
    let folder = match from.rfind('/') {
        Some(slash) => &from[..=slash],
        None => "",
    };
    to.strip_prefix(folder).unwrap_or(to).to_string()
}
