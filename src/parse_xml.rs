//! XML element tree and reader
//!
//! `XmlNode` is the in-memory form of every XML part this crate writes, and
//! the reader turns archive entries back into the same tree for inspection.

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

/// Represents a parsed or constructed XML element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    /// The name/tag of this element, including any namespace prefix
    pub name: String,
    /// Attribute names to values, in document order
    pub attributes: IndexMap<String, String>,
    /// Text content of this node
    pub text_content: String,
    /// Child nodes
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text_content = text.into();
        self
    }

    pub fn child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|n| n.name == name)
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |n| n.name == name)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

pub fn parse_xml_str(source: &str) -> anyhow::Result<XmlNode> {
    parse_xml_reader(source.as_bytes())
}

/// Parses XML from any buffered reader (a ZIP entry, a byte slice)
pub fn parse_xml_reader<R: BufRead>(source: R) -> anyhow::Result<XmlNode> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);

    let mut buf = Vec::new();

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf)?;
        let maybe_root = match event {
            Event::Start(start) => Some((start.into_owned(), false)),
            Event::Empty(start) => Some((start.into_owned(), true)),
            Event::Eof => {
                anyhow::bail!("XML document is empty");
            }
            _ => None,
        };

        if let Some((start, self_closing)) = maybe_root {
            let mut node_buf = Vec::new();
            return parse_node(&mut reader, &mut node_buf, start, self_closing);
        }
    }
}

fn parse_node<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
    start: BytesStart<'static>,
    self_closing: bool,
) -> anyhow::Result<XmlNode> {
    let element_name_bytes = start.name().as_ref().to_vec();
    let element_name = String::from_utf8_lossy(&element_name_bytes).to_string();
    let attributes = collect_attributes(&start)?;

    let mut node = XmlNode {
        name: element_name,
        attributes,
        text_content: String::new(),
        children: Vec::new(),
    };

    if self_closing {
        return Ok(node);
    }

    loop {
        buf.clear();
        let event = reader.read_event_into(buf)?;
        match event {
            Event::Start(child_start) => {
                let mut child_buf = Vec::new();
                let child = parse_node(reader, &mut child_buf, child_start.into_owned(), false)?;
                node.children.push(child);
            }
            Event::Empty(child_start) => {
                let mut child_buf = Vec::new();
                let child = parse_node(reader, &mut child_buf, child_start.into_owned(), true)?;
                node.children.push(child);
            }
            Event::Text(text) => {
                let value = text.unescape()?;
                if !value.trim().is_empty() {
                    node.text_content.push_str(&value);
                }
            }
            Event::CData(text) => {
                let value = String::from_utf8_lossy(text.as_ref()).to_string();
                if !value.trim().is_empty() {
                    node.text_content.push_str(&value);
                }
            }
            Event::End(end) => {
                anyhow::ensure!(
                    end.name().as_ref() == element_name_bytes.as_slice(),
                    "unexpected closing tag '</{}>' while parsing '<{}>'",
                    String::from_utf8_lossy(end.name().as_ref()),
                    node.name
                );
                return Ok(node);
            }
            Event::Eof => {
                anyhow::bail!("unexpected end of file while parsing element '{}'", node.name);
            }
            _ => {}
        }
    }
}

fn collect_attributes(start: &BytesStart<'_>) -> anyhow::Result<IndexMap<String, String>> {
    let mut map = IndexMap::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.into_owned();
        map.insert(key, value);
    }
    Ok(map)
}
