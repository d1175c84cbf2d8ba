/// XML serialization module - writes XmlNode trees as standalone XML documents
///
/// Output is deterministic: attributes are written in insertion order and
/// indentation is fixed, so identical trees always produce identical bytes.

use crate::parse_xml::XmlNode;
use rayon::prelude::*;
use std::io::{self, Write};

const XML_DECLARATION: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

/// Serializes a node tree, with declaration, into a byte buffer
pub fn xml_node_to_bytes(node: &XmlNode) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(4096);
    write_xml_document(node, &mut buffer)?;
    Ok(buffer)
}

/// Writes the XML declaration followed by the pretty-printed tree
pub fn write_xml_document<W: Write>(node: &XmlNode, writer: &mut W) -> io::Result<()> {
    writer.write_all(XML_DECLARATION)?;
    write_node_pretty(node, writer, 0)
}

/// Internal recursive function to serialize a node with formatting
/// Uses parallel processing for nodes with many children (e.g. large Shapes lists)
fn write_node_pretty<W: Write>(node: &XmlNode, writer: &mut W, indent_level: usize) -> io::Result<()> {
    write_indent(writer, indent_level)?;
    writer.write_all(b"<")?;
    writer.write_all(node.name.as_bytes())?;

    for (key, value) in &node.attributes {
        writer.write_all(b" ")?;
        writer.write_all(key.as_bytes())?;
        writer.write_all(b"=\"")?;
        write_escaped_attr(writer, value)?;
        writer.write_all(b"\"")?;
    }

    let text = node.text_content.as_str();
    let has_text = !text.is_empty();
    if node.children.is_empty() && !has_text {
        writer.write_all(b"/>\n")?;
        return Ok(());
    }

    if node.children.is_empty() {
        // Inline text keeps values like timestamps free of surrounding whitespace
        writer.write_all(b">")?;
        write_escaped_text(writer, text)?;
        writer.write_all(b"</")?;
        writer.write_all(node.name.as_bytes())?;
        writer.write_all(b">\n")?;
        return Ok(());
    }

    writer.write_all(b">\n")?;

    if has_text {
        write_indent(writer, indent_level + 1)?;
        write_escaped_text(writer, text)?;
        writer.write_all(b"\n")?;
    }

    // Serialize wide nodes in parallel to memory buffers, then write sequentially
    // in the original order.
    if node.children.len() > 64 {
        let child_buffers: Result<Vec<Vec<u8>>, io::Error> = node.children.par_iter()
            .map(|child| {
                let mut buf = Vec::with_capacity(1024);
                write_node_pretty(child, &mut buf, indent_level + 1)?;
                Ok(buf)
            })
            .collect();

        for buf in child_buffers? {
            writer.write_all(&buf)?;
        }
    } else {
        for child in &node.children {
            write_node_pretty(child, writer, indent_level + 1)?;
        }
    }

    write_indent(writer, indent_level)?;
    writer.write_all(b"</")?;
    writer.write_all(node.name.as_bytes())?;
    writer.write_all(b">\n")?;
    Ok(())
}

fn write_indent<W: Write>(writer: &mut W, indent_level: usize) -> io::Result<()> {
    for _ in 0..indent_level {
        writer.write_all(b"  ")?;
    }
    Ok(())
}

/// Escapes special XML characters in attribute values
fn write_escaped_attr<W: Write>(writer: &mut W, input: &str) -> io::Result<()> {
    write_escaped(writer, input, |ch| match ch {
        '&' => Some(b"&amp;" as &[u8]),
        '<' => Some(b"&lt;" as &[u8]),
        '>' => Some(b"&gt;" as &[u8]),
        '"' => Some(b"&quot;" as &[u8]),
        '\'' => Some(b"&apos;" as &[u8]),
        _ => None,
    })
}

fn write_escaped_text<W: Write>(writer: &mut W, input: &str) -> io::Result<()> {
    write_escaped(writer, input, |ch| match ch {
        '&' => Some(b"&amp;" as &[u8]),
        '<' => Some(b"&lt;" as &[u8]),
        '>' => Some(b"&gt;" as &[u8]),
        _ => None,
    })
}

fn write_escaped<W: Write>(
    writer: &mut W,
    input: &str,
    entity_for: impl Fn(char) -> Option<&'static [u8]>,
) -> io::Result<()> {
    let mut last = 0;
    for (idx, ch) in input.char_indices() {
        if let Some(bytes) = entity_for(ch) {
            if last < idx {
                writer.write_all(input[last..idx].as_bytes())?;
            }
            writer.write_all(bytes)?;
            last = idx + ch.len_utf8();
        }
    }

    if last < input.len() {
        writer.write_all(input[last..].as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_xml::parse_xml_str;

    fn create_test_node() -> XmlNode {
        XmlNode::new("root")
            .attr("id", "123")
            .child(XmlNode::new("child").attr("name", "test").text("Hello World"))
    }

    fn to_string(node: &XmlNode) -> String {
        String::from_utf8(xml_node_to_bytes(node).unwrap()).unwrap()
    }

    #[test]
    fn test_serialize_simple_node() {
        let xml = to_string(&create_test_node());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n"));
        assert!(xml.contains("<root id=\"123\">"));
        assert!(xml.contains("  <child name=\"test\">Hello World</child>\n"));
        assert!(xml.ends_with("</root>\n"));
    }

    #[test]
    fn test_escape_xml_chars() {
        let node = XmlNode::new("test")
            .attr("attr", "value&quote\"lt<gt>")
            .text("text<with>special&chars");

        let xml = to_string(&node);
        assert!(xml.contains("&amp;"));
        assert!(xml.contains("&quot;"));
        assert!(xml.contains("&lt;"));
        assert!(xml.contains("&gt;"));
    }

    #[test]
    fn test_empty_element() {
        let xml = to_string(&XmlNode::new("empty"));
        assert!(xml.contains("<empty/>"));
    }

    #[test]
    fn test_wide_node_keeps_child_order() {
        let mut shapes = XmlNode::new("Shapes");
        for i in 0..200 {
            shapes.push(XmlNode::new("Shape").attr("ID", i.to_string()));
        }

        let parsed = parse_xml_str(&to_string(&shapes)).unwrap();
        let ids: Vec<usize> = parsed
            .find_all("Shape")
            .map(|s| s.get("ID").unwrap().parse().unwrap())
            .collect();
        assert_eq!(ids, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn test_roundtrip_preserves_tree() {
        let node = create_test_node();
        let parsed = parse_xml_str(&to_string(&node)).unwrap();
        assert_eq!(parsed, node);
    }
}
