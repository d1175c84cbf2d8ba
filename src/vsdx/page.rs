//! Page contents: every shape and connector of a diagram as positioned,
//! sized `Shape` elements with geometry attached

use crate::config::PageConfig;
use crate::diagram::{Connector, Diagram, Shape};
use crate::error::Result;
use crate::parse_xml::XmlNode;
use crate::vsdx::geometry::{
    encode_connector, encode_shape, format_number, GeometryPath, PageTransform, PathRow,
};
use crate::vsdx::parts::DocumentPart;
use crate::vsdx::schema::{self, content_type, glue, path, OBJ_TYPE_CONNECTOR};

fn cell(name: &str, value: f64) -> XmlNode {
    XmlNode::new("Cell").attr("N", name).attr("V", format_number(value))
}

fn geometry_section(path: &GeometryPath) -> XmlNode {
    let mut section = XmlNode::new("Section")
        .attr("N", "Geometry")
        .attr("IX", "0")
        .child(XmlNode::new("Cell").attr("N", "NoFill").attr("V", "0"))
        .child(XmlNode::new("Cell").attr("N", "NoLine").attr("V", "0"));
    for (ix, row) in path.rows.iter().enumerate() {
        let mut node = XmlNode::new("Row")
            .attr("T", row.row_type())
            .attr("IX", (ix + 1).to_string());
        for (name, value) in row.cells() {
            node.push(cell(name, value));
        }
        section.push(node);
    }
    section
}

fn shape_node(shape: &Shape, transform: &PageTransform) -> XmlNode {
    let encoded = encode_shape(shape, transform);
    let placement = encoded.placement;
    let name = format!("{}_{}", shape.category, shape.id);
    XmlNode::new("Shape")
        .attr("ID", shape.id.to_string())
        .attr("Type", "Shape")
        .attr("NameU", name.as_str())
        .attr("Name", name)
        .child(cell("PinX", placement.pin_x))
        .child(cell("PinY", placement.pin_y))
        .child(cell("Width", placement.width))
        .child(cell("Height", placement.height))
        .child(cell("LocPinX", placement.width / 2.0))
        .child(cell("LocPinY", placement.height / 2.0))
        .child(geometry_section(&encoded.path))
}

fn connector_node(connector: &Connector, transform: &PageTransform) -> XmlNode {
    let encoded = encode_connector(connector, transform);
    let name = format!("Connector_{}", connector.id);
    let path = GeometryPath {
        rows: vec![
            PathRow::MoveTo { x: 0.0, y: 0.0 },
            PathRow::LineTo { x: encoded.length, y: 0.0 },
        ],
    };
    XmlNode::new("Shape")
        .attr("ID", connector.id.to_string())
        .attr("Type", "Shape")
        .attr("NameU", name.as_str())
        .attr("Name", name)
        .child(cell("PinX", encoded.pin.0))
        .child(cell("PinY", encoded.pin.1))
        .child(cell("Width", encoded.length))
        .child(cell("Height", 0.0))
        .child(cell("LocPinX", encoded.length / 2.0))
        .child(cell("LocPinY", 0.0))
        .child(cell("Angle", encoded.angle))
        .child(cell("BeginX", encoded.begin.0))
        .child(cell("BeginY", encoded.begin.1))
        .child(cell("EndX", encoded.end.0))
        .child(cell("EndY", encoded.end.1))
        .child(XmlNode::new("Cell").attr("N", "ObjType").attr("V", OBJ_TYPE_CONNECTOR))
        .child(geometry_section(&path))
}

fn connect_nodes(connector: &Connector) -> [XmlNode; 2] {
    let glue_to = |from_cell: &str, from_part: &str, to_sheet: String| {
        XmlNode::new("Connect")
            .attr("FromSheet", connector.id.to_string())
            .attr("FromCell", from_cell)
            .attr("FromPart", from_part)
            .attr("ToSheet", to_sheet)
            .attr("ToCell", "PinX")
            .attr("ToPart", glue::WHOLE_SHAPE)
    };
    [
        glue_to("BeginX", glue::BEGIN_POINT, connector.source.to_string()),
        glue_to("EndX", glue::END_POINT, connector.target.to_string()),
    ]
}

/// Builds the `PageContents` tree; empty diagrams yield an empty root
pub fn page_contents(diagram: &Diagram, page: &PageConfig) -> XmlNode {
    let transform = PageTransform::new(diagram.width, diagram.height, page);
    let mut root = XmlNode::new("PageContents")
        .attr("xmlns", schema::NS_VISIO)
        .attr("xmlns:r", schema::NS_RELATIONSHIPS);

    if diagram.is_empty() {
        return root;
    }

    let mut shapes = XmlNode::new("Shapes");
    shapes
        .children
        .extend(diagram.shapes.iter().map(|s| shape_node(s, &transform)));
    shapes
        .children
        .extend(diagram.connectors.iter().map(|c| connector_node(c, &transform)));
    root.push(shapes);

    if !diagram.connectors.is_empty() {
        let mut connects = XmlNode::new("Connects");
        for connector in &diagram.connectors {
            connects.children.extend(connect_nodes(connector));
        }
        root.push(connects);
    }
    root
}

pub fn page_part(diagram: &Diagram, page: &PageConfig) -> Result<DocumentPart> {
    DocumentPart::from_xml(path::PAGE1, content_type::PAGE, &page_contents(diagram, page))
}
