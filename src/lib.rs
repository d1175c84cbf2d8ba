//! Structured diagram reconstruction and VSDX output
//!
//! Detected primitives (polygons, line segments, text boxes) are classified
//! into shapes, line segments are attached to the shapes they join, and the
//! resulting `Diagram` is written as a `.vsdx` package.
//!
//! ```ignore
//! let config = image_to_vsdx::load_config(None)?;
//! let report = image_to_vsdx::convert(&input, "out.vsdx", &config)?;
//! println!("{} shapes, {} connectors", report.shapes, report.connectors);
//! ```

pub mod config;
pub mod convert;
pub mod diagram;
pub mod draw;
pub mod error;
pub mod parse_xml;
pub mod serialize_xml;
pub mod server;
pub mod vsdx;

pub use config::{load_config, ConverterConfig};
pub use convert::{analyze, convert, convert_with_options, ConversionReport};
pub use diagram::{Connector, ConnectorId, Diagram, DiagramBuild, DiagramBuilder, IdAllocator, Shape, ShapeGeometry, ShapeId};
pub use draw::classify::ShapeCategory;
pub use draw::geometry::{BoundingBox, DetectionInput, LineSegmentPrimitive, Point, PolygonPrimitive, TextPrimitive};
pub use error::{ConvertError, ErrorKind, Result, SerializationError};
pub use vsdx::{create_document, inspect_document, DocumentOptions, DocumentSummary, VsdxWriter};
