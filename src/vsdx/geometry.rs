//! Pixel-to-page geometry encoding
//!
//! Page space is in inches with the origin at the bottom-left, so every Y
//! coordinate is flipped on the way in. Shape paths are local to the shape's
//! own box: (0, 0) is its bottom-left corner, (width, height) its top-right.

use crate::config::PageConfig;
use crate::diagram::{Connector, Shape, ShapeGeometry};
use crate::draw::geometry::{BoundingBox, Point};

/// Scale and flip from image pixels to page inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub page_width: f64,
    pub page_height: f64,
}

impl PageTransform {
    /// A zero canvas dimension yields a zero scale; that only happens for
    /// diagrams without shapes, where nothing is transformed.
    pub fn new(canvas_width: u32, canvas_height: u32, page: &PageConfig) -> Self {
        let scale = |page_len: f64, pixels: u32| {
            if pixels == 0 {
                0.0
            } else {
                page_len / pixels as f64
            }
        };
        Self {
            scale_x: scale(page.width, canvas_width),
            scale_y: scale(page.height, canvas_height),
            page_width: page.width,
            page_height: page.height,
        }
    }

    /// Pixel point to page point
    pub fn point(&self, p: Point) -> (f64, f64) {
        (p.x * self.scale_x, self.page_height - p.y * self.scale_y)
    }

    pub fn place(&self, bounds: &BoundingBox) -> Placement {
        let width = bounds.width * self.scale_x;
        let height = bounds.height * self.scale_y;
        let left = bounds.x * self.scale_x;
        let bottom = self.page_height - bounds.bottom() * self.scale_y;
        Placement {
            pin_x: left + width / 2.0,
            pin_y: bottom + height / 2.0,
            width,
            height,
        }
    }
}

/// Position and size of a 2-D shape on the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pin_x: f64,
    pub pin_y: f64,
    pub width: f64,
    pub height: f64,
}

/// One row of a geometry section
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathRow {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    /// Centre (x, y), a point on the major axis (a, b), a point on the minor axis (c, d)
    Ellipse { x: f64, y: f64, a: f64, b: f64, c: f64, d: f64 },
}

impl PathRow {
    pub fn row_type(&self) -> &'static str {
        match self {
            PathRow::MoveTo { .. } => "MoveTo",
            PathRow::LineTo { .. } => "LineTo",
            PathRow::Ellipse { .. } => "Ellipse",
        }
    }

    pub fn cells(&self) -> Vec<(&'static str, f64)> {
        match *self {
            PathRow::MoveTo { x, y } | PathRow::LineTo { x, y } => vec![("X", x), ("Y", y)],
            PathRow::Ellipse { x, y, a, b, c, d } => {
                vec![("X", x), ("Y", y), ("A", a), ("B", b), ("C", c), ("D", d)]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryPath {
    pub rows: Vec<PathRow>,
}

impl GeometryPath {
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self {
            rows: vec![
                PathRow::MoveTo { x: 0.0, y: 0.0 },
                PathRow::LineTo { x: width, y: 0.0 },
                PathRow::LineTo { x: width, y: height },
                PathRow::LineTo { x: 0.0, y: height },
                PathRow::LineTo { x: 0.0, y: 0.0 },
            ],
        }
    }

    /// Ellipse inscribed in the box. The major-axis point sits at the right
    /// edge and the minor-axis point at the top edge; a zero `B` would collapse it.
    pub fn ellipse(width: f64, height: f64) -> Self {
        Self {
            rows: vec![PathRow::Ellipse {
                x: width / 2.0,
                y: height / 2.0,
                a: width,
                b: height / 2.0,
                c: width / 2.0,
                d: height,
            }],
        }
    }

    /// Closed path through the outline's vertices, in the shape's local frame.
    /// `None` when fewer than three distinct vertices remain.
    pub fn outline(outline: &[Point], bounds: &BoundingBox, transform: &PageTransform) -> Option<Self> {
        let mut vertices = outline.to_vec();
        vertices.dedup();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return None;
        }

        let local = |p: &Point| {
            (
                (p.x - bounds.x) * transform.scale_x,
                (bounds.bottom() - p.y) * transform.scale_y,
            )
        };
        let (x0, y0) = local(&vertices[0]);
        let mut rows = Vec::with_capacity(vertices.len() + 1);
        rows.push(PathRow::MoveTo { x: x0, y: y0 });
        for p in &vertices[1..] {
            let (x, y) = local(p);
            rows.push(PathRow::LineTo { x, y });
        }
        rows.push(PathRow::LineTo { x: x0, y: y0 });
        Some(Self { rows })
    }

    pub fn is_closed(&self) -> bool {
        match (self.rows.first(), self.rows.last()) {
            (Some(PathRow::Ellipse { .. }), _) => true,
            (Some(PathRow::MoveTo { x: x0, y: y0 }), Some(PathRow::LineTo { x, y })) => {
                (x0 - x).abs() < 1e-9 && (y0 - y).abs() < 1e-9
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedShape {
    pub placement: Placement,
    pub path: GeometryPath,
}

pub fn encode_shape(shape: &Shape, transform: &PageTransform) -> EncodedShape {
    let placement = transform.place(&shape.bounds);
    let (width, height) = (placement.width, placement.height);
    let path = match &shape.geometry {
        ShapeGeometry::Box => GeometryPath::rectangle(width, height),
        ShapeGeometry::Round => GeometryPath::ellipse(width, height),
        ShapeGeometry::Outline(points) => GeometryPath::outline(points, &shape.bounds, transform)
            .unwrap_or_else(|| GeometryPath::rectangle(width, height)),
    };
    EncodedShape { placement, path }
}

/// A straight 1-D connector in page space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedConnector {
    pub begin: (f64, f64),
    pub end: (f64, f64),
    pub pin: (f64, f64),
    pub length: f64,
    /// Radians, counter-clockwise from the page X axis
    pub angle: f64,
}

pub fn encode_connector(connector: &Connector, transform: &PageTransform) -> EncodedConnector {
    let begin = transform.point(connector.start);
    let end = transform.point(connector.end);
    let (dx, dy) = (end.0 - begin.0, end.1 - begin.1);
    EncodedConnector {
        begin,
        end,
        pin: ((begin.0 + end.0) / 2.0, (begin.1 + end.1) / 2.0),
        length: (dx * dx + dy * dy).sqrt(),
        angle: dy.atan2(dx),
    }
}

/// Largest magnitude that survives scaling by 1e6 without losing the integer part
const ROUNDING_LIMIT: f64 = 1e15;

/// Formats a cell value with at most six fractional digits. Magnitudes too
/// large to carry a fraction are written as they are.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = if value.abs() < ROUNDING_LIMIT {
        (value * 1e6).round() / 1e6
    } else {
        value
    };
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}
