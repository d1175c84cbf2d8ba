//! Structured diagram model
//!
//! A `Diagram` is assembled once per conversion from the detector's primitives
//! and discarded after serialization. Identifiers come from a request-scoped
//! `IdAllocator`: shapes take `1..=999`, connectors start at `1000`, so the two
//! ranges can never collide.

use serde::Serialize;

use crate::config::{ConverterConfig, MAX_SHAPE_ID};
use crate::draw::associate::Associator;
use crate::draw::classify::{classify, is_noise, ShapeCategory};
use crate::draw::geometry::{BoundingBox, DetectionInput, Point, PolygonPrimitive, TextPrimitive};
use crate::error::{ConvertError, PrimitiveKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ShapeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectorId(pub u32);

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out identifiers for one conversion
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_shape: u32,
    max_shape: u32,
    next_connector: Option<u32>,
}

impl IdAllocator {
    pub const FIRST_SHAPE_ID: u32 = 1;
    pub const FIRST_CONNECTOR_ID: u32 = MAX_SHAPE_ID + 1;

    /// `max_shapes` is clamped to the width of the shape range
    pub fn new(max_shapes: u32) -> Self {
        Self {
            next_shape: Self::FIRST_SHAPE_ID,
            max_shape: max_shapes.min(MAX_SHAPE_ID),
            next_connector: Some(Self::FIRST_CONNECTOR_ID),
        }
    }

    pub fn next_shape(&mut self) -> Result<ShapeId> {
        if self.next_shape > self.max_shape {
            return Err(ConvertError::IdentifierExhaustion {
                what: "shapes",
                limit: self.max_shape,
            });
        }
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        Ok(id)
    }

    pub fn next_connector(&mut self) -> Result<ConnectorId> {
        let current = self.next_connector.ok_or(ConvertError::IdentifierExhaustion {
            what: "connectors",
            limit: u32::MAX - Self::FIRST_CONNECTOR_ID + 1,
        })?;
        self.next_connector = current.checked_add(1);
        Ok(ConnectorId(current))
    }

}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(MAX_SHAPE_ID)
    }
}

/// What a shape's path is drawn from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeGeometry {
    /// The bounding box itself
    Box,
    /// Ellipse inscribed in the bounding box
    Round,
    /// Simplified outline in pixel space
    Outline(Vec<Point>),
}

impl ShapeGeometry {
    pub fn for_category(category: ShapeCategory, outline: &[Point]) -> Self {
        match category {
            ShapeCategory::Rectangle | ShapeCategory::Square => ShapeGeometry::Box,
            ShapeCategory::Circle | ShapeCategory::Ellipse => ShapeGeometry::Round,
            ShapeCategory::Triangle
            | ShapeCategory::Pentagon
            | ShapeCategory::Hexagon
            | ShapeCategory::Polygon => ShapeGeometry::Outline(outline.to_vec()),
        }
    }
}

/// A classified diagram element
#[derive(Debug, Clone, Serialize)]
pub struct Shape {
    pub id: ShapeId,
    pub category: ShapeCategory,
    /// Pixel-space bounding box
    pub bounds: BoundingBox,
    pub vertex_count: usize,
    pub geometry: ShapeGeometry,
}

/// A directed link between two different shapes
#[derive(Debug, Clone, Serialize)]
pub struct Connector {
    pub id: ConnectorId,
    pub source: ShapeId,
    pub target: ShapeId,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagram {
    /// Source image width in pixels
    pub width: u32,
    /// Source image height in pixels
    pub height: u32,
    pub shapes: Vec<Shape>,
    pub connectors: Vec<Connector>,
    pub text: Vec<TextPrimitive>,
}

impl Diagram {
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.connectors.is_empty()
    }

    /// Checks identifier uniqueness, connector references and canvas size
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for shape in &self.shapes {
            if !seen.insert(shape.id.0) {
                return Err(format!("duplicate shape id {}", shape.id));
            }
        }
        for connector in &self.connectors {
            if !seen.insert(connector.id.0) {
                return Err(format!("duplicate connector id {}", connector.id));
            }
            if connector.source == connector.target {
                return Err(format!("connector {} is a self-loop", connector.id));
            }
            for end in [connector.source, connector.target] {
                if self.shape(end).is_none() {
                    return Err(format!("connector {} references unknown shape {}", connector.id, end));
                }
            }
        }
        if !self.shapes.is_empty() && (self.width == 0 || self.height == 0) {
            return Err("canvas must be non-empty when shapes exist".to_string());
        }
        Ok(())
    }
}

/// A primitive skipped during assembly
#[derive(Debug, Clone, Serialize)]
pub struct RejectedPrimitive {
    pub kind: PrimitiveKind,
    pub index: usize,
    pub reason: String,
}

impl From<RejectedPrimitive> for ConvertError {
    fn from(rejected: RejectedPrimitive) -> Self {
        ConvertError::InvalidPrimitive {
            kind: rejected.kind,
            index: rejected.index,
            reason: rejected.reason,
        }
    }
}

/// Result of assembling one diagram
#[derive(Debug, Clone, Serialize)]
pub struct DiagramBuild {
    pub diagram: Diagram,
    pub rejected: Vec<RejectedPrimitive>,
    /// Polygons filtered out as too small
    pub noise: usize,
    /// Segments that did not join two different shapes
    pub dropped_segments: usize,
}

pub struct DiagramBuilder<'a> {
    config: &'a ConverterConfig,
}

impl<'a> DiagramBuilder<'a> {
    pub fn new(config: &'a ConverterConfig) -> Self {
        Self { config }
    }

    /// Assemble a diagram with a fresh allocator
    pub fn build(&self, input: &DetectionInput) -> Result<DiagramBuild> {
        let mut ids = IdAllocator::new(self.config.limits.effective_max_shapes());
        self.build_with_allocator(input, &mut ids)
    }

    pub fn build_with_allocator(
        &self,
        input: &DetectionInput,
        ids: &mut IdAllocator,
    ) -> Result<DiagramBuild> {
        let mut rejected = Vec::new();

        let (shapes, noise) = self.classify_polygons(&input.polygons, ids, &mut rejected)?;
        if !shapes.is_empty() && (input.image_width == 0 || input.image_height == 0) {
            return Err(ConvertError::InvalidCanvas {
                width: input.image_width as f64,
                height: input.image_height as f64,
            });
        }

        let segments = accept(&input.segments, PrimitiveKind::LineSegment, &mut rejected, |s| {
            s.validate()
        });
        let association = Associator::new(&shapes, &self.config.association).associate(&segments, ids)?;

        let text = match &input.text {
            Some(text) => accept(text, PrimitiveKind::Text, &mut rejected, |t| t.validate()),
            None => {
                log::debug!("No text primitives supplied");
                Vec::new()
            }
        };

        for r in &rejected {
            log::warn!("Skipping invalid {} primitive #{}: {}", r.kind, r.index, r.reason);
        }

        let diagram = Diagram {
            width: input.image_width,
            height: input.image_height,
            shapes,
            connectors: association.connectors,
            text,
        };
        log::info!(
            "Assembled diagram: {} shapes, {} connectors, {} text elements ({} rejected, {} noise)",
            diagram.shapes.len(),
            diagram.connectors.len(),
            diagram.text.len(),
            rejected.len(),
            noise
        );

        Ok(DiagramBuild {
            diagram,
            rejected,
            noise,
            dropped_segments: association.unresolved + association.self_loops,
        })
    }

    fn classify_polygons(
        &self,
        polygons: &[PolygonPrimitive],
        ids: &mut IdAllocator,
        rejected: &mut Vec<RejectedPrimitive>,
    ) -> Result<(Vec<Shape>, usize)> {
        let mut shapes = Vec::new();
        let mut noise = 0;

        for (index, polygon) in polygons.iter().enumerate() {
            if let Err(reason) = polygon.validate() {
                rejected.push(RejectedPrimitive {
                    kind: PrimitiveKind::Polygon,
                    index,
                    reason,
                });
                continue;
            }
            if is_noise(polygon, &self.config.classifier) {
                noise += 1;
                continue;
            }

            let outline = polygon.outline();
            let category = classify(polygon, &self.config.classifier);
            shapes.push(Shape {
                id: ids.next_shape()?,
                category,
                bounds: polygon.bbox,
                vertex_count: outline.len(),
                geometry: ShapeGeometry::for_category(category, outline),
            });
        }

        if noise > 0 {
            log::debug!("Filtered {} polygons below the minimum area", noise);
        }
        Ok((shapes, noise))
    }
}

/// Keep the primitives that pass `check`, recording the rest
fn accept<T: Clone>(
    items: &[T],
    kind: PrimitiveKind,
    rejected: &mut Vec<RejectedPrimitive>,
    check: impl Fn(&T) -> std::result::Result<(), String>,
) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match check(item) {
            Ok(()) => Some(item.clone()),
            Err(reason) => {
                rejected.push(RejectedPrimitive { kind, index, reason });
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::geometry::LineSegmentPrimitive;

    fn square_at(x: f64, y: f64, side: f64) -> PolygonPrimitive {
        PolygonPrimitive {
            vertices: vec![
                Point::new(x, y),
                Point::new(x + side, y),
                Point::new(x + side, y + side),
                Point::new(x, y + side),
            ],
            approx: Vec::new(),
            area: side * side,
            bbox: BoundingBox::new(x, y, side, side),
        }
    }

    #[test]
    fn test_allocator_ranges_are_disjoint() {
        let mut ids = IdAllocator::new(2);
        assert_eq!(ids.next_shape().unwrap(), ShapeId(1));
        assert_eq!(ids.next_shape().unwrap(), ShapeId(2));
        let err = ids.next_shape().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::IdentifierExhaustion);
        assert_eq!(ids.next_connector().unwrap(), ConnectorId(1000));
        assert_eq!(ids.next_connector().unwrap(), ConnectorId(1001));
    }

    #[test]
    fn test_connector_range_overflow_is_exhaustion() {
        let mut ids = IdAllocator::default();
        ids.next_connector = Some(u32::MAX);
        assert_eq!(ids.next_connector().unwrap(), ConnectorId(u32::MAX));
        let err = ids.next_connector().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::IdentifierExhaustion);
        // Shapes draw from their own range and are unaffected
        assert_eq!(ids.next_shape().unwrap(), ShapeId(1));
    }

    #[test]
    fn test_geometry_follows_category() {
        let outline = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 8.0)];
        assert_eq!(ShapeGeometry::for_category(ShapeCategory::Square, &outline), ShapeGeometry::Box);
        assert_eq!(ShapeGeometry::for_category(ShapeCategory::Ellipse, &outline), ShapeGeometry::Round);
        assert_eq!(
            ShapeGeometry::for_category(ShapeCategory::Triangle, &outline),
            ShapeGeometry::Outline(outline.clone())
        );
    }

    #[test]
    fn test_allocator_clamps_to_shape_range() {
        let ids = IdAllocator::new(u32::MAX);
        assert_eq!(ids.max_shape, MAX_SHAPE_ID);
    }

    #[test]
    fn test_build_skips_invalid_and_noise() {
        let config = ConverterConfig::default();
        let mut broken = square_at(0.0, 0.0, 50.0);
        broken.bbox.width = -4.0;
        let input = DetectionInput {
            image_width: 800,
            image_height: 600,
            polygons: vec![square_at(10.0, 10.0, 100.0), broken, square_at(300.0, 300.0, 5.0)],
            segments: Vec::new(),
            text: None,
        };

        let build = DiagramBuilder::new(&config).build(&input).unwrap();
        assert_eq!(build.diagram.shapes.len(), 1);
        assert_eq!(build.diagram.shapes[0].category, ShapeCategory::Square);
        assert_eq!(build.rejected.len(), 1);
        assert_eq!(build.rejected[0].index, 1);
        assert_eq!(build.noise, 1);
        assert!(build.diagram.check_invariants().is_ok());
    }

    #[test]
    fn test_zero_canvas_with_shapes_is_rejected() {
        let config = ConverterConfig::default();
        let input = DetectionInput {
            image_width: 0,
            image_height: 600,
            polygons: vec![square_at(10.0, 10.0, 100.0)],
            ..Default::default()
        };
        let err = DiagramBuilder::new(&config).build(&input).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidCanvas);
    }

    #[test]
    fn test_zero_canvas_without_shapes_is_fine() {
        let config = ConverterConfig::default();
        let build = DiagramBuilder::new(&config).build(&DetectionInput::default()).unwrap();
        assert!(build.diagram.is_empty());
    }

    #[test]
    fn test_too_many_shapes_is_fatal() {
        let config = ConverterConfig::from_toml_str("[limits]\nmax_shapes = 3\n").unwrap();
        let input = DetectionInput {
            image_width: 2000,
            image_height: 2000,
            polygons: (0..4).map(|i| square_at(i as f64 * 120.0, 0.0, 100.0)).collect(),
            ..Default::default()
        };
        let err = DiagramBuilder::new(&config).build(&input).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::IdentifierExhaustion);
    }

    #[test]
    fn test_non_finite_segment_is_rejected_not_fatal() {
        let config = ConverterConfig::default();
        let input = DetectionInput {
            image_width: 800,
            image_height: 600,
            polygons: vec![square_at(100.0, 100.0, 80.0), square_at(400.0, 100.0, 80.0)],
            segments: vec![
                LineSegmentPrimitive {
                    start: Point::new(f64::NAN, 140.0),
                    end: Point::new(440.0, 140.0),
                },
                LineSegmentPrimitive {
                    start: Point::new(140.0, 140.0),
                    end: Point::new(440.0, f64::INFINITY),
                },
                LineSegmentPrimitive {
                    start: Point::new(140.0, 140.0),
                    end: Point::new(440.0, 140.0),
                },
            ],
            text: None,
        };

        let build = DiagramBuilder::new(&config).build(&input).unwrap();
        assert_eq!(build.diagram.shapes.len(), 2);
        assert_eq!(build.diagram.connectors.len(), 1);
        assert_eq!(build.diagram.connectors[0].id, ConnectorId(1000));
        let rejected: Vec<(PrimitiveKind, usize)> = build.rejected.iter().map(|r| (r.kind, r.index)).collect();
        assert_eq!(
            rejected,
            vec![(PrimitiveKind::LineSegment, 0), (PrimitiveKind::LineSegment, 1)]
        );
        assert_eq!(build.dropped_segments, 0);
        assert!(build.diagram.check_invariants().is_ok());
    }

    #[test]
    fn test_invalid_text_is_rejected_not_fatal() {
        let config = ConverterConfig::default();
        let input = DetectionInput {
            image_width: 800,
            image_height: 600,
            text: Some(vec![
                TextPrimitive {
                    text: "Start".to_string(),
                    bbox: BoundingBox::new(10.0, 10.0, 40.0, 12.0),
                    confidence: 90.0,
                },
                TextPrimitive {
                    text: "???".to_string(),
                    bbox: BoundingBox::new(10.0, 10.0, 0.0, 12.0),
                    confidence: 90.0,
                },
            ]),
            ..Default::default()
        };
        let build = DiagramBuilder::new(&config).build(&input).unwrap();
        assert_eq!(build.diagram.text.len(), 1);
        assert_eq!(build.rejected.len(), 1);
        assert_eq!(build.rejected[0].kind, PrimitiveKind::Text);
    }
}
