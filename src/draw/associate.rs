//! Line-to-shape association
//!
//! Each segment endpoint is matched to the shape whose centre is nearest and
//! strictly within the configured distance. Only segments joining two
//! different shapes become connectors; everything else is dropped.

use crate::config::AssociationConfig;
use crate::diagram::{Connector, IdAllocator, Shape, ShapeId};
use crate::draw::geometry::{CenterIndex, LineSegmentPrimitive, Point};
use crate::error::Result;

/// Connectors produced from one set of segments, plus what was dropped
#[derive(Debug, Default)]
pub struct Association {
    pub connectors: Vec<Connector>,
    pub unresolved: usize,
    pub self_loops: usize,
}

/// Resolves endpoints against a fixed set of shapes
pub struct Associator<'a> {
    shapes: &'a [Shape],
    index: CenterIndex,
    max_distance: f64,
}

impl<'a> Associator<'a> {
    pub fn new(shapes: &'a [Shape], config: &AssociationConfig) -> Self {
        Self {
            shapes,
            index: CenterIndex::new(shapes.iter().map(|s| s.bounds.center())),
            max_distance: config.max_distance,
        }
    }

    /// The shape an endpoint attaches to, if any
    pub fn resolve(&self, point: Point) -> Option<ShapeId> {
        self.index
            .nearest_within(point, self.max_distance)
            .map(|index| self.shapes[index].id)
    }

    pub fn associate(
        &self,
        segments: &[LineSegmentPrimitive],
        ids: &mut IdAllocator,
    ) -> Result<Association> {
        let mut result = Association::default();
        if self.index.is_empty() {
            log::debug!("No shapes to attach {} segments to", segments.len());
            result.unresolved = segments.len();
            return Ok(result);
        }

        for segment in segments {
            let (source, target) = match (self.resolve(segment.start), self.resolve(segment.end)) {
                (Some(source), Some(target)) => (source, target),
                _ => {
                    result.unresolved += 1;
                    continue;
                }
            };
            if source == target {
                result.self_loops += 1;
                continue;
            }

            result.connectors.push(Connector {
                id: ids.next_connector()?,
                source,
                target,
                start: segment.start,
                end: segment.end,
            });
        }

        if result.unresolved > 0 || result.self_loops > 0 {
            log::debug!(
                "Dropped {} segments with unresolved endpoints and {} self-loops",
                result.unresolved,
                result.self_loops
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{ConnectorId, ShapeGeometry};
    use crate::draw::classify::ShapeCategory;
    use crate::draw::geometry::BoundingBox;

    fn shape(id: u32, cx: f64, cy: f64) -> Shape {
        Shape {
            id: ShapeId(id),
            category: ShapeCategory::Square,
            bounds: BoundingBox::new(cx - 10.0, cy - 10.0, 20.0, 20.0),
            vertex_count: 4,
            geometry: ShapeGeometry::Box,
        }
    }

    fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegmentPrimitive {
        LineSegmentPrimitive {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
        }
    }

    #[test]
    fn test_links_two_shapes() {
        let shapes = vec![shape(1, 100.0, 100.0), shape(2, 300.0, 100.0)];
        let associator = Associator::new(&shapes, &AssociationConfig::default());
        let mut ids = IdAllocator::default();

        let result = associator
            .associate(&[segment(110.0, 100.0, 290.0, 100.0)], &mut ids)
            .unwrap();

        assert_eq!(result.connectors.len(), 1);
        let connector = &result.connectors[0];
        assert_eq!(connector.id, ConnectorId(1000));
        assert_eq!(connector.source, ShapeId(1));
        assert_eq!(connector.target, ShapeId(2));
    }

    #[test]
    fn test_drops_unresolved_and_self_loops() {
        let shapes = vec![shape(1, 100.0, 100.0), shape(2, 300.0, 100.0)];
        let associator = Associator::new(&shapes, &AssociationConfig::default());
        let mut ids = IdAllocator::default();

        let result = associator
            .associate(
                &[
                    segment(110.0, 100.0, 200.0, 100.0),
                    segment(95.0, 100.0, 105.0, 100.0),
                    segment(500.0, 500.0, 600.0, 600.0),
                ],
                &mut ids,
            )
            .unwrap();

        assert!(result.connectors.is_empty());
        assert_eq!(result.unresolved, 2);
        assert_eq!(result.self_loops, 1);
    }

    #[test]
    fn test_no_shapes_means_no_connectors() {
        let associator = Associator::new(&[], &AssociationConfig::default());
        let mut ids = IdAllocator::default();
        let result = associator
            .associate(&[segment(0.0, 0.0, 10.0, 10.0)], &mut ids)
            .unwrap();
        assert!(result.connectors.is_empty());
        assert_eq!(result.unresolved, 1);
    }
}
