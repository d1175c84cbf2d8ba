//! Spatial indexing of shape centres
//!
//! This module provides an R-tree over shape centre points so line endpoints
//! can be matched to nearby shapes without scanning every shape.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use super::types::Point;

/// A shape centre tagged with the shape's position in diagram order
#[derive(Clone, Debug)]
pub struct ShapeAnchor {
    pub index: usize,
    pub center: [f64; 2],
}

impl ShapeAnchor {
    pub fn new(index: usize, center: Point) -> Self {
        Self {
            index,
            center: [center.x, center.y],
        }
    }
}

impl RTreeObject for ShapeAnchor {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.center)
    }
}

impl PointDistance for ShapeAnchor {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.center[0] - point[0];
        let dy = self.center[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Index over shape centres answering "closest shape within a radius"
pub struct CenterIndex {
    tree: RTree<ShapeAnchor>,
}

impl CenterIndex {
    pub fn new(centers: impl IntoIterator<Item = Point>) -> Self {
        let anchors: Vec<ShapeAnchor> = centers
            .into_iter()
            .enumerate()
            .map(|(index, center)| ShapeAnchor::new(index, center))
            .collect();
        Self {
            tree: RTree::bulk_load(anchors),
        }
    }

    /// Index of the shape whose centre is strictly closer than `max_distance`
    /// to `point`. Equal distances resolve to the lowest index.
    pub fn nearest_within(&self, point: Point, max_distance: f64) -> Option<usize> {
        let query = [point.x, point.y];
        let max_d2 = max_distance * max_distance;
        self.tree
            .locate_within_distance(query, max_d2)
            .map(|anchor| (anchor.distance_2(&query), anchor.index))
            .filter(|(d2, _)| *d2 < max_d2)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, index)| index)
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
