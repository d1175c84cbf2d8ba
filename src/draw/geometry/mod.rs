//! Geometry module for detected diagram primitives
//!
//! # Submodules
//! - `types` - Points, boxes and the primitives supplied by the detector
//! - `spatial` - R-tree index over shape centres for endpoint association

mod types;
mod spatial;

pub use types::{
    Point,
    BoundingBox,
    PolygonPrimitive,
    LineSegmentPrimitive,
    TextPrimitive,
    DetectionInput,
};

pub use spatial::{
    ShapeAnchor,
    CenterIndex,
};
