//! Core geometry types for detected diagram primitives
//!
//! All coordinates are image pixels with the origin at the top-left corner
//! and Y increasing downward.

use serde::{Deserialize, Serialize};

/// A 2D point in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned bounding box; (x, y) is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Checks that the box is finite with strictly positive extent
    pub fn validate(&self) -> Result<(), String> {
        if ![self.x, self.y, self.width, self.height].iter().all(|v| v.is_finite()) {
            return Err("bounding box has non-finite coordinates".to_string());
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(format!(
                "bounding box must have positive size, got {}x{}",
                self.width, self.height
            ));
        }
        Ok(())
    }
}

/// A closed contour found in the image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonPrimitive {
    /// Full contour, in order
    pub vertices: Vec<Point>,
    /// Perimeter-simplified contour; empty when the detector did not supply one
    #[serde(default)]
    pub approx: Vec<Point>,
    pub area: f64,
    pub bbox: BoundingBox,
}

impl PolygonPrimitive {
    /// The outline used for classification: the simplified contour if present
    pub fn outline(&self) -> &[Point] {
        if self.approx.is_empty() {
            &self.vertices
        } else {
            &self.approx
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.bbox.validate()?;
        if !self.area.is_finite() || self.area < 0.0 {
            return Err(format!("area must be a non-negative number, got {}", self.area));
        }
        if !self.vertices.iter().chain(&self.approx).all(Point::is_finite) {
            return Err("vertex list has non-finite coordinates".to_string());
        }
        Ok(())
    }
}

/// A straight line found by the line detector
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LineSegmentPrimitive {
    pub start: Point,
    pub end: Point,
}

impl LineSegmentPrimitive {
    pub fn validate(&self) -> Result<(), String> {
        if self.start.is_finite() && self.end.is_finite() {
            Ok(())
        } else {
            Err("endpoint has non-finite coordinates".to_string())
        }
    }
}

/// A recognised string with its position and OCR confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub bbox: BoundingBox,
    /// Confidence in [0, 100]
    pub confidence: f64,
}

impl TextPrimitive {
    pub fn validate(&self) -> Result<(), String> {
        self.bbox.validate()?;
        if !(0.0..=100.0).contains(&self.confidence) {
            return Err(format!("confidence {} outside [0, 100]", self.confidence));
        }
        Ok(())
    }
}

/// Everything the detection stage hands over for one image
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionInput {
    pub image_width: u32,
    pub image_height: u32,
    #[serde(default)]
    pub polygons: Vec<PolygonPrimitive>,
    #[serde(default)]
    pub segments: Vec<LineSegmentPrimitive>,
    /// `None` when no text recognition ran for this image
    #[serde(default)]
    pub text: Option<Vec<TextPrimitive>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_center_and_validation() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(bbox.center(), Point::new(60.0, 45.0));
        assert_eq!(bbox.bottom(), 70.0);
        assert!(bbox.validate().is_ok());

        assert!(BoundingBox::new(0.0, 0.0, 0.0, 5.0).validate().is_err());
        assert!(BoundingBox::new(0.0, 0.0, 5.0, -1.0).validate().is_err());
        assert!(BoundingBox::new(f64::NAN, 0.0, 5.0, 5.0).validate().is_err());
    }

    #[test]
    fn test_outline_prefers_approx() {
        let mut polygon = PolygonPrimitive {
            vertices: vec![Point::new(0.0, 0.0); 12],
            approx: Vec::new(),
            area: 600.0,
            bbox: BoundingBox::new(0.0, 0.0, 30.0, 30.0),
        };
        assert_eq!(polygon.outline().len(), 12);
        polygon.approx = vec![Point::new(0.0, 0.0); 4];
        assert_eq!(polygon.outline().len(), 4);
    }

    #[test]
    fn test_text_confidence_range() {
        let mut text = TextPrimitive {
            text: "Start".to_string(),
            bbox: BoundingBox::new(5.0, 5.0, 40.0, 12.0),
            confidence: 87.0,
        };
        assert!(text.validate().is_ok());
        text.confidence = 101.0;
        assert!(text.validate().is_err());
    }

    #[test]
    fn test_detection_input_text_is_optional() {
        let input: DetectionInput =
            serde_json::from_str(r#"{"image_width": 800, "image_height": 600}"#).unwrap();
        assert!(input.text.is_none());
        assert!(input.polygons.is_empty());
        assert!(input.segments.is_empty());
    }
}
