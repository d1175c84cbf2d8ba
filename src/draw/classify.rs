//! Shape classification
//!
//! Maps a single polygon primitive to a category from a closed set, using the
//! vertex count of its simplified outline, its aspect ratio and, for many-sided
//! outlines, its circularity. Classification never fails: anything that does
//! not match a specific rule falls back to `Polygon`.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::config::ClassifierConfig;
use crate::draw::geometry::{Point, PolygonPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeCategory {
    Triangle,
    Square,
    Rectangle,
    Pentagon,
    Hexagon,
    Circle,
    Ellipse,
    Polygon,
}

impl ShapeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeCategory::Triangle => "triangle",
            ShapeCategory::Square => "square",
            ShapeCategory::Rectangle => "rectangle",
            ShapeCategory::Pentagon => "pentagon",
            ShapeCategory::Hexagon => "hexagon",
            ShapeCategory::Circle => "circle",
            ShapeCategory::Ellipse => "ellipse",
            ShapeCategory::Polygon => "polygon",
        }
    }
}

impl std::fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Perimeter of a closed outline
pub fn closed_perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let open: f64 = points.windows(2).map(|w| w[0].distance_to(w[1])).sum();
    open + points[points.len() - 1].distance_to(points[0])
}

/// 4π·area / perimeter², 0 for a degenerate outline
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    if perimeter <= 0.0 {
        return 0.0;
    }
    4.0 * PI * area / (perimeter * perimeter)
}

/// True when the primitive is too small to be a diagram element
pub fn is_noise(polygon: &PolygonPrimitive, config: &ClassifierConfig) -> bool {
    polygon.area < config.min_area
}

pub fn classify(polygon: &PolygonPrimitive, config: &ClassifierConfig) -> ShapeCategory {
    classify_outline(
        polygon.outline(),
        polygon.area,
        polygon.bbox.width,
        polygon.bbox.height,
        config,
    )
}

pub fn classify_outline(
    outline: &[Point],
    area: f64,
    width: f64,
    height: f64,
    config: &ClassifierConfig,
) -> ShapeCategory {
    match outline.len() {
        3 => ShapeCategory::Triangle,
        4 => {
            let aspect_ratio = if height > 0.0 { width / height } else { 0.0 };
            let low = 1.0 - config.square_tolerance;
            let high = 1.0 + config.square_tolerance;
            if (low..=high).contains(&aspect_ratio) {
                ShapeCategory::Square
            } else {
                ShapeCategory::Rectangle
            }
        }
        5 => ShapeCategory::Pentagon,
        6 => ShapeCategory::Hexagon,
        n if n > 6 => {
            if circularity(area, closed_perimeter(outline)) > config.circularity_threshold {
                ShapeCategory::Circle
            } else {
                ShapeCategory::Ellipse
            }
        }
        _ => ShapeCategory::Polygon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular_outline(sides: usize, radius: f64, stretch_y: f64) -> Vec<Point> {
        (0..sides)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / sides as f64;
                Point::new(radius * angle.cos(), radius * stretch_y * angle.sin())
            })
            .collect()
    }

    fn shoelace(points: &[Point]) -> f64 {
        let n = points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let (a, b) = (points[i], points[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }

    #[test]
    fn test_vertex_count_rules() {
        let config = ClassifierConfig::default();
        let outline = |n| vec![Point::new(0.0, 0.0); n];
        assert_eq!(classify_outline(&outline(3), 600.0, 40.0, 30.0, &config), ShapeCategory::Triangle);
        assert_eq!(classify_outline(&outline(5), 600.0, 40.0, 30.0, &config), ShapeCategory::Pentagon);
        assert_eq!(classify_outline(&outline(6), 600.0, 40.0, 30.0, &config), ShapeCategory::Hexagon);
    }

    #[test]
    fn test_square_versus_rectangle() {
        let config = ClassifierConfig::default();
        let quad = vec![Point::new(0.0, 0.0); 4];
        assert_eq!(classify_outline(&quad, 1e4, 100.0, 100.0, &config), ShapeCategory::Square);
        assert_eq!(classify_outline(&quad, 1e4, 104.0, 100.0, &config), ShapeCategory::Square);
        assert_eq!(classify_outline(&quad, 1e4, 96.0, 100.0, &config), ShapeCategory::Square);
        assert_eq!(classify_outline(&quad, 1e4, 106.0, 100.0, &config), ShapeCategory::Rectangle);
        assert_eq!(classify_outline(&quad, 1e4, 200.0, 100.0, &config), ShapeCategory::Rectangle);
    }

    #[test]
    fn test_round_shapes() {
        let config = ClassifierConfig::default();

        let circle = regular_outline(16, 50.0, 1.0);
        let area = shoelace(&circle);
        assert_eq!(classify_outline(&circle, area, 100.0, 100.0, &config), ShapeCategory::Circle);

        let ellipse = regular_outline(16, 50.0, 0.3);
        let area = shoelace(&ellipse);
        assert_eq!(classify_outline(&ellipse, area, 100.0, 30.0, &config), ShapeCategory::Ellipse);
    }

    #[test]
    fn test_degenerate_outlines_fall_back_to_polygon() {
        let config = ClassifierConfig::default();
        assert_eq!(classify_outline(&[], 600.0, 10.0, 10.0, &config), ShapeCategory::Polygon);
        let two = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
        assert_eq!(classify_outline(&two, 600.0, 10.0, 10.0, &config), ShapeCategory::Polygon);
    }

    #[test]
    fn test_circularity_of_degenerate_perimeter() {
        assert_eq!(circularity(100.0, 0.0), 0.0);
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!((closed_perimeter(&square) - 40.0).abs() < 1e-9);
        assert!((circularity(100.0, 40.0) - PI / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ShapeCategory::Hexagon).unwrap(), "\"hexagon\"");
        assert_eq!(ShapeCategory::Square.to_string(), "square");
    }
}
