//! Polygons with real-valued vertex coordinates.

use serde::{Deserialize, Serialize};

use crate::bbox::Bbox;
use crate::point::Point;
use crate::rect::Rect;
use crate::transform::{Transform, Transformation};

/// A simple polygon, given by its vertices in order.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    /// Vector of points that make up the polygon.
    points: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon with given vertices.
    pub fn from_verts(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Approximates a circle by a regular polygon with `segments` vertices.
    ///
    /// # Panics
    ///
    /// Panics if `segments < 3`.
    pub fn circle(center: Point, radius: f64, segments: usize) -> Self {
        assert!(segments >= 3, "a circle needs at least 3 segments");
        let points = (0..segments)
            .map(|i| center + Point::unit_from_angle(360. * i as f64 / segments as f64) * radius)
            .collect();
        Self { points }
    }

    /// Returns the vertices of the polygon.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The signed area of the polygon; positive for counter-clockwise vertex order.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].cross(self.points[(i + 1) % n]))
            .sum::<f64>()
            / 2.
    }

    /// The area enclosed by the polygon.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }
}

impl Bbox for Polygon {
    fn bbox(&self) -> Option<Rect> {
        let (first, rest) = self.points.split_first()?;
        Some(
            rest.iter()
                .fold(Rect::from_point(*first), |acc, p| {
                    acc.union(&Rect::from_point(*p))
                }),
        )
    }
}

impl Transform for Polygon {
    fn transform(&self, trans: Transformation) -> Self {
        Self {
            points: self.points.iter().map(|p| trans.apply(*p)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn circle_area_approaches_pi_r_squared() {
        let circle = Polygon::circle(Point::zero(), 10., 256);
        assert_relative_eq!(circle.area(), std::f64::consts::PI * 100., max_relative = 1e-3);
        assert_eq!(
            circle.bbox(),
            Some(Rect::from_sides(-10., -10., 10., 10.))
        );
    }
}
