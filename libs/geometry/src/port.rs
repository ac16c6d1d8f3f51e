//! Named attachment points on layout geometry.

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::point::Point;
use crate::transform::{Transform, Transformation};

/// A named attachment point with a position, a width, and an orientation.
///
/// The orientation is the direction, in degrees counter-clockwise from the x axis,
/// in which a connecting trace leaves the port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Port {
    name: ArcStr,
    center: Point,
    width: f64,
    orientation: f64,
}

impl Port {
    /// Creates a new port.
    pub fn new(name: impl Into<ArcStr>, center: Point, width: f64, orientation: f64) -> Self {
        Self {
            name: name.into(),
            center,
            width,
            orientation: crate::wrap_angle(orientation),
        }
    }

    /// The name of the port.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The midpoint of the port.
    pub fn center(&self) -> Point {
        self.center
    }

    /// The width of the port.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// The orientation of the port in degrees, in `[0, 360)`.
    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    /// The unit vector pointing out of the port.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let port = Port::new("top", Point::new(0., 10.), 4., 90.);
    /// assert_eq!(port.normal(), Point::new(0., 1.));
    /// ```
    pub fn normal(&self) -> Point {
        Point::unit_from_angle(self.orientation)
    }

    /// The two edge points of the port, spaced `width` apart across the normal.
    pub fn endpoints(&self) -> (Point, Point) {
        let across = self.normal().rotate(90.) * (self.width / 2.);
        (self.center - across, self.center + across)
    }

    /// Returns a copy of the port with a different name.
    pub fn renamed(&self, name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of the port with a different width.
    pub fn with_width(&self, width: f64) -> Self {
        Self {
            width,
            ..self.clone()
        }
    }

    /// Returns a copy of the port moved `distance` along its normal.
    pub fn advanced(&self, distance: f64) -> Self {
        Self {
            center: self.center + self.normal() * distance,
            ..self.clone()
        }
    }

    /// Returns the port facing the opposite direction.
    pub fn flipped(&self) -> Self {
        Self {
            orientation: crate::wrap_angle(self.orientation + 180.),
            ..self.clone()
        }
    }

    /// Returns `true` if the two ports face exactly opposite directions.
    pub fn opposes(&self, other: &Port) -> bool {
        crate::wrap_angle(self.orientation - other.orientation) == 180.
    }
}

impl Transform for Port {
    fn transform(&self, trans: Transformation) -> Self {
        Self {
            name: self.name.clone(),
            center: trans.apply(self.center),
            width: self.width,
            orientation: trans.apply_angle(self.orientation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_span_width() {
        let port = Port::new("bottom", Point::new(5., 0.), 10., 270.);
        let (a, b) = port.endpoints();
        assert_eq!(a.dist(b), 10.);
        assert_eq!((a + b) / 2., port.center());
    }

    #[test]
    fn transform_rotates_orientation() {
        let port = Port::new("p", Point::new(1., 0.), 2., 0.);
        let moved = port.transform(Transformation::from_parts(false, 90., Point::new(0., 5.)));
        assert_eq!(moved.center(), Point::new(0., 6.));
        assert_eq!(moved.orientation(), 90.);
        assert!(moved.opposes(&moved.flipped()));
    }
}
