//! Transformation types and traits.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// A rigid transformation: an optional reflection about the x axis, followed by a
/// counter-clockwise rotation, followed by a translation.
///
/// Scaling is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    /// Reflect about the x axis (`y -> -y`).
    ///
    /// Applied before rotation.
    reflect: bool,
    /// Counter-clockwise angle in degrees, in `[0, 360)`.
    angle: f64,
    /// The x-y translation applied last.
    offset: Point,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    /// Returns the identity transform, leaving any transformed object unmodified.
    pub const fn identity() -> Self {
        Self {
            reflect: false,
            angle: 0.,
            offset: Point::zero(),
        }
    }

    /// Returns a translation by `offset`.
    pub const fn translate(offset: Point) -> Self {
        Self {
            reflect: false,
            angle: 0.,
            offset,
        }
    }

    /// Returns a rotation about the origin by `angle` degrees.
    pub fn rotate(angle: f64) -> Self {
        Self {
            reflect: false,
            angle: crate::wrap_angle(angle),
            offset: Point::zero(),
        }
    }

    /// Returns a reflection about the x axis.
    pub const fn reflect_vert() -> Self {
        Self {
            reflect: true,
            angle: 0.,
            offset: Point::zero(),
        }
    }

    /// Creates a transformation from its parts.
    pub fn from_parts(reflect: bool, angle: f64, offset: Point) -> Self {
        Self {
            reflect,
            angle: crate::wrap_angle(angle),
            offset,
        }
    }

    /// Whether this transformation reflects about the x axis.
    pub fn reflect(&self) -> bool {
        self.reflect
    }

    /// The rotation angle in degrees.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The translation applied after reflection and rotation.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Returns `true` if the rotation is a multiple of 90 degrees.
    pub fn is_manhattan(&self) -> bool {
        self.angle % 90. == 0.
    }

    /// Applies this transformation to a point.
    pub fn apply(&self, p: Point) -> Point {
        let p = if self.reflect {
            Point::new(p.x(), -p.y())
        } else {
            p
        };
        let u = Point::unit_from_angle(self.angle);
        Point::new(
            u.x() * p.x() - u.y() * p.y(),
            u.y() * p.x() + u.x() * p.y(),
        ) + self.offset
    }

    /// Applies this transformation to an orientation angle in degrees.
    pub fn apply_angle(&self, angle: f64) -> f64 {
        let angle = if self.reflect { -angle } else { angle };
        crate::wrap_angle(angle + self.angle)
    }

    /// Returns the transformation equivalent to applying `self`, then `outer`.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let a = Transformation::from_parts(true, 90., Point::new(1., 2.));
    /// let b = Transformation::from_parts(false, 180., Point::new(-5., 0.));
    /// let p = Point::new(3., 7.);
    /// assert_eq!(a.then(b).apply(p), b.apply(a.apply(p)));
    /// ```
    pub fn then(&self, outer: Transformation) -> Transformation {
        let reflect = self.reflect ^ outer.reflect;
        let angle = if outer.reflect {
            outer.angle - self.angle
        } else {
            outer.angle + self.angle
        };
        Transformation {
            reflect,
            angle: crate::wrap_angle(angle),
            offset: outer.apply(self.offset),
        }
    }
}

/// A trait for geometric objects that can be transformed.
pub trait Transform: Sized {
    /// Returns a transformed copy of `self`.
    fn transform(&self, trans: Transformation) -> Self;

    /// Returns a copy of `self` translated by `p`.
    fn translate(&self, p: Point) -> Self {
        self.transform(Transformation::translate(p))
    }
}

impl<T: Transform> Transform for Vec<T> {
    fn transform(&self, trans: Transformation) -> Self {
        self.iter().map(|item| item.transform(trans)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflects_before_rotating() {
        let trans = Transformation::from_parts(true, 90., Point::new(10., 0.));
        assert_eq!(trans.apply(Point::new(1., 2.)), Point::new(12., 1.));
        assert_eq!(trans.apply_angle(90.), 0.);
    }

    #[test]
    fn composition_matches_sequential_application() {
        let inner = Transformation::from_parts(false, 270., Point::new(4., -3.));
        let outer = Transformation::from_parts(true, 90., Point::new(0., 8.));
        for p in [Point::new(1., 1.), Point::new(-6., 2.5), Point::zero()] {
            assert_eq!(inner.then(outer).apply(p), outer.apply(inner.apply(p)));
        }
        assert_eq!(
            inner.then(outer).apply_angle(30.),
            outer.apply_angle(inner.apply_angle(30.))
        );
    }
}
