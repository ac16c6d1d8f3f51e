//! 2-D points.

use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::transform::{Transform, Transformation};

/// An immutable point in two-dimensional space.
///
/// Points double as two-field parameter values, so they hash and compare
/// by their coordinate pair.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialOrd)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new [`Point`] from (x,y) coordinates.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the origin, `(0, 0)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let origin = Point::zero();
    /// assert_eq!(origin, Point::new(0., 0.));
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0., y: 0. }
    }

    /// Returns the unit vector pointing at `angle` degrees counter-clockwise from the x axis.
    ///
    /// Multiples of 90 degrees are exact.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Point::unit_from_angle(90.), Point::new(0., 1.));
    /// assert_eq!(Point::unit_from_angle(180.), Point::new(-1., 0.));
    /// ```
    pub fn unit_from_angle(angle: f64) -> Self {
        let angle = crate::wrap_angle(angle);
        if angle == 0. {
            Self::new(1., 0.)
        } else if angle == 90. {
            Self::new(0., 1.)
        } else if angle == 180. {
            Self::new(-1., 0.)
        } else if angle == 270. {
            Self::new(0., -1.)
        } else {
            let rad = angle.to_radians();
            Self::new(rad.cos(), rad.sin())
        }
    }

    /// The x-coordinate of the point.
    #[inline]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// The y-coordinate of the point.
    #[inline]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Returns a copy of this point with its x-coordinate replaced.
    #[inline]
    pub const fn with_x(&self, x: f64) -> Self {
        Self::new(x, self.y)
    }

    /// Returns a copy of this point with its y-coordinate replaced.
    #[inline]
    pub const fn with_y(&self, y: f64) -> Self {
        Self::new(self.x, y)
    }

    /// The Euclidean length of the vector from the origin to this point.
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// The Euclidean distance between `self` and `other`.
    pub fn dist(&self, other: Point) -> f64 {
        (*self - other).norm()
    }

    /// The dot product of two vectors.
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z-component of the cross product of two vectors.
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Returns the vector scaled to unit length, or `None` for the zero vector.
    pub fn unit(&self) -> Option<Point> {
        let norm = self.norm();
        if norm <= crate::EPSILON {
            None
        } else {
            Some(*self / norm)
        }
    }

    /// Rotates this point about the origin by `angle` degrees counter-clockwise.
    pub fn rotate(&self, angle: f64) -> Self {
        self.transform(Transformation::rotate(angle))
    }

    /// Returns `true` if the two points coincide within [`EPSILON`](crate::EPSILON).
    pub fn approx_eq(&self, other: Point) -> bool {
        (self.x - other.x).abs() <= crate::EPSILON && (self.y - other.y).abs() <= crate::EPSILON
    }

    /// The bit patterns of the coordinates, with negative zero folded into zero.
    pub fn to_bits(&self) -> (u64, u64) {
        (normalized_bits(self.x), normalized_bits(self.y))
    }
}

/// Returns the bit pattern of `value`, mapping `-0.0` onto `0.0`.
pub fn normalized_bits(value: f64) -> u64 {
    if value == 0. {
        0f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// Points holding `NaN` coordinates are never produced by the layout generators;
/// for all other values equality is reflexive.
impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl Transform for Point {
    fn transform(&self, trans: Transformation) -> Self {
        trans.apply(*self)
    }
}

impl Add<Point> for Point {
    type Output = Self;
    fn add(self, rhs: Point) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Point> for Point {
    type Output = Self;
    fn sub(self, rhs: Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<Point> for (f64, f64) {
    fn from(value: Point) -> Self {
        (value.x, value.y)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn arithmetic() {
        let a = Point::new(3., 4.);
        let b = Point::new(1., -2.);
        assert_eq!(a + b, Point::new(4., 2.));
        assert_eq!(a - b, Point::new(2., 6.));
        assert_eq!(a * 2., Point::new(6., 8.));
        assert_eq!(a / 2., Point::new(1.5, 2.));
        assert_eq!(-a, Point::new(-3., -4.));
        assert_eq!(a.norm(), 5.);
    }

    #[test]
    fn hashes_by_coordinates() {
        let mut set = HashSet::new();
        set.insert(Point::new(0., 1.));
        set.insert(Point::new(-0., 1.));
        set.insert(Point::new(0., 1.));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn rotates_exactly_by_right_angles() {
        assert_eq!(Point::new(1., 0.).rotate(90.), Point::new(0., 1.));
        assert_eq!(Point::new(2., 1.).rotate(180.), Point::new(-2., -1.));
    }
}
