//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::bbox::Bbox;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::shape::Shape;
use crate::transform::{Transform, Transformation};

/// An axis-aligned rectangle, specified by lower-left and upper-right corners.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    /// The lower-left corner.
    p0: Point,
    /// The upper-right corner.
    p1: Point,
}

impl Rect {
    /// Creates a rectangle from two opposite corners, in any order.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::new(Point::new(30., 40.), Point::new(10., 20.));
    /// assert_eq!(rect.left(), 10.);
    /// assert_eq!(rect.top(), 40.);
    /// ```
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            p0: Point::new(a.x().min(b.x()), a.y().min(b.y())),
            p1: Point::new(a.x().max(b.x()), a.y().max(b.y())),
        }
    }

    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// # Panics
    ///
    /// This method panics if `left > right` or if `bot > top`.
    pub fn from_sides(left: f64, bot: f64, right: f64, top: f64) -> Self {
        assert!(
            left <= right,
            "Rect::from_sides requires that left ({}) <= right ({})",
            left,
            right
        );
        assert!(
            bot <= top,
            "Rect::from_sides requires that bot ({}) <= top ({})",
            bot,
            top
        );
        Self {
            p0: Point::new(left, bot),
            p1: Point::new(right, top),
        }
    }

    /// Creates a rectangle of the given dimensions centered on `center`.
    ///
    /// Negative dimensions are treated as their absolute values.
    pub fn from_center_dims(center: Point, dims: Point) -> Self {
        let half = Point::new(dims.x().abs(), dims.y().abs()) / 2.;
        Self {
            p0: center - half,
            p1: center + half,
        }
    }

    /// Creates a rectangle with its lower-left corner at `origin` and the given dimensions.
    pub fn from_origin_dims(origin: Point, dims: Point) -> Self {
        Self::new(origin, origin + dims)
    }

    /// The lower-left corner.
    pub fn p0(&self) -> Point {
        self.p0
    }

    /// The upper-right corner.
    pub fn p1(&self) -> Point {
        self.p1
    }

    /// The left edge coordinate.
    pub fn left(&self) -> f64 {
        self.p0.x()
    }

    /// The bottom edge coordinate.
    pub fn bot(&self) -> f64 {
        self.p0.y()
    }

    /// The right edge coordinate.
    pub fn right(&self) -> f64 {
        self.p1.x()
    }

    /// The top edge coordinate.
    pub fn top(&self) -> f64 {
        self.p1.y()
    }

    /// The horizontal extent.
    pub fn width(&self) -> f64 {
        self.p1.x() - self.p0.x()
    }

    /// The vertical extent.
    pub fn height(&self) -> f64 {
        self.p1.y() - self.p0.y()
    }

    /// The width and height as a point.
    pub fn dims(&self) -> Point {
        self.p1 - self.p0
    }

    /// The center point.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0., 0., 55., 45.);
    /// assert_eq!(rect.center(), Point::new(27.5, 22.5));
    /// ```
    pub fn center(&self) -> Point {
        (self.p0 + self.p1) / 2.
    }

    /// The area enclosed by the rectangle.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns `true` if the rectangle has zero width or height.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= crate::EPSILON || self.height() <= crate::EPSILON
    }

    /// The four corners in counter-clockwise order starting from the lower left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.p0,
            Point::new(self.p1.x(), self.p0.y()),
            self.p1,
            Point::new(self.p0.x(), self.p1.y()),
        ]
    }

    /// Returns `true` if `p` lies inside the rectangle or on its boundary.
    pub fn contains(&self, p: &Point) -> bool {
        p.x() >= self.left() - crate::EPSILON
            && p.x() <= self.right() + crate::EPSILON
            && p.y() >= self.bot() - crate::EPSILON
            && p.y() <= self.top() + crate::EPSILON
    }

    /// Returns `true` if `p` lies strictly inside the rectangle.
    pub fn contains_strictly(&self, p: &Point) -> bool {
        p.x() > self.left() + crate::EPSILON
            && p.x() < self.right() - crate::EPSILON
            && p.y() > self.bot() + crate::EPSILON
            && p.y() < self.top() - crate::EPSILON
    }

    /// Returns `true` if `other` lies entirely within `self`.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let outer = Rect::from_sides(0., 0., 10., 10.);
    /// assert!(outer.contains_rect(&Rect::from_sides(2., 2., 10., 5.)));
    /// assert!(!outer.contains_rect(&Rect::from_sides(2., 2., 11., 5.)));
    /// ```
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(&other.p0) && self.contains(&other.p1)
    }

    /// Returns `true` if the interiors of the two rectangles overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right() - crate::EPSILON
            && other.left() < self.right() - crate::EPSILON
            && self.bot() < other.top() - crate::EPSILON
            && other.bot() < self.top() - crate::EPSILON
    }

    /// Returns `true` if the segment from `a` to `b` passes through the interior
    /// of the rectangle.
    ///
    /// Segments that only touch the boundary do not cross.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0., 0., 10., 10.);
    /// assert!(rect.crosses_segment(Point::new(-5., 5.), Point::new(15., 5.)));
    /// assert!(!rect.crosses_segment(Point::new(-5., 10.), Point::new(15., 10.)));
    /// assert!(!rect.crosses_segment(Point::new(5., 20.), Point::new(5., 10.)));
    /// ```
    pub fn crosses_segment(&self, a: Point, b: Point) -> bool {
        if self.is_degenerate() {
            return false;
        }
        // Liang-Barsky clipping against the open rectangle.
        let d = b - a;
        let mut t0: f64 = 0.;
        let mut t1: f64 = 1.;
        let checks = [
            (-d.x(), a.x() - self.left()),
            (d.x(), self.right() - a.x()),
            (-d.y(), a.y() - self.bot()),
            (d.y(), self.top() - a.y()),
        ];
        for (p, q) in checks {
            if p.abs() <= crate::EPSILON {
                if q <= crate::EPSILON {
                    return false;
                }
            } else {
                let r = q / p;
                if p < 0. {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
        }
        if t1 - t0 <= crate::EPSILON {
            return false;
        }
        let mid = a + d * ((t0 + t1) / 2.);
        self.contains_strictly(&mid)
    }

    /// Returns the smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            p0: Point::new(
                self.left().min(other.left()),
                self.bot().min(other.bot()),
            ),
            p1: Point::new(
                self.right().max(other.right()),
                self.top().max(other.top()),
            ),
        }
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Rect {
        Rect::new(
            self.p0 - Point::new(amount, amount),
            self.p1 + Point::new(amount, amount),
        )
    }

    /// Converts the rectangle into an equivalent polygon.
    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_verts(self.corners().to_vec())
    }

    /// Transforms the rectangle, producing a [`Shape::Rect`] for right-angle
    /// rotations and a [`Shape::Polygon`] otherwise.
    pub fn transform_shape(&self, trans: Transformation) -> Shape {
        if trans.is_manhattan() {
            Shape::Rect(Rect::new(trans.apply(self.p0), trans.apply(self.p1)))
        } else {
            Shape::Polygon(self.to_polygon().transform(trans))
        }
    }
}

impl Bbox for Rect {
    fn bbox(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl Transform for Rect {
    /// Transforms the corners of the rectangle.
    ///
    /// For rotations that are not multiples of 90 degrees this returns the bounding
    /// box of the rotated corners; use [`Rect::transform_shape`] to keep the exact outline.
    fn transform(&self, trans: Transformation) -> Self {
        let corners = self.corners().map(|p| trans.apply(p));
        corners[1..]
            .iter()
            .fold(Rect::from_point(corners[0]), |acc, p| {
                acc.union(&Rect::from_point(*p))
            })
    }
}

impl Rect {
    /// Creates a zero-area rectangle containing the given point.
    pub const fn from_point(p: Point) -> Self {
        Self { p0: p, p1: p }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_expand() {
        let a = Rect::from_sides(0., 0., 10., 5.);
        let b = Rect::from_sides(-5., 2., 4., 20.);
        assert_eq!(a.union(&b), Rect::from_sides(-5., 0., 10., 20.));
        assert_eq!(a.expand(1.), Rect::from_sides(-1., -1., 11., 6.));
    }

    #[test]
    fn segment_crossing_ignores_boundary_contact() {
        let rect = Rect::from_sides(0., 250., 300., 550.);
        assert!(!rect.crosses_segment(Point::new(-50., 200.), Point::new(-50., 600.)));
        assert!(!rect.crosses_segment(Point::new(100., 600.), Point::new(100., 550.)));
        assert!(rect.crosses_segment(Point::new(200., 0.), Point::new(100., 550.)));
    }

    #[test]
    fn transforms_by_right_angles() {
        let rect = Rect::from_sides(0., 0., 10., 20.);
        let rotated = rect.transform(Transformation::rotate(90.));
        assert_eq!(rotated, Rect::from_sides(-20., 0., 0., 10.));
        assert!(matches!(
            rect.transform_shape(Transformation::rotate(45.)),
            Shape::Polygon(_)
        ));
    }
}
