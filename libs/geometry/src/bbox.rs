//! Axis-aligned rectangular bounding boxes.

use impl_trait_for_tuples::impl_for_tuples;

use crate::rect::Rect;

/// A geometric shape that has a bounding box.
///
/// # Examples
///
/// ```
/// # use geometry::prelude::*;
/// let rect = Rect::from_sides(0., 0., 100., 200.);
/// assert_eq!(rect.bbox(), Some(Rect::from_sides(0., 0., 100., 200.)));
/// ```
pub trait Bbox {
    /// Computes the axis-aligned rectangular bounding box.
    ///
    /// If empty, this method should return `None`.
    fn bbox(&self) -> Option<Rect>;
}

/// Returns the bounding union of two optional rectangles.
pub fn union_opt(a: Option<Rect>, b: Option<Rect>) -> Option<Rect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (a, None) => a,
        (None, b) => b,
    }
}

impl<T> Bbox for &T
where
    T: Bbox + ?Sized,
{
    fn bbox(&self) -> Option<Rect> {
        T::bbox(*self)
    }
}

#[impl_for_tuples(32)]
impl Bbox for TupleIdentifier {
    #[allow(clippy::let_and_return)]
    fn bbox(&self) -> Option<Rect> {
        let mut bbox = None;
        for_tuples!( #( bbox = union_opt(bbox, TupleIdentifier.bbox()); )* );
        bbox
    }
}

impl<T: Bbox> Bbox for [T] {
    fn bbox(&self) -> Option<Rect> {
        self.iter().fold(None, |acc, item| union_opt(acc, item.bbox()))
    }
}

impl<T: Bbox> Bbox for Vec<T> {
    fn bbox(&self) -> Option<Rect> {
        self.as_slice().bbox()
    }
}

impl Bbox for Option<Rect> {
    fn bbox(&self) -> Option<Rect> {
        *self
    }
}

#[cfg(test)]
mod tests {
    use crate::{bbox::Bbox, point::Point, polygon::Polygon, rect::Rect};

    #[test]
    fn bbox_works_for_tuples() {
        let tuple = (
            Rect::from_sides(0., 0., 100., 200.),
            Rect::from_sides(-50., 20., 90., 250.),
        );
        assert_eq!(tuple.bbox(), Some(Rect::from_sides(-50., 0., 100., 250.)));
    }

    #[test]
    fn bbox_works_for_diff_types() {
        let points = vec![
            Point::new(-10., 25.),
            Point::new(0., 16.),
            Point::new(40., -20.),
        ];
        let tuple: (Rect, Polygon) = (
            Rect::from_sides(0., 0., 100., 200.),
            Polygon::from_verts(points),
        );
        assert_eq!(tuple.bbox(), Some(Rect::from_sides(-10., -20., 100., 200.)));
    }

    #[test]
    fn empty_vec_has_no_bbox() {
        let v: Vec<Rect> = Vec::new();
        assert_eq!(v.bbox(), None);
    }
}
