//! An enumeration of geometric shapes and their properties.

use crate::{
    bbox::Bbox,
    polygon::Polygon,
    rect::Rect,
    transform::{Transform, Transformation},
};

/// An enumeration of geometric shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A rectangle.
    Rect(Rect),
    /// A polygon.
    Polygon(Polygon),
}

impl Shape {
    /// If this shape is a rectangle, returns the contained rectangle.
    /// Otherwise, returns [`None`].
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(*r),
            _ => None,
        }
    }

    /// If this shape is a polygon, returns the contained polygon.
    /// Otherwise, returns [`None`].
    pub fn polygon(&self) -> Option<&Polygon> {
        match self {
            Self::Polygon(p) => Some(p),
            _ => None,
        }
    }

    /// The area enclosed by the shape.
    pub fn area(&self) -> f64 {
        match self {
            Shape::Rect(rect) => rect.area(),
            Shape::Polygon(polygon) => polygon.area(),
        }
    }
}

impl Transform for Shape {
    fn transform(&self, trans: Transformation) -> Self {
        match self {
            Shape::Rect(rect) => rect.transform_shape(trans),
            Shape::Polygon(polygon) => Shape::Polygon(polygon.transform(trans)),
        }
    }
}

impl Bbox for Shape {
    fn bbox(&self) -> Option<Rect> {
        match self {
            Shape::Rect(rect) => rect.bbox(),
            Shape::Polygon(polygon) => polygon.bbox(),
        }
    }
}

impl From<Rect> for Shape {
    #[inline]
    fn from(value: Rect) -> Self {
        Self::Rect(value)
    }
}

impl From<Polygon> for Shape {
    #[inline]
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}
