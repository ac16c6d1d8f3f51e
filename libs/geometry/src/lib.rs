//! 2-D geometric operations relevant to photomask layout.
//!
//! Coordinates are real-valued and expressed in microns.
//!
//! # Examples
//!
//! Create a [rectangle](crate::rect::Rect):
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_sides(10., 20., 30., 40.);
//! assert_eq!(rect.width(), 20.);
//! ```
#![warn(missing_docs)]

extern crate self as geometry;

pub mod bbox;
pub mod path;
pub mod point;
pub mod polygon;
pub mod port;
pub mod prelude;
pub mod rect;
pub mod shape;
pub mod transform;

/// The tolerance used when comparing coordinates for coincidence.
pub const EPSILON: f64 = 1e-9;

/// Wraps the given angle to the interval `[0, 360)` degrees.
///
/// # Examples
///
/// ```
/// use geometry::wrap_angle;
///
/// assert_eq!(wrap_angle(10.), 10.);
/// assert_eq!(wrap_angle(-10.), 350.);
/// assert_eq!(wrap_angle(-740.), 340.);
/// assert_eq!(wrap_angle(725.), 5.);
/// assert_eq!(wrap_angle(360.), 0.);
/// assert_eq!(wrap_angle(-360.), 0.);
/// ```
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = ((angle % 360.) + 360.) % 360.;
    // `-0.0 % 360.` and friends.
    if wrapped == 0. {
        0.
    } else {
        wrapped
    }
}
