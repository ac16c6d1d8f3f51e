//! PIREL: parametric photomask layout generation for MEMS piezoelectric resonators.
//!
//! Devices are [`LayoutPart`](part::LayoutPart)s: trees of parameterized components whose
//! combined parameter space can be exported to and imported from a flat, string-keyed
//! dictionary. Cross-cutting behavior such as vias, pads, probes, arrays and unit
//! normalization is layered on by wrapping a part in [behavior stages](stages).
//! Drawing goes through a [`Context`](context::Context), which memoizes generated
//! layouts by the full parameter state of each part.
//!
//! ```
//! use pirel::prelude::*;
//!
//! let ctx = Context::default();
//! let mut res = LfeRes::new("res").scaled().with_via();
//! res.set_params(ParamAssignments::new().with("IDTN", 8).with("ViaSide", "bottom"))
//!     .unwrap();
//!
//! let cell = res.draw(&ctx).unwrap();
//! assert!(cell.port("bottom_via").is_some());
//! ```
#![warn(missing_docs)]

extern crate self as pirel;

pub use test_log::test;

pub mod cache;
pub mod context;
pub mod error;
pub mod layout;
pub mod params;
pub mod part;
pub mod pcells;
pub mod prelude;
pub mod routing;
pub mod stages;

#[doc(inline)]
pub use geometry;

#[cfg(test)]
mod tests;
