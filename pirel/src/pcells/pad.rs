//! Probe landing pads.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Point, Port, Rect};
use once_cell::sync::Lazy;

use super::{layer_decl, part_accessors};
use crate::context::Context;
use crate::error::Result;
use crate::layout::{Cell, Layer};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([
        ParamDecl::new("size", 80.).positive(),
        ParamDecl::new("distance", 40.).range(Some(0.), None),
        ParamDecl::new("width", 20.).positive(),
        layer_decl("layer", Layer::PAD),
    ]))
});

/// A square pad of side `size` fed by a strip of `width` and length `distance`.
///
/// The feed starts at the `conn` port at the origin, facing down; the pad's far edge
/// carries the `pad` port, facing up.
#[derive(Debug, Clone)]
pub struct Pad {
    name: ArcStr,
    params: ParamStore,
}

impl Pad {
    /// Creates a pad with default parameters.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            params: ParamStore::new(SCHEMA.clone()),
        }
    }

    /// The pad side length.
    pub fn size(&self) -> f64 {
        self.params.f64("size")
    }

    /// The length of the feed strip.
    pub fn distance(&self) -> f64 {
        self.params.f64("distance")
    }

    /// The width of the feed strip.
    pub fn width(&self) -> f64 {
        self.params.f64("width")
    }
}

impl LayoutPart for Pad {
    fn type_name(&self) -> ArcStr {
        arcstr::literal!("Pad")
    }

    part_accessors!();

    fn layout(&self, _ctx: &Context) -> Result<Cell> {
        let (size, distance, width) = (self.size(), self.distance(), self.width());
        let layer = Layer::from_param(self.params.i64("layer"));

        let mut cell = Cell::new(self.name.clone());
        if distance > 0. {
            cell.add_shape(
                layer,
                Rect::from_sides(-width / 2., 0., width / 2., distance),
            );
        }
        cell.add_shape(
            layer,
            Rect::from_sides(-size / 2., distance, size / 2., distance + size),
        );
        cell.add_port(Port::new("conn", Point::zero(), width, 270.));
        cell.add_port(Port::new(
            "pad",
            Point::new(0., distance + size),
            size,
            90.,
        ));
        Ok(cell)
    }

    fn resistance_squares(&self) -> Option<f64> {
        Some(self.distance() / self.width())
    }
}
