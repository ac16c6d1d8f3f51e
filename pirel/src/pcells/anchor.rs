//! Tethers suspending a released resonator.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Point, Port, Rect};
use once_cell::sync::Lazy;

use super::{layer_decl, part_accessors};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::layout::{Cell, Layer};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([
        ParamDecl::new("size", Point::new(20., 20.)).positive(),
        ParamDecl::new("metalized", Point::new(10., 20.)).positive(),
        ParamDecl::new("etch_margin", Point::new(1., 1.)),
        ParamDecl::new("etch_choice", true),
        ParamDecl::new("x_offset", 0.),
        layer_decl("layer", Layer::IDT),
        layer_decl("etch_layer", Layer::ETCH_PIT),
    ]))
});

/// An anchor of `size` rising from `y = 0`, centered at `x_offset`, carrying a
/// `metalized` strip.
///
/// When `etch_choice` is set, etch windows are drawn on both sides of the anchor,
/// extended by `etch_margin`.
#[derive(Debug, Clone)]
pub struct Anchor {
    name: ArcStr,
    params: ParamStore,
}

impl Anchor {
    /// Creates an anchor with default parameters.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            params: ParamStore::new(SCHEMA.clone()),
        }
    }

    /// The size of the unetched anchor.
    pub fn size(&self) -> Point {
        self.params.point("size")
    }

    /// The size of the metal strip running along the anchor.
    pub fn metalized(&self) -> Point {
        self.params.point("metalized")
    }

    /// The horizontal offset of the anchor axis.
    pub fn x_offset(&self) -> f64 {
        self.params.f64("x_offset")
    }
}

impl LayoutPart for Anchor {
    fn type_name(&self) -> ArcStr {
        arcstr::literal!("Anchor")
    }

    part_accessors!();

    fn layout(&self, _ctx: &Context) -> Result<Cell> {
        let size = self.size();
        let metal = self.metalized();
        let margin = self.params.point("etch_margin");
        let x0 = self.x_offset();
        if metal.x() > size.x() {
            return Err(Error::Placement {
                part: self.type_name(),
                feature: "metalization",
                reason: format!(
                    "metal width {} exceeds anchor width {}",
                    metal.x(),
                    size.x()
                ),
            });
        }

        let layer = Layer::from_param(self.params.i64("layer"));
        let mut cell = Cell::new(self.name.clone());
        cell.add_shape(
            layer,
            Rect::from_sides(x0 - metal.x() / 2., 0., x0 + metal.x() / 2., metal.y()),
        );

        if self.params.bool("etch_choice") {
            let etch_layer = Layer::from_param(self.params.i64("etch_layer"));
            let (bot, top) = (-margin.y(), size.y() + margin.y());
            let half = size.x() / 2.;
            cell.add_shape(
                etch_layer,
                Rect::from_sides(x0 - half - margin.x(), bot, x0 - half, top),
            );
            cell.add_shape(
                etch_layer,
                Rect::from_sides(x0 + half, bot, x0 + half + margin.x(), top),
            );
        }

        cell.add_port(Port::new("bottom", Point::new(x0, 0.), metal.x(), 270.));
        cell.add_port(Port::new("top", Point::new(x0, metal.y()), metal.x(), 90.));
        Ok(cell)
    }

    fn resistance_squares(&self) -> Option<f64> {
        let metal = self.metalized();
        Some(metal.y() / metal.x())
    }
}
