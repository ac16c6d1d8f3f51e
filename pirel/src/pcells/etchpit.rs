//! Release etch pits flanking a resonator.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Point, Rect};
use once_cell::sync::Lazy;

use super::{layer_decl, part_accessors};
use crate::context::Context;
use crate::error::Result;
use crate::layout::{Cell, Layer};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([
        ParamDecl::new("active_area", Point::new(181., 190.)).positive(),
        ParamDecl::new("x", 50.).positive(),
        layer_decl("layer", Layer::ETCH_PIT),
    ]))
});

/// Two rectangular pits of width `x` on either side of an `active_area` anchored at
/// the origin.
#[derive(Debug, Clone)]
pub struct EtchPit {
    name: ArcStr,
    params: ParamStore,
}

impl EtchPit {
    /// Creates an etch pit with default parameters.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            params: ParamStore::new(SCHEMA.clone()),
        }
    }

    /// The area left unetched between the pits.
    pub fn active_area(&self) -> Point {
        self.params.point("active_area")
    }

    /// The width of each pit.
    pub fn x(&self) -> f64 {
        self.params.f64("x")
    }
}

impl LayoutPart for EtchPit {
    fn type_name(&self) -> ArcStr {
        arcstr::literal!("EtchPit")
    }

    part_accessors!();

    fn layout(&self, _ctx: &Context) -> Result<Cell> {
        let area = self.active_area();
        let x = self.x();
        let layer = Layer::from_param(self.params.i64("layer"));

        let mut cell = Cell::new(self.name.clone());
        cell.add_shape(layer, Rect::from_sides(-x, 0., 0., area.y()));
        cell.add_shape(layer, Rect::from_sides(area.x(), 0., area.x() + x, area.y()));
        Ok(cell)
    }
}
