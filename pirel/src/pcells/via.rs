//! Vias to the bottom electrode.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Point, Polygon, Rect};
use once_cell::sync::Lazy;

use super::{layer_decl, part_accessors};
use crate::context::Context;
use crate::error::Result;
use crate::layout::{Cell, Layer};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;

const CIRCLE_SEGMENTS: usize = 64;

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([
        ParamDecl::new("size", 50.).positive(),
        ParamDecl::new("shape", "square").one_of(["square", "circle"]),
        layer_decl("layer", Layer::VIA),
    ]))
});

/// A square or circular via of side (or diameter) `size`, centered at the origin.
#[derive(Debug, Clone)]
pub struct Via {
    name: ArcStr,
    params: ParamStore,
}

impl Via {
    /// Creates a via with default parameters.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            params: ParamStore::new(SCHEMA.clone()),
        }
    }

    /// The side length or diameter.
    pub fn size(&self) -> f64 {
        self.params.f64("size")
    }
}

impl LayoutPart for Via {
    fn type_name(&self) -> ArcStr {
        arcstr::literal!("Via")
    }

    part_accessors!();

    fn layout(&self, _ctx: &Context) -> Result<Cell> {
        let size = self.size();
        let layer = Layer::from_param(self.params.i64("layer"));
        let mut cell = Cell::new(self.name.clone());
        match self.params.str("shape").as_str() {
            "circle" => cell.add_shape(
                layer,
                Polygon::circle(Point::zero(), size / 2., CIRCLE_SEGMENTS),
            ),
            _ => cell.add_shape(
                layer,
                Rect::from_center_dims(Point::zero(), Point::new(size, size)),
            ),
        }
        Ok(cell)
    }
}
