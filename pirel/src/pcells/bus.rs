//! Bus bars feeding transducer fingers.

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
        ParamDecl::new("size", Point::new(180., 20.)).positive(),
        ParamDecl::new("distance", Point::new(0., 130.)),
        layer_decl("layer", Layer::IDT),
    ]))
});

/// A pair of parallel strips of equal `size`, the second offset from the first by
/// `distance`.
#[derive(Debug, Clone)]
pub struct Bus {
    name: ArcStr,
    params: ParamStore,
}

impl Bus {
    /// Creates a bus with default parameters.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            params: ParamStore::new(SCHEMA.clone()),
        }
    }

    /// The size of each strip.
    pub fn size(&self) -> Point {
        self.params.point("size")
    }

    /// The offset of the top strip from the bottom strip.
    pub fn distance(&self) -> Point {
        self.params.point("distance")
    }
}

impl LayoutPart for Bus {
    fn type_name(&self) -> ArcStr {
        arcstr::literal!("Bus")
    }

    part_accessors!();

    fn layout(&self, _ctx: &Context) -> Result<Cell> {
        let size = self.size();
        let distance = self.distance();
        let layer = Layer::from_param(self.params.i64("layer"));

        let mut cell = Cell::new(self.name.clone());
        cell.add_shape(layer, Rect::from_origin_dims(Point::zero(), size));
        cell.add_shape(layer, Rect::from_origin_dims(distance, size));
        cell.add_port(Port::new(
            "bottom",
            Point::new(size.x() / 2., 0.),
            size.x(),
            270.,
        ));
        cell.add_port(Port::new(
            "top",
            Point::new(distance.x() + size.x() / 2., distance.y() + size.y()),
            size.x(),
            90.,
        ));
        Ok(cell)
    }

    /// Two strips in parallel, each `size.x / size.y` squares long.
    fn resistance_squares(&self) -> Option<f64> {
        let size = self.size();
        Some(size.x() / size.y() / 2.)
    }
}
