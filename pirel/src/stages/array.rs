//! Parallel arrays of devices.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Bbox, Point, Port, Rect};
use once_cell::sync::Lazy;

use super::{stage_accessors, stage_name};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::layout::{Cell, Instance, Layer};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;
use crate::pcells::layer_decl;

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([
        ParamDecl::new("n_blocks", 4).range(Some(1.), None),
        ParamDecl::new("connector_width", 20.).positive(),
        layer_decl("connector_layer", Layer::IDT),
    ]))
});

/// Tiles `n_blocks` copies of the wrapped part side by side, with no gap between
/// their bounding boxes.
///
/// Strips of `connector_width` join all `top` ports and all `bottom` ports, so the
/// copies are connected in parallel. The outer edges of the strips are exposed as
/// `top` and `bottom`.
#[derive(Debug, Clone)]
pub struct Arrayed<P> {
    inner: P,
    params: ParamStore,
}

impl<P: LayoutPart> Arrayed<P> {
    /// Wraps `inner`.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            params: ParamStore::new(SCHEMA.clone()),
        }
    }

    /// The wrapped part.
    pub fn base(&self) -> &P {
        &self.inner
    }

    /// The number of copies.
    pub fn n_blocks(&self) -> usize {
        self.params.i64("n_blocks") as usize
    }
}

/// The horizontal extent of a port facing up or down.
fn x_span(port: &Port) -> (f64, f64) {
    let (a, b) = port.endpoints();
    (a.x().min(b.x()), a.x().max(b.x()))
}

impl<P: LayoutPart> LayoutPart for Arrayed<P> {
    fn type_name(&self) -> ArcStr {
        stage_name("Arrayed", &self.inner)
    }

    stage_accessors!();

    fn layout(&self, ctx: &Context) -> Result<Cell> {
        let base = ctx.draw(&self.inner)?;
        let mut terminals = Vec::with_capacity(2);
        for name in ["top", "bottom"] {
            terminals.push(base.port(name).cloned().ok_or_else(|| Error::MissingPort {
                part: self.inner.type_name(),
                port: ArcStr::from(name),
            })?);
        }
        let pitch = base.bbox().map(|b| b.width()).ok_or_else(|| Error::Placement {
            part: self.type_name(),
            feature: "array",
            reason: "the device has no geometry".to_string(),
        })?;
        let n = self.n_blocks();
        let width = self.params.f64("connector_width");
        let layer = Layer::from_param(self.params.i64("connector_layer"));
        let last = pitch * (n - 1) as f64;

        let mut cell = Cell::new(self.type_name());
        for i in 0..n {
            cell.add_instance(
                Instance::new(base.clone()).translated(Point::new(pitch * i as f64, 0.)),
            );
        }
        for port in terminals {
            let (left, right) = x_span(&port);
            let (left, right) = (left, right + last);
            let y = port.center().y();
            let outward = port.normal().y().signum();
            let edge = y + outward * width;
            cell.add_shape(
                layer,
                Rect::from_sides(left, y.min(edge), right, y.max(edge)),
            );
            cell.add_port(Port::new(
                port.name().clone(),
                Point::new((left + right) / 2., edge),
                right - left,
                port.orientation(),
            ));
        }
        Ok(cell)
    }

    /// The copies are in parallel.
    fn resistance_squares(&self) -> Option<f64> {
        Some(self.inner.resistance_squares()? / self.n_blocks() as f64)
    }
}
