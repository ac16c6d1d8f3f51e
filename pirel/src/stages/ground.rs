//! Enlarged ground pads.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Point, Rect};
use once_cell::sync::Lazy;

use super::{stage_accessors, stage_name};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::layout::{Cell, Layer};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;
use crate::pcells::layer_decl;

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([
        ParamDecl::new("ground_size", Point::new(200., 200.)).positive(),
        layer_decl("ground_layer", Layer::BOTTOM),
    ]))
});

/// Extends both probe ground pads of the wrapped part outwards into planes of
/// `ground_size`.
///
/// Each plane hangs below its pad's port, flush with the pad's outer edge. The wrapped
/// part must expose `probe_gnd_left` and `probe_gnd_right`, as [`WithProbe`](super::WithProbe)
/// does.
#[derive(Debug, Clone)]
pub struct WithLargeGround<P> {
    inner: P,
    params: ParamStore,
}

impl<P: LayoutPart> WithLargeGround<P> {
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
}

impl<P: LayoutPart> LayoutPart for WithLargeGround<P> {
    fn type_name(&self) -> ArcStr {
        stage_name("WithLargeGround", &self.inner)
    }

    stage_accessors!();

    fn layout(&self, ctx: &Context) -> Result<Cell> {
        let base = ctx.draw(&self.inner)?;
        let size = self.params.point("ground_size");
        let layer = Layer::from_param(self.params.i64("ground_layer"));

        let mut planes = Vec::with_capacity(2);
        for (name, outward) in [("probe_gnd_left", -1.), ("probe_gnd_right", 1.)] {
            let port = base.port(name).ok_or_else(|| Error::MissingPort {
                part: self.inner.type_name(),
                port: ArcStr::from(name),
            })?;
            let (x, y) = (port.center().x(), port.center().y());
            let edge = x + outward * port.width() / 2.;
            let inner_edge = edge - outward * size.x();
            planes.push(Rect::from_sides(
                edge.min(inner_edge),
                y - size.y(),
                edge.max(inner_edge),
                y,
            ));
        }

        let mut cell = Cell::wrapping(self.type_name(), base);
        for plane in planes {
            cell.add_shape(layer, plane);
        }
        Ok(cell)
    }

    fn resistance_squares(&self) -> Option<f64> {
        self.inner.resistance_squares()
    }
}
