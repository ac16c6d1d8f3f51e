//! Open and short calibration structures.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Port, Rect};
use once_cell::sync::Lazy;

use super::{stage_accessors, stage_name};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::layout::{port_extension, Cell, Layer};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;
use crate::pcells::layer_decl;

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([
        ParamDecl::new("style", "open").one_of(["open", "short"]),
        layer_decl("fixture_layer", Layer::IDT),
    ]))
});

/// Replaces the wrapped device with an open or short between its `bottom` and `top`
/// ports, for de-embedding measurements.
///
/// The device itself is not drawn, but all of its ports are kept, so any stages
/// wrapping the fixture see the same terminals. An open draws a stub a third of the
/// gap long at each port; a short joins the ports with metal.
#[derive(Debug, Clone)]
pub struct Fixture<P> {
    inner: P,
    params: ParamStore,
}

impl<P: LayoutPart> Fixture<P> {
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

    /// Returns `true` if the fixture shorts the terminals.
    pub fn is_short(&self) -> bool {
        self.params.str("style").as_str() == "short"
    }

    fn terminal(&self, base: &Cell, name: &str) -> Result<Port> {
        base.port(name).cloned().ok_or_else(|| Error::MissingPort {
            part: self.inner.type_name(),
            port: ArcStr::from(name),
        })
    }

    fn gap(&self, bottom: &Port, top: &Port) -> Result<f64> {
        let gap = top.center().y() - bottom.center().y();
        if gap <= 0. {
            return Err(Error::Placement {
                part: self.type_name(),
                feature: "fixture",
                reason: format!("the `top` port lies {} below the `bottom` port", -gap),
            });
        }
        Ok(gap)
    }
}

impl<P: LayoutPart> LayoutPart for Fixture<P> {
    fn type_name(&self) -> ArcStr {
        stage_name("Fixture", &self.inner)
    }

    stage_accessors!();

    fn layout(&self, ctx: &Context) -> Result<Cell> {
        let base = ctx.draw(&self.inner)?;
        let bottom = self.terminal(&base, "bottom")?;
        let top = self.terminal(&base, "top")?;
        let gap = self.gap(&bottom, &top)?;
        let layer = Layer::from_param(self.params.i64("fixture_layer"));

        let mut cell = Cell::new(self.type_name());
        if self.is_short() {
            let width = bottom.width().max(top.width());
            let x = (bottom.center().x() + top.center().x()) / 2.;
            cell.add_shape(
                layer,
                Rect::from_sides(
                    x - width / 2.,
                    bottom.center().y(),
                    x + width / 2.,
                    top.center().y(),
                ),
            );
        } else {
            for port in [&bottom, &top] {
                cell.add_shape(layer, port_extension(&port.flipped(), port.width(), gap / 3., 0.));
            }
        }
        cell.add_ports(base.ports().cloned());
        Ok(cell)
    }

    /// An ideal short has no resistance; an open has none defined.
    fn resistance_squares(&self) -> Option<f64> {
        self.is_short().then_some(0.)
    }
}
