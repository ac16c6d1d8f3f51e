//! Pads on every port.

use arcstr::ArcStr;

use super::{stage_accessors, stage_name};
use crate::context::Context;
use crate::error::Result;
use crate::layout::{Cell, Instance};
use crate::params::ParamStore;
use crate::part::LayoutPart;
use crate::pcells::Pad;

/// Adds a [`Pad`] to every port of the wrapped part.
///
/// Each pad's feed is as wide as the port it attaches to. The ports of the wrapped
/// part are kept, and each pad's far edge is exposed as `<port>_pad`.
#[derive(Debug, Clone)]
pub struct WithPads<P> {
    inner: P,
    params: ParamStore,
    pad: Pad,
}

impl<P: LayoutPart> WithPads<P> {
    /// Wraps `inner`.
    pub fn new(inner: P) -> Self {
        let pad = Pad::new(arcstr::format!("{}Pad", inner.name()));
        Self {
            inner,
            params: ParamStore::empty(),
            pad,
        }
    }

    /// The wrapped part.
    pub fn base(&self) -> &P {
        &self.inner
    }

    /// The pad template.
    pub fn pad(&self) -> &Pad {
        &self.pad
    }
}

impl<P: LayoutPart> LayoutPart for WithPads<P> {
    fn type_name(&self) -> ArcStr {
        stage_name("WithPads", &self.inner)
    }

    stage_accessors!();

    fn components(&self) -> Vec<(&'static str, &dyn LayoutPart)> {
        vec![("Pad", &self.pad as &dyn LayoutPart)]
    }

    fn components_mut(&mut self) -> Vec<(&'static str, &mut dyn LayoutPart)> {
        vec![("Pad", &mut self.pad as &mut dyn LayoutPart)]
    }

    fn layout(&self, ctx: &Context) -> Result<Cell> {
        let base = ctx.draw(&self.inner)?;
        let mut cell = Cell::wrapping(self.type_name(), base.clone());
        for port in base.ports() {
            let mut pad = self.pad.clone();
            pad.params_mut().set("width", port.width())?;
            let mut inst = Instance::new(ctx.draw(&pad)?);
            inst.connect("conn", port, 0.)?;
            cell.add_port(
                inst.require_port("pad")?
                    .renamed(arcstr::format!("{}_pad", port.name())),
            );
            cell.add_instance(inst);
        }
        Ok(cell)
    }

    fn resistance_squares(&self) -> Option<f64> {
        self.inner.resistance_squares()
    }
}
