//! Series chains of devices.

use std::sync::Arc;

use arcstr::ArcStr;
use once_cell::sync::Lazy;

use super::{stage_accessors, stage_name};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::layout::{Cell, Instance};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;

static SCHEMA: Lazy<Arc<ParamSchema>> =
    Lazy::new(|| Arc::new(ParamSchema::new([ParamDecl::new("n_paths", 2).range(Some(1.), None)])));

/// Chains `n_paths` copies of the wrapped part, each copy's `bottom` port meeting the
/// previous copy's `top` port.
///
/// The first copy stays in place. The chain's ends are exposed as `bottom` and `top`.
#[derive(Debug, Clone)]
pub struct Stacked<P> {
    inner: P,
    params: ParamStore,
}

impl<P: LayoutPart> Stacked<P> {
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
    pub fn n_paths(&self) -> usize {
        self.params.i64("n_paths") as usize
    }
}

impl<P: LayoutPart> LayoutPart for Stacked<P> {
    fn type_name(&self) -> ArcStr {
        stage_name("Stacked", &self.inner)
    }

    stage_accessors!();

    fn layout(&self, ctx: &Context) -> Result<Cell> {
        let base = ctx.draw(&self.inner)?;
        for name in ["top", "bottom"] {
            if base.port(name).is_none() {
                return Err(Error::MissingPort {
                    part: self.inner.type_name(),
                    port: ArcStr::from(name),
                });
            }
        }

        let mut cell = Cell::new(self.type_name());
        let first = Instance::new(base.clone());
        cell.add_port(first.require_port("bottom")?);
        let mut top = first.require_port("top")?;
        cell.add_instance(first);
        for _ in 1..self.n_paths() {
            let mut inst = Instance::new(base.clone());
            inst.connect("bottom", &top, 0.)?;
            top = inst.require_port("top")?;
            cell.add_instance(inst);
        }
        cell.add_port(top);
        Ok(cell)
    }

    /// The copies are in series.
    fn resistance_squares(&self) -> Option<f64> {
        Some(self.inner.resistance_squares()? * self.n_paths() as f64)
    }
}
