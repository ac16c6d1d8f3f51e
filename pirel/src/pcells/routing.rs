//! Traces routed around a keep-out rectangle.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Point, Port, Rect};
use once_cell::sync::Lazy;

use super::{layer_decl, part_accessors};
use crate::context::Context;
use crate::error::Result;
use crate::layout::{Cell, Layer};
use crate::params::{ParamDecl, ParamSchema, ParamStore, ValidationError};
use crate::part::LayoutPart;
use crate::routing::{self, Side};

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([
        ParamDecl::new("trace_width", 50.).positive(),
        ParamDecl::new(
            "clearance",
            vec![Point::new(0., 250.), Point::new(300., 550.)],
        ),
        ParamDecl::new("side", Side::Auto.as_str()).one_of(Side::ALL.map(|s| s.as_str())),
        ParamDecl::new("source", Port::new("source", Point::zero(), 50., 90.)),
        ParamDecl::new(
            "destination",
            vec![Port::new("destination", Point::new(150., 600.), 50., 270.)],
        ),
        layer_decl("layer", Layer::IDT),
    ]))
});

/// Traces from a `source` port to each `destination` port, detouring around the
/// `clearance` rectangle when required.
///
/// Corners are rounded with a radius of `trace_width`, using the number of segments
/// configured in [`RoutingConfig`](config::RoutingConfig).
#[derive(Debug, Clone)]
pub struct Routing {
    name: ArcStr,
    params: ParamStore,
}

impl Routing {
    /// Creates a routing with default parameters.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            params: ParamStore::new(SCHEMA.clone()),
        }
    }

    /// The trace width.
    pub fn trace_width(&self) -> f64 {
        self.params.f64("trace_width")
    }

    /// The preferred detour side.
    pub fn side(&self) -> Side {
        self.params.str("side").parse().unwrap_or_default()
    }

    /// The source port.
    pub fn source(&self) -> &Port {
        self.params.port("source")
    }

    /// The keep-out rectangle, spanned by two opposite corners.
    pub fn clearance(&self) -> Result<Rect> {
        match self.params.list("clearance") {
            [a, b] => match (a.as_point(), b.as_point()) {
                (Some(a), Some(b)) => Ok(Rect::new(a, b)),
                _ => Err(self.malformed("clearance", "corners must be points")),
            },
            corners => Err(self.malformed(
                "clearance",
                format!("expected 2 corners, found {}", corners.len()),
            )),
        }
    }

    /// The destination ports.
    pub fn destinations(&self) -> Result<Vec<Port>> {
        self.params
            .list("destination")
            .iter()
            .map(|v| {
                v.as_port()
                    .cloned()
                    .ok_or_else(|| self.malformed("destination", format!("{v} is not a port")))
            })
            .collect()
    }

    /// Points the routing from `source` to every port in `destinations`, avoiding
    /// `clearance`.
    pub fn configure(
        &mut self,
        source: Port,
        destinations: Vec<Port>,
        clearance: Rect,
    ) -> Result<()> {
        self.params.set("source", source)?;
        self.params.set("destination", destinations)?;
        self.params.set("clearance", vec![clearance.p0(), clearance.p1()])?;
        Ok(())
    }

    fn malformed(&self, name: &str, reason: impl Into<String>) -> crate::error::Error {
        let label = self
            .params
            .schema()
            .get(name)
            .map(|decl| decl.label().clone())
            .unwrap_or_else(|| ArcStr::from(name));
        ValidationError::Malformed {
            label,
            reason: reason.into(),
        }
        .into()
    }
}

impl LayoutPart for Routing {
    fn type_name(&self) -> ArcStr {
        arcstr::literal!("Routing")
    }

    part_accessors!();

    fn layout(&self, ctx: &Context) -> Result<Cell> {
        let width = self.trace_width();
        let clearance = self.clearance()?;
        let source = self.source();
        let side = self.side();
        let segments = ctx.config().routing.smoothing_segments;
        let layer = Layer::from_param(self.params.i64("layer"));

        let mut cell = Cell::new(self.name.clone());
        cell.add_port(source.clone());
        for dest in self.destinations()? {
            let path = routing::route(source, &dest, &clearance, side, width)?;
            if let Some(trace) = path.smoothed(width, segments).extrude(width) {
                cell.add_shape(layer, trace);
            }
            cell.add_port(dest);
        }
        Ok(cell)
    }
}
