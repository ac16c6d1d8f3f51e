//! Ground-signal-ground probe footprints.

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
        ParamDecl::new("pitch", 150.).positive(),
        ParamDecl::new("size", Point::new(80., 80.)).positive(),
        layer_decl("layer", Layer::PAD),
    ]))
});

/// Three pads on a `pitch` grid: ground, signal, ground.
///
/// The signal pad is centered at the origin. Each pad exposes a port on its top edge:
/// `gnd_left`, `sig` and `gnd_right`.
#[derive(Debug, Clone)]
pub struct Probe {
    name: ArcStr,
    params: ParamStore,
}

impl Probe {
    /// Creates a probe with default parameters.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            params: ParamStore::new(SCHEMA.clone()),
        }
    }

    /// The center-to-center pad spacing.
    pub fn pitch(&self) -> f64 {
        self.params.f64("pitch")
    }

    /// The pad size.
    pub fn size(&self) -> Point {
        self.params.point("size")
    }
}

impl LayoutPart for Probe {
    fn type_name(&self) -> ArcStr {
        arcstr::literal!("GSGProbe")
    }

    part_accessors!();

    fn layout(&self, _ctx: &Context) -> Result<Cell> {
        let pitch = self.pitch();
        let size = self.size();
        if size.x() >= pitch {
            return Err(Error::Placement {
                part: self.type_name(),
                feature: "pads",
                reason: format!("pads of width {} overlap at pitch {pitch}", size.x()),
            });
        }
        let layer = Layer::from_param(self.params.i64("layer"));

        let mut cell = Cell::new(self.name.clone());
        for (name, x) in [("gnd_left", -pitch), ("sig", 0.), ("gnd_right", pitch)] {
            let center = Point::new(x, 0.);
            cell.add_shape(layer, Rect::from_center_dims(center, size));
            cell.add_port(Port::new(
                name,
                Point::new(x, size.y() / 2.),
                size.x(),
                90.,
            ));
        }
        Ok(cell)
    }
}
