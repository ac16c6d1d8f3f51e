//! Ground-signal-ground probe pads routed to a device.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Bbox, Point, Port, Rect};
use once_cell::sync::Lazy;

use super::{stage_accessors, stage_name};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::layout::{Cell, Instance};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;
use crate::pcells::{Probe, Routing};

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([ParamDecl::new(
        "probe_offset",
        Point::new(0., 150.),
    )]))
});

/// Places a [`Probe`] below the wrapped part and routes its pads to the part.
///
/// The signal pad sits `probe_offset` below the part, measured from the part's
/// `bottom` port horizontally and from its bounding box vertically, and is routed
/// to `bottom`. Both ground pads are routed around the part to `top`. The probe pads
/// are exposed as `probe_sig`, `probe_gnd_left` and `probe_gnd_right`.
#[derive(Debug, Clone)]
pub struct WithProbe<P> {
    inner: P,
    params: ParamStore,
    probe: Probe,
    sig_trace: Routing,
    gnd_left_trace: Routing,
    gnd_right_trace: Routing,
}

impl<P: LayoutPart> WithProbe<P> {
    /// Wraps `inner`.
    pub fn new(inner: P) -> Self {
        let name = inner.name().clone();
        Self {
            inner,
            params: ParamStore::new(SCHEMA.clone()),
            probe: Probe::new(arcstr::format!("{name}Probe")),
            sig_trace: Routing::new(arcstr::format!("{name}SigTrace")),
            gnd_left_trace: Routing::new(arcstr::format!("{name}GndLeftTrace")),
            gnd_right_trace: Routing::new(arcstr::format!("{name}GndRightTrace")),
        }
    }

    /// The wrapped part.
    pub fn base(&self) -> &P {
        &self.inner
    }

    /// The probe.
    pub fn probe(&self) -> &Probe {
        &self.probe
    }

    fn require_base_port<'a>(&self, base: &'a Cell, name: &str) -> Result<&'a Port> {
        base.port(name).ok_or_else(|| Error::MissingPort {
            part: self.inner.type_name(),
            port: ArcStr::from(name),
        })
    }
}

impl<P: LayoutPart> LayoutPart for WithProbe<P> {
    fn type_name(&self) -> ArcStr {
        stage_name("WithProbe", &self.inner)
    }

    stage_accessors!();

    fn components(&self) -> Vec<(&'static str, &dyn LayoutPart)> {
        vec![
            ("Probe", &self.probe as &dyn LayoutPart),
            ("SigTrace", &self.sig_trace as &dyn LayoutPart),
            ("GndLeftTrace", &self.gnd_left_trace as &dyn LayoutPart),
            ("GndRightTrace", &self.gnd_right_trace as &dyn LayoutPart),
        ]
    }

    fn components_mut(&mut self) -> Vec<(&'static str, &mut dyn LayoutPart)> {
        vec![
            ("Probe", &mut self.probe as &mut dyn LayoutPart),
            ("SigTrace", &mut self.sig_trace as &mut dyn LayoutPart),
            ("GndLeftTrace", &mut self.gnd_left_trace as &mut dyn LayoutPart),
            ("GndRightTrace", &mut self.gnd_right_trace as &mut dyn LayoutPart),
        ]
    }

    fn layout(&self, ctx: &Context) -> Result<Cell> {
        let base = ctx.draw(&self.inner)?;
        let bottom = self.require_base_port(&base, "bottom")?.clone();
        let top = self.require_base_port(&base, "top")?.clone();
        let bbox = base.bbox().ok_or_else(|| Error::Placement {
            part: self.type_name(),
            feature: "probe",
            reason: "the device has no geometry".to_string(),
        })?;
        // The region between the device terminals that ground traces must avoid.
        let clearance = Rect::from_sides(
            bbox.left(),
            bottom.center().y().min(top.center().y()),
            bbox.right(),
            bottom.center().y().max(top.center().y()),
        );

        let offset = self.params.point("probe_offset");
        let probe = ctx.draw(&self.probe)?;
        let sig = probe.require_port("sig")?.center();
        let target = Point::new(bottom.center().x() + offset.x(), bbox.bot() - offset.y());
        let probe = Instance::new(probe).translated(target - sig);

        let mut cell = Cell::wrapping(self.type_name(), base);
        let pads = [
            probe.require_port("sig")?,
            probe.require_port("gnd_left")?,
            probe.require_port("gnd_right")?,
        ];
        let traces = [
            (&self.sig_trace, &bottom),
            (&self.gnd_left_trace, &top),
            (&self.gnd_right_trace, &top),
        ];
        for (pad, (trace, dest)) in pads.iter().zip(traces) {
            let mut trace = trace.clone();
            trace.configure(pad.clone(), vec![dest.clone()], clearance)?;
            cell.add_instance(Instance::new(ctx.draw(&trace)?));
        }
        cell.add_instance(probe);
        cell.add_ports(
            pads.iter()
                .map(|pad| pad.renamed(arcstr::format!("probe_{}", pad.name()))),
        );
        Ok(cell)
    }

    fn resistance_squares(&self) -> Option<f64> {
        self.inner.resistance_squares()
    }
}
