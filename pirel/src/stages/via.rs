//! Vias to the bottom electrode.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Bbox, Point, Port, Transform};
use once_cell::sync::Lazy;

use super::{stage_accessors, stage_name};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::layout::{port_extension, Cell, Instance, Layer};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;
use crate::pcells::{layer_decl, Via};

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([
        ParamDecl::new("via_distance", 100.).range(Some(0.), None),
        ParamDecl::new("via_area", Point::new(100., 100.)).positive(),
        ParamDecl::new("via_side", "top").one_of(["top", "bottom"]),
        layer_decl("landing_layer", Layer::IDT),
    ]))
});

/// Adds a via beyond the `top` or `bottom` port of the wrapped part.
///
/// A strip of the port's width runs `via_distance` out of the port onto a landing
/// area of `via_area`, and the via is centered on the landing area. The landing area
/// is exposed as the `top_via` or `bottom_via` port.
#[derive(Debug, Clone)]
pub struct WithVia<P> {
    inner: P,
    params: ParamStore,
    via: Via,
}

impl<P: LayoutPart> WithVia<P> {
    /// Wraps `inner`.
    pub fn new(inner: P) -> Self {
        let via = Via::new(arcstr::format!("{}Via", inner.name()));
        Self {
            inner,
            params: ParamStore::new(SCHEMA.clone()),
            via,
        }
    }

    /// The wrapped part.
    pub fn base(&self) -> &P {
        &self.inner
    }

    /// The via.
    pub fn via(&self) -> &Via {
        &self.via
    }
}

impl<P: LayoutPart> LayoutPart for WithVia<P> {
    fn type_name(&self) -> ArcStr {
        stage_name("WithVia", &self.inner)
    }

    stage_accessors!();

    fn components(&self) -> Vec<(&'static str, &dyn LayoutPart)> {
        vec![("Via", &self.via as &dyn LayoutPart)]
    }

    fn components_mut(&mut self) -> Vec<(&'static str, &mut dyn LayoutPart)> {
        vec![("Via", &mut self.via as &mut dyn LayoutPart)]
    }

    fn layout(&self, ctx: &Context) -> Result<Cell> {
        let base = ctx.draw(&self.inner)?;
        let side = self.params.str("via_side").clone();
        let port = base.port(&side).cloned().ok_or_else(|| Error::MissingPort {
            part: self.inner.type_name(),
            port: side.clone(),
        })?;
        let distance = self.params.f64("via_distance");
        let area = self.params.point("via_area");
        let layer = Layer::from_param(self.params.i64("landing_layer"));

        let landing = port_extension(&port, area.x(), area.y(), distance);
        let via = ctx.draw(&self.via)?;
        let footprint = via
            .bbox()
            .map(|bbox| bbox.translate(landing.center()))
            .ok_or_else(|| Error::Placement {
                part: self.type_name(),
                feature: "via",
                reason: "the via has no geometry".to_string(),
            })?;
        if !landing.contains_rect(&footprint) {
            return Err(Error::Placement {
                part: self.type_name(),
                feature: "via",
                reason: format!(
                    "a {} x {} via does not fit in the {} x {} landing area",
                    footprint.width(),
                    footprint.height(),
                    landing.width(),
                    landing.height(),
                ),
            });
        }

        let mut cell = Cell::wrapping(self.type_name(), base);
        if distance > 0. {
            cell.add_shape(layer, port_extension(&port, port.width(), distance, 0.));
        }
        cell.add_shape(layer, landing);
        cell.add_instance(Instance::new(via).translated(landing.center()));
        cell.add_port(Port::new(
            arcstr::format!("{side}_via"),
            port.advanced(distance + area.y()).center(),
            area.x(),
            port.orientation(),
        ));
        Ok(cell)
    }

    fn resistance_squares(&self) -> Option<f64> {
        self.inner.resistance_squares()
    }
}
