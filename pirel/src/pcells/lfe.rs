//! Lateral field excitation resonators.

use arcstr::ArcStr;
use geometry::prelude::{Point, Transform};

use super::{part_accessors, Anchor, Bus, EtchPit, Idt};
use crate::context::Context;
use crate::error::Result;
use crate::layout::{Cell, Instance};
use crate::params::ParamStore;
use crate::part::LayoutPart;
use crate::stages::scaled::{Axis, ScaleRule, Scalable};

/// A released resonator: a transducer fed by a bus, suspended by anchors and
/// surrounded by etch pits.
///
/// The resonator keeps its components consistent with the transducer:
///
/// - the bus strips span the fingers and sit just outside them,
/// - the etch pits enclose the active area, both bus strips and both anchors.
///
/// ```
/// use pirel::prelude::*;
///
/// let mut res = LfeRes::new("res");
/// res.set_params(ParamAssignments::new().with("IDTPitch", 10.).with("IDTN", 2)).unwrap();
/// assert_eq!(res.get_value(&["Bus", "size"]).unwrap().as_point().unwrap().x(), 50.);
/// ```
#[derive(Debug, Clone)]
pub struct LfeRes {
    name: ArcStr,
    params: ParamStore,
    idt: Idt,
    bus: Bus,
    etch_pit: EtchPit,
    anchor: Anchor,
}

impl LfeRes {
    /// Creates a resonator with default parameters.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        let name = name.into();
        Self {
            idt: Idt::new(arcstr::format!("{name}IDT")),
            bus: Bus::new(arcstr::format!("{name}Bus")),
            etch_pit: EtchPit::new(arcstr::format!("{name}EtchPit")),
            anchor: Anchor::new(arcstr::format!("{name}Anchor")),
            params: ParamStore::empty(),
            name,
        }
    }

    /// The transducer.
    pub fn idt(&self) -> &Idt {
        &self.idt
    }

    /// The bus feeding the transducer.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The release etch pits.
    pub fn etch_pit(&self) -> &EtchPit {
        &self.etch_pit
    }

    /// The anchor used at both ends of the resonator.
    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }
}

impl LayoutPart for LfeRes {
    fn type_name(&self) -> ArcStr {
        arcstr::literal!("LFERes")
    }

    part_accessors!();

    fn components(&self) -> Vec<(&'static str, &dyn LayoutPart)> {
        vec![
            ("IDT", &self.idt as &dyn LayoutPart),
            ("Bus", &self.bus as &dyn LayoutPart),
            ("EtchPit", &self.etch_pit as &dyn LayoutPart),
            ("Anchor", &self.anchor as &dyn LayoutPart),
        ]
    }

    fn components_mut(&mut self) -> Vec<(&'static str, &mut dyn LayoutPart)> {
        vec![
            ("IDT", &mut self.idt as &mut dyn LayoutPart),
            ("Bus", &mut self.bus as &mut dyn LayoutPart),
            ("EtchPit", &mut self.etch_pit as &mut dyn LayoutPart),
            ("Anchor", &mut self.anchor as &mut dyn LayoutPart),
        ]
    }

    fn update_relations(&mut self) -> Result<()> {
        let span = self.idt.span();
        let area = self.idt.active_area();
        let bus = self.bus.size();
        let anchor = self.anchor.size();

        let params = self.bus.params_mut();
        params.set("size", Point::new(span, bus.y()))?;
        params.set(
            "distance",
            Point::new(0., self.idt.length() + self.idt.y_offset() + bus.y()),
        )?;
        self.etch_pit.params_mut().set(
            "active_area",
            Point::new(area.x(), area.y() + 2. * bus.y() + 2. * anchor.y()),
        )
    }

    fn layout(&self, ctx: &Context) -> Result<Cell> {
        let bus_y = self.bus.size().y();
        let anchor_y = self.anchor.size().y();
        let margin = self.idt.active_area_margin();

        let mut cell = Cell::new(self.name.clone());
        cell.add_instance(Instance::new(ctx.draw(&self.idt)?));

        let bus = Instance::new(ctx.draw(&self.bus)?).translated(Point::new(0., -bus_y));
        let shift = Point::new(self.anchor.x_offset(), 0.);
        let below = bus.require_port("bottom")?.translate(shift);
        let above = bus.require_port("top")?.translate(shift);
        cell.add_instance(bus);

        let anchor = ctx.draw(&self.anchor)?;
        let mut bottom = Instance::new(anchor.clone());
        bottom.connect("top", &below, 0.)?;
        let mut top = Instance::new(anchor);
        top.connect("bottom", &above, 0.)?;
        cell.add_port(bottom.require_port("bottom")?);
        cell.add_port(top.require_port("top")?);
        cell.add_instance(bottom);
        cell.add_instance(top);

        cell.add_instance(
            Instance::new(ctx.draw(&self.etch_pit)?)
                .translated(Point::new(-margin, -bus_y - anchor_y)),
        );
        Ok(cell)
    }

    /// One comb, one bus and one anchor in series.
    fn resistance_squares(&self) -> Option<f64> {
        Some(
            self.idt.resistance_squares()?
                + self.bus.resistance_squares()?
                + self.anchor.resistance_squares()?,
        )
    }
}

fn pitch(res: &LfeRes) -> f64 {
    res.idt.pitch()
}

fn active_width(res: &LfeRes) -> f64 {
    res.idt.active_area().x()
}

fn anchor_width(res: &LfeRes) -> f64 {
    res.anchor.size().x()
}

impl Scalable for LfeRes {
    fn scale_rules() -> Vec<ScaleRule<Self>> {
        vec![
            ScaleRule::new(&["IDT", "y_offset"], Axis::Whole, pitch),
            ScaleRule::new(&["IDT", "length"], Axis::Whole, pitch),
            ScaleRule::new(&["Bus", "size"], Axis::Whole, pitch),
            ScaleRule::new(&["EtchPit", "x"], Axis::Whole, active_width),
            ScaleRule::new(&["Anchor", "size"], Axis::X, active_width),
            ScaleRule::new(&["Anchor", "size"], Axis::Y, pitch),
            ScaleRule::new(&["Anchor", "metalized"], Axis::X, anchor_width),
            ScaleRule::new(&["Anchor", "metalized"], Axis::Y, pitch),
            ScaleRule::new(&["Anchor", "x_offset"], Axis::Whole, pitch),
        ]
    }
}
