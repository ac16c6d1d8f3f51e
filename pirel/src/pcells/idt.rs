//! Interdigitated transducers.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Point, Port, Rect};
use once_cell::sync::Lazy;

use super::{layer_decl, part_accessors};
use crate::context::Context;
use crate::error::Result;
use crate::layout::{Cell, Layer};
use crate::params::{ParamDecl, ParamSchema, ParamStore};
use crate::part::LayoutPart;
use crate::stages::scaled::{Axis, ScaleRule, Scalable};

static SCHEMA: Lazy<Arc<ParamSchema>> = Lazy::new(|| {
    Arc::new(ParamSchema::new([
        ParamDecl::new("pitch", 20.).positive(),
        ParamDecl::new("coverage", 0.5).range(Some(0.), Some(1.)),
        ParamDecl::new("length", 100.).positive(),
        ParamDecl::new("n", 4).range(Some(1.), None),
        ParamDecl::new("y_offset", 10.).positive(),
        ParamDecl::new("active_area_margin", 0.5).range(Some(0.), None),
        layer_decl("layer", Layer::IDT),
    ]))
});

/// A finger-comb electrode pair.
///
/// The transducer has `2n + 1` fingers on a `pitch` grid, alternately attached to the
/// top and bottom combs. Bottom fingers start at `y = 0`; top fingers start
/// `y_offset` higher, so the combs overlap over `length - y_offset`.
#[derive(Debug, Clone)]
pub struct Idt {
    name: ArcStr,
    params: ParamStore,
}

impl Idt {
    /// Creates a transducer with default parameters.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            params: ParamStore::new(SCHEMA.clone()),
        }
    }

    /// The finger pitch.
    pub fn pitch(&self) -> f64 {
        self.params.f64("pitch")
    }

    /// The fraction of each pitch covered by metal.
    pub fn coverage(&self) -> f64 {
        self.params.f64("coverage")
    }

    /// The finger length.
    pub fn length(&self) -> f64 {
        self.params.f64("length")
    }

    /// The number of finger pairs.
    pub fn n(&self) -> usize {
        self.params.i64("n") as usize
    }

    /// The offset between the top and bottom fingers.
    pub fn y_offset(&self) -> f64 {
        self.params.f64("y_offset")
    }

    /// The lateral margin added around the fingers.
    pub fn active_area_margin(&self) -> f64 {
        self.params.f64("active_area_margin")
    }

    /// The width spanned by the fingers, `pitch * (2n + 1)`.
    pub fn span(&self) -> f64 {
        self.pitch() * (2 * self.n() + 1) as f64
    }

    /// The active area: `(pitch * (2n + 1) + 2 * margin, length + y_offset)`.
    pub fn active_area(&self) -> Point {
        Point::new(
            self.span() + 2. * self.active_area_margin(),
            self.length() + self.y_offset(),
        )
    }
}

impl LayoutPart for Idt {
    fn type_name(&self) -> ArcStr {
        arcstr::literal!("IDT")
    }

    part_accessors!();

    fn layout(&self, _ctx: &Context) -> Result<Cell> {
        let pitch = self.pitch();
        let width = pitch * self.coverage();
        let length = self.length();
        let y_offset = self.y_offset();
        let layer = Layer::from_param(self.params.i64("layer"));

        let mut cell = Cell::new(self.name.clone());
        for i in 0..(2 * self.n() + 1) {
            let x = pitch * (i as f64 + 0.5);
            let bot = if i % 2 == 0 { y_offset } else { 0. };
            cell.add_shape(
                layer,
                Rect::from_sides(x - width / 2., bot, x + width / 2., bot + length),
            );
        }

        let span = self.span();
        let top = length + y_offset;
        cell.add_port(Port::new("top", Point::new(span / 2., top), span, 90.));
        cell.add_port(Port::new("bottom", Point::new(span / 2., 0.), span, 270.));
        Ok(cell)
    }

    /// Each comb is `n` fingers of `length / (pitch * coverage)` squares in parallel.
    fn resistance_squares(&self) -> Option<f64> {
        Some(self.length() / (self.pitch() * self.coverage()) / self.n() as f64)
    }
}

fn pitch(idt: &Idt) -> f64 {
    idt.pitch()
}

impl Scalable for Idt {
    fn scale_rules() -> Vec<ScaleRule<Self>> {
        vec![
            ScaleRule::new(&["y_offset"], Axis::Whole, pitch),
            ScaleRule::new(&["length"], Axis::Whole, pitch),
        ]
    }
}
