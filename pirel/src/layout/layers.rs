//! Mask layers.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A GDS layer and datatype pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Layer {
    number: u16,
    datatype: u16,
}

impl Layer {
    /// Top electrode metal: IDT fingers, buses and anchor metal.
    pub const IDT: Layer = Layer::new(1, 0);
    /// Release etch.
    pub const ETCH_PIT: Layer = Layer::new(2, 0);
    /// Bottom electrode and ground planes.
    pub const BOTTOM: Layer = Layer::new(3, 0);
    /// Vias through the piezoelectric film.
    pub const VIA: Layer = Layer::new(4, 0);
    /// Thick pad metal for probing and bonding.
    pub const PAD: Layer = Layer::new(5, 0);

    /// Creates a layer from its GDS number and datatype.
    pub const fn new(number: u16, datatype: u16) -> Self {
        Self { number, datatype }
    }

    /// The GDS layer number.
    pub const fn number(&self) -> u16 {
        self.number
    }

    /// The GDS datatype.
    pub const fn datatype(&self) -> u16 {
        self.datatype
    }

    /// The layer number as stored in an integer parameter.
    pub const fn param(&self) -> i64 {
        self.number as i64
    }

    /// The layer with datatype 0 named by an integer parameter.
    ///
    /// Layer parameters are range-checked to `0..=255` on assignment.
    pub fn from_param(value: i64) -> Self {
        Self::new(value.clamp(0, u16::MAX as i64) as u16, 0)
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.number, self.datatype)
    }
}
