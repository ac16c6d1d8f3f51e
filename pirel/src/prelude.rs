//! Commonly used types and traits.

pub use crate::context::Context;
pub use crate::error::{Error, Result};
pub use crate::layout::{Cell, Element, Instance, Layer};
pub use crate::params::{Assignment, FlatParams, ParamAssignments, Value};
pub use crate::part::{LayoutPart, LayoutPartExt};
pub use crate::pcells::{Anchor, Bus, EtchPit, Idt, LfeRes, Pad, Probe, Routing, Via};
pub use crate::routing::Side;
pub use crate::stages::{Scalable, StageExt};
pub use geometry::prelude::*;
