//! Behavior stages: parts that wrap another part and add geometry around it.
//!
//! A stage exposes every parameter and component of the part it wraps, plus its own.
//! Its layout references the wrapped part's cell and keeps all of its ports, so stages
//! compose freely:
//!
//! ```
//! use pirel::prelude::*;
//!
//! let part = LfeRes::new("res").with_via().with_pads();
//! assert_eq!(part.type_name(), "WithPads<WithVia<LFERes>>");
//! assert!(part.get_components().contains_key("Via"));
//! ```

use arcstr::ArcStr;

use crate::part::LayoutPart;

pub mod array;
pub mod fixture;
pub mod ground;
pub mod pad;
pub mod probe;
pub mod scaled;
pub mod stack;
pub mod via;

pub use array::Arrayed;
pub use fixture::Fixture;
pub use ground::WithLargeGround;
pub use pad::WithPads;
pub use probe::WithProbe;
pub use scaled::{Scalable, Scaled};
pub use stack::Stacked;
pub use via::WithVia;

#[cfg(test)]
mod tests;

/// The type name of a stage wrapping `inner`, such as `WithVia<LFERes>`.
pub(crate) fn stage_name(stage: &str, inner: &dyn LayoutPart) -> ArcStr {
    arcstr::format!("{stage}<{}>", inner.type_name())
}

/// Constructors for wrapping a part in a behavior stage.
pub trait StageExt: LayoutPart + Sized {
    /// Expresses geometric parameters relative to a reference dimension.
    fn scaled(self) -> Scaled<Self>
    where
        Self: Scalable,
    {
        Scaled::new(self)
    }

    /// Adds a via on a landing pad beyond one of the `top` or `bottom` ports.
    fn with_via(self) -> WithVia<Self> {
        WithVia::new(self)
    }

    /// Adds a pad on every port.
    fn with_pads(self) -> WithPads<Self> {
        WithPads::new(self)
    }

    /// Adds a ground-signal-ground probe routed to the `top` and `bottom` ports.
    fn with_probe(self) -> WithProbe<Self> {
        WithProbe::new(self)
    }

    /// Adds large ground planes behind the probe ground pads.
    fn with_large_ground(self) -> WithLargeGround<Self> {
        WithLargeGround::new(self)
    }

    /// Tiles copies side by side, connected in parallel.
    fn arrayed(self) -> Arrayed<Self> {
        Arrayed::new(self)
    }

    /// Chains copies vertically, connected in series.
    fn stacked(self) -> Stacked<Self> {
        Stacked::new(self)
    }

    /// Replaces the part with an open or short calibration structure.
    fn fixture(self) -> Fixture<Self> {
        Fixture::new(self)
    }
}

impl<T: LayoutPart> StageExt for T {}

/// Implements the name, parameter and wrapped-part accessors of [`LayoutPart`] for a
/// stage struct with `inner` and `params` fields.
macro_rules! stage_accessors {
    () => {
        fn name(&self) -> &arcstr::ArcStr {
            self.inner.name()
        }

        fn params(&self) -> &$crate::params::ParamStore {
            &self.params
        }

        fn params_mut(&mut self) -> &mut $crate::params::ParamStore {
            &mut self.params
        }

        fn inner(&self) -> Option<&dyn $crate::part::LayoutPart> {
            Some(&self.inner)
        }

        fn inner_mut(&mut self) -> Option<&mut dyn $crate::part::LayoutPart> {
            Some(&mut self.inner)
        }
    };
}

pub(crate) use stage_accessors;
