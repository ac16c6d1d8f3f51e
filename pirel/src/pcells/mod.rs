//! Parametric cells for piezoelectric resonators and their test structures.

use crate::layout::Layer;
use crate::params::ParamDecl;

pub mod anchor;
pub mod bus;
pub mod etchpit;
pub mod idt;
pub mod lfe;
pub mod pad;
pub mod probe;
pub mod routing;
pub mod via;

pub use anchor::Anchor;
pub use bus::Bus;
pub use etchpit::EtchPit;
pub use idt::Idt;
pub use lfe::LfeRes;
pub use pad::Pad;
pub use probe::Probe;
pub use routing::Routing;
pub use via::Via;

#[cfg(test)]
mod tests;

/// Declares an integer layer-number parameter.
pub(crate) fn layer_decl(name: &'static str, default: Layer) -> ParamDecl {
    ParamDecl::new(name, default.param()).range(Some(0.), Some(255.))
}

/// Implements the name and parameter accessors of [`LayoutPart`](crate::part::LayoutPart)
/// for a struct with `name` and `params` fields.
macro_rules! part_accessors {
    () => {
        fn name(&self) -> &arcstr::ArcStr {
            &self.name
        }

        fn params(&self) -> &$crate::params::ParamStore {
            &self.params
        }

        fn params_mut(&mut self) -> &mut $crate::params::ParamStore {
            &mut self.params
        }
    };
}

pub(crate) use part_accessors;
