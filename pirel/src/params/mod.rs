//! The parameter system.
//!
//! Every part type declares its parameters once, in a [`ParamSchema`]. Instances hold
//! their current values in a [`ParamStore`] seeded from the schema defaults. The whole
//! parameter tree of a composed part is exchanged through [`FlatParams`], a flat
//! string-keyed dictionary, and imported from [`ParamAssignments`], which may defer
//! values to closures evaluated against the part being configured.

pub mod assign;
pub mod error;
pub mod flat;
pub mod schema;
pub mod store;
pub mod value;

pub use assign::{Assignment, Deferred, ParamAssignments};
pub use error::ValidationError;
pub use flat::FlatParams;
pub use schema::{Domain, ParamDecl, ParamSchema};
pub use store::ParamStore;
pub use value::{ParamKind, Value};

/// Flat keys that carry bookkeeping rather than parameter values.
pub const BOOKKEEPING_KEYS: [&str; 3] = ["Type", "Name", "Resistance"];

/// Returns `true` if `key` is a bookkeeping key ignored on import.
pub fn is_bookkeeping(key: &str) -> bool {
    BOOKKEEPING_KEYS.contains(&key)
}
