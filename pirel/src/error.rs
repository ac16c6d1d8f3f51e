//! Error types and error handling utilities.

use std::sync::Arc;

use arcstr::ArcStr;

use crate::params::error::ValidationError;

/// A result type returning PIREL errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type for PIREL functions.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// A parameter was assigned a value outside its declared domain or shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A parameter path did not name a declared parameter.
    #[error("`{part}` has no parameter named `{param}`")]
    NoSuchParam {
        /// The type of the part that was searched.
        part: ArcStr,
        /// The missing parameter.
        param: String,
    },
    /// A parameter path did not name a component.
    #[error("`{part}` has no component named `{component}`")]
    NoSuchComponent {
        /// The type of the part that was searched.
        part: ArcStr,
        /// The missing component label.
        component: String,
    },
    /// A strict import contained keys that match no parameter.
    #[error("unrecognized parameters: {}", .0.join(", "))]
    UnknownParams(Vec<String>),
    /// Parameter relations kept changing the exported parameters.
    #[error("parameters did not reach a fixed point after {0} iterations")]
    NotConverged(usize),
    /// A stage required a port that the wrapped layout does not expose.
    #[error("`{part}` has no port named `{port}`")]
    MissingPort {
        /// The part or cell that lacks the port.
        part: ArcStr,
        /// The name of the missing port.
        port: ArcStr,
    },
    /// A generated feature does not fit where it must be placed.
    #[error("cannot place {feature} in `{part}`: {reason}")]
    Placement {
        /// The part being drawn.
        part: ArcStr,
        /// The feature that was being placed.
        feature: &'static str,
        /// Why the placement failed.
        reason: String,
    },
    /// No candidate route avoids the clearance region.
    #[error("no route from `{from}` to `{to}` avoids the clearance region")]
    RoutingImpossible {
        /// The name of the source port.
        from: ArcStr,
        /// The name of the destination port.
        to: ArcStr,
    },
    /// Normalization and denormalization were invoked out of alternation.
    #[error("cannot {attempted}: parameters are {state}")]
    ScaleState {
        /// The operation that was attempted.
        attempted: &'static str,
        /// The current normalization state.
        state: &'static str,
    },
    /// A normalization reference evaluated to zero.
    #[error("scale reference for `{0}` is zero")]
    ZeroScaleReference(String),
    /// A flat parameter dictionary could not be (de)serialized.
    #[error("invalid flat parameter JSON: {0}")]
    Json(#[from] Arc<serde_json::Error>),
    /// Configuration could not be loaded.
    #[error("configuration error: {0:#}")]
    Config(#[from] Arc<anyhow::Error>),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Json(Arc::new(value))
    }
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Error::Config(Arc::new(value))
    }
}
