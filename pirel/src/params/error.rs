//! Parameter validation errors.

use arcstr::ArcStr;
use itertools::Itertools;

use super::value::{ParamKind, Value};

/// A value was rejected by a parameter declaration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The value has a different shape than the parameter.
    #[error("parameter `{label}` holds {expected} values, but a {found} was assigned")]
    Shape {
        /// The parameter label.
        label: ArcStr,
        /// The declared shape.
        expected: ParamKind,
        /// The shape of the rejected value.
        found: ParamKind,
    },
    /// The value is not one of the enumerated legal values.
    #[error("parameter `{label}` must be one of [{}], got {value}", .allowed.iter().join(", "))]
    NotAllowed {
        /// The parameter label.
        label: ArcStr,
        /// The rejected value.
        value: Value,
        /// The legal values.
        allowed: Vec<Value>,
    },
    /// The value lies outside the declared range.
    #[error("parameter `{label}` must lie in [{}, {}], got {value}", fmt_bound(.min), fmt_bound(.max))]
    OutOfRange {
        /// The parameter label.
        label: ArcStr,
        /// The rejected value.
        value: f64,
        /// The smallest allowed value.
        min: Option<f64>,
        /// The largest allowed value.
        max: Option<f64>,
    },
    /// The value must be strictly positive.
    #[error("parameter `{label}` must be positive, got {value}")]
    NotPositive {
        /// The parameter label.
        label: ArcStr,
        /// The rejected value.
        value: Value,
    },
    /// The value is or contains a NaN or infinite number.
    #[error("parameter `{label}` must be finite, got {value}")]
    NotFinite {
        /// The parameter label.
        label: ArcStr,
        /// The rejected value.
        value: Value,
    },
    /// A compound value does not have the structure the parameter requires.
    #[error("parameter `{label}` is malformed: {reason}")]
    Malformed {
        /// The parameter label.
        label: ArcStr,
        /// What is wrong with the value.
        reason: String,
    },
    /// A flat key held a value that cannot form part of the parameter.
    #[error("flat key `{key}` must hold a number, got {value}")]
    NotNumeric {
        /// The offending flat key.
        key: String,
        /// The rejected value.
        value: Value,
    },
}

fn fmt_bound(bound: &Option<f64>) -> String {
    bound.map_or_else(|| "..".to_string(), |b| b.to_string())
}
