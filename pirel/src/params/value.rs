//! Parameter values.

use std::fmt::Display;

use arcstr::ArcStr;
use geometry::point::Point;
use geometry::port::Port;
use serde::{Deserialize, Serialize};

/// The shape of a parameter value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    /// An integer.
    Int,
    /// A real number.
    Float,
    /// A boolean flag.
    Bool,
    /// A string.
    Str,
    /// A two-field point.
    Point,
    /// A named port.
    Port,
    /// A list of values.
    List,
}

impl Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParamKind::Int => "integer",
            ParamKind::Float => "float",
            ParamKind::Bool => "boolean",
            ParamKind::Str => "string",
            ParamKind::Point => "point",
            ParamKind::Port => "port",
            ParamKind::List => "list",
        };
        f.write_str(name)
    }
}

/// A parameter value.
///
/// Serialized untagged, so flat dictionaries read naturally as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A real number.
    Float(f64),
    /// A string.
    Str(ArcStr),
    /// A two-field point.
    Point(Point),
    /// A named port.
    Port(Port),
    /// A list of values.
    List(Vec<Value>),
}

impl Value {
    /// The shape of this value.
    pub fn kind(&self) -> ParamKind {
        match self {
            Value::Bool(_) => ParamKind::Bool,
            Value::Int(_) => ParamKind::Int,
            Value::Float(_) => ParamKind::Float,
            Value::Str(_) => ParamKind::Str,
            Value::Point(_) => ParamKind::Point,
            Value::Port(_) => ParamKind::Port,
            Value::List(_) => ParamKind::List,
        }
    }

    /// Returns the value as a real number, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a string.
    pub fn as_str(&self) -> Option<&ArcStr> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as a point.
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Value::Point(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a port.
    pub fn as_port(&self) -> Option<&Port> {
        match self {
            Value::Port(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    /// Returns `true` for integers and floats.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v:?}"),
            Value::Point(p) => write!(f, "({}, {})", p.x(), p.y()),
            Value::Port(p) => write!(
                f,
                "port {} at ({}, {}) width {} facing {}",
                p.name(),
                p.center().x(),
                p.center().y(),
                p.width(),
                p.orientation()
            ),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

impl_from!(
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    ArcStr => Str,
    &str => Str,
    String => Str,
    Point => Point,
    Port => Port,
    Vec<Value> => List,
);

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<(f64, f64)> for Value {
    fn from(value: (f64, f64)) -> Self {
        Value::Point(value.into())
    }
}

impl From<Vec<Point>> for Value {
    fn from(value: Vec<Point>) -> Self {
        Value::List(value.into_iter().map(Value::Point).collect())
    }
}

impl From<Vec<Port>> for Value {
    fn from(value: Vec<Port>) -> Self {
        Value::List(value.into_iter().map(Value::Port).collect())
    }
}
