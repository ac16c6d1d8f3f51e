//! Per-type parameter declarations.

use arcstr::ArcStr;
use convert_case::{Case, Casing};
use indexmap::IndexMap;

use super::error::ValidationError;
use super::value::{ParamKind, Value};

/// The legal values of a parameter beyond its shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Domain {
    /// Any value of the declared shape.
    #[default]
    Any,
    /// One of an enumerated set of values.
    OneOf(Vec<Value>),
    /// A number within an inclusive range.
    Range {
        /// The smallest allowed value.
        min: Option<f64>,
        /// The largest allowed value.
        max: Option<f64>,
    },
    /// A number, or both coordinates of a point, strictly greater than zero.
    Positive,
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    name: &'static str,
    label: ArcStr,
    default: Value,
    domain: Domain,
}

impl ParamDecl {
    /// Declares a parameter whose shape is that of `default`.
    ///
    /// The flat-dictionary label is the PascalCase form of `name`.
    ///
    /// ```
    /// use pirel::params::ParamDecl;
    ///
    /// let decl = ParamDecl::new("active_area_margin", 0.5);
    /// assert_eq!(decl.label(), "ActiveAreaMargin");
    /// ```
    pub fn new(name: &'static str, default: impl Into<Value>) -> Self {
        Self {
            name,
            label: name.to_case(Case::Pascal).into(),
            default: default.into(),
            domain: Domain::Any,
        }
    }

    /// Overrides the flat-dictionary label.
    pub fn with_label(mut self, label: impl Into<ArcStr>) -> Self {
        self.label = label.into();
        self
    }

    /// Restricts the parameter to the given values.
    pub fn one_of<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.domain = Domain::OneOf(values.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts the parameter to an inclusive range.
    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.domain = Domain::Range { min, max };
        self
    }

    /// Restricts the parameter to strictly positive values.
    pub fn positive(mut self) -> Self {
        self.domain = Domain::Positive;
        self
    }

    /// The identifier-style name, e.g. `active_area_margin`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The PascalCase label used in flat dictionaries, e.g. `ActiveAreaMargin`.
    pub fn label(&self) -> &ArcStr {
        &self.label
    }

    /// The shape every value of this parameter must have.
    pub fn kind(&self) -> ParamKind {
        self.default.kind()
    }

    /// The initial value.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// The legal values.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Checks `value` against this declaration, returning the value to store.
    ///
    /// Integers assigned to float parameters are widened; no other coercion is made.
    pub fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        let value = match (self.kind(), value) {
            (ParamKind::Float, Value::Int(v)) => Value::Float(v as f64),
            (kind, value) if kind == value.kind() => value,
            (kind, value) => {
                return Err(ValidationError::Shape {
                    label: self.label.clone(),
                    expected: kind,
                    found: value.kind(),
                })
            }
        };
        if !is_finite(&value) {
            return Err(ValidationError::NotFinite {
                label: self.label.clone(),
                value,
            });
        }

        match &self.domain {
            Domain::Any => {}
            Domain::OneOf(allowed) => {
                if !allowed.contains(&value) {
                    return Err(ValidationError::NotAllowed {
                        label: self.label.clone(),
                        value,
                        allowed: allowed.clone(),
                    });
                }
            }
            Domain::Range { min, max } => {
                if let Some(v) = value.as_f64() {
                    if min.is_some_and(|min| v < min) || max.is_some_and(|max| v > max) {
                        return Err(ValidationError::OutOfRange {
                            label: self.label.clone(),
                            value: v,
                            min: *min,
                            max: *max,
                        });
                    }
                }
            }
            Domain::Positive => {
                let positive = match &value {
                    Value::Point(p) => p.x() > 0. && p.y() > 0.,
                    other => other.as_f64().map_or(true, |v| v > 0.),
                };
                if !positive {
                    return Err(ValidationError::NotPositive {
                        label: self.label.clone(),
                        value,
                    });
                }
            }
        }
        Ok(value)
    }

    /// The flat keys this parameter expands to.
    ///
    /// Point parameters expand to `<Label>X` and `<Label>Y`; all others to `<Label>`.
    pub fn flat_keys(&self) -> Vec<String> {
        if self.kind() == ParamKind::Point {
            vec![format!("{}X", self.label), format!("{}Y", self.label)]
        } else {
            vec![self.label.to_string()]
        }
    }
}

fn is_finite(value: &Value) -> bool {
    match value {
        Value::Float(v) => v.is_finite(),
        Value::Point(p) => p.x().is_finite() && p.y().is_finite(),
        Value::Port(p) => {
            let center = p.center();
            center.x().is_finite()
                && center.y().is_finite()
                && p.width().is_finite()
                && p.orientation().is_finite()
        }
        Value::List(items) => items.iter().all(is_finite),
        Value::Bool(_) | Value::Int(_) | Value::Str(_) => true,
    }
}

/// The immutable parameter declarations of one part type.
///
/// Schemas are built once per type, typically in a
/// [`Lazy`](once_cell::sync::Lazy) static, so every parameter is registered
/// before any instance exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSchema {
    decls: IndexMap<&'static str, ParamDecl>,
}

impl ParamSchema {
    /// Creates a schema from a list of declarations.
    ///
    /// # Panics
    ///
    /// Panics if two declarations share a name or label, or if a default value
    /// violates its own declaration.
    pub fn new(decls: impl IntoIterator<Item = ParamDecl>) -> Self {
        let mut map: IndexMap<&'static str, ParamDecl> = IndexMap::new();
        for decl in decls {
            if let Err(err) = decl.validate(decl.default.clone()) {
                panic!("invalid default for parameter `{}`: {err}", decl.name);
            }
            assert!(
                map.values().all(|other| other.label != decl.label),
                "duplicate parameter label `{}`",
                decl.label
            );
            let name = decl.name;
            assert!(
                map.insert(name, decl).is_none(),
                "duplicate parameter `{name}`"
            );
        }
        Self { decls: map }
    }

    /// Creates a schema with no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The number of declared parameters.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Returns `true` if no parameters are declared.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Iterates over the declarations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParamDecl> {
        self.decls.values()
    }

    /// Looks up a declaration by name.
    pub fn get(&self, name: &str) -> Option<&ParamDecl> {
        self.decls.get(name)
    }

    /// Returns the position of a declaration, looked up by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.decls.get_index_of(name)
    }

    /// Looks up a declaration by name or by flat label.
    pub fn lookup(&self, name_or_label: &str) -> Option<(usize, &ParamDecl)> {
        if let Some((index, _, decl)) = self.decls.get_full(name_or_label) {
            return Some((index, decl));
        }
        self.decls
            .values()
            .enumerate()
            .find(|(_, decl)| decl.label == name_or_label)
    }

    /// Returns the declaration at `index`.
    pub(crate) fn decl(&self, index: usize) -> &ParamDecl {
        &self.decls[index]
    }
}
