//! Per-instance parameter values.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::point::Point;
use geometry::port::Port;

use super::assign::ParamAssignments;
use super::error::ValidationError;
use super::flat::FlatParams;
use super::schema::{ParamDecl, ParamSchema};
use super::value::{ParamKind, Value};
use crate::error::{Error, Result};
use crate::part::LayoutPart;

/// The current parameter values of one part instance.
///
/// Values are always valid for the schema: every write goes through
/// [`ParamDecl::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParamStore {
    schema: Arc<ParamSchema>,
    values: Vec<Value>,
}

impl ParamStore {
    /// Creates a store holding the schema defaults.
    pub fn new(schema: Arc<ParamSchema>) -> Self {
        let values = schema.iter().map(|d| d.default_value().clone()).collect();
        Self { schema, values }
    }

    /// Creates a store with no parameters.
    pub fn empty() -> Self {
        Self::new(Arc::new(ParamSchema::empty()))
    }

    /// The declarations backing this store.
    pub fn schema(&self) -> &Arc<ParamSchema> {
        &self.schema
    }

    /// Iterates over declarations and their current values.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamDecl, &Value)> {
        self.schema.iter().zip(self.values.iter())
    }

    /// Returns the current value of a parameter, looked up by name or label.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.lookup(name).map(|(i, _)| &self.values[i])
    }

    /// Returns the current value of the parameter `name`.
    ///
    /// # Panics
    ///
    /// Panics if no such parameter is declared.
    pub fn value(&self, name: &str) -> &Value {
        self.get(name)
            .unwrap_or_else(|| panic!("no parameter named `{name}`"))
    }

    /// Assigns a parameter, looked up by name or label.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let (index, decl) = self.schema.lookup(name).ok_or_else(|| Error::NoSuchParam {
            part: ArcStr::from("<store>"),
            param: name.to_string(),
        })?;
        self.values[index] = decl.validate(value.into())?;
        Ok(())
    }

    /// Returns a numeric parameter as a float.
    ///
    /// # Panics
    ///
    /// Panics if the parameter is not declared or is not numeric.
    pub fn f64(&self, name: &str) -> f64 {
        self.value(name)
            .as_f64()
            .unwrap_or_else(|| panic!("parameter `{name}` is not numeric"))
    }

    /// Returns an integer parameter.
    ///
    /// # Panics
    ///
    /// Panics if the parameter is not declared or is not an integer.
    pub fn i64(&self, name: &str) -> i64 {
        self.value(name)
            .as_i64()
            .unwrap_or_else(|| panic!("parameter `{name}` is not an integer"))
    }

    /// Returns a boolean parameter.
    ///
    /// # Panics
    ///
    /// Panics if the parameter is not declared or is not a boolean.
    pub fn bool(&self, name: &str) -> bool {
        self.value(name)
            .as_bool()
            .unwrap_or_else(|| panic!("parameter `{name}` is not a boolean"))
    }

    /// Returns a string parameter.
    ///
    /// # Panics
    ///
    /// Panics if the parameter is not declared or is not a string.
    pub fn str(&self, name: &str) -> &ArcStr {
        self.value(name)
            .as_str()
            .unwrap_or_else(|| panic!("parameter `{name}` is not a string"))
    }

    /// Returns a point parameter.
    ///
    /// # Panics
    ///
    /// Panics if the parameter is not declared or is not a point.
    pub fn point(&self, name: &str) -> Point {
        self.value(name)
            .as_point()
            .unwrap_or_else(|| panic!("parameter `{name}` is not a point"))
    }

    /// Returns a port parameter.
    ///
    /// # Panics
    ///
    /// Panics if the parameter is not declared or is not a port.
    pub fn port(&self, name: &str) -> &Port {
        self.value(name)
            .as_port()
            .unwrap_or_else(|| panic!("parameter `{name}` is not a port"))
    }

    /// Returns a list parameter.
    ///
    /// # Panics
    ///
    /// Panics if the parameter is not declared or is not a list.
    pub fn list(&self, name: &str) -> &[Value] {
        self.value(name)
            .as_list()
            .unwrap_or_else(|| panic!("parameter `{name}` is not a list"))
    }

    /// Writes the parameters into `out` under `prefix`.
    ///
    /// Point parameters become two keys, `<Label>X` and `<Label>Y`.
    pub fn flatten_into(&self, prefix: &str, out: &mut FlatParams) {
        for (decl, value) in self.iter() {
            match value {
                Value::Point(p) => {
                    out.insert(format!("{prefix}{}X", decl.label()), p.x());
                    out.insert(format!("{prefix}{}Y", decl.label()), p.y());
                }
                other => {
                    out.insert(format!("{prefix}{}", decl.label()), other.clone());
                }
            }
        }
    }

    /// Resolves the assignments that target this store's parameters.
    ///
    /// Deferred values are evaluated against `owner`. The returned values are not yet
    /// validated; pass them to [`ParamStore::set_resolved`].
    pub fn resolve(
        &self,
        assignments: &ParamAssignments,
        owner: &dyn LayoutPart,
    ) -> Result<Vec<(usize, Value)>> {
        let mut resolved = Vec::new();
        for (index, (decl, current)) in self.iter().enumerate() {
            let label = decl.label().as_str();
            if decl.kind() == ParamKind::Point {
                let x = coordinate(assignments, &format!("{label}X"), owner)?;
                let y = coordinate(assignments, &format!("{label}Y"), owner)?;
                if x.is_none() && y.is_none() {
                    continue;
                }
                let current = current.as_point().unwrap_or_default();
                let point = Point::new(x.unwrap_or(current.x()), y.unwrap_or(current.y()));
                resolved.push((index, Value::Point(point)));
            } else if let Some(assignment) = assignments.get(label) {
                resolved.push((index, assignment.resolve(owner)?));
            }
        }
        Ok(resolved)
    }

    /// Stores values produced by [`ParamStore::resolve`].
    ///
    /// Values are validated in order; the first invalid value aborts the update,
    /// leaving earlier values assigned.
    pub fn set_resolved(&mut self, resolved: Vec<(usize, Value)>) -> Result<()> {
        for (index, value) in resolved {
            self.values[index] = self.schema.decl(index).validate(value)?;
        }
        Ok(())
    }
}

fn coordinate(
    assignments: &ParamAssignments,
    key: &str,
    owner: &dyn LayoutPart,
) -> Result<Option<f64>> {
    let Some(assignment) = assignments.get(key) else {
        return Ok(None);
    };
    let value = assignment.resolve(owner)?;
    match value.as_f64() {
        Some(v) => Ok(Some(v)),
        None => Err(ValidationError::NotNumeric {
            key: key.to_string(),
            value,
        }
        .into()),
    }
}
