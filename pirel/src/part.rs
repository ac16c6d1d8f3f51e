//! The composition root: parameterized, drawable layout parts.
//!
//! A [`LayoutPart`] owns its parameter values, an ordered list of labelled child
//! components, and optionally a wrapped inner part (when it is a behavior stage). The
//! default methods of the trait walk this tree to export and import the combined
//! parameter space as one flat dictionary; [`LayoutPartExt`] adds the public
//! operations built on top of them.

use std::sync::Arc;

use arcstr::ArcStr;
use config::{ParamsConfig, UnknownKeys};
use indexmap::IndexMap;

use crate::cache::CacheKey;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::layout::Cell;
use crate::params::{self, FlatParams, ParamAssignments, ParamStore, Value};

/// Conversion to a trait object, available on every [`LayoutPart`].
pub trait AsPart {
    /// Returns `self` as a [`LayoutPart`] trait object.
    fn as_part(&self) -> &dyn LayoutPart;
    /// Returns `self` as a mutable [`LayoutPart`] trait object.
    fn as_part_mut(&mut self) -> &mut dyn LayoutPart;
}

impl<T: LayoutPart> AsPart for T {
    fn as_part(&self) -> &dyn LayoutPart {
        self
    }

    fn as_part_mut(&mut self) -> &mut dyn LayoutPart {
        self
    }
}

/// A parameterized generator of layout geometry.
pub trait LayoutPart: AsPart + Send + Sync + 'static {
    /// The type name, used as the cache namespace and the `Type` flat key.
    fn type_name(&self) -> ArcStr;

    /// The instance name.
    fn name(&self) -> &ArcStr;

    /// This level's own parameters.
    fn params(&self) -> &ParamStore;

    /// This level's own parameters, mutably.
    fn params_mut(&mut self) -> &mut ParamStore;

    /// This level's child components, in declaration order, with their labels.
    fn components(&self) -> Vec<(&'static str, &dyn LayoutPart)> {
        Vec::new()
    }

    /// This level's child components, mutably.
    fn components_mut(&mut self) -> Vec<(&'static str, &mut dyn LayoutPart)> {
        Vec::new()
    }

    /// The part wrapped by this behavior stage, if any.
    fn inner(&self) -> Option<&dyn LayoutPart> {
        None
    }

    /// The part wrapped by this behavior stage, mutably.
    fn inner_mut(&mut self) -> Option<&mut dyn LayoutPart> {
        None
    }

    /// Exports the whole parameter tree.
    ///
    /// The default merges the wrapped part's parameters, each component's parameters
    /// under its label, and this level's own parameters, and records the type name.
    fn export_params(&self) -> FlatParams {
        export_tree(self.as_part())
    }

    /// Applies assignments to the whole parameter tree, without maintaining relations.
    fn apply_params(&mut self, assignments: &ParamAssignments) -> Result<()> {
        apply_tree(self.as_part_mut(), assignments)
    }

    /// Re-derives parameters that depend on other parameters at this level.
    ///
    /// Called bottom-up over the tree after every import; see [`update_tree`].
    fn update_relations(&mut self) -> Result<()> {
        Ok(())
    }

    /// Generates the layout without consulting the cache.
    ///
    /// Use [`LayoutPartExt::draw`] to draw through a [`Context`].
    fn layout(&self, ctx: &Context) -> Result<Cell>;

    /// The electrical resistance of the part in squares, if meaningful.
    fn resistance_squares(&self) -> Option<f64> {
        None
    }
}

/// Exports the parameter tree rooted at `part`.
pub fn export_tree(part: &dyn LayoutPart) -> FlatParams {
    let mut out = FlatParams::new();
    out.insert("Type", part.type_name());
    if let Some(inner) = part.inner() {
        out.extend_prefixed("", inner.export_params());
    }
    for (label, component) in part.components() {
        out.extend_prefixed(label, component.export_params());
    }
    part.params().flatten_into("", &mut out);
    out
}

/// Applies `assignments` to the parameter tree rooted at `part`.
///
/// The wrapped part sees every assignment; components see the assignments prefixed
/// with their label, with the prefix removed.
pub fn apply_tree(part: &mut dyn LayoutPart, assignments: &ParamAssignments) -> Result<()> {
    if let Some(inner) = part.inner_mut() {
        inner.apply_params(assignments)?;
    }
    for (label, component) in part.components_mut() {
        let scoped = assignments.strip_prefix(label);
        if !scoped.is_empty() {
            component.apply_params(&scoped)?;
        }
    }
    let resolved = part.params().resolve(assignments, &*part)?;
    part.params_mut().set_resolved(resolved)
}

/// Re-derives relations over the whole tree: wrapped part first, then components, then
/// `part` itself.
pub fn update_tree(part: &mut dyn LayoutPart) -> Result<()> {
    if let Some(inner) = part.inner_mut() {
        update_tree(inner)?;
    }
    for (_, component) in part.components_mut() {
        update_tree(component)?;
    }
    part.update_relations()
}

/// Finds a component by label at this level or any wrapped level.
pub fn find_component<'a>(part: &'a dyn LayoutPart, label: &str) -> Option<&'a dyn LayoutPart> {
    part.components()
        .into_iter()
        .find(|(l, _)| *l == label)
        .map(|(_, c)| c)
        .or_else(|| part.inner().and_then(|inner| find_component(inner, label)))
}

fn find_component_mut<'a>(
    part: &'a mut dyn LayoutPart,
    label: &str,
) -> Option<&'a mut dyn LayoutPart> {
    if part.components().iter().any(|(l, _)| *l == label) {
        return part
            .components_mut()
            .into_iter()
            .find(|(l, _)| *l == label)
            .map(|(_, c)| c);
    }
    part.inner_mut()
        .and_then(|inner| find_component_mut(inner, label))
}

fn find_owner<'a>(part: &'a dyn LayoutPart, param: &str) -> Option<&'a dyn LayoutPart> {
    if part.params().schema().lookup(param).is_some() {
        return Some(part);
    }
    part.inner().and_then(|inner| find_owner(inner, param))
}

fn find_owner_mut<'a>(part: &'a mut dyn LayoutPart, param: &str) -> Option<&'a mut dyn LayoutPart> {
    if part.params().schema().lookup(param).is_some() {
        return Some(part);
    }
    part.inner_mut().and_then(|inner| find_owner_mut(inner, param))
}

fn split_path<'p>(part: &dyn LayoutPart, path: &'p [&'p str]) -> Result<(&'p [&'p str], &'p str)> {
    path.split_last()
        .map(|(param, components)| (components, *param))
        .ok_or_else(|| Error::NoSuchParam {
            part: part.type_name(),
            param: String::new(),
        })
}

/// Reads the parameter at `path`: component labels followed by a parameter name or label.
pub fn lookup(part: &dyn LayoutPart, path: &[&str]) -> Result<Value> {
    let (components, param) = split_path(part, path)?;
    let mut current = part;
    for label in components {
        current = find_component(current, label).ok_or_else(|| Error::NoSuchComponent {
            part: current.type_name(),
            component: label.to_string(),
        })?;
    }
    find_owner(current, param)
        .and_then(|owner| owner.params().get(param).cloned())
        .ok_or_else(|| Error::NoSuchParam {
            part: current.type_name(),
            param: param.to_string(),
        })
}

/// Writes the parameter at `path` without re-deriving relations.
pub fn assign(part: &mut dyn LayoutPart, path: &[&str], value: Value) -> Result<()> {
    let (components, param) = split_path(part, path)?;
    let mut current = part;
    for label in components {
        let type_name = current.type_name();
        current = find_component_mut(current, label).ok_or_else(|| Error::NoSuchComponent {
            part: type_name,
            component: label.to_string(),
        })?;
    }
    let type_name = current.type_name();
    let owner = find_owner_mut(current, param).ok_or_else(|| Error::NoSuchParam {
        part: type_name,
        param: param.to_string(),
    })?;
    owner.params_mut().set(param, value)
}

/// Returns `true` if two exports agree, treating floats within a relative
/// [`EPSILON`](geometry::EPSILON) as equal.
fn settled(before: &FlatParams, after: &FlatParams) -> bool {
    before.len() == after.len()
        && before.iter().all(|(key, a)| match (a, after.get(key)) {
            (Value::Float(a), Some(Value::Float(b))) => {
                (a - b).abs() <= geometry::EPSILON * a.abs().max(b.abs()).max(1.)
            }
            (a, b) => Some(a) == b,
        })
}

/// Applies `assignments` and re-derives relations until the export stops changing.
fn converge(
    part: &mut dyn LayoutPart,
    assignments: &ParamAssignments,
    config: &ParamsConfig,
    mut before: FlatParams,
) -> Result<()> {
    for iteration in 1..=config.max_iterations {
        part.apply_params(assignments)?;
        update_tree(part)?;
        let after = part.get_params();
        if settled(&before, &after) {
            tracing::trace!(part = %part.type_name(), iteration, "parameters converged");
            return Ok(());
        }
        before = after;
    }
    Err(Error::NotConverged(config.max_iterations))
}

/// Re-applies a previous export after a rejected import.
fn restore(part: &mut dyn LayoutPart, snapshot: &FlatParams) {
    let restored = part
        .apply_params(&ParamAssignments::from(snapshot))
        .and_then(|()| update_tree(part));
    if let Err(err) = restored {
        tracing::error!(part = %part.type_name(), %err, "could not restore parameters");
    }
}

/// Operations available on every [`LayoutPart`].
pub trait LayoutPartExt: LayoutPart {
    /// Exports the whole parameter tree as a flat dictionary.
    fn get_params(&self) -> FlatParams {
        self.export_params()
    }

    /// Imports flat assignments with the default [`ParamsConfig`].
    fn set_params(&mut self, assignments: impl Into<ParamAssignments>) -> Result<()> {
        self.set_params_with(assignments, &ParamsConfig::default())
    }

    /// Imports flat assignments, re-applying them until the exported parameters stop
    /// changing.
    ///
    /// Keys matching no parameter are rejected or logged according to
    /// `config.unknown_keys`. The `Type`, `Name` and `Resistance` keys are ignored.
    fn set_params_with(
        &mut self,
        assignments: impl Into<ParamAssignments>,
        config: &ParamsConfig,
    ) -> Result<()> {
        let assignments = assignments.into();
        let before = self.get_params();

        let unknown: Vec<String> = assignments
            .keys()
            .filter(|k| !params::is_bookkeeping(k) && !before.contains_key(k))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            match config.unknown_keys {
                UnknownKeys::Strict => return Err(Error::UnknownParams(unknown)),
                UnknownKeys::Lenient => tracing::warn!(
                    part = %self.type_name(),
                    ?unknown,
                    "ignoring unrecognized parameters"
                ),
            }
        }

        let result = converge(self.as_part_mut(), &assignments, config, before.clone());
        if result.is_err() {
            restore(self.as_part_mut(), &before);
        }
        result
    }

    /// Exports the parameter tree plus a `Resistance` entry where the part defines one.
    fn export_all(&self) -> FlatParams {
        let mut params = self.get_params();
        if let Some(resistance) = self.resistance_squares() {
            params.insert("Resistance", resistance);
        }
        params
    }

    /// The labels and type names of all components, including those of wrapped parts.
    fn get_components(&self) -> IndexMap<&'static str, ArcStr> {
        fn collect(part: &dyn LayoutPart, out: &mut IndexMap<&'static str, ArcStr>) {
            if let Some(inner) = part.inner() {
                collect(inner, out);
            }
            for (label, component) in part.components() {
                out.insert(label, component.type_name());
            }
        }
        let mut out = IndexMap::new();
        collect(self.as_part(), &mut out);
        out
    }

    /// The key identifying this part's full parameter state in the layout cache.
    fn cache_key(&self) -> CacheKey {
        CacheKey::of(self.as_part())
    }

    /// Draws the part through `ctx`, reusing a cached layout when one exists.
    fn draw(&self, ctx: &Context) -> Result<Arc<Cell>> {
        ctx.draw(self.as_part())
    }

    /// Reads the parameter at `path`.
    ///
    /// ```
    /// use pirel::prelude::*;
    ///
    /// let res = LfeRes::new("res");
    /// let pitch = res.get_value(&["IDT", "pitch"]).unwrap();
    /// assert_eq!(pitch, res.get_value(&["IDT", "Pitch"]).unwrap());
    /// ```
    fn get_value(&self, path: &[&str]) -> Result<Value> {
        lookup(self.as_part(), path)
    }

    /// Writes the parameter at `path`, then re-derives relations.
    fn set_value(&mut self, path: &[&str], value: impl Into<Value>) -> Result<()> {
        assign(self.as_part_mut(), path, value.into())?;
        update_tree(self.as_part_mut())
    }
}

impl<T: LayoutPart + ?Sized> LayoutPartExt for T {}
