//! Parameters expressed relative to reference dimensions.
//!
//! A [`Scaled`] part exports selected geometric parameters divided by a reference
//! dimension of the part (for instance, finger lengths in units of pitch), and
//! multiplies imported values back. Changing the reference then rescales the
//! dependent dimensions instead of leaving them fixed.

use arcstr::ArcStr;

use super::{stage_accessors, stage_name};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::layout::Cell;
use crate::params::{FlatParams, ParamAssignments, ParamStore, ValidationError, Value};
use crate::part::{self, export_tree, LayoutPart};

/// The part of a parameter a [`ScaleRule`] applies to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    /// The x coordinate of a point parameter.
    X,
    /// The y coordinate of a point parameter.
    Y,
    /// A number, or both coordinates of a point.
    Whole,
}

/// Scales the parameter at `path` by a reference dimension computed from the part.
pub struct ScaleRule<P> {
    path: &'static [&'static str],
    axis: Axis,
    reference: fn(&P) -> f64,
}

impl<P> ScaleRule<P> {
    /// Creates a rule scaling `axis` of the parameter at `path` by `reference`.
    pub fn new(path: &'static [&'static str], axis: Axis, reference: fn(&P) -> f64) -> Self {
        Self {
            path,
            axis,
            reference,
        }
    }

    /// The component labels and parameter name the rule applies to.
    pub fn path(&self) -> &'static [&'static str] {
        self.path
    }

    fn apply(&self, part: &mut P, reference: f64, op: fn(f64, f64) -> f64) -> Result<()>
    where
        P: LayoutPart,
    {
        if reference == 0. {
            return Err(Error::ZeroScaleReference(self.path.join(".")));
        }
        let value = part::lookup(&*part, self.path)?;
        let scaled = match (&value, self.axis) {
            (Value::Point(p), Axis::X) => Value::Point(p.with_x(op(p.x(), reference))),
            (Value::Point(p), Axis::Y) => Value::Point(p.with_y(op(p.y(), reference))),
            (Value::Point(p), Axis::Whole) => {
                Value::Point(p.with_x(op(p.x(), reference)).with_y(op(p.y(), reference)))
            }
            (v, Axis::Whole) if v.is_numeric() => {
                Value::Float(op(v.as_f64().unwrap_or_default(), reference))
            }
            (v, _) => {
                return Err(ValidationError::Malformed {
                    label: ArcStr::from(self.path.join(".")),
                    reason: format!("cannot scale {} along {:?}", v.kind(), self.axis),
                }
                .into())
            }
        };
        part::assign(part, self.path, scaled)
    }
}

/// A part whose geometry can be expressed relative to its own dimensions.
pub trait Scalable: LayoutPart + Clone {
    /// The rules, in the order they are applied.
    ///
    /// A rule's reference may depend on parameters scaled by earlier rules; on
    /// restoration those are already back in absolute units when it is computed.
    fn scale_rules() -> Vec<ScaleRule<Self>>;
}

/// A stage that exports and imports its part's parameters in relative units.
///
/// ```
/// use pirel::prelude::*;
///
/// let mut res = LfeRes::new("res").scaled();
/// let params = res.get_params();
/// assert_eq!(params["IDTLength"], Value::Float(5.));
///
/// // Doubling the pitch doubles the relative dimensions too.
/// res.set_params(ParamAssignments::new().with("IDTPitch", 40.)).unwrap();
/// assert_eq!(res.get_value(&["IDT", "length"]).unwrap(), Value::Float(200.));
/// ```
#[derive(Debug, Clone)]
pub struct Scaled<P> {
    inner: P,
    params: ParamStore,
    normalized: bool,
}

impl<P: Scalable> Scaled<P> {
    /// Wraps `inner`, whose parameters are in absolute units.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            params: ParamStore::empty(),
            normalized: false,
        }
    }

    /// The wrapped part.
    pub fn base(&self) -> &P {
        &self.inner
    }

    /// Returns `true` while the part's parameters are in relative units.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Converts the scaled parameters to relative units.
    ///
    /// All references are computed before any parameter is divided.
    pub fn normalize(&mut self) -> Result<()> {
        if self.normalized {
            return Err(Error::ScaleState {
                attempted: "normalize",
                state: "already normalized",
            });
        }
        let rules = P::scale_rules();
        let references: Vec<f64> = rules
            .iter()
            .map(|rule| (rule.reference)(&self.inner))
            .collect();
        for (rule, reference) in rules.iter().zip(references) {
            rule.apply(&mut self.inner, reference, |v, r| v / r)?;
        }
        self.normalized = true;
        Ok(())
    }

    /// Converts the scaled parameters back to absolute units.
    ///
    /// References are recomputed rule by rule, after the preceding rules have been
    /// restored.
    pub fn denormalize(&mut self) -> Result<()> {
        if !self.normalized {
            return Err(Error::ScaleState {
                attempted: "denormalize",
                state: "already absolute",
            });
        }
        for rule in P::scale_rules() {
            let reference = (rule.reference)(&self.inner);
            rule.apply(&mut self.inner, reference, |v, r| v * r)?;
        }
        self.normalized = false;
        Ok(())
    }
}

impl<P: Scalable> LayoutPart for Scaled<P> {
    fn type_name(&self) -> ArcStr {
        stage_name("Scaled", &self.inner)
    }

    stage_accessors!();

    fn export_params(&self) -> FlatParams {
        let mut view = self.clone();
        if !view.normalized {
            if let Err(err) = view.normalize() {
                tracing::warn!(
                    part = %self.type_name(),
                    %err,
                    "exporting parameters in absolute units"
                );
                return export_tree(self);
            }
        }
        export_tree(&view)
    }

    fn apply_params(&mut self, assignments: &ParamAssignments) -> Result<()> {
        self.normalize()?;
        let applied = self.inner.apply_params(assignments);
        let restored = self.denormalize();
        applied.and(restored)
    }

    fn layout(&self, ctx: &Context) -> Result<Cell> {
        Ok(Cell::wrapping(self.type_name(), ctx.draw(&self.inner)?))
    }

    fn resistance_squares(&self) -> Option<f64> {
        self.inner.resistance_squares()
    }
}
