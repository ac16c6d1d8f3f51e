//! Basic layout elements.
//!
//! Cells consist of shapes on layers and references to other cells.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Bbox, Point, Port, Rect, Shape, Transform, Transformation};

use super::{Cell, Layer};
use crate::error::{Error, Result};

/// An element of a [`Cell`].
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A shape drawn on a layer.
    Shape(Layer, Shape),
    /// A reference to another cell.
    Instance(Instance),
}

impl Bbox for Element {
    fn bbox(&self) -> Option<Rect> {
        match self {
            Element::Shape(_, shape) => shape.bbox(),
            Element::Instance(inst) => inst.bbox(),
        }
    }
}

impl From<Instance> for Element {
    fn from(value: Instance) -> Self {
        Element::Instance(value)
    }
}

/// A placed reference to a shared [`Cell`].
///
/// Ports of the referenced cell are inherited, transformed into the coordinates of
/// the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    cell: Arc<Cell>,
    trans: Transformation,
}

impl Instance {
    /// Places `cell` with the identity transformation.
    pub fn new(cell: Arc<Cell>) -> Self {
        Self {
            cell,
            trans: Transformation::identity(),
        }
    }

    /// The referenced cell.
    pub fn cell(&self) -> &Arc<Cell> {
        &self.cell
    }

    /// The placement of the referenced cell.
    pub fn transformation(&self) -> Transformation {
        self.trans
    }

    /// Applies `trans` after the current placement.
    pub fn transform_mut(&mut self, trans: Transformation) -> &mut Self {
        self.trans = self.trans.then(trans);
        self
    }

    /// Moves the instance by `offset`.
    pub fn translate_mut(&mut self, offset: Point) -> &mut Self {
        self.transform_mut(Transformation::translate(offset))
    }

    /// Returns the instance moved by `offset`.
    pub fn translated(mut self, offset: Point) -> Self {
        self.translate_mut(offset);
        self
    }

    /// The transformed port named `name`, if the referenced cell has one.
    pub fn port(&self, name: &str) -> Option<Port> {
        self.cell.port(name).map(|p| p.transform(self.trans))
    }

    /// The transformed port named `name`.
    pub fn require_port(&self, name: &str) -> Result<Port> {
        self.port(name).ok_or_else(|| Error::MissingPort {
            part: self.cell.name().clone(),
            port: ArcStr::from(name),
        })
    }

    /// Iterates over all transformed ports.
    pub fn ports(&self) -> impl Iterator<Item = Port> + '_ {
        self.cell.ports().map(|p| p.transform(self.trans))
    }

    /// Moves the instance so that its port `port` meets `dest` head-on.
    ///
    /// The instance is rotated until the two ports face opposite directions, then
    /// translated so that its port lies `overlap` behind `dest`, measured against the
    /// direction `dest` faces.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use pirel::layout::{Cell, Instance, Layer};
    /// use pirel::geometry::prelude::*;
    ///
    /// let mut pad = Cell::new("pad");
    /// pad.add_shape(Layer::PAD, Rect::from_sides(-5., 0., 5., 10.));
    /// pad.add_port(Port::new("conn", Point::new(0., 0.), 10., 270.));
    ///
    /// let dest = Port::new("top", Point::new(20., 50.), 10., 90.);
    /// let mut inst = Instance::new(Arc::new(pad));
    /// inst.connect("conn", &dest, 0.).unwrap();
    /// assert_eq!(inst.port("conn").unwrap().center(), Point::new(20., 50.));
    /// ```
    pub fn connect(&mut self, port: &str, dest: &Port, overlap: f64) -> Result<&mut Self> {
        let current = self.require_port(port)?;
        let target = geometry::wrap_angle(dest.orientation() + 180.);
        self.transform_mut(Transformation::rotate(target - current.orientation()));
        let rotated = self.require_port(port)?;
        let anchor = dest.center() - dest.normal() * overlap;
        self.translate_mut(anchor - rotated.center());
        Ok(self)
    }

    /// Returns the shapes of the referenced cell, flattened and transformed.
    pub fn flatten(&self) -> Vec<(Layer, Shape)> {
        self.cell
            .flatten()
            .into_iter()
            .map(|(layer, shape)| (layer, shape.transform(self.trans)))
            .collect()
    }
}

impl Bbox for Instance {
    fn bbox(&self) -> Option<Rect> {
        self.flatten().iter().map(|(_, s)| s).collect::<Vec<_>>().bbox()
    }
}
