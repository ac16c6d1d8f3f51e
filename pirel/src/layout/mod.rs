//! Layout results: cells of shapes, references, and ports.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::prelude::{Bbox, Port, Rect, Shape};
use indexmap::IndexMap;

use crate::error::{Error, Result};

pub mod element;
pub mod layers;

pub use element::{Element, Instance};
pub use layers::Layer;

#[cfg(test)]
mod tests;

/// A generated layout cell.
///
/// Cells returned by [`Context::draw`](crate::context::Context::draw) may be shared
/// with other callers through the cache and should be treated as read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    name: ArcStr,
    elements: Vec<Element>,
    ports: IndexMap<ArcStr, Port>,
}

impl Cell {
    /// Creates an empty cell.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates a cell that references `inner` in place and exposes all of its ports.
    pub fn wrapping(name: impl Into<ArcStr>, inner: Arc<Cell>) -> Self {
        let mut cell = Self::new(name);
        cell.add_ports(inner.ports().cloned());
        cell.add_instance(Instance::new(inner));
        cell
    }

    /// The cell name.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The elements of the cell, in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Adds a shape on `layer`.
    pub fn add_shape(&mut self, layer: Layer, shape: impl Into<Shape>) {
        self.elements.push(Element::Shape(layer, shape.into()));
    }

    /// Adds a reference to another cell.
    pub fn add_instance(&mut self, instance: Instance) {
        self.elements.push(Element::Instance(instance));
    }

    /// Iterates over the instances placed in this cell.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.elements.iter().filter_map(|e| match e {
            Element::Instance(inst) => Some(inst),
            Element::Shape(..) => None,
        })
    }

    /// Adds a port, replacing any existing port with the same name.
    pub fn add_port(&mut self, port: Port) {
        self.ports.insert(port.name().clone(), port);
    }

    /// Adds several ports.
    pub fn add_ports(&mut self, ports: impl IntoIterator<Item = Port>) {
        for port in ports {
            self.add_port(port);
        }
    }

    /// Iterates over the ports in insertion order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    /// Returns the port named `name`.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    /// Returns the port named `name`, or a [`Error::MissingPort`] naming this cell.
    pub fn require_port(&self, name: &str) -> Result<&Port> {
        self.port(name).ok_or_else(|| Error::MissingPort {
            part: self.name.clone(),
            port: ArcStr::from(name),
        })
    }

    /// Returns every shape in the hierarchy, transformed into this cell's coordinates.
    pub fn flatten(&self) -> Vec<(Layer, Shape)> {
        let mut shapes = Vec::new();
        for elem in &self.elements {
            match elem {
                Element::Shape(layer, shape) => shapes.push((*layer, shape.clone())),
                Element::Instance(inst) => shapes.extend(inst.flatten()),
            }
        }
        shapes
    }

    /// Returns the flattened shapes grouped by layer, in order of first appearance.
    pub fn shapes_by_layer(&self) -> IndexMap<Layer, Vec<Shape>> {
        let mut layers: IndexMap<Layer, Vec<Shape>> = IndexMap::new();
        for (layer, shape) in self.flatten() {
            layers.entry(layer).or_default().push(shape);
        }
        layers
    }

    /// The bounding box of the shapes on `layer`.
    pub fn layer_bbox(&self, layer: Layer) -> Option<Rect> {
        self.flatten()
            .into_iter()
            .filter(|(l, _)| *l == layer)
            .map(|(_, s)| s)
            .collect::<Vec<_>>()
            .bbox()
    }

    /// The total area drawn on `layer`, counting overlapping shapes once each.
    pub fn layer_area(&self, layer: Layer) -> f64 {
        self.flatten()
            .iter()
            .filter(|(l, _)| *l == layer)
            .map(|(_, s)| s.area())
            .sum()
    }

}

impl Bbox for Cell {
    fn bbox(&self) -> Option<Rect> {
        self.elements.bbox()
    }
}

/// The rectangle extending `along` out of `port`, starting `offset` beyond it, and
/// `across` wide.
///
/// ```
/// use pirel::geometry::prelude::*;
/// use pirel::layout::port_extension;
///
/// let port = Port::new("top", Point::new(10., 20.), 4., 90.);
/// assert_eq!(port_extension(&port, 4., 6., 0.), Rect::from_sides(8., 20., 12., 26.));
/// ```
pub fn port_extension(port: &Port, across: f64, along: f64, offset: f64) -> Rect {
    let normal = port.normal();
    let half = normal.rotate(90.) * (across / 2.);
    let start = port.center() + normal * offset;
    let end = start + normal * along;
    Rect::new(start - half, end + half)
}
