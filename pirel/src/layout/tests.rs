use std::sync::Arc;

use approx::assert_relative_eq;
use geometry::prelude::*;
use test_log::test;

use super::{port_extension, Cell, Element, Instance, Layer};
use crate::error::Error;

fn strip() -> Cell {
    let mut cell = Cell::new("strip");
    cell.add_shape(Layer::IDT, Rect::from_sides(-5., 0., 5., 20.));
    cell.add_port(Port::new("bottom", Point::new(0., 0.), 10., 270.));
    cell.add_port(Port::new("top", Point::new(0., 20.), 10., 90.));
    cell
}

#[test]
fn connect_meets_ports_head_on() {
    let dest = Port::new("east", Point::new(100., 50.), 10., 0.);
    let mut inst = Instance::new(Arc::new(strip()));
    inst.connect("bottom", &dest, 0.).unwrap();

    let port = inst.port("bottom").unwrap();
    assert_eq!(port.center(), Point::new(100., 50.));
    assert!(port.opposes(&dest));
    // The strip now extends to the right of the destination.
    assert_eq!(inst.port("top").unwrap().center(), Point::new(120., 50.));
    assert_eq!(inst.bbox(), Some(Rect::from_sides(100., 45., 120., 55.)));
}

#[test]
fn connect_with_overlap_pulls_instance_back() {
    let dest = Port::new("top", Point::new(0., 100.), 10., 90.);
    let mut inst = Instance::new(Arc::new(strip()));
    inst.connect("bottom", &dest, 2.).unwrap();
    assert_eq!(inst.port("bottom").unwrap().center(), Point::new(0., 98.));
}

#[test]
fn connect_reports_missing_port() {
    let mut inst = Instance::new(Arc::new(strip()));
    let err = inst
        .connect("left", &Port::new("p", Point::zero(), 1., 0.), 0.)
        .unwrap_err();
    assert!(matches!(err, Error::MissingPort { ref port, .. } if port == "left"));
}

#[test]
fn flatten_applies_nested_transformations() {
    let inner = Arc::new(strip());
    let mut middle = Cell::new("middle");
    middle.add_instance(Instance::new(inner).translated(Point::new(10., 0.)));
    let mut outer = Cell::new("outer");
    outer.add_instance(Instance::new(Arc::new(middle)).translated(Point::new(0., 30.)));
    outer.add_shape(Layer::PAD, Rect::from_sides(0., 0., 1., 1.));

    let shapes = outer.flatten();
    assert_eq!(shapes.len(), 2);
    assert_eq!(
        shapes[0],
        (Layer::IDT, Shape::Rect(Rect::from_sides(5., 30., 15., 50.)))
    );

    let by_layer = outer.shapes_by_layer();
    assert_eq!(by_layer.keys().copied().collect::<Vec<_>>(), vec![Layer::IDT, Layer::PAD]);
    assert_eq!(outer.layer_bbox(Layer::IDT), Some(Rect::from_sides(5., 30., 15., 50.)));
    assert_relative_eq!(outer.layer_area(Layer::IDT), 200.);
    assert_eq!(outer.bbox(), Some(Rect::from_sides(0., 0., 15., 50.)));
}

#[test]
fn wrapping_keeps_ports_and_references_inner() {
    let inner = Arc::new(strip());
    let cell = Cell::wrapping("wrapper", inner.clone());
    assert_eq!(cell.name(), "wrapper");
    assert_eq!(
        cell.ports().map(|p| p.name().as_str()).collect::<Vec<_>>(),
        vec!["bottom", "top"]
    );
    match cell.elements() {
        [Element::Instance(inst)] => assert!(Arc::ptr_eq(inst.cell(), &inner)),
        other => panic!("unexpected elements: {other:?}"),
    }
}

#[test]
fn adding_a_port_replaces_by_name() {
    let mut cell = strip();
    cell.add_port(Port::new("top", Point::new(0., 25.), 4., 90.));
    assert_eq!(cell.ports().count(), 2);
    assert_eq!(cell.require_port("top").unwrap().width(), 4.);
    assert!(matches!(
        cell.require_port("left"),
        Err(Error::MissingPort { part, .. }) if part == "strip"
    ));
}

#[test]
fn port_extension_follows_port_direction() {
    let port = Port::new("west", Point::new(0., 0.), 10., 180.);
    assert_eq!(
        port_extension(&port, 10., 20., 5.),
        Rect::from_sides(-25., -5., -5., 5.)
    );
}
