use approx::assert_relative_eq;
use geometry::prelude::*;
use test_log::test;

use super::*;
use crate::context::Context;
use crate::error::Error;
use crate::layout::Layer;
use crate::params::{ParamAssignments, ValidationError, Value};
use crate::part::{LayoutPart, LayoutPartExt};

#[test]
fn idt_draws_interleaved_fingers() {
    let ctx = Context::default();
    let mut idt = Idt::new("idt");
    idt.set_params(
        ParamAssignments::new()
            .with("Pitch", 8)
            .with("N", 40)
            .with("Length", 200)
            .with("YOffset", 10)
            .with("ActiveAreaMargin", 0.5),
    )
    .unwrap();
    assert_eq!(idt.active_area(), Point::new(649., 210.));

    let cell = idt.draw(&ctx).unwrap();
    let fingers = cell.flatten();
    assert_eq!(fingers.len(), 81);
    assert!(fingers.iter().all(|(layer, _)| *layer == Layer::IDT));
    assert_eq!(fingers[0].1.rect(), Some(Rect::from_sides(2., 10., 6., 210.)));
    assert_eq!(fingers[1].1.rect(), Some(Rect::from_sides(10., 0., 14., 200.)));

    let top = cell.require_port("top").unwrap();
    assert_eq!(top.center(), Point::new(324., 210.));
    assert_eq!(top.width(), 648.);
    assert_eq!(cell.require_port("bottom").unwrap().orientation(), 270.);
    assert_relative_eq!(idt.resistance_squares().unwrap(), 1.25);
}

#[test]
fn bus_resistance_counts_both_strips() {
    let mut bus = Bus::new("bus");
    bus.set_params(ParamAssignments::new().with("SizeX", 640).with("SizeY", 16))
        .unwrap();
    assert_relative_eq!(bus.resistance_squares().unwrap(), 20.);

    let cell = bus.draw(&Context::default()).unwrap();
    assert_eq!(
        cell.bbox(),
        Some(Rect::from_sides(0., 0., 640., 146.))
    );
    assert_eq!(
        cell.require_port("top").unwrap().center(),
        Point::new(320., 146.)
    );
}

#[test]
fn etch_pits_flank_the_active_area() {
    let pit = EtchPit::new("pit");
    let cell = pit.draw(&Context::default()).unwrap();
    assert_eq!(
        cell.layer_bbox(Layer::ETCH_PIT),
        Some(Rect::from_sides(-50., 0., 231., 190.))
    );
    assert_relative_eq!(cell.layer_area(Layer::ETCH_PIT), 2. * 50. * 190.);
}

#[test]
fn anchor_metal_must_fit() {
    let ctx = Context::default();
    let mut anchor = Anchor::new("anchor");
    anchor
        .set_params(ParamAssignments::new().with("MetalizedX", 30.))
        .unwrap();
    let err = anchor.draw(&ctx).unwrap_err();
    assert!(matches!(err, Error::Placement { feature: "metalization", .. }));

    anchor
        .set_params(
            ParamAssignments::new()
                .with("MetalizedX", 10.)
                .with("EtchChoice", false),
        )
        .unwrap();
    let cell = anchor.draw(&ctx).unwrap();
    assert!(cell.layer_bbox(Layer::ETCH_PIT).is_none());
    assert_relative_eq!(anchor.resistance_squares().unwrap(), 2.);
}

#[test]
fn via_shapes() {
    let ctx = Context::default();
    let mut via = Via::new("via");
    assert_relative_eq!(via.draw(&ctx).unwrap().layer_area(Layer::VIA), 2500.);

    via.set_params(ParamAssignments::new().with("Shape", "circle"))
        .unwrap();
    let area = via.draw(&ctx).unwrap().layer_area(Layer::VIA);
    assert_relative_eq!(area, std::f64::consts::PI * 625., max_relative = 0.01);

    let err = via
        .set_params(ParamAssignments::new().with("Shape", "hexagon"))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::NotAllowed { .. })
    ));
}

#[test]
fn pad_feed_and_ports() {
    let cell = Pad::new("pad").draw(&Context::default()).unwrap();
    assert_eq!(cell.bbox(), Some(Rect::from_sides(-40., 0., 40., 120.)));
    assert_eq!(cell.require_port("conn").unwrap().width(), 20.);
    assert_eq!(
        cell.require_port("pad").unwrap().center(),
        Point::new(0., 120.)
    );
}

#[test]
fn probe_pads_must_not_overlap() {
    let ctx = Context::default();
    let mut probe = Probe::new("probe");
    let cell = probe.draw(&ctx).unwrap();
    assert_eq!(
        cell.ports().map(|p| p.name().as_str()).collect::<Vec<_>>(),
        vec!["gnd_left", "sig", "gnd_right"]
    );
    assert_eq!(
        cell.require_port("gnd_right").unwrap().center(),
        Point::new(150., 40.)
    );

    probe
        .set_params(ParamAssignments::new().with("Pitch", 60.))
        .unwrap();
    assert!(matches!(
        probe.draw(&ctx),
        Err(Error::Placement { feature: "pads", .. })
    ));
}

#[test]
fn routing_draws_one_trace_per_destination() {
    let ctx = Context::default();
    let routing = Routing::new("trace");
    let cell = routing.draw(&ctx).unwrap();
    assert_eq!(cell.flatten().len(), 1);
    assert!(cell.port("source").is_some());
    assert!(cell.port("destination").is_some());
}

#[test]
fn routing_into_the_clearance_fails() {
    let mut routing = Routing::new("trace");
    routing
        .configure(
            Port::new("src", Point::new(0., 0.), 10., 90.),
            vec![Port::new("dst", Point::new(150., 400.), 10., 90.)],
            Rect::from_sides(0., 250., 300., 550.),
        )
        .unwrap();
    assert!(matches!(
        routing.draw(&Context::default()),
        Err(Error::RoutingImpossible { ref to, .. }) if to == "dst"
    ));
}

#[test]
fn routing_rejects_malformed_clearance() {
    let mut routing = Routing::new("trace");
    routing
        .set_params(ParamAssignments::new().with(
            "Clearance",
            vec![Point::new(0., 0.), Point::new(1., 1.), Point::new(2., 2.)],
        ))
        .unwrap();
    assert!(matches!(
        routing.clearance(),
        Err(Error::Validation(ValidationError::Malformed { .. }))
    ));
}

#[test]
fn lfe_defaults_satisfy_relations() {
    let mut res = LfeRes::new("res");
    let before = res.get_params();
    res.set_params(ParamAssignments::new()).unwrap();
    assert_eq!(res.get_params(), before);
    assert_eq!(before.type_name(), Some("LFERes"));
    assert_eq!(before["BusSizeX"], Value::Float(180.));
    assert_eq!(before["EtchPitActiveAreaY"], Value::Float(190.));
}

#[test]
fn lfe_relations_follow_the_transducer() {
    let mut res = LfeRes::new("res");
    res.set_params(
        ParamAssignments::new()
            .with("IDTPitch", 8)
            .with("IDTN", 40)
            .with("IDTLength", 200)
            .with("BusSizeY", 15),
    )
    .unwrap();
    assert_eq!(res.bus().size(), Point::new(648., 15.));
    assert_eq!(res.bus().distance(), Point::new(0., 225.));
    assert_eq!(res.etch_pit().active_area(), Point::new(649., 280.));
}

#[test]
fn lfe_layout_places_anchors_on_the_bus() {
    let res = LfeRes::new("res");
    let cell = res.draw(&Context::default()).unwrap();

    let bottom = cell.require_port("bottom").unwrap();
    assert_eq!(bottom.center(), Point::new(90., -40.));
    assert_eq!(bottom.orientation(), 270.);
    let top = cell.require_port("top").unwrap();
    assert_eq!(top.center(), Point::new(90., 150.));
    assert_eq!(top.width(), 10.);

    assert_eq!(cell.bbox(), Some(Rect::from_sides(-50.5, -41., 230.5, 151.)));
    assert_relative_eq!(res.resistance_squares().unwrap(), 9.);
}

#[test]
fn lfe_components_are_named_after_the_device() {
    let res = LfeRes::new("res");
    assert_eq!(res.idt().name(), "resIDT");
    assert_eq!(
        res.get_components()
            .into_iter()
            .map(|(label, ty)| format!("{label}:{ty}"))
            .collect::<Vec<_>>(),
        vec!["IDT:IDT", "Bus:Bus", "EtchPit:EtchPit", "Anchor:Anchor"]
    );
}
