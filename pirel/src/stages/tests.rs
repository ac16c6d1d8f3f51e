use approx::assert_relative_eq;
use geometry::prelude::*;
use test_log::test;

use super::*;
use crate::context::Context;
use crate::error::Error;
use crate::layout::Layer;
use crate::params::{FlatParams, ParamAssignments, Value};
use crate::part::{LayoutPart, LayoutPartExt};
use crate::pcells::LfeRes;

fn port_names(cell: &crate::layout::Cell) -> Vec<&str> {
    cell.ports().map(|p| p.name().as_str()).collect()
}

fn assert_params_close(a: &FlatParams, b: &FlatParams) {
    assert_eq!(a.keys().collect::<Vec<_>>(), b.keys().collect::<Vec<_>>());
    for (key, value) in a.iter() {
        match (value, &b[key.as_str()]) {
            (Value::Float(x), Value::Float(y)) => {
                assert_relative_eq!(*x, *y, max_relative = 1e-12, epsilon = 1e-12)
            }
            (x, y) => assert_eq!(x, y, "mismatch at `{key}`"),
        }
    }
}

#[test]
fn stage_type_names_nest() {
    let part = LfeRes::new("res").scaled().with_via().with_pads().arrayed();
    assert_eq!(
        part.type_name(),
        "Arrayed<WithPads<WithVia<Scaled<LFERes>>>>"
    );
    assert_eq!(part.name(), "res");
    assert_eq!(part.get_params().type_name(), Some(part.type_name().as_str()));
}

#[test]
fn stages_extend_components_and_parameters() {
    let base = LfeRes::new("res");
    let base_params = base.get_params();
    let part = base.with_via().with_probe();

    let components = part.get_components();
    assert_eq!(
        components.keys().copied().collect::<Vec<_>>(),
        vec![
            "IDT",
            "Bus",
            "EtchPit",
            "Anchor",
            "Via",
            "Probe",
            "SigTrace",
            "GndLeftTrace",
            "GndRightTrace"
        ]
    );
    assert_eq!(components["GndLeftTrace"], "Routing");

    let params = part.get_params();
    for key in base_params.keys() {
        assert!(params.contains_key(key), "missing `{key}`");
    }
    for key in [
        "ViaSide",
        "ViaSize",
        "ViaAreaX",
        "ProbeOffsetY",
        "ProbePitch",
        "SigTraceTraceWidth",
    ] {
        assert!(params.contains_key(key), "missing `{key}`");
    }
}

#[test]
fn stage_parameters_reach_the_base() {
    let mut part = LfeRes::new("res").with_via().with_pads();
    part.set_params(
        ParamAssignments::new()
            .with("IDTPitch", 10.)
            .with("PadSize", 60.)
            .with("ViaSide", "bottom"),
    )
    .unwrap();
    assert_eq!(part.base().base().idt().pitch(), 10.);
    assert_eq!(part.pad().size(), 60.);
    assert_eq!(part.get_value(&["ViaSide"]).unwrap(), Value::from("bottom"));
}

#[test]
fn via_lands_beyond_the_selected_port() {
    let ctx = Context::default();
    let mut part = LfeRes::new("res").with_via();
    let cell = part.draw(&ctx).unwrap();
    assert_eq!(port_names(&cell), vec!["bottom", "top", "top_via"]);
    let via = cell.require_port("top_via").unwrap();
    assert_eq!(via.center(), Point::new(90., 350.));
    assert_eq!(via.width(), 100.);
    assert_eq!(
        cell.layer_bbox(Layer::VIA),
        Some(Rect::from_sides(65., 275., 115., 325.))
    );

    part.set_params(ParamAssignments::new().with("ViaSide", "bottom"))
        .unwrap();
    let cell = part.draw(&ctx).unwrap();
    assert_eq!(
        cell.require_port("bottom_via").unwrap().center(),
        Point::new(90., -240.)
    );
}

#[test]
fn oversized_via_is_a_placement_error() {
    let mut part = LfeRes::new("res").with_via();
    part.set_params(ParamAssignments::new().with("ViaSize", 150.))
        .unwrap();
    assert!(matches!(
        part.draw(&Context::default()),
        Err(Error::Placement { feature: "via", .. })
    ));
}

#[test]
fn via_requires_the_selected_port() {
    let mut part = crate::pcells::Pad::new("pad").with_via();
    part.set_params(ParamAssignments::new().with("ViaSide", "bottom"))
        .unwrap();
    assert!(matches!(
        part.draw(&Context::default()),
        Err(Error::MissingPort { ref part, ref port }) if part == "Pad" && port == "bottom"
    ));
}

#[test]
fn pads_attach_to_every_port() {
    let cell = LfeRes::new("res")
        .with_pads()
        .draw(&Context::default())
        .unwrap();
    assert_eq!(
        port_names(&cell),
        vec!["bottom", "top", "bottom_pad", "top_pad"]
    );
    let top = cell.require_port("top_pad").unwrap();
    assert_eq!(top.center(), Point::new(90., 270.));
    assert_eq!(top.orientation(), 90.);
    let bottom = cell.require_port("bottom_pad").unwrap();
    assert_eq!(bottom.center(), Point::new(90., -160.));
    assert_eq!(bottom.orientation(), 270.);
}

#[test]
fn probe_is_routed_to_the_device() {
    let cell = LfeRes::new("res")
        .with_probe()
        .draw(&Context::default())
        .unwrap();
    assert_eq!(
        port_names(&cell),
        vec!["bottom", "top", "probe_sig", "probe_gnd_left", "probe_gnd_right"]
    );
    assert_eq!(
        cell.require_port("probe_sig").unwrap().center(),
        Point::new(90., -191.)
    );
    // Device, three traces and the probe.
    assert_eq!(cell.instances().count(), 5);
}

#[test]
fn large_ground_requires_a_probe() {
    let ctx = Context::default();
    assert!(matches!(
        LfeRes::new("res").with_large_ground().draw(&ctx),
        Err(Error::MissingPort { ref port, .. }) if port == "probe_gnd_left"
    ));

    let cell = LfeRes::new("res")
        .with_probe()
        .with_large_ground()
        .draw(&ctx)
        .unwrap();
    let gnd = cell.layer_bbox(Layer::BOTTOM).unwrap();
    // Flush with the outer edges of the ground pads at x = -60 - 40 and 240 + 40.
    assert_eq!(gnd.left(), -100.);
    assert_eq!(gnd.right(), 280.);
    assert_eq!(gnd.top(), -191.);
}

#[test]
fn arrays_connect_copies_in_parallel() {
    let mut part = LfeRes::new("res").arrayed();
    part.set_params(ParamAssignments::new().with("NBlocks", 3))
        .unwrap();
    let cell = part.draw(&Context::default()).unwrap();
    assert_eq!(cell.instances().count(), 3);
    let top = cell.require_port("top").unwrap();
    assert_eq!(top.center(), Point::new(371., 170.));
    assert_eq!(top.width(), 572.);
    assert_eq!(cell.require_port("bottom").unwrap().center().y(), -60.);
    assert_relative_eq!(part.resistance_squares().unwrap(), 3.);
}

#[test]
fn stacks_chain_copies_in_series() {
    let mut part = LfeRes::new("res").stacked();
    part.set_params(ParamAssignments::new().with("NPaths", 3))
        .unwrap();
    let cell = part.draw(&Context::default()).unwrap();
    assert_eq!(cell.instances().count(), 3);
    assert_eq!(
        cell.require_port("bottom").unwrap().center(),
        Point::new(90., -40.)
    );
    assert_eq!(
        cell.require_port("top").unwrap().center(),
        Point::new(90., 530.)
    );
    assert_relative_eq!(part.resistance_squares().unwrap(), 27.);
}

#[test]
fn fixtures_keep_terminals() {
    let ctx = Context::default();
    let mut part = LfeRes::new("res").fixture();
    let open = part.draw(&ctx).unwrap();
    assert_eq!(port_names(&open), vec!["bottom", "top"]);
    assert_eq!(open.flatten().len(), 2);
    assert_eq!(part.resistance_squares(), None);

    part.set_params(ParamAssignments::new().with("Style", "short"))
        .unwrap();
    let short = part.draw(&ctx).unwrap();
    assert_eq!(
        short.layer_bbox(Layer::IDT),
        Some(Rect::from_sides(85., -40., 95., 150.))
    );
    assert_eq!(part.resistance_squares(), Some(0.));
}

#[test]
fn scaled_exports_relative_dimensions() {
    let res = LfeRes::new("res").scaled();
    let params = res.get_params();
    assert_eq!(params.type_name(), Some("Scaled<LFERes>"));
    assert_eq!(params["IDTLength"], Value::Float(5.));
    assert_eq!(params["IDTYOffset"], Value::Float(0.5));
    assert_eq!(params["BusSizeX"], Value::Float(9.));
    assert_eq!(params["AnchorMetalizedX"], Value::Float(0.5));
    assert_eq!(params["IDTPitch"], Value::Float(20.));
    // Exporting leaves the part in absolute units.
    assert!(!res.is_normalized());
    assert_eq!(res.base().idt().length(), 100.);
}

#[test]
fn scaled_round_trip_restores_parameters() {
    let mut res = LfeRes::new("res").scaled();
    let absolute = res.base().get_params();
    res.normalize().unwrap();
    assert!(res.is_normalized());
    res.denormalize().unwrap();
    assert_params_close(&res.base().get_params(), &absolute);
}

#[test]
fn scaled_import_is_idempotent() {
    let mut res = LfeRes::new("res").scaled();
    res.set_params(ParamAssignments::new().with("IDTPitch", 12.).with("IDTLength", 8.))
        .unwrap();
    assert_eq!(res.base().idt().length(), 96.);

    let exported = res.get_params();
    res.set_params(&exported).unwrap();
    assert_params_close(&res.get_params(), &exported);
}

#[test]
fn scale_operations_must_alternate() {
    let mut res = LfeRes::new("res").scaled();
    assert!(matches!(
        res.denormalize(),
        Err(Error::ScaleState { attempted: "denormalize", .. })
    ));
    res.normalize().unwrap();
    assert!(matches!(
        res.normalize(),
        Err(Error::ScaleState { attempted: "normalize", .. })
    ));
}
