use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use config::{Config, ParamsConfig, UnknownKeys};
use test_log::test;

use crate::params::{Deferred, FlatParams, ValidationError};
use crate::part::assign;
use crate::prelude::*;

fn strict() -> ParamsConfig {
    ParamsConfig {
        unknown_keys: UnknownKeys::Strict,
        ..Default::default()
    }
}

#[test]
fn exported_parameters_reproduce_a_device() {
    let mut a = LfeRes::new("a").with_via();
    a.set_params(
        ParamAssignments::new()
            .with("IDTPitch", 12.)
            .with("IDTCoverage", 0.4)
            .with("AnchorEtchChoice", false)
            .with("ViaShape", "circle"),
    )
    .unwrap();

    let mut b = LfeRes::new("b").with_via();
    b.set_params_with(&a.get_params(), &strict()).unwrap();
    assert_eq!(b.get_params(), a.get_params());

    let ctx = Context::default();
    assert_eq!(
        a.draw(&ctx).unwrap().flatten(),
        b.draw(&ctx).unwrap().flatten()
    );
}

#[test]
fn reimporting_an_export_changes_nothing() {
    let mut res = LfeRes::new("res").with_pads();
    let exported = res.get_params();
    res.set_params(&exported).unwrap();
    assert_eq!(res.get_params(), exported);
}

#[test]
fn exports_survive_json() {
    let mut a = LfeRes::new("res").with_probe();
    a.set_params(ParamAssignments::new().with("ProbePitch", 200.))
        .unwrap();
    let json = a.get_params().to_json().unwrap();

    let mut b = LfeRes::new("res").with_probe();
    b.set_params_with(&FlatParams::from_json(&json).unwrap(), &strict())
        .unwrap();
    assert_eq!(b.get_params(), a.get_params());
}

#[test]
fn export_all_reports_resistance() {
    let res = LfeRes::new("res");
    let params = res.export_all();
    assert_eq!(params.get("Resistance"), Some(&Value::Float(9.)));
    assert!(!res.get_params().contains_key("Resistance"));
}

#[test]
fn strict_imports_reject_unknown_keys() {
    let mut res = LfeRes::new("res");
    let err = res
        .set_params_with(
            ParamAssignments::new()
                .with("IDTPitch", 8.)
                .with("AnchorSize", 3.)
                .with("Bogus", 1),
            &strict(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownParams(ref keys) if keys == &["AnchorSize".to_string(), "Bogus".to_string()]
    ));
    // Nothing was applied.
    assert_eq!(res.idt().pitch(), 20.);

    // Bookkeeping keys are always accepted.
    res.set_params_with(
        ParamAssignments::new()
            .with("Type", "Other")
            .with("Name", "x")
            .with("Resistance", 1.),
        &strict(),
    )
    .unwrap();
}

#[test]
fn lenient_imports_skip_unknown_keys() {
    let mut res = LfeRes::new("res");
    res.set_params(ParamAssignments::new().with("Bogus", 1).with("IDTPitch", 8.))
        .unwrap();
    assert_eq!(res.idt().pitch(), 8.);
}

#[test]
fn point_coordinates_import_independently() {
    let mut res = LfeRes::new("res");
    res.set_params(ParamAssignments::new().with("AnchorSizeX", 30.))
        .unwrap();
    assert_eq!(res.anchor().size(), Point::new(30., 20.));
}

#[test]
fn invalid_values_are_rejected() {
    let mut res = LfeRes::new("res");
    assert!(matches!(
        res.set_params(ParamAssignments::new().with("IDTN", 2.5)),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        res.set_params(ParamAssignments::new().with("AnchorSizeX", "wide")),
        Err(Error::Validation(_))
    ));
}

#[test]
fn deferred_values_see_the_owning_part() {
    let mut res = LfeRes::new("res");
    res.set_params(
        ParamAssignments::new()
            .with("AnchorSizeX", 40.)
            .with_fn("AnchorXOffset", |anchor| {
                let size = crate::part::lookup(anchor, &["size"])?;
                Ok(Value::Float(size.as_point().map_or(0., |p| p.x() / 4.)))
            }),
    )
    .unwrap();
    assert_eq!(res.anchor().x_offset(), 10.);
}

#[test]
fn unstable_imports_do_not_converge() {
    let counter = Arc::new(AtomicU64::new(0));
    let ticks = counter.clone();
    let mut res = LfeRes::new("res");
    let err = res
        .set_params(ParamAssignments::new().with_fn("IDTLength", move |_| {
            Ok(Value::Float(101. + ticks.fetch_add(1, Ordering::SeqCst) as f64))
        }))
        .unwrap_err();
    assert!(matches!(err, Error::NotConverged(16)));
    assert_eq!(counter.load(Ordering::SeqCst), 16);
    assert_eq!(res.idt().length(), 100.);
}

#[test]
fn rejected_imports_leave_parameters_unchanged() {
    let mut res = LfeRes::new("res");
    let before = res.get_params();
    let err = res
        .set_params(
            ParamAssignments::new()
                .with("IDTPitch", 10.)
                .with("AnchorSizeX", "wide"),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(res.get_params(), before);
    assert_eq!(res.idt().pitch(), 20.);
    assert_eq!(res.bus().size().x(), res.idt().span());
}

#[test]
fn non_finite_imports_name_the_parameter() {
    let mut res = LfeRes::new("res");
    let err = res
        .set_params(ParamAssignments::new().with("IDTActiveAreaMargin", f64::NAN))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::NotFinite { ref label, .. })
            if label == "ActiveAreaMargin"
    ));
    assert_eq!(res.idt().active_area_margin(), 0.5);
}

#[test]
fn zero_argument_deferred_values_are_evaluated() {
    let mut res = LfeRes::new("res");
    res.set_params(ParamAssignments::new().with("IDTN", Deferred::from_fn(|| 6)))
        .unwrap();
    assert_eq!(res.idt().n(), 6);
    assert_eq!(res.bus().size().x(), 260.);
}

#[test]
fn values_are_addressed_by_path() {
    let mut res = LfeRes::new("res").with_via();
    res.set_value(&["IDT", "pitch"], 10.).unwrap();
    // Relations are maintained.
    let bus = res.get_value(&["Bus", "size"]).unwrap();
    assert_eq!(bus.as_point().map(|p| p.x()), Some(90.));
    assert_eq!(res.get_value(&["via_side"]).unwrap(), Value::from("top"));
    assert!(matches!(
        res.get_value(&["Pad", "size"]),
        Err(Error::NoSuchComponent { ref component, .. }) if component == "Pad"
    ));
    assert!(matches!(
        res.get_value(&["IDT", "width"]),
        Err(Error::NoSuchParam { ref param, .. }) if param == "width"
    ));
}

#[test]
fn assign_skips_relations() {
    let mut res = LfeRes::new("res");
    assign(&mut res, &["IDT", "pitch"], Value::Float(10.)).unwrap();
    assert_eq!(res.bus().size().x(), 180.);
}

#[test]
fn equal_parameters_share_a_cached_layout() {
    let ctx = Context::default();
    let a = LfeRes::new("res").with_pads();
    let first = a.draw(&ctx).unwrap();
    let second = a.draw(&ctx).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // A separately constructed device with the same parameters hits too.
    let b = LfeRes::new("res").with_pads();
    assert!(Arc::ptr_eq(&first, &b.draw(&ctx).unwrap()));
    assert!(ctx.cache().stats().hits >= 2);
}

#[test]
fn changed_parameters_miss_the_cache() {
    let ctx = Context::default();
    let mut res = LfeRes::new("res");
    let key = res.cache_key();
    let before = res.draw(&ctx).unwrap();

    res.set_params(ParamAssignments::new().with("AnchorXOffset", 5.))
        .unwrap();
    assert_ne!(res.cache_key(), key);
    let after = res.draw(&ctx).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_ne!(before.port("top"), after.port("top"));
}

#[test]
fn disabled_cache_regenerates() {
    let mut config = Config::default();
    config.cache.enable = false;
    let ctx = Context::new(config);
    let res = LfeRes::new("res");
    let a = res.draw(&ctx).unwrap();
    let b = res.draw(&ctx).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a, b);
    assert!(ctx.cache().is_empty());
}

#[test]
fn bounded_cache_evicts_old_layouts() {
    let mut config = Config::default();
    config.cache.capacity = Some(1);
    let ctx = Context::new(config);

    let mut res = LfeRes::new("res");
    let first = res.draw(&ctx).unwrap();
    res.set_params(ParamAssignments::new().with("IDTN", 5)).unwrap();
    res.draw(&ctx).unwrap();
    res.set_params(ParamAssignments::new().with("IDTN", 4)).unwrap();
    let again = res.draw(&ctx).unwrap();

    assert!(!Arc::ptr_eq(&first, &again));
    assert_eq!(first, again);
    assert!(ctx.cache().stats().evictions > 0);
}

#[test]
fn decorated_layouts_keep_base_ports() {
    let ctx = Context::default();
    let base = LfeRes::new("res").draw(&ctx).unwrap();
    let decorated = LfeRes::new("res")
        .with_via()
        .with_pads()
        .draw(&ctx)
        .unwrap();
    for port in base.ports() {
        assert_eq!(decorated.port(port.name()), Some(port));
    }
}
