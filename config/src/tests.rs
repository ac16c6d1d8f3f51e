use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::{raw::RawConfig, Config, UnknownKeys};

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");

fn raw_config(dir: &str, env: &[(&str, &str)]) -> RawConfig {
    let root = PathBuf::from(DATA_DIR);
    let mut cfg = RawConfig::new(root.join(dir));
    cfg.set_search_stop_path(root);
    cfg.set_env(HashMap::from_iter(
        env.iter().map(|(a, b)| (a.to_string(), b.to_string())),
    ));
    cfg
}

#[test]
fn defaults_without_files() -> Result<()> {
    let cfg = raw_config("", &[]).resolve()?;
    assert_eq!(cfg, Config::default());
    assert!(cfg.cache.enable);
    assert_eq!(cfg.params.unknown_keys, UnknownKeys::Lenient);
    assert_eq!(cfg.params.max_iterations, 16);
    assert_eq!(cfg.routing.smoothing_segments, 8);
    Ok(())
}

#[test]
fn nested_files_override_ancestors() -> Result<()> {
    let cfg = raw_config("project/nested", &[]).resolve()?;
    assert_eq!(cfg.cache.capacity, Some(32));
    assert!(cfg.cache.enable);
    assert_eq!(cfg.params.unknown_keys, UnknownKeys::Strict);
    assert_eq!(cfg.params.max_iterations, 8);
    assert_eq!(cfg.routing.smoothing_segments, 4);
    Ok(())
}

#[test]
fn environment_overrides_files() -> Result<()> {
    let cfg = raw_config(
        "project/nested",
        &[
            ("PIREL_CACHE_ENABLE", "false"),
            ("PIREL_PARAMS_UNKNOWN_KEYS", "lenient"),
            ("PIREL_ROUTING_SMOOTHING_SEGMENTS", "12"),
        ],
    )
    .resolve()?;
    assert!(!cfg.cache.enable);
    assert_eq!(cfg.cache.capacity, Some(32));
    assert_eq!(cfg.params.unknown_keys, UnknownKeys::Lenient);
    assert_eq!(cfg.routing.smoothing_segments, 12);
    Ok(())
}

#[test]
fn rejects_invalid_values() {
    assert!(raw_config("project", &[("PIREL_PARAMS_MAX_ITERATIONS", "0")])
        .resolve()
        .is_err());
    assert!(raw_config("project", &[("PIREL_CACHE_ENABLE", "maybe")])
        .resolve()
        .is_err());
    assert!(Config::from_toml_str("[params]\nunknown_keys = \"loose\"").is_err());
}
