//! Utilities for loading and merging PIREL configuration.
//!
//! Settings are read from `pirel.toml` files found in the working directory and its
//! ancestors, with files closer to the working directory taking priority. Any setting
//! may be overridden by an environment variable named `PIREL_<SECTION>_<KEY>`, for
//! example `PIREL_CACHE_ENABLE=false`.
#![warn(missing_docs)]

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub(crate) mod paths;
pub(crate) mod raw;
pub(crate) mod toml;
#[cfg(test)]
mod tests;

use raw::RawConfig;

/// The name of configuration files searched for in each ancestor directory.
pub const CONFIG_FILE_NAME: &str = "pirel.toml";

/// The prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "PIREL";

/// Top-level PIREL configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layout cache settings.
    pub cache: CacheConfig,
    /// Parameter handling settings.
    pub params: ParamsConfig,
    /// Trace routing settings.
    pub routing: RoutingConfig,
}

/// Settings for the layout cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether generated layouts are memoized.
    pub enable: bool,
    /// The maximum number of layouts kept per part type, or unbounded if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: true,
            capacity: None,
        }
    }
}

/// How flat parameter imports treat keys that match no parameter.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Log a warning and ignore the key.
    #[default]
    Lenient,
    /// Reject the import.
    Strict,
}

/// Settings for parameter import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamsConfig {
    /// Treatment of unrecognized flat keys.
    pub unknown_keys: UnknownKeys,
    /// The maximum number of relation passes before an import is declared unstable.
    pub max_iterations: usize,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            unknown_keys: UnknownKeys::default(),
            max_iterations: 16,
        }
    }
}

/// Settings for trace routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// The number of straight pieces approximating each smoothed corner.
    pub smoothing_segments: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            smoothing_segments: 8,
        }
    }
}

impl Config {
    /// Loads configuration for the current working directory and process environment.
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir().context("could not determine working directory")?;
        Self::load(cwd)
    }

    /// Loads configuration as seen from `cwd`, using the process environment.
    pub fn load(cwd: impl AsRef<Path>) -> Result<Self> {
        RawConfig::new(cwd.as_ref().to_path_buf()).resolve()
    }

    /// Parses a single TOML document, applying no environment overrides.
    ///
    /// ```
    /// let config = config::Config::from_toml_str("[cache]\nenable = false").unwrap();
    /// assert!(!config.cache.enable);
    /// assert_eq!(config.params.max_iterations, 16);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let table = toml::parse_document(s, Path::new("<string>"))?;
        Self::from_table(table)
    }

    pub(crate) fn from_table(table: ::toml::Table) -> Result<Self> {
        let config: Config = ::toml::Value::Table(table)
            .try_into()
            .context("invalid PIREL configuration")?;
        if config.params.max_iterations == 0 {
            anyhow::bail!("`params.max_iterations` must be at least 1");
        }
        if config.cache.capacity == Some(0) {
            anyhow::bail!("`cache.capacity` must be at least 1");
        }
        Ok(config)
    }
}
