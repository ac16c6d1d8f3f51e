//! Discovery and merging of raw configuration tables.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use lazycell::LazyCell;
use toml::{Table, Value};

use crate::{paths, Config, CONFIG_FILE_NAME, ENV_PREFIX};

/// Unresolved configuration: the merged contents of every discovered config file, plus
/// a snapshot of the relevant environment variables.
#[derive(Debug)]
pub(crate) struct RawConfig {
    /// The directory from which config file discovery starts.
    cwd: PathBuf,
    /// Directory where config file searching should stop (inclusive).
    search_stop_path: Option<PathBuf>,
    /// Merged file contents, loaded on first use.
    values: LazyCell<Table>,
    /// Environment variables beginning with the PIREL prefix.
    env: HashMap<String, String>,
}

impl RawConfig {
    /// Creates a new [`RawConfig`] rooted at `cwd`, snapshotting the process environment.
    ///
    /// No files are read until values are requested.
    pub(crate) fn new(cwd: PathBuf) -> Self {
        let prefix = format!("{ENV_PREFIX}_");
        Self {
            cwd,
            search_stop_path: None,
            values: LazyCell::new(),
            env: std::env::vars()
                .filter(|(k, _)| k.starts_with(&prefix))
                .collect(),
        }
    }

    /// Sets the path where ancestor config file searching will stop. The
    /// given path is included, but its ancestors are not.
    #[cfg(test)]
    pub(crate) fn set_search_stop_path<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        debug_assert!(self.cwd.starts_with(&path));
        self.search_stop_path = Some(path);
    }

    /// Helper for testing.
    #[cfg(test)]
    pub(crate) fn set_env(&mut self, env: HashMap<String, String>) {
        self.env = env;
    }

    /// Gets all config values from disk, loading them if necessary.
    pub(crate) fn values(&self) -> Result<&Table> {
        self.values.try_borrow_with(|| self.load_values())
    }

    /// Merges file values with environment overrides and deserializes the result.
    pub(crate) fn resolve(&self) -> Result<Config> {
        let mut table = self.values()?.clone();
        self.apply_env(&mut table)?;
        Config::from_table(table)
    }

    fn load_values(&self) -> Result<Table> {
        let mut cfg = Table::new();
        for dir in paths::ancestors(&self.cwd, self.search_stop_path.as_deref()) {
            let path = dir.join(CONFIG_FILE_NAME);
            if !path.exists() {
                continue;
            }
            let value = self.load_file(&path)?;
            merge(&mut cfg, value).with_context(|| {
                format!("failed to merge configuration at `{}`", path.display())
            })?;
        }
        Ok(cfg)
    }

    fn load_file(&self, path: &Path) -> Result<Table> {
        log::debug!("loading config file `{}`", path.display());
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file `{}`", path.display()))?;
        crate::toml::parse_document(&contents, path)
    }

    /// Applies `PIREL_<SECTION>_<KEY>` variables on top of `table`.
    fn apply_env(&self, table: &mut Table) -> Result<()> {
        let prefix = format!("{ENV_PREFIX}_");
        let mut keys: Vec<_> = self.env.keys().collect();
        keys.sort();
        for name in keys {
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            let rest = rest.to_lowercase();
            let Some((section, key)) = rest.split_once('_') else {
                log::trace!("ignoring environment variable `{name}`");
                continue;
            };
            let entry = table
                .entry(section.to_string())
                .or_insert_with(|| Value::Table(Table::new()));
            let Value::Table(section_table) = entry else {
                bail!("`{section}` is not a table, so `{name}` cannot override it");
            };
            log::trace!("applying environment override `{name}`");
            section_table.insert(key.to_string(), env_value(&self.env[name]));
        }
        Ok(())
    }
}

/// Merges `src` into `dst`. Values already present in `dst` take priority.
fn merge(dst: &mut Table, src: Table) -> Result<()> {
    for (key, value) in src {
        match (dst.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => merge(existing, incoming)?,
            (Some(Value::Table(_)), other) | (Some(_), other @ Value::Table(_)) => {
                bail!(
                    "`{key}` is a table in one file but a {} in another",
                    other.type_str()
                );
            }
            (Some(_), _) => {}
            (None, value) => {
                dst.insert(key, value);
            }
        }
    }
    Ok(())
}

/// Interprets an environment variable as a TOML scalar, falling back to a string.
fn env_value(s: &str) -> Value {
    format!("value = {s}")
        .parse::<Table>()
        .ok()
        .and_then(|mut t| t.remove("value"))
        .filter(|v| !v.is_table())
        .unwrap_or_else(|| Value::String(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_values_are_typed() {
        assert_eq!(env_value("false"), Value::Boolean(false));
        assert_eq!(env_value("64"), Value::Integer(64));
        assert_eq!(env_value("strict"), Value::String("strict".to_string()));
    }

    #[test]
    fn closer_values_win() {
        let mut dst: Table = "[cache]\nenable = false".parse().unwrap();
        let src: Table = "[cache]\nenable = true\ncapacity = 3".parse().unwrap();
        merge(&mut dst, src).unwrap();
        assert_eq!(dst["cache"]["enable"], Value::Boolean(false));
        assert_eq!(dst["cache"]["capacity"], Value::Integer(3));
    }
}
