use std::path::Path;

use anyhow::{Context, Result};

pub fn parse_document(toml: &str, file: &Path) -> Result<toml::Table> {
    toml.parse()
        .with_context(|| format!("could not parse `{}` as TOML", file.display()))
}
