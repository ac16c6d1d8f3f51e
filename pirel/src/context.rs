//! The drawing context.

use std::sync::Arc;

use config::Config;
use tracing::{span, Level};

use crate::cache::{Cache, CacheKey};
use crate::error::Result;
use crate::layout::Cell;
use crate::part::LayoutPart;

/// The context in which parts are drawn.
///
/// Holds the configuration and the layout cache. Cloning a context is cheap and
/// clones share one cache.
#[derive(Debug, Clone)]
pub struct Context {
    config: Arc<Config>,
    cache: Cache,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Context {
    /// Creates a context with the given configuration.
    pub fn new(config: Config) -> Self {
        let cache = Cache::new(config.cache.capacity);
        Self {
            config: Arc::new(config),
            cache,
        }
    }

    /// Creates a context configured from `pirel.toml` files and `PIREL_*` environment
    /// variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }

    /// The configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The layout cache.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Draws `part`, reusing a cached layout for an equal parameter state.
    ///
    /// The cache lock is not held while the layout is generated, so nested parts may
    /// be drawn from within [`LayoutPart::layout`]. Errors are not cached.
    pub fn draw(&self, part: &dyn LayoutPart) -> Result<Arc<Cell>> {
        let type_name = part.type_name();
        let span = span!(Level::INFO, "draw", part = %type_name, name = %part.name());
        let _guard = span.enter();

        if !self.config.cache.enable {
            return Ok(Arc::new(part.layout(self)?));
        }

        let key = CacheKey::of(part);
        if let Some(cell) = self.cache.get(&type_name, &key) {
            tracing::debug!("cache hit");
            return Ok(cell);
        }
        tracing::debug!("cache miss");
        let cell = Arc::new(part.layout(self)?);
        Ok(self.cache.insert(&type_name, key, cell))
    }
}
