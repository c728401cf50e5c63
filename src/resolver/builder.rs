//! Builder for ConfigResolver
//!
//! This module contains [`ConfigResolverBuilder`] which provides a fluent API
//! for assembling a [`ConfigResolver`](super::ConfigResolver) from sources in
//! priority order.

use crate::error::Result;
use crate::source::{ConfigSource, EnvSource, JsonFileSource, MemorySource};
use std::path::PathBuf;

use super::ConfigResolver;

/// Builder for creating a [`ConfigResolver`] with a fluent API.
///
/// Sources are registered in call order; sources added later override earlier
/// ones for overlapping keys. `build()` performs the initial load.
///
/// # Example
///
/// ```rust,no_run
/// use conflux::ConfigResolver;
///
/// let resolver = ConfigResolver::builder()
///     .with_memory([("MySetting", "fallback")])
///     .with_settings_files("appsettings", Some("Production"))
///     .with_env_prefix("APP_")
///     .build()?;
/// # Ok::<(), conflux::Error>(())
/// ```
#[derive(Default)]
pub struct ConfigResolverBuilder {
    base_dir: Option<PathBuf>,
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigResolverBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative file paths of subsequently added file sources
    /// against this directory.
    ///
    /// Call before the file-source methods it should apply to.
    #[must_use]
    pub fn with_base_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(path.into());
        self
    }

    /// Register any configuration source
    #[must_use]
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Register an in-memory source from `(key, value)` pairs
    #[must_use]
    pub fn with_memory<I, K, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.with_source(MemorySource::new(values))
    }

    /// Register an environment source filtered by `prefix`.
    ///
    /// With prefix `APP_`, the variable `APP_Subsection__MyIntValue`
    /// contributes the key `Subsection:MyIntValue`.
    #[must_use]
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix))
    }

    /// Register a JSON file source, resolving a relative path against the
    /// base directory
    #[must_use]
    pub fn with_json_source(mut self, source: JsonFileSource) -> Self {
        let source = match &self.base_dir {
            Some(base) if source.path().is_relative() => source.rebase(base),
            _ => source,
        };
        self.sources.push(Box::new(source));
        self
    }

    /// Register a required JSON file
    #[must_use]
    pub fn with_json_file(self, path: impl Into<PathBuf>) -> Self {
        self.with_json_source(JsonFileSource::new(path))
    }

    /// Register the conventional settings-file pair: `{base}.json` followed
    /// by `{base}.{environment}.json`, so environment-specific values
    /// override the base file.
    ///
    /// Both files are optional and reload on change.
    #[must_use]
    pub fn with_settings_files(self, base: &str, environment: Option<&str>) -> Self {
        let builder = self.with_json_source(
            JsonFileSource::new(format!("{base}.json"))
                .optional()
                .reload_on_change(),
        );
        match environment {
            Some(env) => builder.with_json_source(
                JsonFileSource::new(format!("{base}.{env}.json"))
                    .optional()
                    .reload_on_change(),
            ),
            None => builder,
        }
    }

    /// Build the resolver: register all sources and perform the initial load.
    ///
    /// # Errors
    ///
    /// Fails if any non-optional source cannot be loaded.
    pub fn build(self) -> Result<ConfigResolver> {
        use crate::sync::RwLockExt;

        let resolver = ConfigResolver::new();
        {
            let mut sources = resolver.state.sources.write_recovered();
            for source in self.sources {
                sources.push(source.into());
            }
        }
        resolver.build()?;
        Ok(resolver)
    }
}

// =============================================================================
// Tests
// =============================================================================
