//! Configuration sources
//!
//! A source wraps one raw input (mapping literal, process environment, JSON
//! document, parsed command-line options) and exposes it as a flat key/value
//! view. The [`ConfigResolver`](crate::ConfigResolver) merges sources in
//! registration order, later registrations winning on key collisions.

use crate::error::Result;
use crate::key::FlatMap;
use std::path::Path;

mod cli;
mod env;
mod json;
mod memory;

pub use cli::{CliOptions, CommandLineSource};
pub use env::{EnvProvider, EnvSource};
pub use json::JsonFileSource;
pub use memory::MemorySource;

/// Trait for configuration source implementations
///
/// Sources are immutable once loaded; the only exception is a reloadable
/// source (file-backed), whose [`reload`](ConfigSource::reload) replaces the
/// loaded bag atomically.
pub trait ConfigSource: Send + Sync {
    /// Name identifying this source in errors, logs and provenance
    fn name(&self) -> &str;

    /// Produce the flat key/value view of the raw input.
    ///
    /// Malformed values for individual keys are omitted rather than failing
    /// the whole load; unreadable or syntactically invalid backing input
    /// fails the load entirely.
    fn load(&self) -> Result<FlatMap>;

    /// Whether this source can re-read its backing input after construction
    fn supports_reload(&self) -> bool {
        false
    }

    /// Re-read the backing input, atomically replacing the loaded bag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReloadUnsupported`](crate::Error::ReloadUnsupported)
    /// for sources without reload support.
    fn reload(&self) -> Result<()> {
        Err(crate::Error::ReloadUnsupported(self.name().to_string()))
    }

    /// File to watch for external modifications, if change-driven reload was
    /// requested for this source
    fn watch_path(&self) -> Option<&Path> {
        None
    }
}

// Shared sources register like owned ones; callers keeping a handle can
// drive reloads themselves
impl<S: ConfigSource + ?Sized> ConfigSource for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self) -> Result<FlatMap> {
        (**self).load()
    }

    fn supports_reload(&self) -> bool {
        (**self).supports_reload()
    }

    fn reload(&self) -> Result<()> {
        (**self).reload()
    }

    fn watch_path(&self) -> Option<&Path> {
        (**self).watch_path()
    }
}
