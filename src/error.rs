//! Error types for the conflux library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for conflux operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the conflux library
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Required configuration file not found: {0}")]
    RequiredFileMissing(PathBuf),

    // -------------------------------------------------------------------------
    // Parse Errors
    // -------------------------------------------------------------------------
    #[error("Failed to parse JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // -------------------------------------------------------------------------
    // Source Errors
    // -------------------------------------------------------------------------
    #[error("Configuration source '{name}' failed to load: {source}")]
    SourceLoad {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Source '{0}' does not support reloading")]
    ReloadUnsupported(String),

    // -------------------------------------------------------------------------
    // Watch Errors (watch feature)
    // -------------------------------------------------------------------------
    #[cfg(feature = "watch")]
    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl Error {
    /// Check if this is a source-load failure (required file missing or malformed input)
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Error::FileRead { .. }
                | Error::RequiredFileMissing(_)
                | Error::Json { .. }
                | Error::SourceLoad { .. }
        )
    }

    /// Wrap an error with the name of the source that produced it
    pub(crate) fn in_source(self, name: &str) -> Self {
        Error::SourceLoad {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}
