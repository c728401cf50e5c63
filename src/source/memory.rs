//! In-memory configuration source

use crate::error::Result;
use crate::key::FlatMap;
use crate::source::ConfigSource;

/// Source wrapping a caller-supplied mapping literal.
///
/// Values are taken over without transformation; keys follow the canonical
/// `:`-delimited convention.
///
/// # Example
///
/// ```rust
/// use conflux::MemorySource;
///
/// let source = MemorySource::new([
///     ("MySetting", "Setting from in memory"),
///     ("Subsection:MyIntValue", "4"),
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    values: FlatMap,
}

impl MemorySource {
    /// Create a source from `(key, value)` pairs
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl ConfigSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self) -> Result<FlatMap> {
        Ok(self.values.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
