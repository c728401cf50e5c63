//! Prefix-scoped projections of a resolver
//!
//! A section never owns data: every lookup delegates to the parent resolver
//! with the prefix re-applied, so sections always reflect live resolver
//! state.

use crate::bind::{bind, Bindable, KeySpace};
use crate::key::join;
use crate::resolver::ConfigResolver;

/// Read-only view of a [`ConfigResolver`] scoped to a key prefix.
///
/// # Example
///
/// ```rust
/// use conflux::{ConfigResolver, MemorySource};
///
/// let mut resolver = ConfigResolver::new();
/// resolver.register(MemorySource::new([("Subsection:MyIntValue", "4")]));
/// resolver.build()?;
///
/// let subsection = resolver.section("Subsection");
/// assert_eq!(subsection.get("MyIntValue").as_deref(), Some("4"));
/// # Ok::<(), conflux::Error>(())
/// ```
pub struct ConfigSection<'a> {
    resolver: &'a ConfigResolver,
    prefix: String,
}

impl<'a> ConfigSection<'a> {
    pub(crate) fn new(resolver: &'a ConfigResolver, prefix: String) -> Self {
        Self { resolver, prefix }
    }

    /// Key prefix this section applies
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Look up `key` under this section's prefix
    pub fn get(&self, key: &str) -> Option<String> {
        self.resolver.get(&join(&self.prefix, key))
    }

    /// Narrow the view by a further prefix
    pub fn section(&self, prefix: &str) -> ConfigSection<'a> {
        ConfigSection::new(self.resolver, join(&self.prefix, prefix))
    }

    /// Bind this section's key space onto a settings shape
    pub fn bind<T: Bindable>(&self) -> T {
        bind(self)
    }
}

impl KeySpace for ConfigSection<'_> {
    fn value_of(&self, key: &str) -> Option<String> {
        self.get(key)
    }
}

// =============================================================================
// Tests
// =============================================================================
