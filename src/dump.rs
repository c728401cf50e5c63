//! Effective-configuration dump for diagnostics
//!
//! Renders the resolver's current snapshot as sorted `key = value  [source]`
//! lines, answering "which source won?" for every key.

use crate::resolver::ConfigResolver;
use std::fmt::Write;

/// Render the effective snapshot with per-key provenance.
///
/// # Example
///
/// ```rust
/// use conflux::{ConfigResolver, MemorySource};
///
/// let mut resolver = ConfigResolver::new();
/// resolver.register(MemorySource::new([("MySetting", "A")]));
/// resolver.build()?;
///
/// let dump = conflux::dump_effective(&resolver);
/// assert_eq!(dump, "MySetting = A  [memory]\n");
/// # Ok::<(), conflux::Error>(())
/// ```
#[must_use]
pub fn dump_effective(resolver: &ConfigResolver) -> String {
    let snapshot = resolver.snapshot();
    let mut out = String::new();
    for (key, value, source) in snapshot.iter() {
        let _ = writeln!(out, "{key} = {value}  [{source}]");
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
