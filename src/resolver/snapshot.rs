//! Effective snapshot produced by one resolver build

use crate::key::{normalize, FlatMap};
use std::collections::BTreeMap;

/// Source name recorded for values written through
/// [`ConfigResolver::set`](crate::ConfigResolver::set)
pub(crate) const OVERLAY_SOURCE: &str = "overlay";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SnapshotEntry {
    /// First-seen spelling of the key
    pub key: String,
    pub value: String,
    /// Name of the source that contributed the winning value
    pub source: String,
}

/// Immutable merged flat key space.
///
/// A snapshot is built by writing every source's bag in registration order,
/// so later sources overwrite overlapping keys. Readers always observe one
/// snapshot in full; rebuilds swap in a complete replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, SnapshotEntry>,
}

impl Snapshot {
    /// Write one key, recording the contributing source
    pub(crate) fn put(&mut self, key: &str, value: &str, source: &str) {
        self.entries
            .entry(normalize(key))
            .and_modify(|e| {
                e.value = value.to_string();
                e.source = source.to_string();
            })
            .or_insert_with(|| SnapshotEntry {
                key: key.to_string(),
                value: value.to_string(),
                source: source.to_string(),
            });
    }

    /// Write a whole source bag in its own key order
    pub(crate) fn apply(&mut self, bag: &FlatMap, source: &str) {
        for (key, value) in bag.iter() {
            self.put(key, value, source);
        }
    }

    /// Case-insensitive exact lookup
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize(key)).map(|e| e.value.as_str())
    }

    /// Name of the source whose value won for `key`
    pub fn source_of(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&normalize(key))
            .map(|e| e.source.as_str())
    }

    /// All keys in normalized order, with original spelling
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.key.as_str())
    }

    /// Iterate `(key, value, source)` triples in normalized key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.entries
            .values()
            .map(|e| (e.key.as_str(), e.value.as_str(), e.source.as_str()))
    }

    /// Number of keys in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &BTreeMap<String, SnapshotEntry> {
        &self.entries
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_source_wins_with_provenance() {
        let mut snapshot = Snapshot::default();
        let lower: FlatMap = [("MySetting", "A"), ("Only:Lower", "x")].into_iter().collect();
        let upper: FlatMap = [("MYSETTING", "B")].into_iter().collect();

        snapshot.apply(&lower, "memory");
        snapshot.apply(&upper, "env:APP_");

        assert_eq!(snapshot.get("MySetting"), Some("B"));
        assert_eq!(snapshot.source_of("mysetting"), Some("env:APP_"));
        assert_eq!(snapshot.source_of("Only:Lower"), Some("memory"));
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_identical_inputs_build_equal_snapshots() {
        let bag: FlatMap = [("A", "1"), ("B:0", "2")].into_iter().collect();

        let mut first = Snapshot::default();
        first.apply(&bag, "memory");
        let mut second = Snapshot::default();
        second.apply(&bag, "memory");

        assert_eq!(first, second);
    }
}
