//! JSON file configuration source
//!
//! Parses a UTF-8 JSON document into the flat key space by walking objects
//! (concatenating property names with `:`) and arrays (using the index as the
//! segment).

use crate::error::{Error, Result};
use crate::key::{join, FlatMap};
use crate::source::ConfigSource;
use crate::sync::RwLockExt;
use log::debug;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Source backed by a JSON document on disk.
///
/// The parsed bag is cached after the first [`load`](ConfigSource::load);
/// [`reload`](ConfigSource::reload) re-parses the file and replaces the bag
/// atomically.
///
/// # Example
///
/// ```rust,no_run
/// use conflux::JsonFileSource;
///
/// let source = JsonFileSource::new("appsettings.json")
///     .optional()
///     .reload_on_change();
/// ```
pub struct JsonFileSource {
    path: PathBuf,
    optional: bool,
    reload_on_change: bool,
    name: String,
    bag: RwLock<Option<FlatMap>>,
}

impl JsonFileSource {
    /// Create a required source for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("json:{}", path.display());
        Self {
            path,
            optional: false,
            reload_on_change: false,
            name,
            bag: RwLock::new(None),
        }
    }

    /// Tolerate a missing file, contributing an empty mapping instead
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Request change-driven reload for this file (see the `watch` feature)
    #[must_use]
    pub fn reload_on_change(mut self) -> Self {
        self.reload_on_change = true;
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a relative file path against a base directory
    #[must_use]
    pub(crate) fn rebase(mut self, base: &Path) -> Self {
        self.path = base.join(&self.path);
        self.name = format!("json:{}", self.path.display());
        self
    }

    fn parse(&self) -> Result<FlatMap> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if self.optional {
                    debug!("Optional file '{}' not found", self.path.display());
                    return Ok(FlatMap::new());
                }
                return Err(Error::RequiredFileMissing(self.path.clone()));
            }
            Err(e) => {
                return Err(Error::FileRead {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let doc: Value = serde_json::from_str(&content).map_err(|e| Error::Json {
            path: self.path.clone(),
            source: e,
        })?;

        let mut bag = FlatMap::new();
        flatten(&doc, "", &mut bag);
        debug!(
            "Parsed {} key(s) from '{}'",
            bag.len(),
            self.path.display()
        );
        Ok(bag)
    }
}

impl ConfigSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<FlatMap> {
        if let Some(bag) = self.bag.read_recovered().as_ref() {
            return Ok(bag.clone());
        }
        let bag = self.parse()?;
        *self.bag.write_recovered() = Some(bag.clone());
        Ok(bag)
    }

    fn supports_reload(&self) -> bool {
        self.reload_on_change
    }

    fn reload(&self) -> Result<()> {
        if !self.reload_on_change {
            return Err(Error::ReloadUnsupported(self.name.clone()));
        }
        let bag = self.parse()?;
        *self.bag.write_recovered() = Some(bag);
        Ok(())
    }

    fn watch_path(&self) -> Option<&Path> {
        self.reload_on_change.then_some(self.path.as_path())
    }
}

/// Walk a JSON value, emitting flat keys for every leaf.
///
/// Scalar leaves keep their textual form; `null` flattens to an empty string.
/// A scalar at the document root has no key and is ignored.
fn flatten(value: &Value, prefix: &str, bag: &mut FlatMap) {
    match value {
        Value::Object(fields) => {
            for (name, child) in fields {
                flatten(child, &join(prefix, name), bag);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(child, &join(prefix, &index.to_string()), bag);
            }
        }
        Value::Null if !prefix.is_empty() => bag.insert(prefix, ""),
        Value::Bool(b) if !prefix.is_empty() => bag.insert(prefix, b.to_string()),
        Value::Number(n) if !prefix.is_empty() => bag.insert(prefix, n.to_string()),
        Value::String(s) if !prefix.is_empty() => bag.insert(prefix, s.as_str()),
        _ => {}
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_flatten_nested_objects_and_arrays() {
        let dir = tempdir().unwrap();
        let path = write_file(
            &dir,
            "settings.json",
            r#"{
                "MySetting": "from json",
                "Subsection": {
                    "MyIntValue": 4,
                    "IntArray": [12, 34, 56]
                }
            }"#,
        );

        let bag = JsonFileSource::new(path).load().unwrap();
        assert_eq!(bag.get("MySetting"), Some("from json"));
        assert_eq!(bag.get("Subsection:MyIntValue"), Some("4"));
        assert_eq!(bag.get("Subsection:IntArray:0"), Some("12"));
        assert_eq!(bag.get("Subsection:IntArray:2"), Some("56"));
    }

    #[test]
    fn test_null_and_scalar_leaves() {
        let dir = tempdir().unwrap();
        let path = write_file(
            &dir,
            "settings.json",
            r#"{"A": null, "B": true, "C": 1.5}"#,
        );

        let bag = JsonFileSource::new(path).load().unwrap();
        assert_eq!(bag.get("A"), Some(""));
        assert_eq!(bag.get("B"), Some("true"));
        assert_eq!(bag.get("C"), Some("1.5"));
    }

    #[test]
    fn test_missing_optional_file_is_empty() {
        let dir = tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("absent.json")).optional();

        let bag = source.load().unwrap();
        assert!(bag.is_empty());
    }

    #[test]
    fn test_missing_required_file_fails() {
        let dir = tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("absent.json"));

        let err = source.load().unwrap_err();
        assert!(matches!(err, Error::RequiredFileMissing(_)));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_syntax_error_fails_load() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "settings.json", "{ not json");

        let err = JsonFileSource::new(path).optional().load().unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_load_caches_until_reload() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "settings.json", r#"{"MySetting": "one"}"#);
        let source = JsonFileSource::new(&path).reload_on_change();

        assert_eq!(source.load().unwrap().get("MySetting"), Some("one"));

        write_file(&dir, "settings.json", r#"{"MySetting": "two"}"#);
        // Cached bag is returned until an explicit reload
        assert_eq!(source.load().unwrap().get("MySetting"), Some("one"));

        source.reload().unwrap();
        assert_eq!(source.load().unwrap().get("MySetting"), Some("two"));
    }

    #[test]
    fn test_reload_requires_opt_in() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "settings.json", "{}");
        let source = JsonFileSource::new(path);

        assert!(!source.supports_reload());
        assert!(source.watch_path().is_none());
        assert!(matches!(
            source.reload().unwrap_err(),
            Error::ReloadUnsupported(_)
        ));
    }
}
