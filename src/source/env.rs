//! Environment variable configuration source
//!
//! Reads process environment entries whose name starts with a required
//! prefix, strips the prefix and converts the `__` separator convention into
//! the canonical `:` delimiter.

use crate::error::Result;
use crate::key::{FlatMap, KEY_DELIMITER};
use crate::source::ConfigSource;
use log::debug;
use std::sync::Arc;

/// Separator convention used in environment variable names for nesting
const ENV_SEPARATOR: &str = "__";

/// Provider of environment entries, injectable so tests never touch the
/// process environment
pub trait EnvProvider: Send + Sync {
    /// All `(name, value)` pairs visible to this provider
    fn vars(&self) -> Vec<(String, String)>;
}

/// Default provider backed by the process environment.
///
/// Entries with non-UTF-8 names or values are omitted.
struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(name, value)| {
                Some((name.into_string().ok()?, value.into_string().ok()?))
            })
            .collect()
    }
}

/// Source exposing prefix-filtered environment variables.
///
/// The prefix match is case-insensitive and the prefix is stripped before key
/// conversion: with prefix `APP_`, the variable `APP_Subsection__MyIntValue`
/// yields the key `Subsection:MyIntValue`.
///
/// # Example
///
/// ```rust
/// use conflux::EnvSource;
///
/// let source = EnvSource::new("APP_");
/// ```
pub struct EnvSource {
    prefix: String,
    provider: Arc<dyn EnvProvider>,
    name: String,
}

impl EnvSource {
    /// Create a source reading the process environment
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_provider(prefix, Arc::new(ProcessEnv))
    }

    /// Create a source with a custom variable provider
    pub fn with_provider(prefix: impl Into<String>, provider: Arc<dyn EnvProvider>) -> Self {
        let prefix = prefix.into();
        let name = format!("env:{prefix}");
        Self {
            prefix,
            provider,
            name,
        }
    }

    /// Create a source over a fixed set of variables (test seam)
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        struct Fixed(Vec<(String, String)>);
        impl EnvProvider for Fixed {
            fn vars(&self) -> Vec<(String, String)> {
                self.0.clone()
            }
        }
        let fixed = Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        Self::with_provider(prefix, Arc::new(fixed))
    }

    /// Convert a prefix-stripped variable name into a canonical key
    fn to_key(rest: &str) -> String {
        rest.replace(ENV_SEPARATOR, &KEY_DELIMITER.to_string())
    }
}

impl ConfigSource for EnvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<FlatMap> {
        let mut bag = FlatMap::new();
        for (name, value) in self.provider.vars() {
            let Some(head) = name.get(..self.prefix.len()) else {
                continue;
            };
            if !head.eq_ignore_ascii_case(&self.prefix) {
                continue;
            }
            let rest = &name[self.prefix.len()..];
            if rest.is_empty() {
                continue;
            }
            bag.insert(Self::to_key(rest), value);
        }
        debug!(
            "Environment source '{}' matched {} variable(s)",
            self.name,
            bag.len()
        );
        Ok(bag)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_filter_and_strip() {
        let source = EnvSource::from_vars(
            "APP_",
            [
                ("APP_MySetting", "B"),
                ("OTHER_MySetting", "ignored"),
                ("PATH", "/usr/bin"),
            ],
        );

        let bag = source.load().unwrap();
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get("MySetting"), Some("B"));
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        let source = EnvSource::from_vars("APP_", [("app_MySetting", "B")]);
        let bag = source.load().unwrap();
        assert_eq!(bag.get("MySetting"), Some("B"));
    }

    #[test]
    fn test_separator_conversion() {
        let source = EnvSource::from_vars("APP_", [("APP_Subsection__MyIntValue", "4")]);
        let bag = source.load().unwrap();
        assert_eq!(bag.get("Subsection:MyIntValue"), Some("4"));
    }

    #[test]
    fn test_single_underscore_is_preserved() {
        let source = EnvSource::from_vars("APP_", [("APP_My_Setting", "x")]);
        let bag = source.load().unwrap();
        assert_eq!(bag.get("My_Setting"), Some("x"));
    }

    #[test]
    fn test_bare_prefix_is_skipped() {
        let source = EnvSource::from_vars("APP_", [("APP_", "empty-name")]);
        let bag = source.load().unwrap();
        assert!(bag.is_empty());
    }
}
