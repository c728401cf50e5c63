//! Command-line configuration source
//!
//! Argument tokenization and flag handling belong to an external parser; this
//! source starts from the parser's flat option object and projects it onto
//! the canonical key convention.

use crate::error::Result;
use crate::key::{index_key, FlatMap, KEY_DELIMITER};
use crate::source::ConfigSource;
use std::collections::BTreeMap;

/// Flat option object produced by an external argument parser.
///
/// Option values are raw strings; sequence-valued options expand into
/// numerically indexed entries (`IntArray` becomes `IntArray:0`,
/// `IntArray:1`, ...).
///
/// # Example
///
/// ```rust
/// use conflux::CliOptions;
///
/// let mut options = CliOptions::new();
/// options.insert("MySetting", Some("from args".to_string()));
/// options.insert_sequence("IntArray", ["1", "2", "3"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    values: BTreeMap<String, Option<String>>,
}

impl CliOptions {
    /// Create an empty option object
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single option value; `None` marks a flag given without value
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.values.insert(name.into(), value);
    }

    /// Record a sequence-valued option as indexed entries
    pub fn insert_sequence<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let name = name.into();
        for (index, value) in values.into_iter().enumerate() {
            self.values
                .insert(index_key(&name, index), Some(value.to_string()));
        }
    }
}

/// Source projecting parsed command-line options onto canonical keys.
///
/// Mapping rules translate option names to key paths; a rule for `Verbose`
/// also covers indexed entries like `Verbose:0`. Options without a rule keep
/// their name as the key. Empty and absent option values are omitted so an
/// unset flag never overrides a value from a lower-priority source.
///
/// # Example
///
/// ```rust
/// use conflux::{CliOptions, CommandLineSource};
///
/// let mut options = CliOptions::new();
/// options.insert("MyIntValue", Some("42".to_string()));
///
/// let source = CommandLineSource::new(options)
///     .map("MyIntValue", "Subsection:MyIntValue");
/// ```
#[derive(Debug, Clone)]
pub struct CommandLineSource {
    options: CliOptions,
    rules: Vec<(String, String)>,
}

impl CommandLineSource {
    /// Create a source with identity mapping (option name = key)
    pub fn new(options: CliOptions) -> Self {
        Self {
            options,
            rules: Vec::new(),
        }
    }

    /// Add a mapping rule from an option name to a key path
    #[must_use]
    pub fn map(mut self, option: impl Into<String>, key: impl Into<String>) -> Self {
        self.rules.push((option.into(), key.into()));
        self
    }

    /// Apply mapping rules to one option name
    fn key_for(&self, option: &str) -> String {
        for (from, to) in &self.rules {
            if option.eq_ignore_ascii_case(from) {
                return to.clone();
            }
            // A rule also rewrites the head segment of indexed options
            let head = format!("{from}{KEY_DELIMITER}");
            if let Some(prefix) = option.get(..head.len()) {
                if prefix.eq_ignore_ascii_case(&head) && option.len() > head.len() {
                    return format!("{to}{KEY_DELIMITER}{}", &option[head.len()..]);
                }
            }
        }
        option.to_string()
    }
}

impl ConfigSource for CommandLineSource {
    fn name(&self) -> &str {
        "command-line"
    }

    fn load(&self) -> Result<FlatMap> {
        let mut bag = FlatMap::new();
        for (option, value) in &self.options.values {
            // Absent flags stay absent: they must not mask lower layers
            let Some(value) = value else { continue };
            if value.is_empty() {
                continue;
            }
            bag.insert(self.key_for(option), value.as_str());
        }
        Ok(bag)
    }
}

// =============================================================================
// Tests
// =============================================================================
