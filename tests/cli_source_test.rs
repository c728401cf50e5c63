//! Command-Line Source Integration Tests
//!
//! Tests for projecting parsed options onto the key space and for the
//! documented empty-value asymmetry: an absent or empty flag never overrides
//! a lower-priority source.

mod common;

use common::TestSettings;
use conflux::{CliOptions, CommandLineSource, ConfigResolver, MemorySource};

fn parsed_options(setting: Option<&str>, int_value: Option<&str>, int_array: &[i64]) -> CliOptions {
    let mut options = CliOptions::new();
    options.insert("MySetting", setting.map(String::from));
    options.insert("MyIntValue", int_value.map(String::from));
    options.insert_sequence("IntArray", int_array.iter());
    options
}

fn cli_source(options: CliOptions) -> CommandLineSource {
    CommandLineSource::new(options)
        .map("MyIntValue", "Subsection:MyIntValue")
        .map("IntArray", "Subsection:IntArray")
}

// =============================================================================
// Projection
// =============================================================================

#[test]
fn test_options_project_onto_canonical_keys() {
    let mut resolver = ConfigResolver::new();
    resolver.register(cli_source(parsed_options(
        Some("from args"),
        Some("7"),
        &[12, 34],
    )));
    resolver.build().unwrap();

    let settings: TestSettings = resolver.bind();
    assert_eq!(settings.my_setting, "from args");
    assert_eq!(settings.subsection.my_int_value, 7);
    assert_eq!(settings.subsection.int_array, vec![12, 34]);
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn test_cli_overrides_lower_priority_sources() {
    let mut resolver = ConfigResolver::new();
    resolver.register(MemorySource::new([
        ("MySetting", "from memory"),
        ("Subsection:MyIntValue", "4"),
    ]));
    resolver.register(cli_source(parsed_options(Some("from args"), None, &[])));
    resolver.build().unwrap();

    assert_eq!(resolver.get("MySetting").as_deref(), Some("from args"));
    // Unset option leaves the lower source's value intact
    assert_eq!(resolver.get("Subsection:MyIntValue").as_deref(), Some("4"));
}

#[test]
fn test_empty_value_does_not_override() {
    let mut resolver = ConfigResolver::new();
    resolver.register(MemorySource::new([("MySetting", "from memory")]));
    resolver.register(cli_source(parsed_options(Some(""), None, &[])));
    resolver.build().unwrap();

    assert_eq!(resolver.get("MySetting").as_deref(), Some("from memory"));
}

#[test]
fn test_cli_array_replaces_lower_elements_positionally() {
    let mut resolver = ConfigResolver::new();
    resolver.register(MemorySource::new([
        ("Subsection:IntArray:0", "1"),
        ("Subsection:IntArray:1", "2"),
        ("Subsection:IntArray:2", "3"),
    ]));
    resolver.register(cli_source(parsed_options(None, None, &[70, 80])));
    resolver.build().unwrap();

    // Merge is per key: indices the CLI did not provide keep the lower value
    let settings: TestSettings = resolver.bind();
    assert_eq!(settings.subsection.int_array, vec![70, 80, 3]);
}
