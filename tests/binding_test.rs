//! Typed Binding Integration Tests
//!
//! Tests for materializing settings shapes from the resolved key space:
//! - Defaults for absent and malformed values
//! - Nested shapes and array probing
//! - Round-trips through flattened values

mod common;

use common::{TestSettings, TestSubsection};
use conflux::{ConfigResolver, MemorySource};

fn resolver_with(pairs: &[(&str, &str)]) -> ConfigResolver {
    let mut resolver = ConfigResolver::new();
    resolver.register(MemorySource::new(pairs.iter().copied()));
    resolver.build().unwrap();
    resolver
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_empty_key_space_binds_defaults() {
    let resolver = resolver_with(&[]);
    let settings: TestSettings = resolver.bind();
    assert_eq!(settings, TestSettings::default());
}

#[test]
fn test_malformed_integer_binds_default() {
    let resolver = resolver_with(&[("Subsection:MyIntValue", "not-a-number")]);
    let settings: TestSettings = resolver.bind();
    assert_eq!(settings.subsection.my_int_value, 0);
}

#[test]
fn test_partial_data_fills_remaining_defaults() {
    let resolver = resolver_with(&[("MySetting", "only-this")]);
    let settings: TestSettings = resolver.bind();
    assert_eq!(settings.my_setting, "only-this");
    assert_eq!(settings.subsection, TestSubsection::default());
}

// =============================================================================
// Nested shapes and arrays
// =============================================================================

#[test]
fn test_full_nested_binding() {
    let resolver = resolver_with(&[
        ("MySetting", "A"),
        ("Subsection:MyIntValue", "4"),
        ("Subsection:IntArray:0", "12"),
        ("Subsection:IntArray:1", "34"),
        ("Subsection:IntArray:2", "56"),
    ]);

    let settings: TestSettings = resolver.bind();
    assert_eq!(settings.my_setting, "A");
    assert_eq!(settings.subsection.my_int_value, 4);
    assert_eq!(settings.subsection.int_array, vec![12, 34, 56]);
}

#[test]
fn test_array_probing_stops_at_first_gap() {
    let resolver = resolver_with(&[
        ("Subsection:IntArray:0", "12"),
        ("Subsection:IntArray:1", "34"),
        ("Subsection:IntArray:3", "99"),
    ]);

    let settings: TestSettings = resolver.bind();
    assert_eq!(settings.subsection.int_array, vec![12, 34]);
}

#[test]
fn test_array_indices_are_case_insensitive_keys() {
    let resolver = resolver_with(&[("SUBSECTION:INTARRAY:0", "7")]);
    let settings: TestSettings = resolver.bind();
    assert_eq!(settings.subsection.int_array, vec![7]);
}

// =============================================================================
// Round-trip
// =============================================================================

#[test]
fn test_flattened_shape_round_trips() {
    let original = TestSettings {
        my_setting: "round-trip".into(),
        subsection: TestSubsection {
            my_int_value: -17,
            int_array: vec![5, 0, -3],
        },
    };

    let mut pairs = vec![
        ("MySetting".to_string(), original.my_setting.clone()),
        (
            "Subsection:MyIntValue".to_string(),
            original.subsection.my_int_value.to_string(),
        ),
    ];
    for (i, v) in original.subsection.int_array.iter().enumerate() {
        pairs.push((format!("Subsection:IntArray:{i}"), v.to_string()));
    }

    let mut resolver = ConfigResolver::new();
    resolver.register(MemorySource::new(pairs));
    resolver.build().unwrap();

    let bound: TestSettings = resolver.bind();
    assert_eq!(bound, original);
}

// =============================================================================
// Binding reflects overlay writes
// =============================================================================

#[test]
fn test_bind_sees_set_values() {
    let resolver = resolver_with(&[("Subsection:MyIntValue", "4")]);
    resolver.set("Subsection:MyIntValue", "8");

    let settings: TestSettings = resolver.bind();
    assert_eq!(settings.subsection.my_int_value, 8);
}
