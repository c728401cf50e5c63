//! Derive Macro Integration Tests
//!
//! Tests for `#[derive(Bindable)]`: type-driven field kinds, key renaming
//! and nested shapes.

use conflux::{ConfigResolver, DeriveBindable, FieldKind, MemorySource, PrimitiveKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, DeriveBindable)]
#[serde(default)]
#[shape(rename_all = "PascalCase")]
struct Subsection {
    my_int_value: i64,
    int_array: Vec<i64>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, DeriveBindable)]
#[serde(default)]
#[shape(rename_all = "PascalCase")]
struct Settings {
    my_setting: String,
    enabled: bool,
    ratio: f64,
    subsection: Subsection,

    #[bind(rename = "Renamed:Key")]
    aliased: String,

    #[bind(skip)]
    runtime_only: String,
}

#[test]
fn test_generated_shape_kinds_and_keys() {
    use conflux::Bindable;

    let shape = Settings::shape();
    let keys: Vec<&str> = shape.fields.iter().map(|f| f.key).collect();
    assert_eq!(
        keys,
        vec!["MySetting", "Enabled", "Ratio", "Subsection", "Renamed:Key"]
    );

    assert!(matches!(
        shape.fields[0].kind,
        FieldKind::Primitive(PrimitiveKind::Text)
    ));
    assert!(matches!(
        shape.fields[1].kind,
        FieldKind::Primitive(PrimitiveKind::Boolean)
    ));
    assert!(matches!(
        shape.fields[2].kind,
        FieldKind::Primitive(PrimitiveKind::Float)
    ));
    assert!(matches!(shape.fields[3].kind, FieldKind::Nested(_)));

    let subsection = Subsection::shape();
    assert!(matches!(
        subsection.fields[1].kind,
        FieldKind::Array(PrimitiveKind::Integer)
    ));
}

#[test]
fn test_derive_binds_end_to_end() {
    let mut resolver = ConfigResolver::new();
    resolver.register(MemorySource::new([
        ("MySetting", "derived"),
        ("Enabled", "true"),
        ("Ratio", "2.5"),
        ("Subsection:MyIntValue", "4"),
        ("Subsection:IntArray:0", "12"),
        ("Renamed:Key", "aliased-value"),
    ]));
    resolver.build().unwrap();

    let settings: Settings = resolver.bind();
    assert_eq!(settings.my_setting, "derived");
    assert!(settings.enabled);
    assert_eq!(settings.ratio, 2.5);
    assert_eq!(settings.subsection.my_int_value, 4);
    assert_eq!(settings.subsection.int_array, vec![12]);
    assert_eq!(settings.aliased, "aliased-value");
}

#[test]
fn test_skipped_field_keeps_default() {
    let mut resolver = ConfigResolver::new();
    resolver.register(MemorySource::new([("RuntimeOnly", "should-not-bind")]));
    resolver.build().unwrap();

    let settings: Settings = resolver.bind();
    assert_eq!(settings.runtime_only, "");
}

#[test]
fn test_camel_case_rename_all() {
    #[derive(Debug, Default, Serialize, Deserialize, DeriveBindable)]
    #[serde(default)]
    #[shape(rename_all = "camelCase")]
    struct CamelSettings {
        my_setting: String,
    }

    use conflux::Bindable;
    assert_eq!(CamelSettings::shape().fields[0].key, "mySetting");
}
