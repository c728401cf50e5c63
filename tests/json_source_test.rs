//! JSON Source Integration Tests
//!
//! Tests for file-backed configuration:
//! - Flattening of nested documents
//! - Optional vs required files
//! - Layered settings-file conventions

mod common;

use common::{TestFixture, TestSettings};
use conflux::{ConfigResolver, Error, JsonFileSource};

// =============================================================================
// Flattening
// =============================================================================

#[test]
fn test_document_flattens_to_key_space() {
    let fixture = TestFixture::new();
    let path = fixture.write_json(
        "appsettings.json",
        r#"{
            "MySetting": "Setting from JSON",
            "Subsection": {
                "MyIntValue": 4,
                "IntArray": [12, 34]
            }
        }"#,
    );

    let mut resolver = ConfigResolver::new();
    resolver.register(JsonFileSource::new(path));
    resolver.build().unwrap();

    assert_eq!(
        resolver.get("MySetting").as_deref(),
        Some("Setting from JSON")
    );
    assert_eq!(resolver.get("Subsection:IntArray:1").as_deref(), Some("34"));

    let settings: TestSettings = resolver.bind();
    assert_eq!(settings.subsection.int_array, vec![12, 34]);
}

// =============================================================================
// Optional vs required
// =============================================================================

#[test]
fn test_missing_optional_file_contributes_nothing() {
    let fixture = TestFixture::new();
    let mut resolver = ConfigResolver::new();
    resolver.register(JsonFileSource::new(fixture.path("absent.json")).optional());
    resolver.build().unwrap();

    assert!(resolver.keys().is_empty());
}

#[test]
fn test_missing_required_file_fails_build() {
    let fixture = TestFixture::new();
    let mut resolver = ConfigResolver::new();
    resolver.register(JsonFileSource::new(fixture.path("absent.json")));

    let err = resolver.build().unwrap_err();
    assert!(err.is_load_error());
    // The failure names the offending source
    assert!(matches!(err, Error::SourceLoad { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_failed_build_keeps_previous_snapshot() {
    let fixture = TestFixture::new();
    let path = fixture.write_json("appsettings.json", r#"{"MySetting": "good"}"#);

    let mut resolver = ConfigResolver::new();
    resolver.register(JsonFileSource::new(&path));
    resolver.build().unwrap();

    // Corrupt the file and force a re-parse through a fresh source
    std::fs::write(&path, "{ broken").unwrap();
    let mut broken = ConfigResolver::new();
    broken.register(JsonFileSource::new(&path));
    assert!(broken.build().is_err());

    // The first resolver still serves its last good snapshot
    assert_eq!(resolver.get("MySetting").as_deref(), Some("good"));
}

#[test]
fn test_syntax_error_fails_even_when_optional() {
    let fixture = TestFixture::new();
    let path = fixture.write_json("appsettings.json", "{ not json");

    let mut resolver = ConfigResolver::new();
    resolver.register(JsonFileSource::new(path).optional());

    assert!(resolver.build().is_err());
}

// =============================================================================
// Layered settings files
// =============================================================================

#[test]
fn test_environment_file_overrides_base_file() {
    let fixture = TestFixture::new();
    fixture.write_json(
        "appsettings.json",
        r#"{"MySetting": "base", "Subsection": {"MyIntValue": 4}}"#,
    );
    fixture.write_json(
        "appsettings.Production.json",
        r#"{"MySetting": "production"}"#,
    );

    let resolver = ConfigResolver::builder()
        .with_base_dir(fixture.dir.path())
        .with_settings_files("appsettings", Some("Production"))
        .build()
        .unwrap();

    assert_eq!(resolver.get("MySetting").as_deref(), Some("production"));
    assert_eq!(resolver.get("Subsection:MyIntValue").as_deref(), Some("4"));
}
