//! Shared test fixtures and settings shapes
#![allow(dead_code)]

use conflux::{Bindable, FieldDescriptor, PrimitiveKind, ShapeDescriptor};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tempfile::TempDir;

/// Settings shape used across the integration suites
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestSettings {
    pub my_setting: String,
    pub subsection: TestSubsection,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestSubsection {
    pub my_int_value: i64,
    pub int_array: Vec<i64>,
}

impl Bindable for TestSettings {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new(vec![
            FieldDescriptor::text("my_setting", "MySetting"),
            FieldDescriptor::nested("subsection", "Subsection", TestSubsection::shape),
        ])
    }
}

impl Bindable for TestSubsection {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new(vec![
            FieldDescriptor::integer("my_int_value", "MyIntValue"),
            FieldDescriptor::array("int_array", "IntArray", PrimitiveKind::Integer),
        ])
    }
}

/// Temporary directory with JSON file helpers
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_json(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("write test file");
        path
    }
}
