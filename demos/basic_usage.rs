// Basic usage example for conflux
//
// Run with: cargo run --example basic_usage

use conflux::{Bindable, ConfigResolver, EnvSource, FieldDescriptor, MemorySource};
use conflux::{PrimitiveKind, ShapeDescriptor};
use serde::{Deserialize, Serialize};

// Define your settings shapes
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    my_setting: String,
    subsection: Subsection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Subsection {
    my_int_value: i64,
    int_array: Vec<i64>,
}

impl Bindable for Settings {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new(vec![
            FieldDescriptor::text("my_setting", "MySetting"),
            FieldDescriptor::nested("subsection", "Subsection", Subsection::shape),
        ])
    }
}

impl Bindable for Subsection {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new(vec![
            FieldDescriptor::integer("my_int_value", "MyIntValue"),
            FieldDescriptor::array("int_array", "IntArray", PrimitiveKind::Integer),
        ])
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("📦 conflux Basic Usage Example\n");

    // Layer an in-memory source under environment overrides; the prefix
    // keeps unrelated process variables out of the key space
    let mut resolver = ConfigResolver::new();
    resolver.register(MemorySource::new([
        ("MySetting", "Setting from in memory"),
        ("Subsection:MyIntValue", "4"),
    ]));
    resolver.register(EnvSource::new("APP_"));
    resolver.build()?;

    // Raw string access by key path
    let my_setting = resolver.get("MySetting").unwrap_or_default();
    let raw_int = resolver.get("Subsection:MyIntValue").unwrap_or_default();
    println!("Using my setting: {my_setting}");
    println!("Using my subsection setting: {raw_int}");

    // Section-scoped access
    let subsection = resolver.section("Subsection");
    println!(
        "Via section view: {}\n",
        subsection.get("MyIntValue").unwrap_or_default()
    );

    // Typed binding onto the settings shape
    let settings: Settings = resolver.bind();
    println!("✅ Bound settings: {settings:#?}\n");

    // Effective configuration with per-key provenance
    println!("🔎 Effective configuration:");
    print!("{}", conflux::dump_effective(&resolver));

    Ok(())
}
