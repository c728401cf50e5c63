// Deriving shape descriptors instead of writing them by hand
//
// Run with: cargo run --example derive_usage --features derive

use conflux::{ConfigResolver, DeriveBindable, MemorySource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, DeriveBindable)]
#[serde(default)]
#[shape(rename_all = "PascalCase")]
struct Settings {
    my_setting: String,
    subsection: Subsection,
}

#[derive(Debug, Default, Serialize, Deserialize, DeriveBindable)]
#[serde(default)]
#[shape(rename_all = "PascalCase")]
struct Subsection {
    my_int_value: i64,
    int_array: Vec<i64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("📦 conflux Derive Example\n");

    let mut resolver = ConfigResolver::new();
    resolver.register(MemorySource::new([
        ("MySetting", "Setting from in memory"),
        ("Subsection:MyIntValue", "4"),
        ("Subsection:IntArray:0", "12"),
        ("Subsection:IntArray:1", "34"),
    ]));
    resolver.build()?;

    let settings: Settings = resolver.bind();
    println!("✅ Bound settings: {settings:#?}");

    Ok(())
}
