// Layered JSON settings files with live reload
//
// Run with: cargo run --example json_layering
//
// Writes appsettings.json and an environment-specific override next to it,
// layers both, then watches for external edits until interrupted.

use conflux::{ConfigResolver, EnvSource};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("📦 conflux JSON Layering Example\n");

    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("appsettings.json"),
        r#"{
    "MySetting": "Setting from appsettings.json",
    "Subsection": { "MyIntValue": 4, "IntArray": [12, 34] }
}"#,
    )?;
    std::fs::write(
        dir.path().join("appsettings.Production.json"),
        r#"{ "MySetting": "Setting from appsettings.Production.json" }"#,
    )?;

    // The environment name itself comes from configuration: an env-variable
    // source resolved before the file sources are assembled
    let mut env_resolver = ConfigResolver::new();
    env_resolver.register(EnvSource::new("APP_"));
    env_resolver.build()?;
    let environment = env_resolver
        .get("Environment")
        .unwrap_or_else(|| "Production".to_string());
    println!("Resolved environment: {environment}\n");

    let resolver = ConfigResolver::builder()
        .with_base_dir(dir.path())
        .with_settings_files("appsettings", Some(environment.as_str()))
        .build()?;

    println!(
        "Using my setting: {}",
        resolver.get("MySetting").unwrap_or_default()
    );
    println!(
        "Using my subsection setting: {}\n",
        resolver.get("Subsection:MyIntValue").unwrap_or_default()
    );

    println!("🔎 Effective configuration:");
    print!("{}", conflux::dump_effective(&resolver));

    // React to external edits of either file
    resolver.events().on_change(|key, old, new| {
        println!("♻️  {key}: {old:?} -> {new:?}");
    });

    println!(
        "\nWatching {} for changes for 30 seconds...",
        dir.path().display()
    );
    std::thread::sleep(Duration::from_secs(30));

    Ok(())
}
