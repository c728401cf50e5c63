// Command-line options as the highest-priority configuration source
//
// Run with: cargo run --example cli_overrides -- --setting hello --int-value 7
//
// Argument tokenization stays outside the library; this demo does a minimal
// hand parse into the flat option object the source consumes.

use conflux::{CliOptions, CommandLineSource, ConfigResolver, MemorySource};

/// Parse `--setting <v>`, `--int-value <v>` and repeated `--int <v>` flags
fn parse_args() -> CliOptions {
    let mut options = CliOptions::new();
    let mut ints = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--setting" => options.insert("MySetting", args.next()),
            "--int-value" => options.insert("MyIntValue", args.next()),
            "--int" => {
                if let Some(value) = args.next() {
                    ints.push(value);
                }
            }
            _ => {}
        }
    }
    options.insert_sequence("IntArray", ints);
    options
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("📦 conflux Command-Line Overrides Example\n");

    let mut resolver = ConfigResolver::new();
    resolver.register(MemorySource::new([
        ("MySetting", "Setting from in memory"),
        ("Subsection:MyIntValue", "4"),
    ]));
    resolver.register(
        CommandLineSource::new(parse_args())
            .map("MyIntValue", "Subsection:MyIntValue")
            .map("IntArray", "Subsection:IntArray"),
    );
    resolver.build()?;

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

    Ok(())
}
