//! # conflux - Layered Configuration Resolution
//!
//! A generic, framework-agnostic Rust library for resolving application
//! configuration from layered sources with typed binding.
//!
//! ## Features
//!
//! - **Layered Sources**: In-memory values, environment variables, JSON files
//!   and parsed command-line options merged in priority order
//! - **Last Wins**: Sources registered later override earlier ones per key
//! - **Typed Binding**: Materialize settings structs from the flat key space
//!   via shape descriptors (or `#[derive(Bindable)]` with the `derive`
//!   feature)
//! - **Sections**: Prefix-scoped read-only projections for sub-object access
//! - **Live Reload**: File-backed sources re-parse on external modification
//!   (requires the `watch` feature), with atomic snapshot swaps
//! - **Change Events**: Register callbacks fired when resolved values change
//!
//! ## Quick Start
//!
//! ```rust
//! use conflux::{ConfigResolver, EnvSource, MemorySource};
//!
//! let mut resolver = ConfigResolver::new();
//! resolver.register(MemorySource::new([
//!     ("MySetting", "Setting from in memory"),
//!     ("Subsection:MyIntValue", "4"),
//! ]));
//! resolver.register(EnvSource::new("APP_"));
//! resolver.build()?;
//!
//! let my_setting = resolver.get("MySetting");
//! let my_int = resolver.get("Subsection:MyIntValue");
//! # Ok::<(), conflux::Error>(())
//! ```
//!
//! ## Typed Binding
//!
//! ```rust
//! use conflux::{Bindable, ConfigResolver, FieldDescriptor, MemorySource};
//! use conflux::{PrimitiveKind, ShapeDescriptor};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Subsection {
//!     my_int_value: i64,
//!     int_array: Vec<i64>,
//! }
//!
//! impl Bindable for Subsection {
//!     fn shape() -> ShapeDescriptor {
//!         ShapeDescriptor::new(vec![
//!             FieldDescriptor::integer("my_int_value", "MyIntValue"),
//!             FieldDescriptor::array("int_array", "IntArray", PrimitiveKind::Integer),
//!         ])
//!     }
//! }
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Settings {
//!     my_setting: String,
//!     subsection: Subsection,
//! }
//!
//! impl Bindable for Settings {
//!     fn shape() -> ShapeDescriptor {
//!         ShapeDescriptor::new(vec![
//!             FieldDescriptor::text("my_setting", "MySetting"),
//!             FieldDescriptor::nested("subsection", "Subsection", Subsection::shape),
//!         ])
//!     }
//! }
//!
//! # fn example() -> conflux::Result<()> {
//! let mut resolver = ConfigResolver::new();
//! resolver.register(MemorySource::new([
//!     ("MySetting", "A"),
//!     ("Subsection:MyIntValue", "4"),
//! ]));
//! resolver.build()?;
//!
//! let settings: Settings = resolver.bind();
//! assert_eq!(settings.subsection.my_int_value, 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sections
//!
//! ```rust
//! # fn example() -> conflux::Result<()> {
//! # use conflux::{ConfigResolver, MemorySource};
//! # let mut resolver = ConfigResolver::new();
//! # resolver.register(MemorySource::new([("Subsection:MyIntValue", "4")]));
//! # resolver.build()?;
//! let subsection = resolver.section("Subsection");
//! assert_eq!(subsection.get("MyIntValue").as_deref(), Some("4"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Layered Files with Reload
//!
//! The conventional settings-file pair layers an environment-specific file
//! over a base file, both optional and reloading on change:
//!
//! ```rust,no_run
//! use conflux::ConfigResolver;
//!
//! let resolver = ConfigResolver::builder()
//!     .with_settings_files("appsettings", Some("Production"))
//!     .with_env_prefix("APP_")
//!     .build()?;
//! # Ok::<(), conflux::Error>(())
//! ```
//!
//! ## Change Events
//!
//! ```rust
//! # use conflux::ConfigResolver;
//! # let resolver = ConfigResolver::new();
//! resolver.events().watch_key("MySetting", |key, old, new| {
//!     println!("{key}: {old:?} -> {new:?}");
//! });
//! ```

// Core modules
mod bind;
mod dump;
mod error;
mod events;
pub mod key;
mod resolver;
mod section;
pub mod source;
mod sync;

#[cfg(feature = "watch")]
mod watch;

// Re-exports from core
pub use bind::{
    bind, bind_at, Bindable, FieldDescriptor, FieldKind, KeySpace, PrimitiveKind, ShapeDescriptor,
};
pub use dump::dump_effective;
pub use error::{Error, Result};
pub use events::{ChangeCallback, EventManager};
pub use key::FlatMap;
pub use resolver::{ConfigResolver, ConfigResolverBuilder, Snapshot};
pub use section::ConfigSection;
pub use source::{
    CliOptions, CommandLineSource, ConfigSource, EnvProvider, EnvSource, JsonFileSource,
    MemorySource,
};

// Derive macro re-export (requires `derive` feature)
/// Derive macro for auto-generating [`Bindable`] implementations.
///
/// Use this to reduce boilerplate when defining settings structs.
///
/// # Example
///
/// ```rust,ignore
/// use conflux::DeriveBindable;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize, DeriveBindable)]
/// #[shape(rename_all = "PascalCase")]
/// struct Settings {
///     my_setting: String,
///     subsection: Subsection,
/// }
/// ```
#[cfg(feature = "derive")]
pub use conflux_derive::Bindable as DeriveBindable;
