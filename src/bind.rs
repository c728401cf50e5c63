//! Typed binding of the flat key space onto settings shapes
//!
//! # Overview
//!
//! Binding is driven by a **shape descriptor**: static metadata listing a
//! settings struct's fields, their key segments and their kinds. No runtime
//! type introspection takes place; a descriptor is built once per shape type,
//! either by hand or through `#[derive(Bindable)]` (requires the `derive`
//! feature).
//!
//! The binder walks the descriptor against a key space:
//!
//! 1. primitives look up their key and parse forgivingly: a missing key or a
//!    failed parse leaves the field at its default,
//! 2. nested shapes recurse with the field's key appended to the prefix,
//! 3. arrays probe `key:0`, `key:1`, ... in increasing order and stop at the
//!    first absent index, skipping elements that fail to parse.
//!
//! Binding never fails outright: absent or malformed data degrades to the
//! shape's defaults.
//!
//! # Example
//!
//! ```rust
//! use conflux::{Bindable, ConfigResolver, FieldDescriptor, MemorySource, ShapeDescriptor};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Settings {
//!     my_setting: String,
//!     my_int_value: i64,
//! }
//!
//! impl Bindable for Settings {
//!     fn shape() -> ShapeDescriptor {
//!         ShapeDescriptor::new(vec![
//!             FieldDescriptor::text("my_setting", "MySetting"),
//!             FieldDescriptor::integer("my_int_value", "MyIntValue"),
//!         ])
//!     }
//! }
//!
//! let mut resolver = ConfigResolver::new();
//! resolver.register(MemorySource::new([("MySetting", "A"), ("MyIntValue", "4")]));
//! resolver.build()?;
//!
//! let settings: Settings = resolver.bind();
//! assert_eq!(settings.my_setting, "A");
//! assert_eq!(settings.my_int_value, 4);
//! # Ok::<(), conflux::Error>(())
//! ```

use crate::key::{index_key, join};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Read access to a flat key space during binding.
///
/// Implemented by [`ConfigResolver`](crate::ConfigResolver) (root key space)
/// and [`ConfigSection`](crate::ConfigSection) (prefixed key space).
pub trait KeySpace {
    /// Case-insensitive exact lookup
    fn value_of(&self, key: &str) -> Option<String>;
}

/// Trait for types that can be bound from a flat key space
///
/// Implement this for your settings struct (or derive it) to describe which
/// keys populate which fields.
pub trait Bindable: Default + Serialize + DeserializeOwned {
    /// Descriptor of this shape's fields
    fn shape() -> ShapeDescriptor;
}

// =============================================================================
// Shape descriptors
// =============================================================================

/// Semantic kind of a primitive field or array element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// UTF-8 string, taken verbatim
    Text,
    /// Strict base-10 signed integer
    Integer,
    /// Decimal floating-point number
    Float,
    /// `true` / `false`, case-insensitive
    Boolean,
}

/// Kind of a shape field
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Single primitive value
    Primitive(PrimitiveKind),
    /// Nested shape bound under the field's key as prefix
    Nested(fn() -> ShapeDescriptor),
    /// Array of primitives probed via numeric key segments
    Array(PrimitiveKind),
}

/// Static metadata for one field of a settings shape
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Struct field name as serde sees it
    pub field: &'static str,
    /// Key-path segment the field binds from
    pub key: &'static str,
    /// Field kind driving the binding algorithm
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Primitive field of the given kind
    pub fn primitive(field: &'static str, key: &'static str, kind: PrimitiveKind) -> Self {
        Self {
            field,
            key,
            kind: FieldKind::Primitive(kind),
        }
    }

    /// Text field
    pub fn text(field: &'static str, key: &'static str) -> Self {
        Self::primitive(field, key, PrimitiveKind::Text)
    }

    /// Integer field
    pub fn integer(field: &'static str, key: &'static str) -> Self {
        Self::primitive(field, key, PrimitiveKind::Integer)
    }

    /// Floating-point field
    pub fn float(field: &'static str, key: &'static str) -> Self {
        Self::primitive(field, key, PrimitiveKind::Float)
    }

    /// Boolean field
    pub fn boolean(field: &'static str, key: &'static str) -> Self {
        Self::primitive(field, key, PrimitiveKind::Boolean)
    }

    /// Nested shape field
    pub fn nested(field: &'static str, key: &'static str, shape: fn() -> ShapeDescriptor) -> Self {
        Self {
            field,
            key,
            kind: FieldKind::Nested(shape),
        }
    }

    /// Array-of-primitives field
    pub fn array(field: &'static str, key: &'static str, element: PrimitiveKind) -> Self {
        Self {
            field,
            key,
            kind: FieldKind::Array(element),
        }
    }
}

/// Static metadata describing a settings shape's fields
#[derive(Debug, Clone, Default)]
pub struct ShapeDescriptor {
    /// Field descriptors in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl ShapeDescriptor {
    /// Create a descriptor from field metadata
    #[must_use]
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }
}

// =============================================================================
// Binder
// =============================================================================

/// Materialize a settings shape from a key space.
///
/// See the [module documentation](self) for the binding algorithm.
pub fn bind<T: Bindable>(space: &impl KeySpace) -> T {
    bind_at(space, "")
}

/// Materialize a settings shape from keys under `prefix`
pub fn bind_at<T: Bindable>(space: &impl KeySpace, prefix: &str) -> T {
    let Ok(mut tree) = serde_json::to_value(T::default()) else {
        return T::default();
    };
    apply_shape(&mut tree, &T::shape(), space, prefix);
    serde_json::from_value(tree).unwrap_or_default()
}

fn apply_shape(tree: &mut Value, shape: &ShapeDescriptor, space: &dyn DynKeySpace, prefix: &str) {
    for field in &shape.fields {
        let key = join(prefix, field.key);
        match field.kind {
            FieldKind::Primitive(kind) => {
                if let Some(raw) = space.value_of_dyn(&key) {
                    if let Some(value) = parse_primitive(&raw, kind) {
                        set_field(tree, field.field, value);
                    }
                }
            }
            FieldKind::Nested(shape_fn) => {
                let child = child_object(tree, field.field);
                apply_shape(child, &shape_fn(), space, &key);
            }
            FieldKind::Array(element) => {
                let mut items = Vec::new();
                let mut index = 0;
                // Probing stops at the first absent index; a present but
                // unparsable element is skipped without ending the probe
                while let Some(raw) = space.value_of_dyn(&index_key(&key, index)) {
                    if let Some(value) = parse_primitive(&raw, element) {
                        items.push(value);
                    }
                    index += 1;
                }
                if index > 0 {
                    set_field(tree, field.field, Value::Array(items));
                }
            }
        }
    }
}

/// Object-safe adapter over [`KeySpace`] so the binder stays monomorphic
trait DynKeySpace {
    fn value_of_dyn(&self, key: &str) -> Option<String>;
}

impl<S: KeySpace> DynKeySpace for S {
    fn value_of_dyn(&self, key: &str) -> Option<String> {
        self.value_of(key)
    }
}

/// Parse a raw string with forgiving semantics; `None` keeps the default
fn parse_primitive(raw: &str, kind: PrimitiveKind) -> Option<Value> {
    match kind {
        PrimitiveKind::Text => Some(Value::String(raw.to_string())),
        PrimitiveKind::Integer => raw.trim().parse::<i64>().ok().map(Value::from),
        PrimitiveKind::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        PrimitiveKind::Boolean => match raw.trim() {
            t if t.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
            f if f.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
            _ => None,
        },
    }
}

fn set_field(tree: &mut Value, field: &str, value: Value) {
    if let Some(object) = tree.as_object_mut() {
        object.insert(field.to_string(), value);
    }
}

fn child_object<'t>(tree: &'t mut Value, field: &str) -> &'t mut Value {
    if tree.is_object() {
        tree.as_object_mut()
            .unwrap()
            .entry(field.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
    } else {
        tree
    }
}

// =============================================================================
// Tests
// =============================================================================
