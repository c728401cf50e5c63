//! Derive macros for the conflux configuration library
//!
//! This crate provides `#[derive(Bindable)]` for automatically generating
//! shape descriptors used by the typed binder.
//!
//! # Usage
//!
//! ```text
//! use conflux::Bindable;
//!
//! #[derive(Bindable, Default, Serialize, Deserialize)]
//! #[shape(rename_all = "PascalCase")]
//! struct Settings {
//!     my_setting: String,
//!
//!     #[bind(rename = "Subsection")]
//!     subsection: Subsection,
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, GenericArgument, Lit,
    Meta, PathArguments, Type};

/// Derive macro for generating `Bindable` implementations.
///
/// Field kinds are inferred from Rust types: `String`, integers, floats and
/// `bool` become primitives; `Vec<primitive>` becomes an array; any other
/// named type is treated as a nested shape and must itself implement
/// `Bindable`.
///
/// # Attributes
///
/// ## Container attributes (`#[shape(...)]`)
/// - `rename_all = "PascalCase"` (or `"camelCase"`) - Convert snake_case
///   field names into key segments
///
/// ## Field attributes (`#[bind(...)]`)
/// - `rename = "Key"` - Key segment override
/// - `skip` - Exclude this field from binding (it keeps its default)
#[proc_macro_derive(Bindable, attributes(shape, bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let container_attrs = match parse_container_attrs(&input.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.to_compile_error().into(),
    };

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    &input,
                    "Bindable can only be derived for structs with named fields.\n\nExample:\n  #[derive(Bindable)]\n  struct Settings {\n      field: Type,\n  }"
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(
                &input,
                "Bindable can only be derived for structs.\n\nTry: #[derive(Bindable)] on a struct, not an enum or union."
            )
            .to_compile_error()
            .into();
        }
    };

    let mut descriptors = Vec::new();

    for field in fields {
        let field_ident = field.ident.as_ref().expect("named field");
        let field_name = field_ident.to_string();
        let attrs = match parse_field_attrs(&field.attrs) {
            Ok(attrs) => attrs,
            Err(e) => return e.to_compile_error().into(),
        };

        // Skip fields marked with #[bind(skip)]
        if attrs.skip {
            continue;
        }

        let key = attrs
            .rename
            .clone()
            .unwrap_or_else(|| container_attrs.rename_all.apply(&field_name));

        let descriptor = match field_descriptor(&field.ty, &field_name, &key) {
            Ok(descriptor) => descriptor,
            Err(e) => return e.to_compile_error().into(),
        };
        descriptors.push(descriptor);
    }

    let expanded = quote! {
        impl conflux::Bindable for #name {
            fn shape() -> conflux::ShapeDescriptor {
                conflux::ShapeDescriptor::new(vec![
                    #(#descriptors),*
                ])
            }
        }
    };

    TokenStream::from(expanded)
}

/// Key-segment casing applied to field names without a `rename`
#[derive(Default, Clone, Copy)]
enum RenameAll {
    /// Keep the field name verbatim
    #[default]
    None,
    /// `my_setting` becomes `MySetting`
    PascalCase,
    /// `my_setting` becomes `mySetting`
    CamelCase,
}

impl RenameAll {
    fn apply(self, field_name: &str) -> String {
        match self {
            RenameAll::None => field_name.to_string(),
            RenameAll::PascalCase => pascal_case(field_name),
            RenameAll::CamelCase => {
                let pascal = pascal_case(field_name);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
                    None => pascal,
                }
            }
        }
    }
}

fn pascal_case(field_name: &str) -> String {
    field_name
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Container-level attributes from #[shape(...)]
#[derive(Default)]
struct ContainerAttrs {
    rename_all: RenameAll,
}

/// Field-level attributes from #[bind(...)]
#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut result = ContainerAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("shape") {
            continue;
        }
        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;
        for meta in nested {
            if let Meta::NameValue(nv) = &meta {
                if nv.path.is_ident("rename_all") {
                    let value = string_literal(&nv.value, "rename_all")?;
                    result.rename_all = match value.as_str() {
                        "PascalCase" => RenameAll::PascalCase,
                        "camelCase" => RenameAll::CamelCase,
                        other => {
                            return Err(syn::Error::new_spanned(
                                &nv.value,
                                format!(
                                    "Unsupported rename_all value '{other}'. Supported: \"PascalCase\", \"camelCase\""
                                ),
                            ));
                        }
                    };
                    continue;
                }
            }
            return Err(syn::Error::new_spanned(
                meta,
                "Unknown #[shape(...)] attribute.\n\nSupported: rename_all = \"PascalCase\"",
            ));
        }
    }

    Ok(result)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("bind") {
            continue;
        }
        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;
        for meta in nested {
            match &meta {
                Meta::Path(path) if path.is_ident("skip") => {
                    result.skip = true;
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    result.rename = Some(string_literal(&nv.value, "rename")?);
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        meta,
                        "Unknown #[bind(...)] attribute.\n\nSupported: rename = \"Key\", skip",
                    ));
                }
            }
        }
    }

    Ok(result)
}

fn string_literal(expr: &Expr, attribute: &str) -> syn::Result<String> {
    if let Expr::Lit(lit) = expr {
        if let Lit::Str(s) = &lit.lit {
            return Ok(s.value());
        }
    }
    Err(syn::Error::new_spanned(
        expr,
        format!("#[...({attribute})] must be a string literal.\n\nExample: {attribute} = \"Value\""),
    ))
}

/// Primitive kind for a type name, if it is one
fn primitive_kind(name: &str) -> Option<proc_macro2::TokenStream> {
    match name {
        "String" => Some(quote! { conflux::PrimitiveKind::Text }),
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64" | "u128"
        | "usize" => Some(quote! { conflux::PrimitiveKind::Integer }),
        "f32" | "f64" => Some(quote! { conflux::PrimitiveKind::Float }),
        "bool" => Some(quote! { conflux::PrimitiveKind::Boolean }),
        _ => None,
    }
}

/// Generate the FieldDescriptor expression for one field
fn field_descriptor(
    ty: &Type,
    field_name: &str,
    key: &str,
) -> syn::Result<proc_macro2::TokenStream> {
    let Type::Path(path) = ty else {
        return Err(syn::Error::new_spanned(
            ty,
            "Bindable fields must be named types, Vec<primitive> or nested Bindable structs",
        ));
    };

    // Vec<T> becomes an array of primitives
    if let Some(inner) = vec_element(path) {
        let Type::Path(inner_path) = inner else {
            return Err(syn::Error::new_spanned(
                inner,
                "Vec fields must hold primitive elements (String, integers, floats or bool)",
            ));
        };
        let element = inner_path
            .path
            .get_ident()
            .and_then(|ident| primitive_kind(&ident.to_string()))
            .ok_or_else(|| {
                syn::Error::new_spanned(
                    inner,
                    "Vec fields must hold primitive elements (String, integers, floats or bool)",
                )
            })?;
        return Ok(quote! {
            conflux::FieldDescriptor::array(#field_name, #key, #element)
        });
    }

    if let Some(ident) = path.path.get_ident() {
        if let Some(kind) = primitive_kind(&ident.to_string()) {
            return Ok(quote! {
                conflux::FieldDescriptor::primitive(#field_name, #key, #kind)
            });
        }
    }

    // Any other named type is a nested shape
    Ok(quote! {
        conflux::FieldDescriptor::nested(#field_name, #key, <#ty as conflux::Bindable>::shape)
    })
}

/// Element type of a `Vec<T>` path, if the type is one
fn vec_element(path: &syn::TypePath) -> Option<&Type> {
    let segment = path.path.segments.last()?;
    if segment.ident != "Vec" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}
