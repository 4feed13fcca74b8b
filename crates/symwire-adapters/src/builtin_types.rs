//! Built-in primitive type catalogue.
//!
//! Bare type names such as `int32` or `list` are always valid in a
//! [`TypeReference`](symwire_core::domain::TypeReference). This module also
//! offers them as registered L0 symbols under the `builtin` namespace so
//! they show up in listings, searches and the dependency graph.

use symwire_core::{
    domain::{BUILTIN_PRIMITIVES, Level, Origin, SemVer, Symbol, SymbolKind},
    error::SymwireResult,
};

/// Namespace the catalogue is registered under.
pub const BUILTIN_NAMESPACE: &str = "builtin";

const CATALOGUE_VERSION: SemVer = SemVer::new(1, 0, 0);

/// One-line description for a built-in type name.
pub fn describe(name: &str) -> Option<&'static str> {
    let text = match name {
        "int8" => "8-bit signed integer",
        "int16" => "16-bit signed integer",
        "int32" => "32-bit signed integer",
        "int64" => "64-bit signed integer",
        "uint8" => "8-bit unsigned integer",
        "uint16" => "16-bit unsigned integer",
        "uint32" => "32-bit unsigned integer",
        "uint64" => "64-bit unsigned integer",
        "float32" => "32-bit IEEE 754 float",
        "float64" => "64-bit IEEE 754 float",
        "bool" => "boolean",
        "string" => "UTF-8 text",
        "bytes" => "raw byte sequence",
        "void" => "no value",
        "any" => "untyped value",
        "list" => "ordered sequence, one type argument",
        "map" => "key/value mapping, two type arguments",
        "set" => "unordered unique values, one type argument",
        _ => return None,
    };
    Some(text)
}

/// Every built-in as an L0 symbol, in declaration order.
pub fn catalogue() -> SymwireResult<Vec<Symbol>> {
    BUILTIN_PRIMITIVES
        .iter()
        .map(|name| {
            let mut builder = Symbol::builder(BUILTIN_NAMESPACE, *name, CATALOGUE_VERSION)
                .level(Level::Primitive)
                .kind(SymbolKind::Primitive)
                .language("builtin")
                .origin(Origin::Generated)
                .tag("builtin");
            if let Some(text) = describe(name) {
                builder = builder.description(text);
            }
            Ok(builder.build()?)
        })
        .collect()
}
