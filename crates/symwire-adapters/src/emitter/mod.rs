//! Language emitters for the Generation-Gap code generator.
//!
//! Each emitter turns one symbol into a base artifact (regenerated on every
//! run) and a user artifact (written once, then owned by the developer). The
//! generator in `symwire-core` adds the header and decides what to write.

mod rust;
mod typescript;

pub use rust::RustEmitter;
pub use typescript::TypeScriptEmitter;

use symwire_core::application::ports::CodeEmitter;

/// Every emitter this crate ships, for registering with the generator.
pub fn all() -> Vec<Box<dyn CodeEmitter>> {
    vec![Box::new(TypeScriptEmitter), Box::new(RustEmitter)]
}

// ── Identifier casing ────────────────────────────────────────────────────────

/// Split an identifier into words at separators, lower-to-upper transitions
/// and the end of an acronym (`HTTPServer` is `HTTP`, `Server`).
fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Identifiers cannot start with a digit.
fn guard_leading_digit(ident: String) -> String {
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{ident}")
    } else {
        ident
    }
}

pub fn to_snake_case(input: &str) -> String {
    let joined = words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_");
    guard_leading_digit(joined)
}

pub fn to_pascal_case(input: &str) -> String {
    guard_leading_digit(words(input).iter().map(|w| capitalize(w)).collect())
}

pub fn to_camel_case(input: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(input).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    guard_leading_digit(out)
}

/// File stem for a symbol name; never empty.
fn file_stem(name: &str) -> String {
    let stem = to_snake_case(name);
    if stem.is_empty() { "symbol".into() } else { stem }
}
