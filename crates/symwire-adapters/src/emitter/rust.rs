//! Rust emitter: a trait with required handlers and provided emitters, plus
//! a user struct implementing it.

use symwire_core::{
    application::ports::{CodeEmitter, EmittedCode},
    domain::{MAX_TYPE_DEPTH, Port, Symbol, TypeReference},
    error::SymwireResult,
};
use tracing::instrument;

use super::{file_stem, to_pascal_case, to_snake_case};

const ANY: &str = "Box<dyn std::any::Any>";

/// Emits `<name>_base.rs` and `<name>.rs`.
///
/// The base trait requires `publish` and one `on_x` handler per input port;
/// each output port gets a provided `emit_x` that forwards to `publish`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustEmitter;

impl RustEmitter {
    fn handler(port: &Port) -> String {
        format!("on_{}", to_snake_case(&port.name))
    }

    fn emitter(port: &Port) -> String {
        format!("emit_{}", to_snake_case(&port.name))
    }

    fn base_body(symbol: &Symbol, ty: &str) -> String {
        let mut out = String::new();
        if let Some(description) = &symbol.description {
            out.push_str(&format!("/// {description}\n"));
        }
        out.push_str(&format!("pub trait {ty}Base {{\n"));
        out.push_str(&format!(
            "    const SYMBOL_ID: &'static str = \"{}\";\n\n",
            symbol.id()
        ));
        out.push_str("    /// Delivers a value leaving through an output port.\n");
        out.push_str(&format!(
            "    fn publish(&mut self, port: &'static str, value: {ANY});\n"
        ));

        for port in symbol.inputs() {
            out.push('\n');
            out.push_str(&format!("    /// Handles input on port `{}`.\n", port.name));
            out.push_str(&format!(
                "    fn {}(&mut self, value: {});\n",
                Self::handler(port),
                rust_type(&port.type_ref, 0)
            ));
        }

        for port in symbol.outputs() {
            out.push('\n');
            out.push_str(&format!("    /// Emits on output port `{}`.\n", port.name));
            out.push_str(&format!(
                "    fn {}(&mut self, value: {}) {{\n        self.publish(\"{}\", Box::new(value));\n    }}\n",
                Self::emitter(port),
                rust_type(&port.type_ref, 0),
                port.name
            ));
        }

        out.push_str("}\n");
        out
    }

    fn user_body(symbol: &Symbol, ty: &str, stem: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("use super::{stem}_base::{ty}Base;\n\n"));
        out.push_str(&format!("#[derive(Debug, Default)]\npub struct {ty};\n\n"));
        out.push_str(&format!("impl {ty}Base for {ty} {{\n"));
        out.push_str(&format!(
            "    fn publish(&mut self, port: &'static str, value: {ANY}) {{\n        let _ = (port, value);\n        todo!(\"route output from {ty}\")\n    }}\n"
        ));

        for port in symbol.inputs() {
            out.push('\n');
            out.push_str(&format!(
                "    fn {}(&mut self, value: {}) {{\n        let _ = value;\n        todo!(\"handle {ty}.{}\")\n    }}\n",
                Self::handler(port),
                rust_type(&port.type_ref, 0),
                port.name
            ));
        }

        out.push_str("}\n");
        out
    }
}

impl CodeEmitter for RustEmitter {
    fn language(&self) -> &'static str {
        "rust"
    }

    #[instrument(skip_all, fields(symbol = %symbol.id()))]
    fn emit(&self, symbol: &Symbol) -> SymwireResult<EmittedCode> {
        let ty = to_pascal_case(symbol.name());
        let stem = file_stem(symbol.name());
        Ok(EmittedCode {
            base_file: format!("{stem}_base.rs"),
            base_body: Self::base_body(symbol, &ty),
            user_file: format!("{stem}.rs"),
            user_body: Self::user_body(symbol, &ty, &stem),
        })
    }
}

fn rust_type(type_ref: &TypeReference, depth: usize) -> String {
    if depth >= MAX_TYPE_DEPTH {
        return ANY.into();
    }
    let arg = |i: usize| {
        type_ref
            .generics
            .get(i)
            .map_or_else(|| ANY.to_string(), |g| rust_type(g, depth + 1))
    };

    let base = match type_ref.symbol_id.as_str() {
        "int8" => "i8".to_string(),
        "int16" => "i16".into(),
        "int32" => "i32".into(),
        "int64" => "i64".into(),
        "uint8" => "u8".into(),
        "uint16" => "u16".into(),
        "uint32" => "u32".into(),
        "uint64" => "u64".into(),
        "float32" => "f32".into(),
        "float64" => "f64".into(),
        "bool" => "bool".into(),
        "string" => "String".into(),
        "bytes" => "Vec<u8>".into(),
        "void" => "()".into(),
        "any" => ANY.into(),
        "list" => format!("Vec<{}>", arg(0)),
        "set" => format!("std::collections::HashSet<{}>", arg(0)),
        "map" => format!("std::collections::HashMap<{}, {}>", arg(0), arg(1)),
        _ => {
            let name = to_pascal_case(type_ref.type_name());
            if type_ref.generics.is_empty() {
                name
            } else {
                let args: Vec<_> = (0..type_ref.generics.len()).map(arg).collect();
                format!("{name}<{}>", args.join(", "))
            }
        }
    };

    if type_ref.nullable {
        format!("Option<{base}>")
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symwire_core::domain::SemVer;

    fn pricing() -> Symbol {
        Symbol::builder("billing", "PricingEngine", SemVer::new(2, 0, 0))
            .language("rust")
            .port(Port::input("quote", TypeReference::new("billing/Quote@1.0.0")))
            .port(Port::output(
                "priceChanged",
                TypeReference::new("float64").nullable(),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn trait_requires_handlers_and_provides_emitters() {
        let code = RustEmitter.emit(&pricing()).unwrap();
        assert_eq!(code.base_file, "pricing_engine_base.rs");
        assert_eq!(code.user_file, "pricing_engine.rs");

        let base = &code.base_body;
        assert!(base.contains("pub trait PricingEngineBase {"));
        assert!(base.contains("const SYMBOL_ID: &'static str = \"billing/PricingEngine@2.0.0\";"));
        assert!(base.contains("fn on_quote(&mut self, value: Quote);"));
        assert!(base.contains("fn emit_price_changed(&mut self, value: Option<f64>) {"));
        assert!(base.contains("self.publish(\"priceChanged\", Box::new(value));"));
    }

    #[test]
    fn user_struct_implements_the_trait() {
        let user = RustEmitter.emit(&pricing()).unwrap().user_body;
        assert!(user.starts_with("use super::pricing_engine_base::PricingEngineBase;"));
        assert!(user.contains("impl PricingEngineBase for PricingEngine {"));
        assert!(user.contains("fn on_quote(&mut self, value: Quote) {"));
        assert!(!user.contains("emit_price_changed"));
    }

    #[test]
    fn type_mapping() {
        let nested = TypeReference::new("list")
            .with_generic(TypeReference::new("map").with_generic(TypeReference::new("string")));
        assert_eq!(
            rust_type(&nested, 0),
            "Vec<std::collections::HashMap<String, Box<dyn std::any::Any>>>"
        );
        assert_eq!(rust_type(&TypeReference::new("bytes"), 0), "Vec<u8>");
    }
}
