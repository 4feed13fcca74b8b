//! TypeScript emitter: an abstract base class plus a user subclass.

use symwire_core::{
    application::ports::{CodeEmitter, EmittedCode},
    domain::{MAX_TYPE_DEPTH, Port, Symbol, TypeReference},
    error::SymwireResult,
};
use tracing::instrument;

use super::{file_stem, to_pascal_case};

/// Emits `<name>.base.ts` (abstract class, one abstract `onX` handler per
/// input port, one protected `emitX` per output port) and `<name>.ts`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeScriptEmitter;

impl TypeScriptEmitter {
    fn type_of(type_ref: &TypeReference) -> String {
        ts_type(type_ref, 0)
    }

    fn handler(port: &Port) -> String {
        format!("on{}", to_pascal_case(&port.name))
    }

    fn emitter(port: &Port) -> String {
        format!("emit{}", to_pascal_case(&port.name))
    }

    fn base_body(symbol: &Symbol, class: &str) -> String {
        let mut out = String::new();
        out.push_str("export type PortSink = (port: string, value: unknown) => void;\n\n");

        if let Some(description) = &symbol.description {
            out.push_str(&format!("/** {description} */\n"));
        }
        out.push_str(&format!("export abstract class {class}Base {{\n"));
        out.push_str(&format!(
            "  static readonly symbolId = \"{}\";\n",
            symbol.id()
        ));
        out.push_str(&format!(
            "  static readonly inputs = [{}] as const;\n",
            quoted(symbol.inputs())
        ));
        out.push_str(&format!(
            "  static readonly outputs = [{}] as const;\n\n",
            quoted(symbol.outputs())
        ));
        out.push_str("  constructor(protected readonly sink: PortSink) {}\n");

        for port in symbol.inputs() {
            out.push('\n');
            out.push_str(&format!("  /** Handles input on port `{}`. */\n", port.name));
            out.push_str(&format!(
                "  abstract {}(value: {}): void | Promise<void>;\n",
                Self::handler(port),
                Self::type_of(&port.type_ref)
            ));
        }

        for port in symbol.outputs() {
            out.push('\n');
            out.push_str(&format!("  /** Emits on output port `{}`. */\n", port.name));
            out.push_str(&format!(
                "  protected {}(value: {}): void {{\n    this.sink(\"{}\", value);\n  }}\n",
                Self::emitter(port),
                Self::type_of(&port.type_ref),
                port.name
            ));
        }

        out.push_str("}\n");
        out
    }

    fn user_body(symbol: &Symbol, class: &str, stem: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("import {{ {class}Base }} from \"./{stem}.base\";\n\n"));
        out.push_str(&format!("export class {class} extends {class}Base {{\n"));

        let mut first = true;
        for port in symbol.inputs() {
            if !first {
                out.push('\n');
            }
            first = false;
            out.push_str(&format!(
                "  {}(value: {}): void {{\n    throw new Error(\"{class}.{} is not implemented\");\n  }}\n",
                Self::handler(port),
                Self::type_of(&port.type_ref),
                Self::handler(port)
            ));
        }

        out.push_str("}\n");
        out
    }
}

impl CodeEmitter for TypeScriptEmitter {
    fn language(&self) -> &'static str {
        "typescript"
    }

    #[instrument(skip_all, fields(symbol = %symbol.id()))]
    fn emit(&self, symbol: &Symbol) -> SymwireResult<EmittedCode> {
        let class = to_pascal_case(symbol.name());
        let stem = file_stem(symbol.name());
        Ok(EmittedCode {
            base_file: format!("{stem}.base.ts"),
            base_body: Self::base_body(symbol, &class),
            user_file: format!("{stem}.ts"),
            user_body: Self::user_body(symbol, &class, &stem),
        })
    }
}

fn quoted<'a>(ports: impl Iterator<Item = &'a Port>) -> String {
    ports
        .map(|p| format!("\"{}\"", p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn ts_type(type_ref: &TypeReference, depth: usize) -> String {
    if depth >= MAX_TYPE_DEPTH {
        return "unknown".into();
    }
    let arg = |i: usize| {
        type_ref
            .generics
            .get(i)
            .map_or_else(|| "unknown".to_string(), |g| ts_type(g, depth + 1))
    };

    let base = match type_ref.symbol_id.as_str() {
        "int8" | "int16" | "int32" | "uint8" | "uint16" | "uint32" | "float32" | "float64" => {
            "number".to_string()
        }
        "int64" | "uint64" => "bigint".into(),
        "bool" => "boolean".into(),
        "string" => "string".into(),
        "bytes" => "Uint8Array".into(),
        "void" => "void".into(),
        "any" => "unknown".into(),
        "list" => format!("Array<{}>", arg(0)),
        "set" => format!("Set<{}>", arg(0)),
        "map" => format!("Map<{}, {}>", arg(0), arg(1)),
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
        format!("{base} | null")
    } else {
        base
    }
}
