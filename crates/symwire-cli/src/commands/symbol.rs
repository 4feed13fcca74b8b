//! `symwire symbol`: registry operations.

use std::{fs, path::Path};

use serde::Serialize;
use tracing::{info, instrument, warn};

use symwire_adapters::{SymbolManifest, SymbolManifestLoader, builtin_types};
use symwire_core::{
    application::{
        ApiResponse, ResolveOptions, SymbolQuery,
        dto::{
            ConnectionDto, ConnectionRequestDto, ImportSummaryDto, PortDto, SymbolChangesDto,
            SymbolDto, TypeReferenceDto,
        },
    },
    domain::{BUILTIN_PRIMITIVES, Direction, DomainError},
};

use super::{Context, read_json};
use crate::{
    cli::{QueryArgs, RegisterArgs, Relation, SymbolCommands, UpdateArgs},
    error::{CliError, CliResult},
};

pub fn execute(cmd: SymbolCommands, ctx: &Context) -> CliResult<()> {
    let api = &ctx.api;
    let out = &ctx.output;
    match cmd {
        SymbolCommands::Register(args) => {
            let dto = symbol_from_args(args, &ctx.config.generator.default_language)?;
            out.emit(api.register(dto))
        }
        SymbolCommands::Get { id } => out.emit(api.get(&id)),
        SymbolCommands::List => out.emit(api.list()),
        SymbolCommands::Query(args) => out.emit(api.query(&query_from_args(args))),
        SymbolCommands::Search { text } => out.emit(api.search(&text)),
        SymbolCommands::Update(args) => {
            let id = args.id.clone();
            out.emit(api.update(&id, changes_from_args(args)?))
        }
        SymbolCommands::Remove { id } => out.emit(api.remove(&id)),
        SymbolCommands::Versions { namespace, name } => {
            out.emit(api.get_versions(&namespace, &name))
        }
        SymbolCommands::Resolve {
            namespace,
            name,
            constraint,
            oldest,
        } => {
            let options = ResolveOptions {
                constraint,
                prefer_latest: !oldest,
            };
            out.emit(api.resolve(&namespace, &name, &options))
        }
        SymbolCommands::NewVersion { id, bump, changes } => {
            let changes = match changes {
                Some(path) => read_json(&path)?,
                None => SymbolChangesDto::default(),
            };
            out.emit(api.register_new_version(&id, bump, changes))
        }
        SymbolCommands::Status { id, status, source } => {
            out.emit(api.set_status(&id, status, &source))
        }
        SymbolCommands::Related { id, relation } => out.emit(match relation {
            Relation::Contains => api.contains(&id),
            Relation::ContainedBy => api.contained_by(&id),
            Relation::Dependencies => api.dependencies(&id),
            Relation::Dependents => api.dependents(&id),
        }),
        SymbolCommands::Import { path } => import(&path, ctx),
        SymbolCommands::Export { output } => export(output.as_deref(), ctx),
        SymbolCommands::Types { register } => types(register, ctx),
    }
}

// ── register / update / query ─────────────────────────────────────────────────

fn symbol_from_args(args: RegisterArgs, default_language: &str) -> CliResult<SymbolDto> {
    if let Some(path) = &args.file {
        return read_json(path);
    }
    let (Some(namespace), Some(name), Some(version)) = (args.namespace, args.name, args.version)
    else {
        return Err(CliError::InvalidInput {
            message: "NAMESPACE, NAME and VERSION are required without --file".into(),
            source: None,
        });
    };

    Ok(SymbolDto {
        id: None,
        namespace,
        name,
        version,
        level: args.level,
        kind: args.kind,
        language: args.language.unwrap_or_else(|| default_language.to_string()),
        description: args.description,
        tags: args.tags,
        ports: args
            .ports
            .iter()
            .map(|spec| parse_port(spec))
            .collect::<CliResult<_>>()?,
        extends: None,
        implements: Vec::new(),
        dependencies: Vec::new(),
        composes: Vec::new(),
        aggregates: Vec::new(),
        contains: Vec::new(),
        status: Default::default(),
        status_info: None,
        origin: Default::default(),
        created_at: None,
        updated_at: None,
    })
}

/// Parse `name[!][*]:direction:type[?]`.
fn parse_port(spec: &str) -> CliResult<PortDto> {
    let invalid = |reason: &str| CliError::InvalidInput {
        message: format!("port '{spec}': {reason} (expected name:direction:type)"),
        source: None,
    };

    let mut parts = spec.splitn(3, ':');
    let (Some(raw_name), Some(direction), Some(raw_type)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid("missing fields"));
    };

    let mut name = raw_name;
    let mut required = false;
    let mut multiple = false;
    while let Some(last) = name.chars().last() {
        match last {
            '!' => required = true,
            '*' => multiple = true,
            _ => break,
        }
        name = &name[..name.len() - 1];
    }
    if name.is_empty() {
        return Err(invalid("empty name"));
    }

    let direction: Direction = direction
        .parse()
        .map_err(|e: DomainError| invalid(&e.to_string()))?;
    let (symbol_id, nullable) = match raw_type.strip_suffix('?') {
        Some(base) => (base, true),
        None => (raw_type, false),
    };
    if symbol_id.is_empty() {
        return Err(invalid("empty type"));
    }

    Ok(PortDto {
        name: name.to_string(),
        direction,
        type_ref: TypeReferenceDto {
            symbol_id: symbol_id.to_string(),
            nullable,
            generics: Vec::new(),
        },
        required,
        multiple,
        description: None,
    })
}

fn changes_from_args(args: UpdateArgs) -> CliResult<SymbolChangesDto> {
    let mut changes = match &args.file {
        Some(path) => read_json(path)?,
        None => SymbolChangesDto::default(),
    };
    if args.description.is_some() {
        changes.description = args.description;
    }
    if args.clear_description {
        changes.clear_description = true;
    }
    if args.language.is_some() {
        changes.language = args.language;
    }
    if !args.tags.is_empty() {
        changes.tags = Some(args.tags);
    }
    if args.status.is_some() {
        changes.status = args.status;
    }
    Ok(changes)
}

fn query_from_args(args: QueryArgs) -> SymbolQuery {
    SymbolQuery {
        namespace: args.namespace,
        level: args.level,
        kind: args.kind,
        status: args.status,
        origin: args.origin,
        tag: args.tag,
        text: args.text,
    }
}

// ── import / export ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SkippedFile {
    path: String,
    reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionFailure {
    from: String,
    to: String,
    code: String,
    message: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionImport {
    connected: usize,
    /// Already present with the same endpoints.
    skipped: usize,
    failed: usize,
    errors: Vec<ConnectionFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportReport {
    files: Vec<String>,
    skipped_files: Vec<SkippedFile>,
    symbols: ImportSummaryDto,
    connections: ConnectionImport,
}

fn same_endpoints(existing: &ConnectionDto, request: &ConnectionRequestDto) -> bool {
    existing.from_symbol_id == request.from_symbol_id
        && existing.from_port == request.from_port
        && existing.to_symbol_id == request.to_symbol_id
        && existing.to_port == request.to_port
}

/// Symbols first, then connections; one bad item never stops the rest.
#[instrument(skip_all, fields(path = %path.display()))]
fn import(path: &Path, ctx: &Context) -> CliResult<()> {
    let loaded = SymbolManifestLoader::new(path).load()?;
    let manifest = loaded.manifest;

    let symbols = ctx.output.take(ctx.api.import(manifest.symbols))?;
    let existing = ctx.output.take(ctx.api.list_connections())?;

    let mut connections = ConnectionImport::default();
    for request in manifest.connections {
        if existing.iter().any(|c| same_endpoints(c, &request)) {
            connections.skipped += 1;
            continue;
        }
        let from = format!("{}.{}", request.from_symbol_id, request.from_port);
        let to = format!("{}.{}", request.to_symbol_id, request.to_port);
        match ctx.api.connect(request).into_result() {
            Ok(_) => connections.connected += 1,
            Err(error) => {
                warn!(%from, %to, code = %error.code, "Connection not imported");
                connections.failed += 1;
                connections.errors.push(ConnectionFailure {
                    from,
                    to,
                    code: error.code,
                    message: error.message,
                });
            }
        }
    }

    info!(
        imported = symbols.imported,
        connected = connections.connected,
        "Import finished"
    );

    let report = ImportReport {
        files: loaded.files.iter().map(|p| p.display().to_string()).collect(),
        skipped_files: loaded
            .skipped
            .into_iter()
            .map(|(path, reason)| SkippedFile {
                path: path.display().to_string(),
                reason,
            })
            .collect(),
        symbols,
        connections,
    };
    ctx.output.emit(ApiResponse::ok(report))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportReport {
    path: String,
    symbols: usize,
    connections: usize,
}

fn export(target: Option<&Path>, ctx: &Context) -> CliResult<()> {
    let symbols = ctx.output.take(ctx.api.export())?;
    let connections = ctx.output.take(ctx.api.list_connections())?;
    let manifest = SymbolManifest {
        symbols,
        connections: connections
            .into_iter()
            .map(|c| ConnectionRequestDto {
                from_symbol_id: c.from_symbol_id,
                from_port: c.from_port,
                to_symbol_id: c.to_symbol_id,
                to_port: c.to_port,
                transform: c.transform,
            })
            .collect(),
    };

    let Some(path) = target else {
        return ctx
            .output
            .emit(ApiResponse::ok(manifest));
    };

    let body = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::to_string_pretty(&manifest).map_err(|e| CliError::InvalidInput {
            message: format!("registry cannot be written as TOML: {e}"),
            source: Some(Box::new(e)),
        })?
    } else {
        serde_json::to_string_pretty(&manifest)?
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body).map_err(|e| CliError::IoError {
        message: format!("Failed to write '{}'", path.display()),
        source: e,
    })?;

    ctx.output
        .emit(ApiResponse::ok(ExportReport {
            path: path.display().to_string(),
            symbols: manifest.symbols.len(),
            connections: manifest.connections.len(),
        }))
}

// ── types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TypeInfo {
    name: &'static str,
    id: String,
    description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TypesReport {
    types: Vec<TypeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    registered: Option<ImportSummaryDto>,
}

fn types(register: bool, ctx: &Context) -> CliResult<()> {
    let types = BUILTIN_PRIMITIVES
        .iter()
        .map(|&name| TypeInfo {
            name,
            id: format!("{}/{name}@1.0.0", builtin_types::BUILTIN_NAMESPACE),
            description: builtin_types::describe(name).unwrap_or_default(),
        })
        .collect();

    let registered = if register {
        let catalogue = builtin_types::catalogue()?;
        let dtos = catalogue.iter().map(SymbolDto::from).collect();
        Some(ctx.output.take(ctx.api.import(dtos))?)
    } else {
        None
    };

    ctx.output
        .emit(ApiResponse::ok(TypesReport { types, registered }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_spec_with_flags_and_nullable_type() {
        let port = parse_port("items!*:in:shop/Item@1.0.0?").unwrap();
        assert_eq!(port.name, "items");
        assert!(port.required && port.multiple);
        assert_eq!(port.direction, Direction::In);
        assert_eq!(port.type_ref.symbol_id, "shop/Item@1.0.0");
        assert!(port.type_ref.nullable);
    }

    #[test]
    fn port_spec_rejects_bad_direction_and_missing_parts() {
        assert!(parse_port("items:sideways:string").is_err());
        assert!(parse_port("items:in").is_err());
        assert!(parse_port("!:in:string").is_err());
    }

    #[test]
    fn flags_build_a_symbol_with_the_configured_language() {
        let args = RegisterArgs {
            namespace: Some("shop".into()),
            name: Some("Cart".into()),
            version: Some("1.0.0".into()),
            file: None,
            level: None,
            kind: None,
            language: None,
            description: None,
            tags: vec!["checkout".into()],
            ports: vec!["total:out:float64".into()],
        };
        let dto = symbol_from_args(args, "rust").unwrap();
        assert_eq!(dto.language, "rust");
        assert_eq!(dto.ports[0].direction, Direction::Out);
        assert_eq!(dto.tags, vec!["checkout".to_string()]);
    }

    #[test]
    fn update_flags_override_file_fields() {
        let args = UpdateArgs {
            id: "shop/Cart@1.0.0".into(),
            file: None,
            description: None,
            clear_description: true,
            language: Some("rust".into()),
            tags: Vec::new(),
            status: None,
        };
        let changes = changes_from_args(args).unwrap();
        assert!(changes.clear_description);
        assert_eq!(changes.language.as_deref(), Some("rust"));
        assert!(changes.tags.is_none());
    }
}
