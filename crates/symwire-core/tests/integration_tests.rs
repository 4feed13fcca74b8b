//! Integration tests for symwire-core, driven through `ArchitectureApi`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use symwire_core::{
    application::{ApplicationError, GenerateOptions, dto::PortDto},
    domain::{
        Direction, TypeCheckMode, check_direction_compatibility, check_type_compatibility,
        find_best_match,
    },
    prelude::*,
};

// ── Test doubles ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct Symbols(Mutex<HashMap<SymbolId, Symbol>>);

impl SymbolStore for Symbols {
    fn get(&self, id: &SymbolId) -> SymwireResult<Option<Symbol>> {
        Ok(self.0.lock().unwrap().get(id).cloned())
    }
    fn list(&self) -> SymwireResult<Vec<Symbol>> {
        Ok(self.0.lock().unwrap().values().cloned().collect())
    }
    fn insert(&self, symbol: Symbol) -> SymwireResult<()> {
        self.0.lock().unwrap().insert(symbol.id().clone(), symbol);
        Ok(())
    }
    fn remove(&self, id: &SymbolId) -> SymwireResult<bool> {
        Ok(self.0.lock().unwrap().remove(id).is_some())
    }
}

#[derive(Default)]
struct Links(Mutex<Vec<Connection>>);

impl ConnectionStore for Links {
    fn get(&self, id: &symwire_core::domain::ConnectionId) -> SymwireResult<Option<Connection>> {
        Ok(self.0.lock().unwrap().iter().find(|c| &c.id == id).cloned())
    }
    fn list(&self) -> SymwireResult<Vec<Connection>> {
        Ok(self.0.lock().unwrap().clone())
    }
    fn insert(&self, connection: Connection) -> SymwireResult<()> {
        self.0.lock().unwrap().push(connection);
        Ok(())
    }
    fn remove(&self, id: &symwire_core::domain::ConnectionId) -> SymwireResult<bool> {
        let mut all = self.0.lock().unwrap();
        let before = all.len();
        all.retain(|c| &c.id != id);
        Ok(all.len() != before)
    }
}

/// Connection store whose removals fail once `budget` is spent.
struct FlakyLinks {
    inner: Links,
    budget: Mutex<usize>,
}

impl ConnectionStore for FlakyLinks {
    fn get(&self, id: &symwire_core::domain::ConnectionId) -> SymwireResult<Option<Connection>> {
        self.inner.get(id)
    }
    fn list(&self) -> SymwireResult<Vec<Connection>> {
        self.inner.list()
    }
    fn insert(&self, connection: Connection) -> SymwireResult<()> {
        self.inner.insert(connection)
    }
    fn remove(&self, id: &symwire_core::domain::ConnectionId) -> SymwireResult<bool> {
        let mut budget = self.budget.lock().unwrap();
        if *budget == 0 {
            return Err(ApplicationError::StoreLockError.into());
        }
        *budget -= 1;
        self.inner.remove(id)
    }
}

#[derive(Default, Clone)]
struct Files(Arc<Mutex<HashMap<PathBuf, String>>>);

impl Filesystem for Files {
    fn create_dir_all(&self, _path: &Path) -> SymwireResult<()> {
        Ok(())
    }
    fn write_file(&self, path: &Path, content: &str) -> SymwireResult<()> {
        self.0.lock().unwrap().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
    fn read_file(&self, path: &Path) -> SymwireResult<String> {
        self.0.lock().unwrap().get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "not found".into(),
            }
            .into()
        })
    }
    fn exists(&self, path: &Path) -> bool {
        self.0.lock().unwrap().contains_key(path)
    }
}

struct Stub;

impl CodeEmitter for Stub {
    fn language(&self) -> &'static str {
        "typescript"
    }
    fn emit(&self, symbol: &Symbol) -> SymwireResult<EmittedCode> {
        let handlers: String = symbol
            .inputs()
            .map(|p| format!("  abstract on_{}(value: unknown): void;\n", p.name))
            .collect();
        Ok(EmittedCode {
            base_file: format!("{}.base.ts", symbol.name()),
            base_body: format!("export abstract class {}Base {{\n{handlers}}}\n", symbol.name()),
            user_file: format!("{}.ts", symbol.name()),
            user_body: format!("export class {0} extends {0}Base {{}}\n", symbol.name()),
        })
    }
}

fn api_with(files: Files) -> ArchitectureApi {
    let symbols: Arc<dyn SymbolStore> = Arc::new(Symbols::default());
    let links: Arc<dyn ConnectionStore> = Arc::new(Links::default());
    ArchitectureApi::new(
        SymbolRegistry::new(symbols.clone()),
        WiringEngine::new(symbols.clone(), links.clone(), TypeCheckMode::Compatible),
        GraphService::new(symbols.clone(), links),
        CodeGenerator::new(symbols, Box::new(files)).with_emitter(Box::new(Stub)),
    )
}

fn api() -> ArchitectureApi {
    api_with(Files::default())
}

fn port(name: &str, direction: Direction, multiple: bool) -> PortDto {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "direction": direction,
        "type": { "symbolId": "string" },
        "multiple": multiple,
    }))
    .unwrap()
}

fn component(name: &str, multiple_in: bool) -> SymbolDto {
    let mut dto: SymbolDto = serde_json::from_value(serde_json::json!({
        "namespace": "app",
        "name": name,
        "version": "1.0.0",
    }))
    .unwrap();
    dto.ports = vec![
        port("in", Direction::In, multiple_in),
        port("out", Direction::Out, false),
    ];
    dto
}

fn wire(api: &ArchitectureApi, from: &str, to: &str) -> ApiResponse<symwire_core::application::dto::ConnectionDto> {
    api.connect(ConnectionRequestDto {
        from_symbol_id: format!("app/{from}@1.0.0"),
        from_port: "out".into(),
        to_symbol_id: format!("app/{to}@1.0.0"),
        to_port: "in".into(),
        transform: None,
    })
}

fn register_all(api: &ArchitectureApi, names: &[&str]) {
    for name in names {
        assert!(api.register(component(name, false)).success, "register {name}");
    }
}

// ── Version resolution ───────────────────────────────────────────────────────

#[test]
fn caret_range_picks_highest_compatible() {
    let versions = ["1.0.0", "1.2.0", "1.3.5", "2.0.0"]
        .map(|v| SemVer::parse(v).unwrap());
    let best = find_best_match(&versions, "^1.2.0").unwrap();
    assert_eq!(best, Some(SemVer::new(1, 3, 5)));
}

#[test]
fn resolve_respects_constraint_and_preference() {
    let api = api();
    for version in ["1.0.0", "1.4.0", "2.0.0"] {
        let mut dto = component("Lib", false);
        dto.version = version.into();
        assert!(api.register(dto).success);
    }

    let latest = api.resolve("app", "Lib", &ResolveOptions::default()).into_result().unwrap();
    assert_eq!(latest.version, "2.0.0");

    let options = ResolveOptions {
        constraint: Some("^1.0.0".into()),
        prefer_latest: true,
    };
    assert_eq!(api.resolve("app", "Lib", &options).into_result().unwrap().version, "1.4.0");

    let oldest = ResolveOptions {
        constraint: None,
        prefer_latest: false,
    };
    assert_eq!(api.resolve("app", "Lib", &oldest).into_result().unwrap().version, "1.0.0");

    assert_eq!(
        api.get_versions("app", "Lib").into_result().unwrap(),
        vec!["2.0.0", "1.4.0", "1.0.0"]
    );
}

// ── Wiring ───────────────────────────────────────────────────────────────────

#[test]
fn back_edge_is_rejected_as_cycle() {
    let api = api();
    register_all(&api, &["A", "B"]);

    assert!(wire(&api, "A", "B").success);
    let rejected = wire(&api, "B", "A");
    assert_eq!(rejected.code(), Some("WIRING_ERROR"));
    assert!(rejected.error.unwrap().message.contains("cycle"));

    assert_eq!(api.list_connections().into_result().unwrap().len(), 1);
}

#[test]
fn single_input_port_fills_up() {
    let api = api();
    register_all(&api, &["A", "B", "C"]);
    assert!(wire(&api, "A", "C").success);
    let full = wire(&api, "B", "C");
    assert_eq!(full.code(), Some("WIRING_ERROR"));
    assert!(full.error.unwrap().message.contains("port full"));

    let fan_in = api_with(Files::default());
    register_all(&fan_in, &["A", "B"]);
    assert!(fan_in.register(component("Sink", true)).success);
    assert!(wire(&fan_in, "A", "Sink").success);
    assert!(wire(&fan_in, "B", "Sink").success);
}

#[test]
fn validate_connection_never_fails_the_call() {
    let api = api();
    register_all(&api, &["A"]);
    let report = api
        .validate_connection(ConnectionRequestDto {
            from_symbol_id: "app/A@1.0.0".into(),
            from_port: "out".into(),
            to_symbol_id: "garbage".into(),
            to_port: "in".into(),
            transform: None,
        })
        .into_result()
        .unwrap();
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn removing_a_symbol_drops_its_connections() {
    let api = api();
    register_all(&api, &["A", "B", "C"]);
    assert!(wire(&api, "A", "B").success);
    assert!(wire(&api, "B", "C").success);

    let removal = api.remove("app/B@1.0.0").into_result().unwrap();
    assert_eq!(removal.connections_removed, 2);
    assert!(api.list_connections().into_result().unwrap().is_empty());
    assert_eq!(api.get("app/B@1.0.0").code(), Some("NOT_FOUND"));
}

#[test]
fn failed_cascade_leaves_symbol_and_connections_in_place() {
    let symbols: Arc<dyn SymbolStore> = Arc::new(Symbols::default());
    let links = Arc::new(FlakyLinks {
        inner: Links::default(),
        budget: Mutex::new(1),
    });
    let api = ArchitectureApi::new(
        SymbolRegistry::new(symbols.clone()),
        WiringEngine::new(symbols.clone(), links.clone(), TypeCheckMode::Compatible),
        GraphService::new(symbols.clone(), links.clone()),
        CodeGenerator::new(symbols, Box::new(Files::default())).with_emitter(Box::new(Stub)),
    );
    register_all(&api, &["A", "B", "C"]);
    assert!(wire(&api, "A", "B").success);
    assert!(wire(&api, "B", "C").success);

    let failed = api.remove("app/B@1.0.0");
    assert_eq!(failed.code(), Some("STORE_ERROR"));
    assert!(api.get("app/B@1.0.0").success);
    assert_eq!(api.list_connections().into_result().unwrap().len(), 2);

    *links.budget.lock().unwrap() = usize::MAX;
    let removal = api.remove("app/B@1.0.0").into_result().unwrap();
    assert_eq!(removal.connections_removed, 2);
    assert!(api.list_connections().into_result().unwrap().is_empty());
    assert_eq!(api.remove("app/B@1.0.0").code(), Some("NOT_FOUND"));
}

#[test]
fn port_change_that_breaks_a_connection_is_rejected() {
    let api = api();
    register_all(&api, &["A", "B"]);
    assert!(wire(&api, "A", "B").success);

    let mut retyped = port("in", Direction::In, false);
    retyped.type_ref.symbol_id = "int64".into();
    let changes = SymbolChangesDto {
        ports: Some(vec![retyped, port("out", Direction::Out, false)]),
        ..SymbolChangesDto::default()
    };
    let rejected = api.update("app/B@1.0.0", changes);
    assert_eq!(rejected.code(), Some("WIRING_ERROR"));
    assert!(rejected.error.unwrap().message.contains("breaks existing connections"));

    let stored = api.get("app/B@1.0.0").into_result().unwrap();
    assert_eq!(stored.ports[0].type_ref.symbol_id, "string");
    assert_eq!(api.list_connections().into_result().unwrap().len(), 1);

    // Changes that leave the ports alone are unaffected.
    let described = SymbolChangesDto {
        description: Some("sink".into()),
        ..SymbolChangesDto::default()
    };
    assert!(api.update("app/B@1.0.0", described).success);
}

// ── Compatibility ────────────────────────────────────────────────────────────

#[test]
fn compatibility_rules() {
    assert!(!check_direction_compatibility(Direction::In, Direction::In).compatible);

    let string = TypeReference::new("string");
    let same = check_type_compatibility(&string, &string, TypeCheckMode::Compatible);
    assert_eq!(same.score, 100);

    let narrowing = check_type_compatibility(
        &TypeReference::new("string").nullable(),
        &string,
        TypeCheckMode::Compatible,
    );
    assert!(!narrowing.compatible);
    assert!(!narrowing.suggestions.is_empty());
}

// ── Graph ────────────────────────────────────────────────────────────────────

#[test]
fn chain_orders_topologically() {
    let api = api();
    register_all(&api, &["A", "B", "C"]);
    assert!(wire(&api, "A", "B").success);
    assert!(wire(&api, "B", "C").success);

    let order = api.get_topological_order().into_result().unwrap();
    assert_eq!(
        order,
        Some(vec![
            "app/A@1.0.0".to_string(),
            "app/B@1.0.0".to_string(),
            "app/C@1.0.0".to_string(),
        ])
    );

    let stats = api.get_stats().into_result().unwrap();
    assert_eq!(stats.node_count, 3);
    assert_eq!(stats.max_depth, 2);
    assert_eq!(api.downstream("app/A@1.0.0").into_result().unwrap().len(), 2);
}

// ── Registry ─────────────────────────────────────────────────────────────────

#[test]
fn duplicate_register_conflicts_and_new_version_is_distinct() {
    let api = api();
    register_all(&api, &["A"]);
    assert_eq!(api.register(component("A", false)).code(), Some("CONFLICT"));

    let next = api
        .register_new_version("app/A@1.0.0", BumpType::Minor, SymbolChangesDto::default())
        .into_result()
        .unwrap();
    assert_eq!(next.id.as_deref(), Some("app/A@1.1.0"));
    assert_eq!(next.status, Status::Declared);
    assert!(api.get("app/A@1.0.0").success);
}

#[test]
fn import_isolates_bad_items() {
    let api = api();
    register_all(&api, &["A"]);
    let mut broken = component("Broken", false);
    broken.version = "one".into();

    let summary = api
        .import(vec![component("A", false), component("B", false), broken])
        .into_result()
        .unwrap();
    assert_eq!((summary.imported, summary.skipped, summary.failed), (1, 1, 1));
    assert_eq!(api.export().into_result().unwrap().len(), 2);
}

// ── Generation ───────────────────────────────────────────────────────────────

#[test]
fn regeneration_is_stable_and_preserves_user_file() {
    let files = Files::default();
    let api = api_with(files.clone());
    register_all(&api, &["A"]);

    let options = GenerateOptions::new("/out");
    let first = api.generate_symbol("app/A@1.0.0", &options).into_result().unwrap();
    assert_eq!(first.user_action, "created");

    let user_path = PathBuf::from(&first.user_path);
    files.write_file(&user_path, "// hand written\n").unwrap();

    for overwrite in [false, true] {
        let again = api
            .generate_symbol("app/A@1.0.0", &options.clone().overwrite_generated(overwrite))
            .into_result()
            .unwrap();
        assert_eq!(again.content_hash, first.content_hash);
        assert_eq!(again.user_action, "preserved");
        assert_eq!(files.read_file(&user_path).unwrap(), "// hand written\n");
    }
}

#[test]
fn generate_multiple_continues_past_failures() {
    let api = api();
    register_all(&api, &["A", "B"]);
    let batch = api
        .generate_multiple(
            &[
                "app/A@1.0.0".into(),
                "nonsense".into(),
                "app/B@1.0.0".into(),
            ],
            &GenerateOptions::new("/out").dry_run(),
        )
        .into_result()
        .unwrap();
    assert_eq!((batch.total, batch.succeeded, batch.failed), (3, 2, 1));
}
