//! End-to-end tests running the core services on the real adapters.

use std::{fs, path::Path, sync::Arc};

use symwire_adapters::{
    InMemoryConnectionStore, InMemorySymbolStore, JsonFileStore, LocalFilesystem,
    MemoryFilesystem, SymbolManifestLoader, builtin_types, emitter,
};
use symwire_core::prelude::*;
use tempfile::TempDir;

const SHOP: &str = r#"
[[symbols]]
namespace = "shop"
name = "Catalog"
version = "1.0.0"

[[symbols.ports]]
name = "selected"
direction = "out"
type = { symbolId = "string" }

[[symbols]]
namespace = "shop"
name = "Cart"
version = "1.0.0"
language = "rust"

[[symbols.ports]]
name = "items"
direction = "in"
required = true
type = { symbolId = "string" }

[[connections]]
fromSymbolId = "shop/Catalog@1.0.0"
fromPort = "selected"
toSymbolId = "shop/Cart@1.0.0"
toPort = "items"
"#;

fn api_over(store: Arc<JsonFileStore>, filesystem: Box<dyn Filesystem>) -> ArchitectureApi {
    let symbols: Arc<dyn SymbolStore> = store.clone();
    let connections: Arc<dyn ConnectionStore> = store;
    let mut generator = CodeGenerator::new(symbols.clone(), filesystem);
    for e in emitter::all() {
        generator = generator.with_emitter(e);
    }
    ArchitectureApi::new(
        SymbolRegistry::new(symbols.clone()),
        WiringEngine::new(symbols.clone(), connections.clone(), TypeCheckMode::Compatible),
        GraphService::new(symbols, connections),
        generator,
    )
}

fn seed(dir: &Path) -> Arc<JsonFileStore> {
    fs::write(dir.join("shop.toml"), SHOP).unwrap();
    let loaded = SymbolManifestLoader::new(dir.join("shop.toml")).load().unwrap();

    let store = Arc::new(JsonFileStore::open(dir.join("registry.json")).unwrap());
    let api = api_over(store.clone(), Box::new(MemoryFilesystem::new()));

    let summary = api.import(loaded.manifest.symbols).into_result().unwrap();
    assert_eq!(summary.imported, 2);
    for request in loaded.manifest.connections {
        assert!(api.connect(request).is_ok());
    }
    store
}

#[test]
fn manifest_import_persists_symbols_and_connections() {
    let temp = TempDir::new().unwrap();
    drop(seed(temp.path()));

    let reopened = Arc::new(JsonFileStore::open(temp.path().join("registry.json")).unwrap());
    let api = api_over(reopened, Box::new(MemoryFilesystem::new()));

    assert_eq!(api.list().into_result().unwrap().len(), 2);
    assert_eq!(api.list_connections().into_result().unwrap().len(), 1);
    assert_eq!(
        api.get_topological_order().into_result().unwrap(),
        Some(vec!["shop/Catalog@1.0.0".to_string(), "shop/Cart@1.0.0".to_string()])
    );
    assert!(api.find_unconnected_required_ports().into_result().unwrap().is_empty());
}

#[test]
fn removing_a_symbol_removes_its_persisted_connections() {
    let temp = TempDir::new().unwrap();
    let store = seed(temp.path());
    let api = api_over(store, Box::new(MemoryFilesystem::new()));

    let removal = api.remove("shop/Cart@1.0.0").into_result().unwrap();
    assert_eq!(removal.connections_removed, 1);

    let raw = fs::read_to_string(temp.path().join("registry.json")).unwrap();
    assert!(raw.contains("\"connections\": []"));
}

#[test]
fn generation_writes_both_artifacts_and_preserves_user_code() {
    let temp = TempDir::new().unwrap();
    let store = seed(temp.path());
    let out = temp.path().join("out");
    let options = GenerateOptions::new(&out);

    let api = api_over(store.clone(), Box::new(LocalFilesystem::new()));
    let batch = api.generate_all(&options).into_result().unwrap();
    assert_eq!((batch.total, batch.succeeded, batch.failed), (2, 2, 0));

    let base = fs::read_to_string(out.join("shop/catalog.base.ts")).unwrap();
    assert!(base.contains("content-hash: sha256:"));
    assert!(base.contains("export abstract class CatalogBase"));
    assert!(out.join("shop/cart_base.rs").exists());

    let user_path = out.join("shop/cart.rs");
    fs::write(&user_path, "// hand written").unwrap();

    // A fresh generator has no manifest and falls back to the file header.
    let again = api_over(store, Box::new(LocalFilesystem::new()));
    let result = again
        .generate_symbol("shop/Cart@1.0.0", &options)
        .into_result()
        .unwrap();
    assert_eq!(result.base_action, "unchanged");
    assert_eq!(result.user_action, "preserved");
    assert_eq!(fs::read_to_string(&user_path).unwrap(), "// hand written");
}

#[test]
fn builtin_catalogue_registers_as_primitives() {
    let symbols = Arc::new(InMemorySymbolStore::with_builtin_types().unwrap());
    let registry = SymbolRegistry::new(symbols.clone());
    let ids: Vec<_> = registry
        .list()
        .unwrap()
        .iter()
        .map(|s| s.id().to_string())
        .collect();
    assert!(ids.contains(&"builtin/string@1.0.0".to_string()));

    let connections: Arc<dyn ConnectionStore> = Arc::new(InMemoryConnectionStore::new());
    let graph = GraphService::new(symbols, connections);
    assert_eq!(
        graph.build_graph().unwrap().node_count(),
        builtin_types::catalogue().unwrap().len()
    );
}
