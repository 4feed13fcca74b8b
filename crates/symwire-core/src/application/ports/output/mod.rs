//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `symwire-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{Connection, ConnectionId, Symbol, SymbolId};
use crate::error::SymwireResult;

/// Port for canonical symbol records.
///
/// Implemented by:
/// - `symwire_adapters::store::InMemorySymbolStore` (testing, ephemeral runs)
/// - `symwire_adapters::store::JsonFileStore` (persisted registry)
///
/// `insert` is an upsert; uniqueness is enforced by the registry, not here.
#[cfg_attr(test, mockall::automock)]
pub trait SymbolStore: Send + Sync {
    fn get(&self, id: &SymbolId) -> SymwireResult<Option<Symbol>>;

    /// All records, in no particular order.
    fn list(&self) -> SymwireResult<Vec<Symbol>>;

    fn insert(&self, symbol: Symbol) -> SymwireResult<()>;

    /// Returns whether a record was removed.
    fn remove(&self, id: &SymbolId) -> SymwireResult<bool>;
}

/// Port for wiring connections.
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionStore: Send + Sync {
    fn get(&self, id: &ConnectionId) -> SymwireResult<Option<Connection>>;

    fn list(&self) -> SymwireResult<Vec<Connection>>;

    fn insert(&self, connection: Connection) -> SymwireResult<()>;

    fn remove(&self, id: &ConnectionId) -> SymwireResult<bool>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `symwire_adapters::filesystem::LocalFilesystem` (production)
/// - `symwire_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SymwireResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> SymwireResult<()>;

    fn read_file(&self, path: &Path) -> SymwireResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Source text for one symbol, before the generator adds its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedCode {
    /// File name of the regenerated base artifact, e.g. `order_service.base.ts`.
    pub base_file: String,
    pub base_body: String,
    /// File name of the user-owned artifact.
    pub user_file: String,
    pub user_body: String,
}

/// Port for language-specific code emission.
///
/// Implemented by:
/// - `symwire_adapters::emitter::TypeScriptEmitter`
/// - `symwire_adapters::emitter::RustEmitter`
#[cfg_attr(test, mockall::automock)]
pub trait CodeEmitter: Send + Sync {
    /// Language tag this emitter serves, matched against `Symbol::language`.
    fn language(&self) -> &'static str;

    /// Line comment marker used for the generated header.
    fn comment_prefix(&self) -> &'static str {
        "//"
    }

    fn emit(&self, symbol: &Symbol) -> SymwireResult<EmittedCode>;
}
