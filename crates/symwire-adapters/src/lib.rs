//! Infrastructure adapters for symwire.
//!
//! This crate implements the ports defined in `symwire-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_types;
pub mod emitter;
pub mod filesystem;
pub mod store;
pub mod symbol_loader;

// Re-export commonly used adapters
pub use emitter::{RustEmitter, TypeScriptEmitter};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use store::{InMemoryConnectionStore, InMemorySymbolStore, JsonFileStore};
pub use symbol_loader::{LoadError, LoadedManifests, SymbolManifest, SymbolManifestLoader};
