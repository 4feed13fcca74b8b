//! Application layer for symwire.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (registry, wiring, graph, generator)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **DTOs**: Wire-level shapes (camelCase, arrays, RFC 3339 timestamps)
//! - **Api**: The uniform `{success, data | error}` facade
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod api;
pub mod dto;
pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    BatchResult, CodeGenerator, GenerateOptions, GenerationResult, GraphService, ResolveOptions,
    SymbolQuery, SymbolRegistry, WiringEngine,
};

// Re-export port traits (for adapter implementation)
pub use ports::{CodeEmitter, ConnectionStore, EmittedCode, Filesystem, SymbolStore};

pub use api::{ApiError, ApiResponse, ArchitectureApi};
pub use error::{ApplicationError, WiringError};
