//! symwire Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the symwire
//! component-architecture registry, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           symwire-cli (CLI)             │
//! │        (calls the Driving Port)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      ArchitectureApi ({success,..})     │
//! │  Registry · Wiring · Graph · Generator  │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (SymbolStore, ConnectionStore, FS, Emit)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    symwire-adapters (Infrastructure)    │
//! │  (JsonFileStore, LocalFilesystem, etc)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Symbol, SemVer, compatibility, graph)  │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use symwire_core::prelude::*;
//!
//! let symbols: Arc<dyn SymbolStore> = Arc::new(store);
//! let connections: Arc<dyn ConnectionStore> = Arc::new(links);
//!
//! let api = ArchitectureApi::new(
//!     SymbolRegistry::new(symbols.clone()),
//!     WiringEngine::new(symbols.clone(), connections.clone(), TypeCheckMode::Compatible),
//!     GraphService::new(symbols.clone(), connections),
//!     CodeGenerator::new(symbols, Box::new(filesystem)).with_emitter(Box::new(emitter)),
//! );
//!
//! let response = api.get_topological_order();
//! assert!(response.success);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApiError, ApiResponse, ArchitectureApi, CodeGenerator, GenerateOptions, GraphService,
        ResolveOptions, SymbolQuery, SymbolRegistry, WiringEngine,
        dto::{ConnectionRequestDto, SymbolChangesDto, SymbolDto},
        ports::{CodeEmitter, ConnectionStore, EmittedCode, Filesystem, SymbolStore},
    };
    pub use crate::domain::{
        BumpType, Connection, ConnectionRequest, Direction, Level, Port, SemVer, Status, Symbol,
        SymbolId, SymbolKind, TypeCheckMode, TypeReference,
    };
    pub use crate::error::{SymwireError, SymwireResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
