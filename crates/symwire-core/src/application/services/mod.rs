//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "register a symbol", "wire two ports" or
//! "generate code for everything".

pub mod generator_service;
pub mod graph_service;
pub mod registry_service;
pub mod wiring_service;

pub use generator_service::{
    ArtifactAction, BatchItem, BatchOutcome, BatchResult, CodeGenerator, GenerateOptions,
    GenerationManifest, GenerationResult, ManifestEntry, content_hash, is_generatable,
    parse_content_hash,
};
pub use graph_service::GraphService;
pub use registry_service::{
    ImportFailure, ImportSummary, ResolveOptions, SymbolIndex, SymbolQuery, SymbolRegistry,
};
pub use wiring_service::{ConnectionValidation, PortMatch, UnconnectedPort, WiringEngine};
