//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `symwire-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `SymbolStore`: Canonical symbol records
//!   - `ConnectionStore`: Wiring connections
//!   - `Filesystem`: File operations for generated code
//!   - `CodeEmitter`: Language-specific source emission
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (`ArchitectureApi` in `crate::application::api`)

pub mod output;

pub use output::{CodeEmitter, ConnectionStore, EmittedCode, Filesystem, SymbolStore};

#[cfg(test)]
pub use output::{MockCodeEmitter, MockConnectionStore, MockFilesystem, MockSymbolStore};
