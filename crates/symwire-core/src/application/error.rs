//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`; connection
//! rejections are [`WiringError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Level;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    #[error("Symbol not found: {id}")]
    SymbolNotFound { id: String },

    #[error("Connection not found: {id}")]
    ConnectionNotFound { id: String },

    /// No version of `namespace/name` satisfies the request.
    #[error("No version of {namespace}/{name} matches '{constraint}'")]
    VersionNotFound {
        namespace: String,
        name: String,
        constraint: String,
    },

    #[error("Symbol already exists: {id}")]
    AlreadyExists { id: String },

    /// Code generation was requested for a symbol outside L1–L3.
    #[error("Symbol {id} is not generatable (level {level})")]
    NotGeneratable { id: String, level: Level },

    #[error("Generation failed for {id}: {reason}")]
    GenerationFailed { id: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned).
    #[error("Store lock poisoned")]
    StoreLockError,

    /// Persisting or loading the store failed.
    #[error("Store error: {reason}")]
    StoreError { reason: String },

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: String },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SymbolNotFound { .. } => vec![
                "Try: symwire symbol list to see registered symbols".into(),
                "Symbol ids include the version: namespace/name@1.0.0".into(),
            ],
            Self::ConnectionNotFound { .. } => {
                vec!["Try: symwire wire list to see existing connections".into()]
            }
            Self::VersionNotFound {
                namespace, name, ..
            } => vec![
                format!("Try: symwire symbol versions {namespace} {name}"),
                "Relax the constraint, e.g. ^1.0.0 or *".into(),
            ],
            Self::AlreadyExists { .. } => vec![
                "Register a new version instead of re-registering".into(),
                "Or update the existing symbol in place".into(),
            ],
            Self::NotGeneratable { .. } => vec![
                "Only components (L1), modules (L2) and subsystems (L3) produce code".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec![
                "The symbol store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::StoreError { .. } => vec![
                "Check that the store file is valid JSON".into(),
                "Check the store.path setting".into(),
            ],
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {}", name),
                "This is likely a configuration error".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SymbolNotFound { .. }
            | Self::ConnectionNotFound { .. }
            | Self::VersionNotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::NotGeneratable { .. }
            | Self::GenerationFailed { .. }
            | Self::FilesystemError { .. } => ErrorCategory::Generation,
            Self::StoreLockError | Self::StoreError { .. } => ErrorCategory::Store,
            Self::AdapterNotConfigured { .. } => ErrorCategory::Configuration,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}

/// Why the wiring pipeline rejected a connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WiringError {
    #[error("cannot connect {symbol} to itself")]
    SelfConnection { symbol: String },

    #[error("symbol not found: {id}")]
    SymbolNotFound { id: String },

    #[error("port '{port}' not found on {symbol}")]
    PortNotFound { symbol: String, port: String },

    #[error("incompatible ports: {reason}")]
    Incompatible {
        reason: String,
        suggestions: Vec<String>,
    },

    #[error("connection {from} -> {to} already exists")]
    DuplicateConnection { from: String, to: String },

    #[error("port full: {symbol}.{port} accepts a single connection")]
    PortFull { symbol: String, port: String },

    #[error("connecting {from} -> {to} would create a cycle")]
    WouldCreateCycle { from: String, to: String },

    #[error("change to {symbol} breaks existing connections: {}", .problems.join("; "))]
    BreaksConnections {
        symbol: String,
        problems: Vec<String>,
    },
}

impl WiringError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SelfConnection { .. } => {
                vec!["Split the behaviour into two symbols and wire those".into()]
            }
            Self::SymbolNotFound { .. } => vec!["Register the symbol before wiring it".into()],
            Self::PortNotFound { symbol, .. } => {
                vec![format!("Try: symwire symbol get {symbol} to list its ports")]
            }
            Self::Incompatible { suggestions, .. } => suggestions.clone(),
            Self::DuplicateConnection { .. } => vec!["The connection is already in place".into()],
            Self::PortFull { .. } => vec![
                "Disconnect the existing connection first".into(),
                "Or mark the target port as multiple".into(),
            ],
            Self::WouldCreateCycle { .. } => vec![
                "Try: symwire graph upstream <id> to see what already feeds the source".into(),
                "Break the loop by introducing an intermediate symbol".into(),
            ],
            Self::BreaksConnections { symbol, .. } => vec![
                format!("Try: symwire wire list --symbol {symbol} to see what is attached"),
                "Disconnect the affected connections before changing the ports".into(),
            ],
        }
    }
}
