//! Unified error handling for symwire core.
//!
//! This module provides a unified error type that wraps domain, application
//! and wiring errors, with a stable error code and user-actionable
//! suggestions.

use thiserror::Error;

use crate::application::{ApplicationError, WiringError};
use crate::domain::DomainError;

/// Root error type for symwire core operations.
///
/// This enum wraps all possible errors that can occur when using
/// symwire-core, providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum SymwireError {
    /// Errors from the domain layer (malformed input, invariant violations).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// A connection was rejected by the wiring pipeline.
    #[error("Wiring error: {0}")]
    Wiring(#[from] WiringError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl SymwireError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Wiring(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in symwire".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Wiring(_) => ErrorCategory::Wiring,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Stable machine-readable code, e.g. `NOT_FOUND`.
    pub fn code(&self) -> &'static str {
        self.category().code()
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::StoreLockError))
    }
}

/// Error categories; each maps to one wire-level error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Wiring,
    Generation,
    Configuration,
    Store,
    Internal,
}

impl ErrorCategory {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Conflict => "CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::Wiring => "WIRING_ERROR",
            Self::Generation => "GENERATION_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::Store => "STORE_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Convenient result type alias.
pub type SymwireResult<T> = Result<T, SymwireError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    /// Wrap the error as an internal error with a message prefix.
    fn context(self, msg: impl Into<String>) -> SymwireResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> SymwireResult<T> {
        self.map_err(|e| SymwireError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
