// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::error::ErrorCategory;

/// Root domain error type.
///
/// Raised by pure domain logic: parsing identities and versions, building
/// symbols. All errors are:
/// - Cloneable (so services can report them inside batch results)
/// - Categorizable (for the uniform error code)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Parse Errors
    // ========================================================================
    #[error("invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("invalid version constraint '{constraint}': {reason}")]
    InvalidConstraint { constraint: String, reason: String },

    #[error("invalid symbol id '{id}': {reason}")]
    InvalidSymbolId { id: String, reason: String },

    #[error("unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },

    // ========================================================================
    // Construction Errors
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("symbol '{symbol}' declares port '{port}' more than once")]
    DuplicatePort { symbol: String, port: String },

    #[error("symbol id '{given}' does not match its identity '{derived}'")]
    IdentityMismatch { given: String, derived: String },

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidVersion { .. } => vec![
                "Versions use the MAJOR.MINOR.PATCH form, e.g. 1.4.2".into(),
            ],
            Self::InvalidConstraint { .. } => vec![
                "Supported constraints: 1.2.3, ^1.2.3, ~1.2.3, >=1.2.3, <=1.2.3, >1.2.3, <1.2.3, =1.2.3, *".into(),
            ],
            Self::InvalidSymbolId { .. } => vec![
                "Symbol ids look like namespace/name@1.0.0".into(),
                "Namespaces may be nested: acme/billing/Invoice@2.1.0".into(),
            ],
            Self::UnknownValue { field, .. } => vec![format!("Check the allowed values for {field}")],
            Self::MissingRequiredField { field } => vec![format!("Provide a value for '{field}'")],
            Self::DuplicatePort { port, .. } => vec![
                format!("Rename one of the '{port}' ports"),
                "Port names must be unique within a symbol".into(),
            ],
            Self::IdentityMismatch { derived, .. } => vec![
                "Omit the id to have it derived automatically".into(),
                format!("Or use the derived id: {derived}"),
            ],
            Self::InvalidSymbol(_) => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for the uniform error code.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}
