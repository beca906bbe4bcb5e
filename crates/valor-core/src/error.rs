//! # Error Types
//!
//! Domain-specific error types for valor-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError                                                  ErrorKind   │
//! │  ├── Validation(ValidationError)   bad input at construction  Invalid   │
//! │  ├── CurrencyMismatch              Money ⊕ Money              Domain    │
//! │  ├── UnitMismatch                  Quantity ⊕ Quantity        Domain    │
//! │  ├── PrecisionMismatch             Quantity ⊕ Quantity        Domain    │
//! │  └── Overflow                      i64 arithmetic overflow    Internal  │
//! │                                                                         │
//! │  Callers branch on `kind()`, and read `context()` for diagnostics.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending input in the error (code, symbol, value)
//! 3. Errors are enum variants, never String
//! 4. Errors are returned, never logged by this crate

use thiserror::Error;

use crate::currency::Currency;

// =============================================================================
// Error Kind
// =============================================================================

/// Machine-readable failure category.
///
/// `Conflict` is never produced by this crate; it exists so callers can map
/// every error in their system onto the same four kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range input detected at construction/parsing.
    Invalid,
    /// Two individually valid values that cannot be combined.
    DomainViolation,
    /// State conflict (reserved for callers).
    Conflict,
    /// Unexpected failure such as arithmetic overflow.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Invalid => write!(f, "invalid"),
            ErrorKind::DomainViolation => write!(f, "domain_violation"),
            ErrorKind::Conflict => write!(f, "conflict"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors produced by value-object construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Input failed validation (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Two Money values with different currencies were combined or compared.
    ///
    /// ## When This Occurs
    /// - `add` / `subtract` across currencies
    /// - `greater_than` / `less_than` across currencies
    /// - a fixed discount applied to a price in another currency
    #[error("Currency mismatch in {operation}: {left} vs {right}")]
    CurrencyMismatch {
        operation: &'static str,
        left: Currency,
        right: Currency,
    },

    /// Two Quantity values with different units were combined.
    #[error("Unit mismatch in {operation}: {left} vs {right}")]
    UnitMismatch {
        operation: &'static str,
        left: String,
        right: String,
    },

    /// Two Quantity values with the same unit but different precision were combined.
    #[error("Precision mismatch in {operation}: {left} vs {right}")]
    PrecisionMismatch {
        operation: &'static str,
        left: u32,
        right: u32,
    },

    /// Fixed-point arithmetic left the i64 range.
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },
}

impl CoreError {
    /// Returns the machine-readable category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Invalid,
            CoreError::CurrencyMismatch { .. }
            | CoreError::UnitMismatch { .. }
            | CoreError::PrecisionMismatch { .. } => ErrorKind::DomainViolation,
            CoreError::Overflow { .. } => ErrorKind::Internal,
        }
    }

    /// Returns key/value pairs describing the failure.
    pub fn context(&self) -> Vec<(&'static str, String)> {
        match self {
            CoreError::Validation(err) => err.context(),
            CoreError::CurrencyMismatch {
                operation,
                left,
                right,
            } => vec![
                ("operation", operation.to_string()),
                ("left_currency", left.to_string()),
                ("right_currency", right.to_string()),
            ],
            CoreError::UnitMismatch {
                operation,
                left,
                right,
            } => vec![
                ("operation", operation.to_string()),
                ("left_unit", left.clone()),
                ("right_unit", right.clone()),
            ],
            CoreError::PrecisionMismatch {
                operation,
                left,
                right,
            } => vec![
                ("operation", operation.to_string()),
                ("left_precision", left.to_string()),
                ("right_precision", right.to_string()),
            ],
            CoreError::Overflow { operation } => vec![("operation", operation.to_string())],
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant is reported as [`ErrorKind::Invalid`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value is not in the allowed set (e.g. unknown currency code).
    #[error("{field} '{value}' must be one of: {allowed:?}")]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    /// Symbol is not present in the registry at the time of use.
    #[error("{field} '{value}' is not registered")]
    NotRegistered { field: String, value: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: String, value: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    /// Invalid format (e.g. NaN, malformed payload).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns key/value pairs describing the failure.
    pub fn context(&self) -> Vec<(&'static str, String)> {
        match self {
            ValidationError::Required { field } => vec![("field", field.clone())],
            ValidationError::NotAllowed { field, value, .. }
            | ValidationError::NotRegistered { field, value }
            | ValidationError::Negative { field, value }
            | ValidationError::MustBePositive { field, value } => {
                vec![("field", field.clone()), ("value", value.clone())]
            }
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => vec![
                ("field", field.clone()),
                ("value", value.clone()),
                ("min", min.clone()),
                ("max", max.clone()),
            ],
            ValidationError::InvalidFormat { field, reason } => {
                vec![("field", field.clone()), ("reason", reason.clone())]
            }
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
