//! # Error Types
//!
//! Domain-specific error types for typedesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  typedesk-core errors (this file)                                   │
//! │  ├── CoreError        - business rule violations                    │
//! │  └── ValidationError  - input validation failures                   │
//! │                                                                     │
//! │  typedesk-db errors (separate crate)                                │
//! │  ├── DbError          - storage operation failures                  │
//! │  └── ReceiptError     - receipt-creation outcome taxonomy           │
//! │                                                                     │
//! │  Flow: ValidationError → ReceiptError → caller-facing message       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive macros, never manual Display impls
//! 2. Context in the message (field name, offending id)
//! 3. Errors are enum variants, never bare Strings

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A receipt exceeded the allowed number of line items.
    #[error("Receipt cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// A line quantity exceeded the allowed maximum.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements; they are
/// recoverable by re-prompting the user and never open a transaction.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A referenced entity does not exist or is inactive.
    #[error("{entity} '{id}' does not exist or is inactive")]
    UnknownReference { entity: String, id: String },

    /// A receipt ended up with no valid line items after filtering.
    #[error("customer name and at least one service are required")]
    EmptyReceipt,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1200 exceeds maximum allowed (999)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer_name".to_string(),
        };
        assert_eq!(err.to_string(), "customer_name is required");

        let err = ValidationError::EmptyReceipt;
        assert_eq!(
            err.to_string(),
            "customer name and at least one service are required"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::EmptyReceipt;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
