//! # Error Types
//!
//! The domain error taxonomy for the ledger engine.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── DomainError      - Expected, typed business outcomes              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures (internal)         │
//! │                                                                         │
//! │  tally-service errors                                                  │
//! │  └── ServiceError     - Domain(DomainError) | Storage(DbError)         │
//! │                                                                         │
//! │  The boundary layer passes Domain errors through verbatim and          │
//! │  logs-and-masks Storage errors.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (resource, id, quantities)
//! 3. Errors are enum variants, never String
//! 4. Every domain kind carries a suggested external status for the
//!    (excluded) HTTP layer - the core itself never interprets it

use thiserror::Error;

// =============================================================================
// Domain Error
// =============================================================================

/// The closed set of expected, recoverable-by-caller outcomes.
///
/// Anything not representable here (connectivity loss, serialization fault)
/// is by definition an internal error and stays a separate type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An entity id plus the tenant filter yielded no match.
    ///
    /// ## When This Occurs
    /// - The id does not exist
    /// - The entity belongs to a different tenant (never distinguishable)
    /// - The id is malformed (treated identically to a genuine miss)
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Input failed a schema or business rule check.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A sell requested more units than are available.
    ///
    /// ## User Workflow
    /// ```text
    /// Sell (qty: 11)
    ///      │
    ///      ▼
    /// Check stock: available=10
    ///      │
    ///      ▼
    /// InsufficientStock { available: 10, requested: 11 }
    ///      │
    ///      ▼
    /// Caller shows: "Only 10 in stock"
    /// ```
    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    /// A storage mutation that should have matched affected no rows.
    ///
    /// ## When This Occurs
    /// The one observable race in the sell protocol: a concurrent sale
    /// decremented stock between the read and the conditional update.
    /// The operation fails safely instead of overselling or retrying.
    #[error("{operation} failed: {reason}")]
    OperationFailed {
        operation: &'static str,
        reason: &'static str,
    },

    /// Generic invariant violation not covered by the kinds above.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),
}

impl DomainError {
    /// Creates a NotFound error for a given resource type and id.
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Suggested external status code for the boundary layer.
    ///
    /// Only meaningful to the (excluded) HTTP layer; nothing in the core
    /// branches on it.
    pub fn status_hint(&self) -> u16 {
        match self {
            DomainError::NotFound { .. } => 404,
            DomainError::Validation(_) => 400,
            DomainError::InsufficientStock { .. } => 400,
            DomainError::OperationFailed { .. } => 500,
            DomainError::BusinessRule(_) => 422,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The primary contract surfaces the first violated field; whole-form
/// validators additionally collect every [`Violation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Invalid format (e.g., invalid identifier, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    /// The field this error is attached to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }

    /// Machine-readable code for programmatic consumers.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Required { .. } => "required",
            ValidationError::TooShort { .. } => "too_short",
            ValidationError::TooLong { .. } => "too_long",
            ValidationError::OutOfRange { .. } => "out_of_range",
            ValidationError::MustBePositive { .. } => "must_be_positive",
            ValidationError::InvalidFormat { .. } => "invalid_format",
        }
    }

    /// Converts into the reportable form used for full-form feedback.
    pub fn to_violation(&self) -> Violation {
        Violation {
            field: self.field(),
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// One field violation, in the shape full-form reporting wants:
/// field name, machine code, human message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    pub field: &'static str,
    pub code: &'static str,
    pub message: String,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with DomainError.
pub type DomainResult<T> = Result<T, DomainError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DomainError::InsufficientStock {
            available: 10,
            requested: 11,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock: available 10, requested 11"
        );

        let err = DomainError::not_found("Product", "abc");
        assert_eq!(err.to_string(), "Product not found: abc");
    }

    #[test]
    fn test_status_hints() {
        assert_eq!(DomainError::not_found("Product", "x").status_hint(), 404);
        assert_eq!(
            DomainError::InsufficientStock {
                available: 1,
                requested: 2
            }
            .status_hint(),
            400
        );
        assert_eq!(
            DomainError::OperationFailed {
                operation: "Sell product",
                reason: "Stock update failed"
            }
            .status_hint(),
            500
        );
    }

    #[test]
    fn test_validation_converts_to_domain_error() {
        let validation_err = ValidationError::Required { field: "name" };
        let domain_err: DomainError = validation_err.into();
        assert!(matches!(domain_err, DomainError::Validation(_)));
        assert_eq!(domain_err.status_hint(), 400);
    }

    #[test]
    fn test_violation_shape() {
        let err = ValidationError::TooShort {
            field: "name",
            min: 2,
        };
        let v = err.to_violation();
        assert_eq!(v.field, "name");
        assert_eq!(v.code, "too_short");
        assert_eq!(v.message, "name must be at least 2 characters");
    }
}
