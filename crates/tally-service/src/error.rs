//! # Service Error Types
//!
//! The service layer surfaces exactly two kinds of failure:
//!
//! - [`ServiceError::Domain`] - a business outcome (not found, validation,
//!   insufficient stock, ...). Safe to show to callers verbatim; carries a
//!   `status_hint()` for whatever boundary sits on top.
//! - [`ServiceError::Storage`] - infrastructure failed. The boundary should
//!   log the detail and mask it; it never encodes a business rule.
//!
//! Repositories report misses as `Ok(None)` / `Ok(false)`, so turning a miss
//! into `DomainError::NotFound` happens here, in the service.

use thiserror::Error;

use tally_core::DomainError;
use tally_db::DbError;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A domain outcome: the request was understood and rejected.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage infrastructure failed.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

impl ServiceError {
    /// Suggested status code for a boundary layer.
    ///
    /// Storage faults always map to the 500 range; domain errors delegate
    /// to [`DomainError::status_hint`].
    pub fn status_hint(&self) -> u16 {
        match self {
            ServiceError::Domain(err) => err.status_hint(),
            ServiceError::Storage(_) => 500,
        }
    }

    /// True when this is a domain outcome rather than an internal fault.
    pub fn is_domain(&self) -> bool {
        matches!(self, ServiceError::Domain(_))
    }

    /// Shorthand for a NotFound domain error.
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        ServiceError::Domain(DomainError::not_found(resource, id))
    }
}

// ValidationError arrives via DomainError's #[from]; this keeps `?` working
// directly on validation calls inside services.
impl From<tally_core::ValidationError> for ServiceError {
    fn from(err: tally_core::ValidationError) -> Self {
        ServiceError::Domain(DomainError::Validation(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_their_hint() {
        let err = ServiceError::not_found("Product", "abc");
        assert!(err.is_domain());
        assert_eq!(err.status_hint(), 404);
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let err = ServiceError::Storage(DbError::PoolExhausted);
        assert!(!err.is_domain());
        assert_eq!(err.status_hint(), 500);
    }

    #[test]
    fn test_validation_converts_through() {
        let err: ServiceError = tally_core::ValidationError::Required { field: "name" }.into();
        assert_eq!(err.status_hint(), 400);
    }
}
