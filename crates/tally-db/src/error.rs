//! # Database Error Types
//!
//! Error types for storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError::Storage (tally-service) ← Marked as internal            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Boundary layer logs and masks; domain errors pass through instead     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is by definition NOT part of the domain taxonomy:
//! a `DbError` reaching the caller means infrastructure failed, never that
//! a business rule was violated.

use thiserror::Error;

/// Storage operation errors.
///
/// These wrap sqlx errors and provide categorization for logging and
/// masking at the boundary.
#[derive(Debug, Error)]
pub enum DbError {
    /// A CHECK or UNIQUE constraint rejected a write.
    ///
    /// ## When This Occurs
    /// Only when the validation layer failed to catch bad input first -
    /// the schema constraints are a last line of defense, so this is
    /// always a bug upstream, not a user error.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database      → ConstraintViolation | QueryFailed
/// sqlx::Error::PoolTimedOut  → PoolExhausted
/// sqlx::Error::PoolClosed    → ConnectionFailed
/// Other                      → Internal
/// ```
///
/// Note there is no NotFound mapping: repositories express misses as
/// `Ok(None)` / `Ok(false)`, and the service layer decides what a miss
/// means. RowNotFound never escapes a repository.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "CHECK constraint failed: <table>" / "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("constraint failed") {
                    DbError::ConstraintViolation(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
