//! # Database Error Types
//!
//! Error types for storage operations, plus the receipt-creation outcome
//! taxonomy the portal layers consume.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Error Propagation                              │
//! │                                                                     │
//! │  SQLite error (sqlx::Error)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  DbError (this module)  ← adds context and categorization           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ReceiptError           ← the four outcomes create_receipt can      │
//! │       │                   have besides success                      │
//! │       ▼                                                             │
//! │  Portal renders a field message (Validation) or a generic           │
//! │  "could not create receipt, please try again" (everything else)     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use typedesk_core::ValidationError;

// =============================================================================
// DbError
// =============================================================================

/// Storage operation errors.
///
/// Wraps sqlx errors and classifies the constraint failures the writer
/// cares about (unique receipt numbers, foreign keys).
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// `field` carries the `<table>.<column>` SQLite reports, e.g.
    /// `receipts.receipt_number` when two writers raced on a number.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation (dangling branch/employee/service
    /// reference).
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed (file missing, permissions, disk full).
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

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// True when this is a unique violation on the given column.
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { field, .. } if field.contains(column))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Mapping
/// ```text
/// sqlx::Error::RowNotFound  → DbError::NotFound
/// sqlx::Error::Database     → parse message for constraint type
/// sqlx::Error::PoolTimedOut → DbError::PoolExhausted
/// other                     → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                //   "UNIQUE constraint failed: <table>.<column>"
                //   "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
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

// =============================================================================
// ReceiptError
// =============================================================================

/// Everything `ReceiptRepository::create` can return besides a receipt.
///
/// The split matters to callers:
/// - [`Validation`](ReceiptError::Validation) is the user's fault and is
///   shown as a field message; no transaction was opened.
/// - The other three are infrastructure outcomes; the whole operation was
///   rolled back and the caller shows a generic retryable error. Partial
///   success is impossible.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Missing customer name, unknown employee, or no valid line items.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No free receipt number was found within the retry bound. Transient;
    /// safe to retry the whole request.
    #[error("Could not allocate a receipt number after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    /// The atomic write failed (constraint, connection loss, timeout).
    /// Fully rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(#[source] DbError),

    /// A read (catalog, employee, uniqueness check) failed before the
    /// transaction was opened.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] DbError),
}

// =============================================================================
// Unit Tests
// =============================================================================
