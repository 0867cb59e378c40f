//! # Storage Errors
//!
//! ```text
//! sqlx::Error ───────┐
//! MigrateError ──────┼──► DbError ──► ApiError (mart-entry)
//! CoreError ─────────┘        │
//!                             ├── StorageUnavailable   generator, pool, open
//!                             └── WriteFailed          persister, rolled back
//! ```
//!
//! The invoice ID generator reports every failure as `StorageUnavailable`;
//! the persister reports every failure as `WriteFailed` naming the invoice.

use mart_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The database could not be opened, reached or read.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// No row of the invoice was stored.
    #[error("Failed to save invoice {invoice_id}: {cause}")]
    WriteFailed { invoice_id: String, cause: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Rows could not be derived from the invoice (empty, zero total).
    #[error(transparent)]
    Pricing(#[from] CoreError),

    /// A stored row did not decode back into its domain type.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        DbError::StorageUnavailable(err.to_string())
    }

    pub fn write_failed(invoice_id: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        DbError::WriteFailed {
            invoice_id: invoice_id.into(),
            cause: cause.to_string(),
        }
    }
}

/// Connection-level failures become `StorageUnavailable`; a statement
/// rejected by SQLite (constraint, syntax) becomes `QueryFailed`.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "row".to_string(),
                id: "(query)".to_string(),
            },
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DbError::StorageUnavailable(err.to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
