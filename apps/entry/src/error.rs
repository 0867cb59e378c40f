//! # API Error Type
//!
//! Unified error type for entry commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Mart Sales Entry                       │
//! │                                                                         │
//! │  Clerk types: add 0 3 Food and beverages                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── DbError::StorageUnavailable ───┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Input Error? ─── ValidationError::MustBePositive ─ ApiError ──►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Text:  [INVALID_INPUT] unit price must be positive                    │
//! │  JSON:  {"kind":"error","code":"INVALID_INPUT","message":"…"}          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use mart_core::{CoreError, ValidationError};
use mart_db::DbError;

/// Error returned from entry commands and shown on the form.
///
/// ## Serialization
/// ```json
/// {
///   "code": "STORAGE_UNAVAILABLE",
///   "message": "Storage is unavailable: pool timed out"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{}] {}", .code.as_str(), .message)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for form responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Database could not be reached or read
    StorageUnavailable,

    /// Invoice write failed and was rolled back
    StorageError,

    /// A product line totals zero
    InvalidLineTotal,

    /// Bad price, quantity, rating, date, label or command
    InvalidInput,

    /// Action not allowed in the current session phase
    SessionState,

    /// Submit with no product lines
    EmptyInvoice,

    /// Resource not found
    NotFound,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::StorageUnavailable => "STORAGE_UNAVAILABLE",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InvalidLineTotal => "INVALID_LINE_TOTAL",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::SessionState => "SESSION_STATE",
            ErrorCode::EmptyInvoice => "EMPTY_INVOICE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates an input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::StorageUnavailable(e) => {
                tracing::error!("Storage unavailable: {}", e);
                ApiError::new(
                    ErrorCode::StorageUnavailable,
                    format!("Storage is unavailable: {}", e),
                )
            }
            DbError::WriteFailed { invoice_id, cause } => {
                tracing::error!(invoice_id = %invoice_id, "Invoice write failed: {}", cause);
                ApiError::new(
                    ErrorCode::StorageError,
                    format!("Could not save invoice {}: {}", invoice_id, cause),
                )
            }
            DbError::NotFound { entity, id } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database operation failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Database migration failed")
            }
            DbError::Pricing(e) => ApiError::from(e),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::internal("Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidLineTotal { .. } => {
                ApiError::new(ErrorCode::InvalidLineTotal, err.to_string())
            }
            CoreError::EmptyInvoice { .. } => ApiError::new(
                ErrorCode::EmptyInvoice,
                "Add at least one product line before submitting",
            ),
            CoreError::InvalidSessionState { .. } => {
                ApiError::new(ErrorCode::SessionState, err.to_string())
            }
            // Positions are shown 1-based on the form.
            CoreError::LedgerIndexOutOfRange { index, len } => ApiError::invalid_input(format!(
                "No product line #{} (invoice has {})",
                index + 1,
                len
            )),
            CoreError::AmountOverflow { .. } => ApiError::invalid_input(err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::invalid_input(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
