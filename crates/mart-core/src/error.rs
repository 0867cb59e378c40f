//! # Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Where each error is raised                                             │
//! │                                                                         │
//! │  typed input ──► validation.rs / FromStr ──► ValidationError            │
//! │                                                   │ #[from]             │
//! │  ledger, pricing, session rules ──────────► CoreError                   │
//! │                                                   │ #[from]             │
//! │  mart-db ─────────────────────────────────► DbError::Pricing            │
//! │                                                   │                     │
//! │  mart-entry ──────────────────────────────► ApiError { code, message }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Variants carry the index, phase or field involved so the form can say
//! what went wrong without reformatting.

use thiserror::Error;

/// Ledger, pricing and session rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Gross margin divides by the line total. Unreachable through the form,
    /// which rejects non-positive prices and quantities first.
    #[error("Line total for {product_line} is zero; gross margin is undefined")]
    InvalidLineTotal { product_line: String },

    #[error("Invoice {invoice_id} has no product lines")]
    EmptyInvoice { invoice_id: String },

    /// `action` reads as a verb phrase: "add a product line", "submit".
    #[error("Cannot {action} while session is {phase}")]
    InvalidSessionState { phase: String, action: String },

    /// `index` is 0-based.
    #[error("No product line at position {index} (ledger has {len})")]
    LedgerIndexOutOfRange { index: usize, len: usize },

    /// An amount left the range of `Money`. Only reachable by bypassing
    /// the price and quantity bounds, or with an absurd number of lines.
    #[error("{what} is too large to record")]
    AmountOverflow { what: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// A typed value rejected at the input boundary.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Picker value outside its label set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

pub type CoreResult<T> = Result<T, CoreError>;
