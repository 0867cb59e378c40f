//! # mart-core: Pure Business Logic for Mart Sales Entry
//!
//! This crate is the **heart** of the sales entry system. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mart Sales Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Entry Form (terminal)                        │   │
//! │  │    Header fields ──► Add lines ──► Review totals ──► Submit     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Entry Commands                               │   │
//! │  │    add_line, delete_line, submit_invoice, next_customer         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mart-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │ ledger  │ │ pricing  │ │session │  │   │
//! │  │   │  City   │ │  Money  │ │ entries │ │ tax/cogs │ │ states │  │   │
//! │  │   │ Invoice │ │ TaxRate │ │ add/rm  │ │ margin   │ │ reset  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mart-db (Database Layer)                     │   │
//! │  │          SQLite `sales` table, invoice ID sequence              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (City, Branch, InvoiceHeader, PersistedSaleRow, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - The in-progress list of product lines
//! - [`pricing`] - Tax, totals, cogs and gross margin
//! - [`invoice_id`] - `INV-YYYYMMDD-NNN` formatting and sequencing
//! - [`session`] - Per-customer state machine
//! - [`validation`] - Input boundary checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use mart_core::ledger::ProductLineLedger;
//! use mart_core::money::Money;
//! use mart_core::pricing::calculate_totals;
//! use mart_core::types::{ProductLine, ProductLineEntry};
//! use mart_core::DEFAULT_TAX_RATE;
//!
//! let mut ledger = ProductLineLedger::new();
//! ledger.add(ProductLineEntry::new(
//!     ProductLine::FoodAndBeverages,
//!     Money::from_cents(10_000),
//!     3,
//! ));
//!
//! let totals = calculate_totals(&ledger, DEFAULT_TAX_RATE).unwrap();
//! assert_eq!(totals.invoice_total.cents(), 31_500); // 315.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice_id;
pub mod ledger;
pub mod money;
pub mod pricing;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::ProductLineLedger;
pub use money::Money;
pub use session::{InvoiceSubmission, Session, SessionPhase};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied to every product line (5%).
///
/// ## Why a constant?
/// Every row in the `sales` table carries a `Tax 5%` column. The app can
/// override the rate from configuration, but the stored column keeps its name.
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(500);

/// Lowest rating the form accepts.
pub const MIN_RATING: u8 = 1;

/// Highest rating the form accepts.
pub const MAX_RATING: u8 = 10;

/// Rating preselected on a fresh form.
pub const DEFAULT_RATING: u8 = 5;

/// Highest unit price the form accepts (10,000,000.00).
///
/// Keeps `unit price × MAX_LINE_QUANTITY` and its tax far inside `i64`.
pub const MAX_UNIT_PRICE: Money = Money::from_cents(1_000_000_000);

/// Maximum quantity of a single product line.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 9_999;
