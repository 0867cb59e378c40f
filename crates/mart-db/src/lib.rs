//! # mart-db: Database Layer for Mart Sales Entry
//!
//! This crate provides database access for the sales entry system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mart Sales Data Flow                             │
//! │                                                                         │
//! │  Entry command (submit_invoice)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     mart-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │   │   │
//! │  │   │               │    │ InvoiceIdRepo  │   │              │   │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo       │   │ 001_create_  │   │   │
//! │  │   │ WAL, busy     │    │                │   │   sales.sql  │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/sales.db  (or --db / MART_DB_PATH)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Invoice ID and sale repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mart_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/sales.db")).await?;
//!
//! let invoice_id = db.invoices().generate_invoice_id().await?;
//! let rows = db.sales().persist_invoice(&header, &entries, rate).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::invoice_id::InvoiceIdRepository;
pub use repository::sale::SaleRepository;
