//! # Repository Module
//!
//! Database repository implementations for the sales database.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Entry command                                                         │
//! │       │                                                                 │
//! │       │  db.invoices().generate_invoice_id()                           │
//! │       │  db.sales().persist_invoice(&header, &entries, rate)           │
//! │       ▼                                                                 │
//! │  InvoiceIdRepository            SaleRepository                         │
//! │  ├── generate_invoice_id()      ├── persist_invoice()                  │
//! │  └── generate_invoice_id_for()  ├── rows_for_invoice()                 │
//! │                                 ├── invoice_ids_with_prefix()          │
//! │                                 └── count_rows() / count_invoices()    │
//! │       │                                                                 │
//! │       │  Bound-parameter SQL                                            │
//! │       ▼                                                                 │
//! │  SQLite: sales, invoice_sequences                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod invoice_id;
pub mod sale;

/// Converts integer cents to the REAL stored in money columns.
pub(crate) fn cents_to_real(cents: i64) -> f64 {
    cents as f64 / 100.0
}
