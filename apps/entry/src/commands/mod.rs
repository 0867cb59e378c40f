//! # Entry Commands Module
//!
//! All commands the form loop can dispatch.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── invoice.rs  ◄─── Start, submit, next customer
//! ├── ledger.rs   ◄─── Product line add/delete, invoice view
//! ├── form.rs     ◄─── Header fields and picker options
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Entry Command Flow                                   │
//! │                                                                         │
//! │  Clerk types                                                            │
//! │  ───────────                                                            │
//! │  add 25.99 2 Food and beverages                                         │
//! │         │                                                               │
//! │         │ (FormCommand::parse)                                          │
//! │         ▼                                                               │
//! │  Rust command                                                           │
//! │  ────────────                                                           │
//! │  fn add_line(                                                           │
//! │      session: &SessionState,  ◄── Held by the form                     │
//! │      config: &ConfigState,                                              │
//! │      unit_price: &str,        ◄── From the typed line                  │
//! │      ...                                                                │
//! │  ) -> Result<InvoiceView, ApiError>                                     │
//! │         │                                                               │
//! │         │ (mutate, then render)                                         │
//! │         ▼                                                               │
//! │  Text table or one JSON object on stdout                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the session
//! fn set_field(session: &SessionState, config: &ConfigState, ...)
//!
//! // Needs the database too
//! async fn submit_invoice(db: &DbState, session: &SessionState, config: &ConfigState)
//! ```

pub mod config;
pub mod form;
pub mod invoice;
pub mod ledger;
