//! # Mart Sales Entry
//!
//! Terminal entry point for the sales invoice form.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        mart-entry                                       │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Terminal                                    │  │
//! │  │  • set city Mandalay        • add 25.99 2 Food and beverages     │  │
//! │  │  • submit                   • next                               │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Parses flags, hands off to lib.rs                │  │
//! │  │  lib.rs ─────► Sets up logging, database, state, form loop      │  │
//! │  │  commands/ ──► add_line, submit_invoice, next_customer, ...     │  │
//! │  │  state/ ─────► DbState, SessionState, ConfigState               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  sales.db (local file, WAL mode)                                 │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use mart_entry::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match mart_entry::run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mart-entry: {}", e);
            ExitCode::FAILURE
        }
    }
}
