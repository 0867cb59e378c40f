//! # State Module
//!
//! Manages application state for the entry form.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct containing everything, the form
//! holds separate state types so each command declares exactly what it
//! touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Form loop                                  │   │
//! │  │  Form::new(db_state, session_state, config_state, output)       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │   DbState    │  │ SessionState │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Database    │  │  Arc<Mutex<  │  │  store_name      │              │
//! │  │  (SQLite     │  │    Session   │  │  currency_symbol │              │
//! │  │   pool)      │  │  >>          │  │  tax_rate_bps    │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • SessionState: Protected by Arc<Mutex<T>>, never held across .await  │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod session;

pub use config::ConfigState;
pub use db::DbState;
pub use session::SessionState;
