//! # Session State
//!
//! Holds the per-customer [`Session`]: the invoice ID, the header fields
//! and the product line ledger.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Operations                             │
//! │                                                                         │
//! │  Form command             Entry command           Session change        │
//! │  ────────────             ─────────────           ──────────────        │
//! │                                                                         │
//! │  (startup) ──────────────► start_invoice() ─────► begin(id)            │
//! │                                                                         │
//! │  set city Mandalay ──────► set_field() ─────────► details.city = ...   │
//! │                                                                         │
//! │  add 25.99 2 Food... ────► add_line() ──────────► ledger.add(entry)    │
//! │                                                                         │
//! │  delete 1 ───────────────► delete_line() ───────► ledger.remove(0)     │
//! │                                                                         │
//! │  submit ─────────────────► submit_invoice() ────► mark_submitted()     │
//! │                                                                         │
//! │  next ───────────────────► next_customer() ─────► start_next(id)       │
//! │                                                                         │
//! │  NOTE: The lock is released before any database call.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use mart_core::{InvoiceDetails, Session};

/// Thread-safe wrapper around the current session.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    /// Creates a session in the `Empty` phase with the given form fields.
    pub fn new(details: InvoiceDetails) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(Session::new(details))),
        }
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let phase = session_state.with_session(|s| s.phase());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().expect("Session mutex poisoned");
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// session_state.with_session_mut(|s| s.add_line(entry))?;
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().expect("Session mutex poisoned");
        f(&mut session)
    }
}
