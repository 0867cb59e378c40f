//! # Invoice Commands
//!
//! Starting an invoice, submitting it, and moving on to the next customer.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    submit_invoice                                       │
//! │                                                                         │
//! │  1. prepare_submission()  (lock held)                                   │
//! │     └── empty ledger? ─── EMPTY_INVOICE, nothing touches storage        │
//! │                                                                         │
//! │  2. persist_invoice()     (lock released)                               │
//! │     └── write fails? ──── STORAGE_ERROR, session stays Building         │
//! │                                                                         │
//! │  3. mark_submitted()      (lock held)                                   │
//! │     └── Building ──► Submitted                                          │
//! │                                                                         │
//! │  4. "Invoice INV-20241016-003 submitted successfully!"                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, Timelike};
use serde::Serialize;
use tracing::{debug, info};

use mart_core::{InvoiceDetails, SessionPhase};

use crate::commands::ledger::InvoiceView;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub invoice_id: String,
    pub rows_written: usize,
    pub invoice_total_cents: i64,
    pub message: String,
    pub invoice: InvoiceView,
}

/// Form fields for a new customer: defaults plus the current date and time.
pub fn fresh_details() -> InvoiceDetails {
    let now = Local::now().naive_local();
    let time = now.time().with_nanosecond(0).unwrap_or(now.time());
    InvoiceDetails::new(now.date(), time)
}

/// Assigns the first invoice ID of the session.
///
/// Does nothing if the session already has an ID, so it is safe to call
/// on every startup path.
pub async fn start_invoice(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
) -> Result<InvoiceView, ApiError> {
    debug!("start_invoice command");

    if session.with_session(|s| s.phase()) == SessionPhase::Empty {
        let invoice_id = db.inner().invoices().generate_invoice_id().await?;
        session.with_session_mut(|s| s.begin(invoice_id.as_str()))?;
        info!(invoice_id = %invoice_id, "Invoice started");
    }

    Ok(session.with_session(|s| InvoiceView::from_session(s, config.tax_rate()))?)
}

/// Persists the invoice: one `sales` row per product line.
///
/// ## Behavior
/// - Empty ledger: rejected before any storage call
/// - Storage failure: reported, session unchanged (still Building)
/// - Success: session becomes Submitted and the ledger is frozen
pub async fn submit_invoice(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
) -> Result<SubmitResponse, ApiError> {
    debug!("submit_invoice command");

    let rate = config.tax_rate();
    let submission = session.with_session(|s| s.prepare_submission())?;
    let invoice_id = submission.header.invoice_id.clone();

    let rows_written = db
        .inner()
        .sales()
        .persist_invoice(&submission.header, &submission.entries, rate)
        .await?;

    let invoice = session.with_session_mut(|s| -> Result<InvoiceView, ApiError> {
        s.mark_submitted()?;
        Ok(InvoiceView::from_session(s, rate)?)
    })?;

    info!(
        invoice_id = %invoice_id,
        rows = rows_written,
        total_cents = invoice.invoice_total_cents,
        "Invoice submitted"
    );

    Ok(SubmitResponse {
        message: format!("Invoice {} submitted successfully!", invoice_id),
        invoice_total_cents: invoice.invoice_total_cents,
        invoice_id,
        rows_written,
        invoice,
    })
}

/// Resets the form for the next customer with a freshly generated ID.
///
/// ## Behavior
/// - `Submitted`: clears the ledger and form, takes a new ID
/// - `Empty`: the first ID was never assigned (storage was down at
///   startup), so this retries [`start_invoice`]
/// - `Building`: rejected before the generator runs, so nothing is reserved
pub async fn next_customer(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
) -> Result<InvoiceView, ApiError> {
    debug!("next_customer command");

    let phase = session.with_session(|s| s.phase());
    if phase == SessionPhase::Empty {
        info!("No invoice ID yet, retrying assignment");
        return start_invoice(db, session, config).await;
    }
    if phase != SessionPhase::Submitted {
        return Err(mart_core::CoreError::InvalidSessionState {
            phase: phase.to_string(),
            action: "start the next customer".to_string(),
        }
        .into());
    }

    let invoice_id = db.inner().invoices().generate_invoice_id().await?;
    let view = session.with_session_mut(|s| -> Result<InvoiceView, ApiError> {
        s.start_next(invoice_id.as_str(), fresh_details())?;
        Ok(InvoiceView::from_session(s, config.tax_rate())?)
    })?;

    info!(invoice_id = %invoice_id, "Next customer");
    Ok(view)
}

// =============================================================================
// Unit Tests
// =============================================================================
