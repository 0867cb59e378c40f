//! # Entry Session
//!
//! One clerk's in-progress invoice: the invoice ID, the form fields and the
//! product line ledger, guarded by a small state machine.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌───────┐  begin(id)   ┌──────────┐  mark_submitted()  ┌───────────┐  │
//! │   │ Empty │ ───────────► │ Building │ ─────────────────► │ Submitted │  │
//! │   └───────┘              └──────────┘                    └───────────┘  │
//! │                            ▲   │ add_line / remove_line        │        │
//! │                            │   └──────────┐                    │        │
//! │                            │              ▼                    │        │
//! │                            │        (ledger mutates)           │        │
//! │                            │                                   │        │
//! │                            └────────── start_next(id) ─────────┘        │
//! │                                   (ledger cleared, new ID)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two-Phase Submit
//! `prepare_submission()` checks the ledger and hands back an owned
//! [`InvoiceSubmission`] without changing state. The caller persists it and
//! only then calls `mark_submitted()`. A storage failure in between leaves
//! the session in `Building` with every line intact.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::ledger::ProductLineLedger;
use crate::pricing::{calculate_totals, InvoiceTotals};
use crate::types::{InvoiceDetails, InvoiceHeader, ProductLineEntry, TaxRate};
use crate::validation::validate_entry;

/// Worst case `validate_tax_rate_bps` allows.
const MAX_TAX_RATE: TaxRate = TaxRate::from_bps(10_000);

// =============================================================================
// Session Phase
// =============================================================================

/// Where the session is in the per-customer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No invoice ID yet.
    Empty,
    /// Ledger is open for edits.
    Building,
    /// Invoice persisted; ledger frozen.
    Submitted,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Empty => "empty",
            SessionPhase::Building => "building",
            SessionPhase::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Invoice Submission
// =============================================================================

/// Owned snapshot of an invoice ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSubmission {
    pub header: InvoiceHeader,
    pub entries: Vec<ProductLineEntry>,
}

// =============================================================================
// Session
// =============================================================================

/// A single clerk's entry session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    phase: SessionPhase,
    invoice_id: Option<String>,
    details: InvoiceDetails,
    ledger: ProductLineLedger,
}

impl Session {
    /// Creates a session in `Empty` with the given form fields.
    pub fn new(details: InvoiceDetails) -> Self {
        Session {
            phase: SessionPhase::Empty,
            invoice_id: None,
            details,
            ledger: ProductLineLedger::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn invoice_id(&self) -> Option<&str> {
        self.invoice_id.as_deref()
    }

    pub fn details(&self) -> &InvoiceDetails {
        &self.details
    }

    pub fn ledger(&self) -> &ProductLineLedger {
        &self.ledger
    }

    /// Totals for the current ledger.
    pub fn totals(&self, rate: TaxRate) -> CoreResult<InvoiceTotals> {
        calculate_totals(&self.ledger, rate)
    }

    /// Takes the first generated invoice ID. `Empty` → `Building`.
    pub fn begin(&mut self, invoice_id: impl Into<String>) -> CoreResult<()> {
        self.require(SessionPhase::Empty, "begin an invoice")?;
        self.invoice_id = Some(invoice_id.into());
        self.phase = SessionPhase::Building;
        Ok(())
    }

    /// Mutable access to the form fields.
    ///
    /// Allowed until the invoice is submitted.
    pub fn details_mut(&mut self) -> CoreResult<&mut InvoiceDetails> {
        if self.phase == SessionPhase::Submitted {
            return Err(self.illegal("edit the invoice"));
        }
        Ok(&mut self.details)
    }

    /// Validates and appends a product line. Returns its position.
    ///
    /// The ledger is priced with the entry at a 100% rate first, so an
    /// accepted line can always be totalled at any configurable rate.
    pub fn add_line(&mut self, entry: ProductLineEntry) -> CoreResult<usize> {
        self.require(SessionPhase::Building, "add a product line")?;
        validate_entry(&entry)?;

        let mut trial = self.ledger.clone();
        trial.add(entry.clone());
        calculate_totals(&trial, MAX_TAX_RATE)?;

        Ok(self.ledger.add(entry))
    }

    /// Removes the product line at `index`.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<ProductLineEntry> {
        self.require(SessionPhase::Building, "delete a product line")?;
        self.ledger.remove(index)
    }

    /// Snapshots the invoice for persistence. State is unchanged.
    ///
    /// ## Errors
    /// - `InvalidSessionState` unless `Building`
    /// - `EmptyInvoice` when the ledger has no lines
    pub fn prepare_submission(&self) -> CoreResult<InvoiceSubmission> {
        self.require(SessionPhase::Building, "submit")?;
        let invoice_id = self.current_id()?;

        if self.ledger.is_empty() {
            return Err(CoreError::EmptyInvoice { invoice_id });
        }

        Ok(InvoiceSubmission {
            header: InvoiceHeader::new(invoice_id, self.details.clone()),
            entries: self.ledger.snapshot(),
        })
    }

    /// Records that persistence succeeded. `Building` → `Submitted`.
    pub fn mark_submitted(&mut self) -> CoreResult<()> {
        self.require(SessionPhase::Building, "mark submitted")?;
        if self.ledger.is_empty() {
            return Err(CoreError::EmptyInvoice {
                invoice_id: self.current_id()?,
            });
        }
        self.phase = SessionPhase::Submitted;
        Ok(())
    }

    /// Resets for the next customer. `Submitted` → `Building`.
    ///
    /// Clears the ledger, takes the freshly generated ID and a fresh set of
    /// form fields.
    pub fn start_next(
        &mut self,
        invoice_id: impl Into<String>,
        details: InvoiceDetails,
    ) -> CoreResult<()> {
        self.require(SessionPhase::Submitted, "start the next customer")?;
        self.ledger.clear();
        self.details = details;
        self.invoice_id = Some(invoice_id.into());
        self.phase = SessionPhase::Building;
        Ok(())
    }

    fn require(&self, phase: SessionPhase, action: &str) -> CoreResult<()> {
        if self.phase != phase {
            return Err(self.illegal(action));
        }
        Ok(())
    }

    fn illegal(&self, action: &str) -> CoreError {
        CoreError::InvalidSessionState {
            phase: self.phase.to_string(),
            action: action.to_string(),
        }
    }

    fn current_id(&self) -> CoreResult<String> {
        self.invoice_id
            .clone()
            .ok_or_else(|| self.illegal("submit without an invoice ID"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{City, ProductLine};
    use crate::DEFAULT_TAX_RATE;
    use chrono::{NaiveDate, NaiveTime};

    fn details() -> InvoiceDetails {
        InvoiceDetails::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        )
    }

    fn entry(cents: i64, qty: i64) -> ProductLineEntry {
        ProductLineEntry::new(ProductLine::FoodAndBeverages, Money::from_cents(cents), qty)
    }

    fn building() -> Session {
        let mut session = Session::new(details());
        session.begin("INV-20240101-001").unwrap();
        session
    }

    #[test]
    fn test_begin_moves_to_building() {
        let mut session = Session::new(details());
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert_eq!(session.invoice_id(), None);

        session.begin("INV-20240101-001").unwrap();
        assert_eq!(session.phase(), SessionPhase::Building);
        assert_eq!(session.invoice_id(), Some("INV-20240101-001"));

        let err = session.begin("INV-20240101-002").unwrap_err();
        assert!(matches!(err, CoreError::InvalidSessionState { .. }));
    }

    #[test]
    fn test_lines_require_building() {
        let mut session = Session::new(details());
        let err = session.add_line(entry(100, 1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot add a product line while session is empty"
        );
    }

    #[test]
    fn test_add_line_validates_input() {
        let mut session = building();
        assert!(matches!(
            session.add_line(entry(0, 1)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            session.add_line(entry(100, 0)),
            Err(CoreError::Validation(_))
        ));
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_oversized_line_is_refused_without_touching_the_ledger() {
        let mut session = building();

        let err = session.add_line(entry(9_999_999_999_999_900, 9_999)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(session.ledger().is_empty());

        // The largest line the form accepts still totals at a 100% rate.
        session
            .add_line(entry(crate::MAX_UNIT_PRICE.cents(), crate::MAX_LINE_QUANTITY))
            .unwrap();
        let totals = session.totals(TaxRate::from_bps(10_000)).unwrap();
        assert_eq!(totals.invoice_total.cents(), 2 * 9_999_000_000_000);
    }

    #[test]
    fn test_empty_submission_is_rejected() {
        let session = building();
        let err = session.prepare_submission().unwrap_err();
        assert!(matches!(err, CoreError::EmptyInvoice { .. }));
        assert_eq!(session.phase(), SessionPhase::Building);
    }

    #[test]
    fn test_full_cycle() {
        let mut session = building();
        session.details_mut().unwrap().city = City::Naypyitaw;
        session.add_line(entry(10_000, 3)).unwrap();
        session.add_line(entry(500, 2)).unwrap();
        session.remove_line(1).unwrap();

        assert_eq!(
            session.totals(DEFAULT_TAX_RATE).unwrap().invoice_total.cents(),
            31_500
        );

        let submission = session.prepare_submission().unwrap();
        assert_eq!(submission.header.invoice_id, "INV-20240101-001");
        assert_eq!(submission.header.details.city, City::Naypyitaw);
        assert_eq!(submission.entries.len(), 1);

        session.mark_submitted().unwrap();
        assert_eq!(session.phase(), SessionPhase::Submitted);

        // Frozen after submit.
        assert!(session.add_line(entry(100, 1)).is_err());
        assert!(session.remove_line(0).is_err());
        assert!(session.details_mut().is_err());
        assert!(session.prepare_submission().is_err());

        session.start_next("INV-20240101-002", details()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Building);
        assert_eq!(session.invoice_id(), Some("INV-20240101-002"));
        assert!(session.ledger().is_empty());
        assert_eq!(session.details().city, City::Yangon);
    }

    #[test]
    fn test_failed_persist_leaves_session_building() {
        let mut session = building();
        session.add_line(entry(10_000, 3)).unwrap();

        // Caller prepares, storage fails, mark_submitted is never called.
        let _submission = session.prepare_submission().unwrap();

        assert_eq!(session.phase(), SessionPhase::Building);
        assert_eq!(session.ledger().len(), 1);
        assert!(session.prepare_submission().is_ok());
    }

    #[test]
    fn test_start_next_requires_submitted() {
        let mut session = building();
        session.add_line(entry(100, 1)).unwrap();

        let err = session
            .start_next("INV-20240101-002", details())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSessionState { .. }));
        assert_eq!(session.ledger().len(), 1);
    }
}
