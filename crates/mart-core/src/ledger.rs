//! # Product Line Ledger
//!
//! The ordered, mutable list of product lines for the invoice being built.
//!
//! ## Ledger Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  Form Action              Ledger Call            Effect                 │
//! │  ───────────              ───────────            ──────                 │
//! │                                                                         │
//! │  "Add Product" ─────────► add(entry) ──────────► push to the end        │
//! │                                                                         │
//! │  "Delete" on row n ─────► remove(n) ───────────► rows after n shift     │
//! │                                                  down by one            │
//! │                                                                         │
//! │  Next customer ─────────► clear() ─────────────► empty                  │
//! │                                                                         │
//! │  Render / submit ───────► snapshot() ──────────► owned copy to iterate  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Positions Are Not Identifiers
//! A position is only valid for the view it was rendered from. After a
//! removal every later entry moves down one slot, and a new entry always goes
//! to the end, never into a freed slot.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::ProductLineEntry;

/// The in-progress list of product lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLineLedger {
    entries: Vec<ProductLineEntry>,
}

impl ProductLineLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        ProductLineLedger {
            entries: Vec::new(),
        }
    }

    /// Appends an entry and returns its position.
    pub fn add(&mut self, entry: ProductLineEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Removes the entry at `index` and returns it.
    ///
    /// ## Errors
    /// `LedgerIndexOutOfRange` when `index >= len()`; the ledger is unchanged.
    pub fn remove(&mut self, index: usize) -> CoreResult<ProductLineEntry> {
        if index >= self.entries.len() {
            return Err(CoreError::LedgerIndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Empties the ledger.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Borrowed view of the entries, in order.
    pub fn entries(&self) -> &[ProductLineEntry] {
        &self.entries
    }

    /// Owned copy of the entries.
    ///
    /// Callers that render delete actions or expand rows iterate this copy,
    /// so a removal triggered mid-iteration cannot skip or revisit entries.
    pub fn snapshot(&self) -> Vec<ProductLineEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
