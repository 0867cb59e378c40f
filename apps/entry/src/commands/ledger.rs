//! # Ledger Commands
//!
//! Product line manipulation and the invoice view every command returns.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice Lifecycle                                    │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ Building │────►│Submitted │────►│ Building │       │
//! │  │ (no ID)  │     │          │     │ (frozen) │     │ (next ID)│       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_line          next_customer                      │
//! │                   delete_line       (invoice.rs)                       │
//! │                   set_field                                             │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   submit_invoice ──────────────────►                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use mart_core::validation::{parse_quantity, parse_unit_price};
use mart_core::{
    Branch, CoreResult, InvoiceDetails, ProductLine, ProductLineEntry, Session, SessionPhase,
    TaxRate,
};

use crate::error::ApiError;
use crate::state::{ConfigState, SessionState};

/// One priced row of the invoice table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    /// 1-based position, as typed in `delete <n>`
    pub position: usize,
    pub product_line: ProductLine,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub tax_cents: i64,
    pub line_total_cents: i64,
}

/// Everything the form shows after a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub invoice_id: Option<String>,
    pub phase: SessionPhase,
    pub branch: Branch,
    pub details: InvoiceDetails,
    pub lines: Vec<LineView>,
    pub tax_rate_bps: u32,
    pub tax_total_cents: i64,
    pub invoice_total_cents: i64,
}

impl InvoiceView {
    /// Prices the session's ledger at `rate`.
    pub fn from_session(session: &Session, rate: TaxRate) -> CoreResult<Self> {
        let totals = session.totals(rate)?;
        let lines = totals
            .lines
            .iter()
            .enumerate()
            .map(|(i, quote)| LineView {
                position: i + 1,
                product_line: quote.product_line,
                unit_price_cents: quote.unit_price.cents(),
                quantity: quote.quantity,
                tax_cents: quote.tax.cents(),
                line_total_cents: quote.line_total.cents(),
            })
            .collect();

        Ok(InvoiceView {
            invoice_id: session.invoice_id().map(String::from),
            phase: session.phase(),
            branch: session.details().branch(),
            details: session.details().clone(),
            lines,
            tax_rate_bps: rate.bps(),
            tax_total_cents: totals.tax_total.cents(),
            invoice_total_cents: totals.invoice_total.cents(),
        })
    }
}

/// Gets the current invoice with its priced lines and total.
pub fn get_invoice(
    session: &SessionState,
    config: &ConfigState,
) -> Result<InvoiceView, ApiError> {
    debug!("get_invoice command");
    Ok(session.with_session(|s| InvoiceView::from_session(s, config.tax_rate()))?)
}

/// Adds a product line to the ledger.
///
/// ## Behavior
/// - Price and quantity are parsed and must be positive
/// - The product line label is matched case-insensitively
/// - The new line is appended at the end
///
/// ## Arguments
/// * `unit_price` - Typed price, e.g. `25.99`
/// * `quantity` - Typed whole quantity
/// * `product_line` - One of the product line labels
pub fn add_line(
    session: &SessionState,
    config: &ConfigState,
    unit_price: &str,
    quantity: &str,
    product_line: &str,
) -> Result<InvoiceView, ApiError> {
    debug!(unit_price, quantity, product_line, "add_line command");

    let product_line: ProductLine = product_line.parse()?;
    let unit_price = parse_unit_price(unit_price)?;
    let quantity = parse_quantity(quantity)?;
    let entry = ProductLineEntry::new(product_line, unit_price, quantity);

    session.with_session_mut(|s| -> Result<InvoiceView, ApiError> {
        s.add_line(entry)?;
        Ok(InvoiceView::from_session(s, config.tax_rate())?)
    })
}

/// Deletes the product line at a 1-based `position`.
///
/// Lines after it shift up by one.
pub fn delete_line(
    session: &SessionState,
    config: &ConfigState,
    position: usize,
) -> Result<InvoiceView, ApiError> {
    debug!(position, "delete_line command");

    let index = position
        .checked_sub(1)
        .ok_or_else(|| ApiError::invalid_input("Line positions start at 1"))?;

    session.with_session_mut(|s| -> Result<InvoiceView, ApiError> {
        s.remove_line(index)?;
        Ok(InvoiceView::from_session(s, config.tax_rate())?)
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{NaiveDate, NaiveTime};

    fn building() -> SessionState {
        let state = SessionState::new(InvoiceDetails::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        ));
        state
            .with_session_mut(|s| s.begin("INV-20240101-001"))
            .unwrap();
        state
    }

    #[test]
    fn test_add_line_prices_view() {
        let session = building();
        let config = ConfigState::default();

        let view = add_line(&session, &config, "100", "3", "food and beverages").unwrap();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].position, 1);
        assert_eq!(view.lines[0].product_line, ProductLine::FoodAndBeverages);
        assert_eq!(view.lines[0].tax_cents, 1_500);
        assert_eq!(view.lines[0].line_total_cents, 31_500);
        assert_eq!(view.invoice_total_cents, 31_500);
    }

    #[test]
    fn test_add_line_rejects_bad_input() {
        let session = building();
        let config = ConfigState::default();

        let err = add_line(&session, &config, "0", "3", "Health and beauty").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err = add_line(&session, &config, "10", "-2", "Health and beauty").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err = add_line(&session, &config, "10", "2", "Groceries").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        assert!(get_invoice(&session, &config).unwrap().lines.is_empty());
    }

    #[test]
    fn test_huge_price_is_an_input_error_and_form_keeps_working() {
        let session = building();
        let config = ConfigState::default();

        let err = add_line(&session, &config, "99999999999999", "9999", "Food and beverages")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.message.contains("unit price"));

        let view = add_line(&session, &config, "10000000", "9999", "Food and beverages").unwrap();
        assert_eq!(view.invoice_total_cents, 10_498_950_000_000);
        assert!(get_invoice(&session, &config).is_ok());
    }

    #[test]
    fn test_delete_then_add_appends() {
        let session = building();
        let config = ConfigState::default();

        add_line(&session, &config, "10", "1", "Health and beauty").unwrap();
        add_line(&session, &config, "20", "1", "Sports and travel").unwrap();
        delete_line(&session, &config, 1).unwrap();
        let view = add_line(&session, &config, "30", "1", "Home and lifestyle").unwrap();

        let lines: Vec<ProductLine> = view.lines.iter().map(|l| l.product_line).collect();
        assert_eq!(
            lines,
            vec![ProductLine::SportsAndTravel, ProductLine::HomeAndLifestyle]
        );
        assert_eq!(view.lines[1].position, 2);
    }

    #[test]
    fn test_delete_out_of_range() {
        let session = building();
        let config = ConfigState::default();
        add_line(&session, &config, "10", "1", "Health and beauty").unwrap();

        let err = delete_line(&session, &config, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err = delete_line(&session, &config, 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.message, "No product line #2 (invoice has 1)");
    }

    #[test]
    fn test_add_line_before_begin_is_session_error() {
        let session = SessionState::new(InvoiceDetails::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        ));
        let err = add_line(&session, &ConfigState::default(), "10", "1", "Health and beauty")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionState);
    }
}
