//! # Pricing Calculator
//!
//! Pure functions that turn ledger entries into money: tax, line totals,
//! invoice total, cogs and gross margin.
//!
//! ## Per-Line Math
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  unit_price = 100.00, quantity = 3, rate = 5%                           │
//! │                                                                         │
//! │  cogs         = unit_price × quantity          = 300.00                 │
//! │  tax          = cogs × rate                    =  15.00                 │
//! │  line total   = cogs + tax                     = 315.00                 │
//! │  gross margin = (total − cogs) / total × 100   =   4.76                 │
//! │  gross income = tax                            =  15.00                 │
//! │                                                                         │
//! │  invoice total = Σ line totals (exact: every term is whole cents)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax and line total are rounded half up to the cent. The margin is taken
//! from the exact, unrounded line total and rounded once, to the hundredth
//! of a percent, so at 5% every line records 4.76 whatever its price.
//!
//! Every sum and product is checked; an amount that leaves `Money` is an
//! `AmountOverflow` rather than a wrapped total.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::ledger::ProductLineLedger;
use crate::money::Money;
use crate::types::{
    InvoiceHeader, Percent, PersistedSaleRow, ProductLine, ProductLineEntry, TaxRate,
};

// =============================================================================
// Quotes
// =============================================================================

/// Computed amounts for one ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineQuote {
    pub product_line: ProductLine,
    pub unit_price: Money,
    pub quantity: i64,
    pub cogs: Money,
    pub tax: Money,
    pub line_total: Money,
}

/// Totals for the whole ledger, as shown before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub lines: Vec<LineQuote>,
    pub cogs_total: Money,
    pub tax_total: Money,
    pub invoice_total: Money,
}

/// Prices a single entry.
///
/// ## Errors
/// `AmountOverflow` when cogs or the line total does not fit in `Money`.
pub fn quote_line(entry: &ProductLineEntry, rate: TaxRate) -> CoreResult<LineQuote> {
    let cogs = entry.cogs()?;
    let tax = cogs.calculate_tax(rate);
    let line_total = cogs.checked_add(tax).ok_or_else(|| CoreError::AmountOverflow {
        what: format!("{} line total", entry.product_line),
    })?;

    Ok(LineQuote {
        product_line: entry.product_line,
        unit_price: entry.unit_price,
        quantity: entry.quantity,
        cogs,
        tax,
        line_total,
    })
}

/// Prices every entry in the ledger and sums the invoice total.
///
/// ## Example
/// ```rust
/// use mart_core::{Money, ProductLineLedger, DEFAULT_TAX_RATE};
/// use mart_core::pricing::calculate_totals;
/// use mart_core::types::{ProductLine, ProductLineEntry};
///
/// let mut ledger = ProductLineLedger::new();
/// ledger.add(ProductLineEntry::new(ProductLine::SportsAndTravel, Money::from_cents(1_000), 2));
/// ledger.add(ProductLineEntry::new(ProductLine::HealthAndBeauty, Money::from_cents(550), 1));
///
/// let totals = calculate_totals(&ledger, DEFAULT_TAX_RATE).unwrap();
/// assert_eq!(totals.invoice_total.to_string(), "26.78");
/// ```
pub fn calculate_totals(
    ledger: &ProductLineLedger,
    rate: TaxRate,
) -> CoreResult<InvoiceTotals> {
    let lines = ledger
        .entries()
        .iter()
        .map(|entry| quote_line(entry, rate))
        .collect::<CoreResult<Vec<LineQuote>>>()?;

    let total = |what: &str, amounts: Vec<Money>| {
        Money::checked_sum(amounts).ok_or_else(|| CoreError::AmountOverflow {
            what: what.to_string(),
        })
    };

    Ok(InvoiceTotals {
        cogs_total: total("Invoice cost", lines.iter().map(|l| l.cogs).collect())?,
        tax_total: total("Invoice tax", lines.iter().map(|l| l.tax).collect())?,
        invoice_total: total("Invoice total", lines.iter().map(|l| l.line_total).collect())?,
        lines,
    })
}

// =============================================================================
// Gross Margin
// =============================================================================

/// Gross margin percentage of a line: `(total − cogs) / total × 100`,
/// with `total = cogs × (1 + rate)` left unrounded.
///
/// In basis points that is `cogs·bps / (cogs·(10000 + bps))`, evaluated in
/// i128 so no intermediate rounding creeps in.
///
/// ```rust
/// use mart_core::pricing::gross_margin;
/// use mart_core::{Money, ProductLine, DEFAULT_TAX_RATE};
///
/// let margin = gross_margin(Money::from_cents(1), DEFAULT_TAX_RATE, ProductLine::SportsAndTravel);
/// assert_eq!(margin.unwrap().to_string(), "4.76");
/// ```
///
/// ## Errors
/// `InvalidLineTotal` when the line total is zero.
pub fn gross_margin(
    cogs: Money,
    rate: TaxRate,
    product_line: ProductLine,
) -> CoreResult<Percent> {
    let cogs = cogs.cents() as i128;
    let bps = rate.bps() as i128;

    // Line total scaled by 10000.
    let denominator = cogs * (10_000 + bps);
    if denominator == 0 {
        return Err(CoreError::InvalidLineTotal {
            product_line: product_line.to_string(),
        });
    }

    // (total − cogs) scaled by 10000, then by 100 × 100 for hundredths of a percent.
    let numerator = cogs * bps * 10_000;

    Ok(Percent::from_hundredths(
        div_round_half_up(numerator, denominator) as i64,
    ))
}

/// Integer division rounding halves away from zero.
fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    let negative = (numerator < 0) != (denominator < 0);
    let (n, d) = (numerator.abs(), denominator.abs());
    let rounded = (2 * n + d) / (2 * d);
    if negative {
        -rounded
    } else {
        rounded
    }
}

// =============================================================================
// Row Expansion
// =============================================================================

/// Expands an invoice into the rows written to the `sales` table.
///
/// Every row repeats the header; the amounts come from [`quote_line`].
///
/// ## Errors
/// - `EmptyInvoice` when `entries` is empty
/// - `InvalidLineTotal` when a line totals zero
pub fn expand_rows(
    header: &InvoiceHeader,
    entries: &[ProductLineEntry],
    rate: TaxRate,
) -> CoreResult<Vec<PersistedSaleRow>> {
    if entries.is_empty() {
        return Err(CoreError::EmptyInvoice {
            invoice_id: header.invoice_id.clone(),
        });
    }

    let details = &header.details;

    entries
        .iter()
        .map(|entry| {
            let quote = quote_line(entry, rate)?;
            let margin = gross_margin(quote.cogs, rate, quote.product_line)?;

            Ok(PersistedSaleRow {
                invoice_id: header.invoice_id.clone(),
                branch: details.branch(),
                city: details.city,
                customer_type: details.customer_type,
                gender: details.gender,
                product_line: quote.product_line,
                unit_price: quote.unit_price,
                quantity: quote.quantity,
                tax: quote.tax,
                total: quote.line_total,
                date: details.date,
                time: details.time,
                payment: details.payment,
                cogs: quote.cogs,
                gross_margin: margin,
                gross_income: quote.tax,
                rating: details.rating,
                month: PersistedSaleRow::month_of(details.date),
                year: PersistedSaleRow::year_of(details.date),
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Branch, City, InvoiceDetails};
    use crate::DEFAULT_TAX_RATE;
    use chrono::{NaiveDate, NaiveTime};

    fn entry(line: ProductLine, cents: i64, qty: i64) -> ProductLineEntry {
        ProductLineEntry::new(line, Money::from_cents(cents), qty)
    }

    fn header(city: City) -> InvoiceHeader {
        let mut details = InvoiceDetails::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(13, 8, 0).unwrap(),
        );
        details.city = city;
        details.rating = 9;
        InvoiceHeader::new("INV-20240101-001", details)
    }

    #[test]
    fn test_reference_line() {
        let quote =
            quote_line(&entry(ProductLine::FoodAndBeverages, 10_000, 3), DEFAULT_TAX_RATE).unwrap();

        assert_eq!(quote.cogs.to_string(), "300.00");
        assert_eq!(quote.tax.to_string(), "15.00");
        assert_eq!(quote.line_total.to_string(), "315.00");

        let margin = gross_margin(quote.cogs, DEFAULT_TAX_RATE, quote.product_line).unwrap();
        assert_eq!(margin.to_string(), "4.76");
    }

    #[test]
    fn test_invoice_total_is_sum_of_line_totals() {
        let mut ledger = ProductLineLedger::new();
        ledger.add(entry(ProductLine::HealthAndBeauty, 7_469, 7));
        ledger.add(entry(ProductLine::ElectronicAccessories, 1_531, 5));
        ledger.add(entry(ProductLine::HomeAndLifestyle, 4_633, 8));
        ledger.add(entry(ProductLine::SportsAndTravel, 1, 1));

        let totals = calculate_totals(&ledger, DEFAULT_TAX_RATE).unwrap();
        let summed = Money::checked_sum(totals.lines.iter().map(|l| l.line_total)).unwrap();

        assert_eq!(totals.lines.len(), 4);
        assert_eq!(totals.invoice_total, summed);
        assert_eq!(totals.invoice_total, totals.cogs_total + totals.tax_total);
    }

    #[test]
    fn test_empty_ledger_totals_zero() {
        let totals = calculate_totals(&ProductLineLedger::new(), DEFAULT_TAX_RATE).unwrap();
        assert!(totals.lines.is_empty());
        assert!(totals.invoice_total.is_zero());
    }

    #[test]
    fn test_zero_line_total_is_rejected() {
        let err = gross_margin(Money::zero(), DEFAULT_TAX_RATE, ProductLine::SportsAndTravel)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidLineTotal { .. }));
    }

    #[test]
    fn test_margin_ignores_cent_rounding_of_small_lines() {
        // 0.01 → tax 0.0005, 0.10 → 0.005, 0.30 → 0.015: none are whole cents.
        for typed in ["0.01", "0.10", "0.30", "25.99"] {
            let price = crate::validation::parse_unit_price(typed).unwrap();
            let line = ProductLineEntry::new(ProductLine::HealthAndBeauty, price, 1);
            let quote = quote_line(&line, DEFAULT_TAX_RATE).unwrap();

            let margin = gross_margin(quote.cogs, DEFAULT_TAX_RATE, quote.product_line).unwrap();
            assert_eq!(margin.to_string(), "4.76", "price {}", typed);
        }

        let rows = expand_rows(
            &header(City::Yangon),
            &[entry(ProductLine::HealthAndBeauty, 10, 1)],
            DEFAULT_TAX_RATE,
        )
        .unwrap();
        assert_eq!(rows[0].total.cents(), 11);
        assert_eq!(rows[0].gross_margin.hundredths(), 476);
    }

    #[test]
    fn test_margin_tracks_the_rate() {
        let cogs = Money::from_cents(10_000);
        let margin = |bps| {
            gross_margin(cogs, TaxRate::from_bps(bps), ProductLine::HealthAndBeauty)
                .unwrap()
                .hundredths()
        };

        assert_eq!(margin(0), 0);
        // 10 / 110 = 9.0909… → 9.09
        assert_eq!(margin(1_000), 909);
        // 12.5 / 112.5 = 11.111… → 11.11
        assert_eq!(margin(1_250), 1_111);
        // 100 / 200 = 50
        assert_eq!(margin(10_000), 5_000);
    }

    #[test]
    fn test_overflowing_line_is_an_error() {
        let line = entry(ProductLine::FoodAndBeverages, 99_999_999_999_999_00, 9_999);
        assert!(matches!(
            quote_line(&line, DEFAULT_TAX_RATE),
            Err(CoreError::AmountOverflow { .. })
        ));

        let mut ledger = ProductLineLedger::new();
        ledger.add(entry(ProductLine::FoodAndBeverages, i64::MAX / 2 + 1, 1));
        ledger.add(entry(ProductLine::FoodAndBeverages, i64::MAX / 2 + 1, 1));
        assert!(matches!(
            calculate_totals(&ledger, TaxRate::from_bps(0)),
            Err(CoreError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_expand_two_lines() {
        let entries = vec![
            entry(ProductLine::FoodAndBeverages, 10_000, 3),
            entry(ProductLine::FashionAccessories, 2_599, 2),
        ];

        let rows = expand_rows(&header(City::Mandalay), &entries, DEFAULT_TAX_RATE).unwrap();
        assert_eq!(rows.len(), 2);

        for row in &rows {
            assert_eq!(row.invoice_id, "INV-20240101-001");
            assert_eq!(row.branch, Branch::B);
            assert_eq!(row.city, City::Mandalay);
            assert_eq!(row.rating, 9);
            assert_eq!(row.month, 1);
            assert_eq!(row.year, 2024);
            assert_eq!(row.gross_income, row.tax);
            assert_eq!(row.total, row.cogs + row.tax);
        }

        assert_eq!(rows[0].total.cents(), 31_500);
        assert_eq!(rows[0].gross_margin.hundredths(), 476);
        // 25.99 × 2 = 51.98; tax 2.599 → 2.60; total 54.58
        assert_eq!(rows[1].cogs.cents(), 5_198);
        assert_eq!(rows[1].tax.cents(), 260);
        assert_eq!(rows[1].total.cents(), 5_458);
        assert_ne!(rows[0].total, rows[1].total);
    }

    #[test]
    fn test_expand_others_city_uses_sentinel_branch() {
        let entries = vec![entry(ProductLine::HealthAndBeauty, 500, 1)];
        let rows = expand_rows(&header(City::Others), &entries, DEFAULT_TAX_RATE).unwrap();
        assert_eq!(rows[0].branch, Branch::Unassigned);
    }

    #[test]
    fn test_expand_empty_is_rejected() {
        let err = expand_rows(&header(City::Yangon), &[], DEFAULT_TAX_RATE).unwrap_err();
        assert!(matches!(err, CoreError::EmptyInvoice { .. }));
    }

    #[test]
    fn test_expand_zero_priced_line_fails() {
        let entries = vec![entry(ProductLine::HealthAndBeauty, 0, 1)];
        let err = expand_rows(&header(City::Yangon), &entries, DEFAULT_TAX_RATE).unwrap_err();
        assert!(matches!(err, CoreError::InvalidLineTotal { .. }));
    }
}
