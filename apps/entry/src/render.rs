//! # Response Rendering
//!
//! Turns a [`Response`] into what the clerk sees.
//!
//! ## Text View
//! ```text
//! Invoice INV-20241016-001 (building)
//! Branch B | Mandalay | Normal | Male | Cash | rating 5 | 2024-10-16 13:08:00
//!
//!   #  Product line              Unit price    Qty         Tax        Total
//!   1  Health and beauty             ₹10.00      1       ₹0.50       ₹10.50
//!   2  Food and beverages            ₹25.99      2       ₹2.60       ₹54.58
//!
//!   Tax (5.00%)                                          ₹3.10
//!   TOTAL                                                            ₹65.08
//! ```
//!
//! ## JSON
//! One object per response, tagged with `kind`.

use std::fmt::Write as _;

use crate::cli::OutputFormat;
use crate::commands::ledger::InvoiceView;
use crate::form::{Response, HELP};
use crate::state::ConfigState;

/// Renders one response, without a trailing newline.
pub fn render(response: &Response, format: OutputFormat, config: &ConfigState) -> String {
    match format {
        OutputFormat::Json => render_json(response),
        OutputFormat::Text => render_text(response, config),
    }
}

fn render_json(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            r#"{{"kind":"error","code":"INTERNAL","message":"{}"}}"#,
            e.to_string().replace('"', "'")
        )
    })
}

fn render_text(response: &Response, config: &ConfigState) -> String {
    match response {
        Response::Invoice(view) => invoice_table(view, config),
        Response::Submitted(submitted) => format!(
            "{}\n\n{}\nType `next` for the next customer.",
            invoice_table(&submitted.invoice, config),
            submitted.message
        ),
        Response::Options(options) => {
            let mut out = String::new();
            let _ = writeln!(out, "city:         {}", options.cities.join(", "));
            let _ = writeln!(out, "customer:     {}", options.customer_types.join(", "));
            let _ = writeln!(out, "gender:       {}", options.genders.join(", "));
            let _ = writeln!(out, "payment:      {}", options.payments.join(", "));
            let _ = writeln!(out, "product line: {}", options.product_lines.join(", "));
            let _ = write!(
                out,
                "rating:       {}-{}",
                options.min_rating, options.max_rating
            );
            out
        }
        Response::Config(current) => format!(
            "store: {}\ncurrency: {}\ntax rate: {:.2}%",
            current.store_name,
            current.currency_symbol,
            current.tax_rate().percentage()
        ),
        Response::Help => HELP
            .iter()
            .map(|(usage, what)| format!("  {:<34} {}", usage, what))
            .collect::<Vec<_>>()
            .join("\n"),
        Response::Error(err) => format!("error: {}", err),
        Response::Goodbye => "Goodbye.".to_string(),
    }
}

/// The invoice header, line table and totals.
pub fn invoice_table(view: &InvoiceView, config: &ConfigState) -> String {
    let money = |cents: i64| config.format_currency(mart_core::Money::from_cents(cents));
    let d = &view.details;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Invoice {} ({})",
        view.invoice_id.as_deref().unwrap_or("(none)"),
        view.phase
    );
    let _ = writeln!(
        out,
        "Branch {} | {} | {} | {} | {} | rating {} | {} {}",
        view.branch,
        d.city,
        d.customer_type,
        d.gender,
        d.payment,
        d.rating,
        d.date.format("%Y-%m-%d"),
        d.time.format("%H:%M:%S")
    );
    let _ = writeln!(out);

    if view.lines.is_empty() {
        let _ = writeln!(out, "  (no product lines)");
    } else {
        let _ = writeln!(
            out,
            "  {:>2}  {:<24} {:>12} {:>6} {:>11} {:>12}",
            "#", "Product line", "Unit price", "Qty", "Tax", "Total"
        );
        for line in &view.lines {
            let _ = writeln!(
                out,
                "  {:>2}  {:<24} {:>12} {:>6} {:>11} {:>12}",
                line.position,
                line.product_line.as_str(),
                money(line.unit_price_cents),
                line.quantity,
                money(line.tax_cents),
                money(line.line_total_cents)
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {:<52} {:>11}",
        format!("Tax ({:.2}%)", view.tax_rate_bps as f64 / 100.0),
        money(view.tax_total_cents)
    );
    let _ = write!(
        out,
        "  {:<65} {:>12}",
        "TOTAL",
        money(view.invoice_total_cents)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use chrono::{NaiveDate, NaiveTime};
    use mart_core::{InvoiceDetails, Money, ProductLine, ProductLineEntry, Session};

    fn view() -> InvoiceView {
        let mut session = Session::new(InvoiceDetails::new(
            NaiveDate::from_ymd_opt(2024, 10, 16).unwrap(),
            NaiveTime::from_hms_opt(13, 8, 0).unwrap(),
        ));
        session.begin("INV-20241016-001").unwrap();
        session
            .add_line(ProductLineEntry::new(
                ProductLine::FoodAndBeverages,
                Money::from_cents(10_000),
                3,
            ))
            .unwrap();
        InvoiceView::from_session(&session, ConfigState::default().tax_rate()).unwrap()
    }

    #[test]
    fn test_text_invoice_table() {
        let text = render(
            &Response::Invoice(view()),
            OutputFormat::Text,
            &ConfigState::default(),
        );

        assert!(text.starts_with("Invoice INV-20241016-001 (building)"));
        assert!(text.contains("Branch A | Yangon | Normal | Male | Cash | rating 5"));
        assert!(text.contains("Food and beverages"));
        assert!(text.contains("₹315.00"));
        assert!(text.contains("Tax (5.00%)"));
    }

    #[test]
    fn test_json_is_tagged() {
        let json = render(
            &Response::Invoice(view()),
            OutputFormat::Json,
            &ConfigState::default(),
        );
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["kind"], "invoice");
        assert_eq!(value["invoiceId"], "INV-20241016-001");
        assert_eq!(value["phase"], "building");
        assert_eq!(value["lines"][0]["productLine"], "Food and beverages");
        assert_eq!(value["invoiceTotalCents"], 31_500);
    }

    #[test]
    fn test_error_rendering() {
        let err = Response::Error(ApiError::invalid_input("quantity must be positive"));

        let text = render(&err, OutputFormat::Text, &ConfigState::default());
        assert_eq!(text, "error: [INVALID_INPUT] quantity must be positive");

        let json = render(&err, OutputFormat::Json, &ConfigState::default());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "error");
        assert_eq!(value["code"], "INVALID_INPUT");
    }
}
