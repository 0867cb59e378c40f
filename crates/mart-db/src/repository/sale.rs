//! # Sale Repository
//!
//! Writes submitted invoices to the `sales` table and reads them back.
//!
//! ## Persist Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       persist_invoice()                                 │
//! │                                                                         │
//! │  1. EXPAND                                                             │
//! │     └── pricing::expand_rows(header, entries) → N PersistedSaleRow     │
//! │         (empty invoice / zero total rejected here, no storage touched) │
//! │                                                                         │
//! │  2. WRITE (one transaction)                                            │
//! │     └── BEGIN                                                          │
//! │     └── INSERT row 1 … INSERT row N                                    │
//! │     └── COMMIT                                                         │
//! │                                                                         │
//! │  3. ANY FAILURE                                                        │
//! │     └── transaction dropped → rolled back → WriteFailed                │
//! │         (zero rows for the invoice, no retry)                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, NaiveTime};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use super::cents_to_real;
use crate::error::{DbError, DbResult};
use mart_core::pricing::expand_rows;
use mart_core::types::{
    Branch, City, CustomerType, Gender, InvoiceHeader, PaymentMethod, Percent, PersistedSaleRow,
    ProductLine, ProductLineEntry, TaxRate,
};
use mart_core::Money;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Prices an invoice and writes one row per product line, atomically.
    ///
    /// ## Returns
    /// The number of rows written.
    ///
    /// ## Errors
    /// - `Pricing(EmptyInvoice)` / `Pricing(InvalidLineTotal)` before any write
    /// - `WriteFailed` when the transaction could not be completed
    pub async fn persist_invoice(
        &self,
        header: &InvoiceHeader,
        entries: &[ProductLineEntry],
        rate: TaxRate,
    ) -> DbResult<usize> {
        let rows = expand_rows(header, entries, rate)?;
        self.insert_rows(&header.invoice_id, &rows).await?;

        info!(
            invoice_id = %header.invoice_id,
            rows = rows.len(),
            branch = %header.branch(),
            "Invoice persisted"
        );

        Ok(rows.len())
    }

    /// Inserts pre-expanded rows in one transaction.
    pub async fn insert_rows(&self, invoice_id: &str, rows: &[PersistedSaleRow]) -> DbResult<()> {
        if rows.is_empty() {
            return Err(DbError::Pricing(mart_core::CoreError::EmptyInvoice {
                invoice_id: invoice_id.to_string(),
            }));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::write_failed(invoice_id, e))?;

        for (position, row) in rows.iter().enumerate() {
            debug!(
                invoice_id = %row.invoice_id,
                position,
                product_line = %row.product_line,
                "Inserting sale row"
            );

            sqlx::query(
                r#"
                INSERT INTO sales (
                    "Invoice ID", "Branch", "City", "Customer type", "Gender",
                    "Product line", "Unit price", "Quantity", "Tax 5%", "Total",
                    "Date", "Time", "Payment", "cogs", "gross margin percentage",
                    "gross income", "Rating", "Month", "Year"
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5,
                    ?6, ?7, ?8, ?9, ?10,
                    ?11, ?12, ?13, ?14, ?15,
                    ?16, ?17, ?18, ?19
                )
                "#,
            )
            .bind(&row.invoice_id)
            .bind(row.branch)
            .bind(row.city)
            .bind(row.customer_type)
            .bind(row.gender)
            .bind(row.product_line)
            .bind(cents_to_real(row.unit_price.cents()))
            .bind(row.quantity)
            .bind(cents_to_real(row.tax.cents()))
            .bind(cents_to_real(row.total.cents()))
            .bind(row.date.format("%Y-%m-%d").to_string())
            .bind(row.time.format("%H:%M:%S").to_string())
            .bind(row.payment)
            .bind(cents_to_real(row.cogs.cents()))
            .bind(cents_to_real(row.gross_margin.hundredths()))
            .bind(cents_to_real(row.gross_income.cents()))
            .bind(row.rating as i64)
            .bind(row.month as i64)
            .bind(row.year as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::write_failed(invoice_id, e))?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::write_failed(invoice_id, e))?;

        Ok(())
    }

    /// Reads back the rows of one invoice, in the order they were written.
    pub async fn rows_for_invoice(&self, invoice_id: &str) -> DbResult<Vec<PersistedSaleRow>> {
        let rows = sqlx::query(
            r#"
            SELECT
                "Invoice ID"                                            AS invoice_id,
                "Branch"                                                AS branch,
                "City"                                                  AS city,
                "Customer type"                                         AS customer_type,
                "Gender"                                                AS gender,
                "Product line"                                          AS product_line,
                CAST(ROUND("Unit price" * 100) AS INTEGER)              AS unit_price_cents,
                "Quantity"                                              AS quantity,
                CAST(ROUND("Tax 5%" * 100) AS INTEGER)                  AS tax_cents,
                CAST(ROUND("Total" * 100) AS INTEGER)                   AS total_cents,
                "Date"                                                  AS date,
                "Time"                                                  AS time,
                "Payment"                                               AS payment,
                CAST(ROUND("cogs" * 100) AS INTEGER)                    AS cogs_cents,
                CAST(ROUND("gross margin percentage" * 100) AS INTEGER) AS margin_hundredths,
                CAST(ROUND("gross income" * 100) AS INTEGER)            AS gross_income_cents,
                "Rating"                                                AS rating,
                "Month"                                                 AS month,
                "Year"                                                  AS year
            FROM sales
            WHERE "Invoice ID" = ?1
            ORDER BY rowid
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_row).collect()
    }

    /// All stored invoice IDs starting with `prefix` (one entry per row).
    pub async fn invoice_ids_with_prefix(&self, prefix: &str) -> DbResult<Vec<String>> {
        let ids: Vec<String> =
            sqlx::query_scalar(r#"SELECT "Invoice ID" FROM sales WHERE "Invoice ID" LIKE ?1 || '%'"#)
                .bind(prefix)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }

    /// Total number of rows in `sales`.
    pub async fn count_rows(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Number of distinct invoices in `sales`.
    pub async fn count_invoices(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(DISTINCT "Invoice ID") FROM sales"#)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Maps a `rows_for_invoice` result row back onto the domain type.
fn decode_row(row: &SqliteRow) -> DbResult<PersistedSaleRow> {
    let date: String = row.try_get("date")?;
    let time: String = row.try_get("time")?;
    let rating: i64 = row.try_get("rating")?;
    let month: i64 = row.try_get("month")?;
    let year: i64 = row.try_get("year")?;

    Ok(PersistedSaleRow {
        invoice_id: row.try_get("invoice_id")?,
        branch: row.try_get::<Branch, _>("branch")?,
        city: row.try_get::<City, _>("city")?,
        customer_type: row.try_get::<CustomerType, _>("customer_type")?,
        gender: row.try_get::<Gender, _>("gender")?,
        product_line: row.try_get::<ProductLine, _>("product_line")?,
        unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
        quantity: row.try_get("quantity")?,
        tax: Money::from_cents(row.try_get("tax_cents")?),
        total: Money::from_cents(row.try_get("total_cents")?),
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| DbError::Internal(format!("bad Date '{date}': {e}")))?,
        time: NaiveTime::parse_from_str(&time, "%H:%M:%S")
            .map_err(|e| DbError::Internal(format!("bad Time '{time}': {e}")))?,
        payment: row.try_get::<PaymentMethod, _>("payment")?,
        cogs: Money::from_cents(row.try_get("cogs_cents")?),
        gross_margin: Percent::from_hundredths(row.try_get("margin_hundredths")?),
        gross_income: Money::from_cents(row.try_get("gross_income_cents")?),
        rating: u8::try_from(rating)
            .map_err(|_| DbError::Internal(format!("bad Rating {rating}")))?,
        month: u32::try_from(month).map_err(|_| DbError::Internal(format!("bad Month {month}")))?,
        year: i32::try_from(year).map_err(|_| DbError::Internal(format!("bad Year {year}")))?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use mart_core::types::InvoiceDetails;
    use mart_core::{CoreError, DEFAULT_TAX_RATE};

    fn header(invoice_id: &str, city: City) -> InvoiceHeader {
        let mut details = InvoiceDetails::new(
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            NaiveTime::from_hms_opt(13, 8, 0).unwrap(),
        );
        details.city = city;
        details.customer_type = CustomerType::Member;
        details.gender = Gender::Female;
        details.payment = PaymentMethod::CreditCard;
        details.rating = 9;
        InvoiceHeader::new(invoice_id, details)
    }

    fn entry(line: ProductLine, cents: i64, qty: i64) -> ProductLineEntry {
        ProductLineEntry::new(line, Money::from_cents(cents), qty)
    }

    #[tokio::test]
    async fn test_two_lines_make_two_rows() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let header = header("INV-20240309-001", City::Yangon);
        let entries = vec![
            entry(ProductLine::FoodAndBeverages, 10_000, 3),
            entry(ProductLine::HealthAndBeauty, 2_599, 2),
        ];

        let written = db
            .sales()
            .persist_invoice(&header, &entries, DEFAULT_TAX_RATE)
            .await
            .unwrap();
        assert_eq!(written, 2);

        let rows = db.sales().rows_for_invoice("INV-20240309-001").await.unwrap();
        assert_eq!(rows.len(), 2);

        for row in &rows {
            assert_eq!(row.branch, Branch::A);
            assert_eq!(row.city, City::Yangon);
            assert_eq!(row.customer_type, CustomerType::Member);
            assert_eq!(row.gender, Gender::Female);
            assert_eq!(row.payment, PaymentMethod::CreditCard);
            assert_eq!(row.date, header.details.date);
            assert_eq!(row.time, header.details.time);
            assert_eq!(row.rating, 9);
            assert_eq!(row.month, 3);
            assert_eq!(row.year, 2024);
        }

        assert_eq!(rows[0].product_line, ProductLine::FoodAndBeverages);
        assert_eq!(rows[0].cogs.cents(), 30_000);
        assert_eq!(rows[0].tax.cents(), 1_500);
        assert_eq!(rows[0].total.cents(), 31_500);
        assert_eq!(rows[0].gross_margin.hundredths(), 476);
        assert_eq!(rows[0].gross_income.cents(), 1_500);

        assert_eq!(rows[1].product_line, ProductLine::HealthAndBeauty);
        assert_eq!(rows[1].unit_price.cents(), 2_599);
        assert_eq!(rows[1].total.cents(), 5_458);
        assert_ne!(rows[0].total, rows[1].total);

        // Round trip matches what was priced in memory.
        let expected = expand_rows(&header, &entries, DEFAULT_TAX_RATE).unwrap();
        assert_eq!(rows, expected);
    }

    #[tokio::test]
    async fn test_others_city_stores_sentinel_branch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let header = header("INV-20240309-002", City::Others);
        let entries = vec![entry(ProductLine::SportsAndTravel, 1_000, 1)];

        db.sales()
            .persist_invoice(&header, &entries, DEFAULT_TAX_RATE)
            .await
            .unwrap();

        let branch: String =
            sqlx::query_scalar(r#"SELECT "Branch" FROM sales WHERE "Invoice ID" = ?1"#)
                .bind("INV-20240309-002")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(branch, "N/A");

        let rows = db.sales().rows_for_invoice("INV-20240309-002").await.unwrap();
        assert_eq!(rows[0].branch, Branch::Unassigned);
    }

    #[tokio::test]
    async fn test_empty_invoice_never_reaches_storage() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let header = header("INV-20240309-003", City::Mandalay);

        let err = db
            .sales()
            .persist_invoice(&header, &[], DEFAULT_TAX_RATE)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Pricing(CoreError::EmptyInvoice { .. })
        ));
        assert_eq!(db.sales().count_rows().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_rows() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let header = header("INV-20240309-004", City::Naypyitaw);
        // Second line breaks the Quantity CHECK after the first row is in.
        let entries = vec![
            entry(ProductLine::HomeAndLifestyle, 1_000, 1),
            entry(ProductLine::HomeAndLifestyle, 1_000, 10_000),
        ];

        let err = db
            .sales()
            .persist_invoice(&header, &entries, DEFAULT_TAX_RATE)
            .await
            .unwrap_err();

        match err {
            DbError::WriteFailed { invoice_id, .. } => assert_eq!(invoice_id, "INV-20240309-004"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(db.sales().count_rows().await.unwrap(), 0);
        assert!(db
            .sales()
            .rows_for_invoice("INV-20240309-004")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_prefix_query_and_counts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sales = db.sales();

        for id in ["INV-20240309-001", "INV-20240309-002", "INV-20240310-001"] {
            let entries = vec![
                entry(ProductLine::FashionAccessories, 500, 1),
                entry(ProductLine::ElectronicAccessories, 700, 2),
            ];
            sales
                .persist_invoice(&header(id, City::Yangon), &entries, DEFAULT_TAX_RATE)
                .await
                .unwrap();
        }

        let ids = sales.invoice_ids_with_prefix("INV-20240309").await.unwrap();
        assert_eq!(ids.len(), 4);
        assert!(ids.iter().all(|id| id.starts_with("INV-20240309")));

        assert_eq!(sales.count_rows().await.unwrap(), 6);
        assert_eq!(sales.count_invoices().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_closed_pool_write_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let entries = vec![entry(ProductLine::FoodAndBeverages, 100, 1)];
        let err = db
            .sales()
            .persist_invoice(&header("INV-20240309-005", City::Yangon), &entries, DEFAULT_TAX_RATE)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::WriteFailed { .. }));
    }
}
