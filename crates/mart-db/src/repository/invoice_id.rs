//! # Invoice ID Repository
//!
//! Reserves the next `INV-YYYYMMDD-NNN` identifier for a day.
//!
//! ## Reservation Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   1. UPSERT invoice_sequences(day)        ← first statement is a write, │
//! │                                             so this connection holds    │
//! │                                             the write lock from here    │
//! │   2. SELECT "Invoice ID" FROM sales                                     │
//! │        WHERE "Invoice ID" LIKE 'INV-20240101%'                          │
//! │   3. SELECT last_seq FROM invoice_sequences WHERE day = ?               │
//! │   4. next = max(max suffix, last_seq) + 1                               │
//! │   5. UPDATE invoice_sequences SET last_seq = next                       │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite allows one writer at a time, so two clerks asking at once are
//! serialized: the second waits on the busy timeout, then sees the first
//! one's reservation. An ID that is reserved and never submitted leaves a
//! gap in the day's sequence.

use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use mart_core::invoice_id::{format_invoice_id, next_sequence, prefix_for};

/// Repository for invoice ID reservation.
#[derive(Debug, Clone)]
pub struct InvoiceIdRepository {
    pool: SqlitePool,
}

impl InvoiceIdRepository {
    /// Creates a new InvoiceIdRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceIdRepository { pool }
    }

    /// Reserves the next invoice ID for today's local date.
    pub async fn generate_invoice_id(&self) -> DbResult<String> {
        self.generate_invoice_id_for(Local::now().date_naive()).await
    }

    /// Reserves the next invoice ID for `date`.
    ///
    /// ## Errors
    /// `StorageUnavailable` for any database failure; nothing is reserved.
    pub async fn generate_invoice_id_for(&self, date: NaiveDate) -> DbResult<String> {
        let prefix = prefix_for(date);
        let day = date.format("%Y%m%d").to_string();

        let mut tx = self.pool.begin().await.map_err(DbError::unavailable)?;

        sqlx::query(
            r#"
            INSERT INTO invoice_sequences (day, last_seq) VALUES (?1, 0)
            ON CONFLICT(day) DO UPDATE SET last_seq = last_seq
            "#,
        )
        .bind(&day)
        .execute(&mut *tx)
        .await
        .map_err(DbError::unavailable)?;

        let existing: Vec<String> =
            sqlx::query_scalar(r#"SELECT "Invoice ID" FROM sales WHERE "Invoice ID" LIKE ?1 || '%'"#)
                .bind(&prefix)
                .fetch_all(&mut *tx)
                .await
                .map_err(DbError::unavailable)?;

        let last_seq: i64 =
            sqlx::query_scalar("SELECT last_seq FROM invoice_sequences WHERE day = ?1")
                .bind(&day)
                .fetch_one(&mut *tx)
                .await
                .map_err(DbError::unavailable)?;

        let floor = u32::try_from(last_seq).unwrap_or(0);
        let next = next_sequence(existing.iter().map(String::as_str), floor);

        sqlx::query("UPDATE invoice_sequences SET last_seq = ?2 WHERE day = ?1")
            .bind(&day)
            .bind(next as i64)
            .execute(&mut *tx)
            .await
            .map_err(DbError::unavailable)?;

        tx.commit().await.map_err(DbError::unavailable)?;

        let invoice_id = format_invoice_id(&prefix, next);
        debug!(
            stored_ids = existing.len(),
            last_seq,
            invoice_id = %invoice_id,
            "Reserved invoice ID"
        );
        info!(invoice_id = %invoice_id, "Generated invoice ID");

        Ok(invoice_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
