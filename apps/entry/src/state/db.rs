//! # Database State
//!
//! Wraps the `Database` connection for use in entry commands.
//!
//! ## Thread Safety
//! The `Database` struct from `mart-db` contains a `SqlitePool` which
//! is inherently thread-safe.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn submit_invoice(db: &DbState, ...) -> Result<SubmitResponse, ApiError> {
//!     db.inner().sales().persist_invoice(&header, &entries, rate).await?;
//! }
//! ```

use mart_db::Database;

/// Wrapper around `Database` for the form's state.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
