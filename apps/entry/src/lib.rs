//! # Mart Entry Library
//!
//! Core library for the sales invoice entry form.
//! This is the main entry point that configures and runs the form loop.
//!
//! ## Module Organization
//! ```text
//! mart_entry/
//! ├── lib.rs          ◄─── You are here (setup & run)
//! ├── cli.rs          ◄─── clap flags
//! ├── form.rs         ◄─── Line parser and form loop
//! ├── render.rs       ◄─── Text table / JSON output
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── session.rs  ◄─── Session state management
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── invoice.rs  ◄─── Start/submit/next commands
//! │   ├── ledger.rs   ◄─── Product line commands
//! │   ├── form.rs     ◄─── Header field commands
//! │   └── config.rs   ◄─── Config command
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod form;
pub mod render;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use form::Form;
use mart_db::{Database, DbConfig};
use state::{ConfigState, DbState, SessionState};

/// Runs the entry form on stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, on stderr                     │
/// │     • Default: info,mart=debug,sqlx=warn (RUST_LOG overrides)           │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • Defaults, then MART_* variables, then CLI flags                   │
/// │                                                                         │
/// │  3. Determine Database Path ──────────────────────────────────────────► │
/// │     • --db / MART_DB_PATH                                               │
/// │     • Linux: ~/.local/share/sales/sales.db                              │
/// │                                                                         │
/// │  4. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  5. Initialize State Objects ─────────────────────────────────────────► │
/// │     • DbState, SessionState (Empty), ConfigState                        │
/// │                                                                         │
/// │  6. Run the Form Loop ────────────────────────────────────────────────► │
/// │     • Assign the first invoice ID                                       │
/// │     • One command per line until quit / EOF                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Mart sales entry");

    let config = ConfigState::from_env()
        .with_overrides(cli.tax_rate.as_deref(), cli.currency_symbol.as_deref())?;
    info!(
        store = %config.store_name,
        tax_rate_bps = config.tax_rate_bps,
        "Configuration loaded"
    );

    let db_path = get_database_path(cli.db.clone())?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let form = Form::new(
        DbState::new(db.clone()),
        SessionState::new(commands::invoice::fresh_details()),
        config,
        cli.output,
    );

    form.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mart=trace` - Show trace for mart crates only
/// - Default: `info,mart=debug,sqlx=warn`
///
/// Logs go to stderr; stdout carries only form responses.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mart=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.mart.sales/sales.db`
/// - **Windows**: `%APPDATA%\mart\sales\data\sales.db`
/// - **Linux**: `~/.local/share/sales/sales.db`
///
/// ## Override
/// `--db <path>` or the `MART_DB_PATH` environment variable.
pub fn get_database_path(
    override_path: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = override_path {
        return Ok(path);
    }

    let proj_dirs = ProjectDirs::from("com", "mart", "sales")
        .ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("sales.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_override() {
        let path = get_database_path(Some(PathBuf::from("/tmp/mart/sales.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/mart/sales.db"));
    }
}
