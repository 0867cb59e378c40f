//! # Command-Line Flags
//!
//! ```text
//! mart-entry [--db <path>] [--output text|json]
//!            [--tax-rate <percent>] [--currency-symbol <symbol>]
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Sales invoice entry form.
#[derive(Debug, Clone, Parser)]
#[command(name = "mart-entry", version, about)]
pub struct Cli {
    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, env = "MART_DB_PATH")]
    pub db: Option<PathBuf>,

    /// How responses are written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Sales tax rate as a percentage, e.g. 5 or 8.25 (overrides MART_TAX_RATE)
    #[arg(long)]
    pub tax_rate: Option<String>,

    /// Currency symbol used in the text view (overrides MART_CURRENCY_SYMBOL)
    #[arg(long)]
    pub currency_symbol: Option<String>,
}

/// Response rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable invoice table
    Text,
    /// One JSON object per line
    Json,
}
