//! # Seed Data Generator
//!
//! Populates the database with demo invoices for development.
//!
//! ## Usage
//! ```bash
//! # 50 invoices dated today (default)
//! cargo run -p mart-db --bin seed
//!
//! # Custom amount, date and database
//! cargo run -p mart-db --bin seed -- --count 500 --date 2024-01-01 --db ./data/sales.db
//! ```
//!
//! ## Generated Invoices
//! Every invoice goes through the same ID generator and persister the entry
//! form uses, so the IDs are sequential and every row is priced the same
//! way. Each invoice has 1-4 product lines with prices between 10.00 and
//! 99.99.

use chrono::{Local, NaiveDate, NaiveTime};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mart_core::types::{
    City, CustomerType, Gender, InvoiceDetails, InvoiceHeader, PaymentMethod, ProductLine,
    ProductLineEntry,
};
use mart_core::validation::parse_date;
use mart_core::{Money, DEFAULT_TAX_RATE};
use mart_db::{Database, DbConfig};

/// Seed a sales database with demo invoices.
#[derive(Debug, Parser)]
#[command(name = "seed", version, about)]
struct Args {
    /// Number of invoices to generate
    #[arg(short, long, default_value_t = 50)]
    count: usize,

    /// Database file path
    #[arg(short, long, default_value = "./mart_dev.db")]
    db: String,

    /// Invoice date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let date: NaiveDate = match args.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Local::now().date_naive(),
    };

    println!("🌱 Mart Sales Seed Data Generator");
    println!("=================================");
    println!("Database: {}", args.db);
    println!("Invoices: {}", args.count);
    println!("Date:     {}", date);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.sales().count_invoices().await?;
    if existing > 0 {
        println!("  Database already has {} invoices; appending.", existing);
    }

    println!();
    println!("Generating invoices...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut rows = 0;

    for seed in 0..args.count {
        let invoice_id = db.invoices().generate_invoice_id_for(date).await?;
        let header = InvoiceHeader::new(invoice_id, generate_details(date, seed));
        let entries = generate_entries(seed);

        match db
            .sales()
            .persist_invoice(&header, &entries, DEFAULT_TAX_RATE)
            .await
        {
            Ok(written) => {
                generated += 1;
                rows += written;
            }
            Err(e) => {
                eprintln!("Failed to insert {}: {}", header.invoice_id, e);
                continue;
            }
        }

        if generated % 100 == 0 {
            println!("  Generated {} invoices...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} invoices ({} rows) in {:?}",
        generated, rows, elapsed
    );
    println!("  Total rows in sales: {}", db.sales().count_rows().await?);

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Invoice-level fields, cycling through every picker value.
fn generate_details(date: NaiveDate, seed: usize) -> InvoiceDetails {
    let minutes = (9 * 60 + (seed * 7) % (12 * 60)) as u32;
    let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN);

    let mut details = InvoiceDetails::new(date, time);
    details.city = City::ALL[seed % City::ALL.len()];
    details.customer_type = CustomerType::ALL[(seed / 2) % CustomerType::ALL.len()];
    details.gender = Gender::ALL[(seed / 3) % Gender::ALL.len()];
    details.payment = PaymentMethod::ALL[(seed / 5) % PaymentMethod::ALL.len()];
    details.rating = 1 + (seed % 10) as u8;
    details
}

/// Between one and four product lines with deterministic prices.
fn generate_entries(seed: usize) -> Vec<ProductLineEntry> {
    let lines = 1 + seed % 4;
    (0..lines)
        .map(|i| {
            let n = seed * 31 + i * 17;
            let product_line = ProductLine::ALL[n % ProductLine::ALL.len()];
            let unit_price = Money::from_cents(1_000 + ((n * 137) % 9_000) as i64);
            let quantity = 1 + (n % 10) as i64;
            ProductLineEntry::new(product_line, unit_price, quantity)
        })
        .collect()
}
