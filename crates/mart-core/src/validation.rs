//! # Validation Module
//!
//! Input boundary checks for the sales entry form.
//!
//! ```text
//! "add 25.99 2 Food and beverages"
//!       │     │  └──────────────── ProductLine::from_str   (label set)
//!       │     └─────────────────── parse_quantity          (1..=9999)
//!       └───────────────────────── parse_unit_price        (0.01..=10M, 2 dp)
//!
//! "set rating 7" ──► parse_rating (1..=10)
//! "set date 2024-03-09" / "set time 13:08" ──► parse_date / parse_time
//! ```
//!
//! The `sales` table repeats the range checks as CHECK constraints.
//!
//! ## Usage
//! ```rust
//! use mart_core::validation::{parse_quantity, parse_unit_price};
//!
//! let price = parse_unit_price("100").unwrap();
//! let qty = parse_quantity("3").unwrap();
//! assert_eq!(price.multiply_quantity(qty).unwrap().cents(), 30_000);
//!
//! assert!(parse_unit_price("0").is_err());
//! assert!(parse_quantity("0").is_err());
//! ```

use chrono::{NaiveDate, NaiveTime};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductLineEntry;
use crate::{MAX_LINE_QUANTITY, MAX_RATING, MAX_UNIT_PRICE, MIN_RATING};

pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// `0.01..=MAX_UNIT_PRICE`. The range error is reported in cents.
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "unit price".to_string(),
        });
    }

    if price > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "unit price (cents)".to_string(),
            min: 1,
            max: MAX_UNIT_PRICE.cents(),
        });
    }

    Ok(())
}

/// `1..=MAX_LINE_QUANTITY`.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a customer rating and narrows it to `u8`.
///
/// ## Example
/// ```rust
/// use mart_core::validation::validate_rating;
///
/// assert_eq!(validate_rating(7).unwrap(), 7);
/// assert!(validate_rating(0).is_err());
/// assert!(validate_rating(11).is_err());
/// ```
pub fn validate_rating(rating: i64) -> ValidationResult<u8> {
    if rating < MIN_RATING as i64 || rating > MAX_RATING as i64 {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING as i64,
            max: MAX_RATING as i64,
        });
    }

    Ok(rating as u8)
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a product line entry before it reaches the ledger.
pub fn validate_entry(entry: &ProductLineEntry) -> ValidationResult<()> {
    validate_unit_price(entry.unit_price)?;
    validate_quantity(entry.quantity)?;
    Ok(())
}

// =============================================================================
// Parsers
// =============================================================================

/// Parses and validates a typed unit price.
pub fn parse_unit_price(input: &str) -> ValidationResult<Money> {
    let price: Money = input.parse().map_err(|err| rename_field(err, "unit price"))?;
    validate_unit_price(price)?;
    Ok(price)
}

/// Parses and validates a typed quantity.
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    let qty: i64 = input.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: "expected a whole number".to_string(),
    })?;
    validate_quantity(qty)?;
    Ok(qty)
}

/// Parses and validates a typed rating.
pub fn parse_rating(input: &str) -> ValidationResult<u8> {
    let rating: i64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "rating".to_string(),
            reason: "expected a whole number".to_string(),
        })?;
    validate_rating(rating)
}

/// Parses an invoice date in `YYYY-MM-DD` form.
pub fn parse_date(input: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

/// Parses an invoice time in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time(input: &str) -> ValidationResult<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .map_err(|_| ValidationError::InvalidFormat {
            field: "time".to_string(),
            reason: "expected HH:MM or HH:MM:SS".to_string(),
        })
}

/// Re-labels the field of an error produced by a generic parser.
fn rename_field(err: ValidationError, field: &str) -> ValidationError {
    let field = field.to_string();
    match err {
        ValidationError::Required { .. } => ValidationError::Required { field },
        ValidationError::OutOfRange { min, max, .. } => {
            ValidationError::OutOfRange { field, min, max }
        }
        ValidationError::MustBePositive { .. } => ValidationError::MustBePositive { field },
        ValidationError::InvalidFormat { reason, .. } => {
            ValidationError::InvalidFormat { field, reason }
        }
        ValidationError::NotAllowed { allowed, .. } => {
            ValidationError::NotAllowed { field, allowed }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
