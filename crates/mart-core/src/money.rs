//! # Money
//!
//! Invoice amounts as whole cents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Amounts on an invoice                                                  │
//! │                                                                         │
//! │  typed "25.99" ──► Money(2599)          exact, or rejected              │
//! │                        │                                                │
//! │                        ├──► multiply_quantity cogs, checked             │
//! │                        ├──► calculate_tax     half up, to the cent      │
//! │                        └──► checked_sum       invoice total             │
//! │                                                                         │
//! │  0.1 + 0.2 != 0.3 in f64, so nothing here touches floats. The sales     │
//! │  table stores REAL, converted once at the storage boundary.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust
//! use mart_core::money::Money;
//!
//! let unit: Money = "25.99".parse().unwrap();
//! let cogs = unit.multiply_quantity(2).unwrap();
//! assert_eq!(cogs, Money::from_cents(5_198));
//! assert_eq!(cogs.to_string(), "51.98");
//!
//! assert_eq!(Money::from_cents(i64::MAX).multiply_quantity(2), None);
//! ```
//!
//! Invoice amounts are combined with `multiply_quantity` and the
//! `checked_*` helpers, which return `None` instead of wrapping. The `+` and
//! `-` operators are for amounts already known to be small.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::TaxRate;

/// Signed so that differences stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Tax on this amount, half up to the cent.
    ///
    /// `(cents * bps + 5000) / 10000`, widened to i128 for the product.
    ///
    /// ```rust
    /// use mart_core::money::Money;
    /// use mart_core::types::TaxRate;
    ///
    /// let five_percent = TaxRate::from_bps(500);
    /// assert_eq!(Money::from_cents(30_000).calculate_tax(five_percent).cents(), 1_500);
    /// assert_eq!(Money::from_cents(10).calculate_tax(five_percent).cents(), 1);
    /// ```
    ///
    /// Saturates for rates above 100% on huge amounts; the checked line
    /// total then rejects the result.
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        let clamped = tax_cents.clamp(i64::MIN as i128, i64::MAX as i128);
        Money(clamped as i64)
    }

    /// Unit price × quantity, `None` on overflow.
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    #[inline]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Sum of `amounts`, `None` if any partial sum overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal amount as typed into the form.
///
/// Accepts `"12"`, `"12.5"`, `"12.50"` and `".75"`. More than two fractional
/// digits is rejected rather than rounded: the clerk typed a price that
/// cannot be charged.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("expected digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected a number like 12.50"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount is too large"))?
        };
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("bad cents"))? * 10,
            _ => frac.parse().map_err(|_| invalid("bad cents"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Operators
// =============================================================================

/// `315.00`. The currency symbol is added by the app.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> i64 {
        s.parse::<Money>().unwrap().cents()
    }

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Money::from_cents(31_500).to_string(), "315.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::default().to_string(), "0.00");
    }

    #[test]
    fn test_parse_typed_prices() {
        assert_eq!(parse("100"), 10_000);
        assert_eq!(parse("12.5"), 1_250);
        assert_eq!(parse("12.50"), 1_250);
        assert_eq!(parse(" 0.01 "), 1);
        assert_eq!(parse(".75"), 75);
        assert_eq!(parse("-3.10"), -310);
    }

    #[test]
    fn test_parse_rejects_uncharged_or_garbled_input() {
        assert!(matches!(
            "  ".parse::<Money>(),
            Err(ValidationError::Required { .. })
        ));
        for bad in ["12.345", "abc", "1.2.3", ".", "1e3", "99999999999999999999"] {
            assert!(bad.parse::<Money>().is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_invoice_arithmetic() {
        let food = Money::from_cents(10_000).multiply_quantity(3).unwrap();
        let beauty = Money::from_cents(1_000).multiply_quantity(1).unwrap();

        assert_eq!(food - beauty, Money::from_cents(29_000));

        let total = Money::checked_sum([food, beauty]).unwrap();
        assert_eq!(total.cents(), 31_000);
        assert_eq!(total, food + beauty);
        assert!(total.is_positive());
        assert!((total - total).is_zero());
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));
    }

    #[test]
    fn test_overflow_is_reported_not_wrapped() {
        let huge = Money::from_cents(9_999_999_999_999_900);
        assert_eq!(huge.multiply_quantity(9_999), None);
        assert_eq!(
            Money::checked_sum([Money::from_cents(i64::MAX), Money::from_cents(1)]),
            None
        );
        assert_eq!(
            Money::from_cents(i64::MAX).calculate_tax(TaxRate::from_bps(20_000)),
            Money::from_cents(i64::MAX)
        );
    }

    #[test]
    fn test_tax_half_up_boundary() {
        let rate = TaxRate::from_bps(500);
        // 0.005 rounds up, 0.0045 rounds down
        assert_eq!(Money::from_cents(10).calculate_tax(rate).cents(), 1);
        assert_eq!(Money::from_cents(9).calculate_tax(rate).cents(), 0);
        assert_eq!(Money::from_cents(5_198).calculate_tax(rate).cents(), 260);
    }

    #[test]
    fn test_tax_does_not_overflow_large_amounts() {
        let big = Money::from_cents(i64::MAX / 100);
        let tax = big.calculate_tax(TaxRate::from_bps(100));
        assert_eq!(tax.cents(), (i64::MAX / 100 + 50) / 100);
    }
}
