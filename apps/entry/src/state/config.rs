//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. CLI flags (`--tax-rate`, `--currency-symbol`)
//! 2. Environment variables (`MART_*`)
//! 3. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use tracing::warn;

use mart_core::validation::validate_tax_rate_bps;
use mart_core::{Money, TaxRate, ValidationError, DEFAULT_TAX_RATE};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown in the form banner)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Sales tax rate in basis points
    /// e.g., 500 = 5.00%
    pub tax_rate_bps: u32,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Mart Sales"
    /// - Currency: ₹
    /// - Tax: 5%
    fn default() -> Self {
        ConfigState {
            store_name: "Mart Sales".to_string(),
            currency_symbol: "₹".to_string(),
            tax_rate_bps: DEFAULT_TAX_RATE.bps(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `MART_STORE_NAME`: Override store name
    /// - `MART_CURRENCY_SYMBOL`: Override currency symbol
    /// - `MART_TAX_RATE`: Override tax rate as a percentage (e.g., "5")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] with an explicit variable source.
    ///
    /// An unparseable `MART_TAX_RATE` is logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("MART_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("MART_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(raw) = lookup("MART_TAX_RATE") {
            match parse_tax_rate(&raw) {
                Ok(rate) => config.tax_rate_bps = rate.bps(),
                Err(e) => warn!(value = %raw, "Ignoring MART_TAX_RATE: {}", e),
            }
        }

        config
    }

    /// Applies CLI flags on top of the environment/defaults.
    pub fn with_overrides(
        mut self,
        tax_rate: Option<&str>,
        currency_symbol: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if let Some(raw) = tax_rate {
            self.tax_rate_bps = parse_tax_rate(raw)?.bps();
        }
        if let Some(symbol) = currency_symbol {
            self.currency_symbol = symbol.to_string();
        }
        Ok(self)
    }

    /// The configured tax rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "₹12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}

/// Parses a tax rate typed as a percentage (`"5"`, `"8.25"`).
pub fn parse_tax_rate(input: &str) -> Result<TaxRate, ValidationError> {
    let pct: f64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "tax rate".to_string(),
            reason: "expected a percentage such as 5 or 8.25".to_string(),
        })?;

    if !pct.is_finite() || pct < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 100,
        });
    }

    let rate = TaxRate::from_percentage(pct);
    validate_tax_rate_bps(rate.bps())?;
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(31_500)), "₹315.00");
        assert_eq!(config.format_currency(Money::from_cents(1)), "₹0.01");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-₹12.34");
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert_eq!(config.tax_rate(), DEFAULT_TAX_RATE);
        assert_eq!(config.currency_symbol, "₹");
    }

    #[test]
    fn test_env_then_cli_precedence() {
        let vars: HashMap<&str, &str> = [
            ("MART_STORE_NAME", "Branch C Till 2"),
            ("MART_CURRENCY_SYMBOL", "K"),
            ("MART_TAX_RATE", "7"),
        ]
        .into_iter()
        .collect();

        let config = ConfigState::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.store_name, "Branch C Till 2");
        assert_eq!(config.currency_symbol, "K");
        assert_eq!(config.tax_rate_bps, 700);

        let config = config.with_overrides(Some("8.25"), Some("$")).unwrap();
        assert_eq!(config.tax_rate_bps, 825);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.store_name, "Branch C Till 2");
    }

    #[test]
    fn test_bad_env_tax_rate_is_ignored() {
        let config = ConfigState::from_lookup(|key| {
            (key == "MART_TAX_RATE").then(|| "five".to_string())
        });
        assert_eq!(config.tax_rate_bps, 500);
    }

    #[test]
    fn test_bad_cli_tax_rate_is_rejected() {
        assert!(ConfigState::default().with_overrides(Some("-1"), None).is_err());
        assert!(ConfigState::default().with_overrides(Some("101"), None).is_err());
        assert!(ConfigState::default().with_overrides(Some("abc"), None).is_err());
    }
}
