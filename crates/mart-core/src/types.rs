//! # Domain Types
//!
//! Core domain types used throughout the sales entry system.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │ ProductLineEntry │   │  InvoiceHeader   │   │ PersistedSaleRow │    │
//! │  │ ──────────────── │   │ ──────────────── │   │ ──────────────── │    │
//! │  │ product_line     │   │ invoice_id       │   │ header fields    │    │
//! │  │ unit_price       │   │ city → branch    │   │ + entry fields   │    │
//! │  │ quantity         │   │ customer, gender │   │ + tax/total/cogs │    │
//! │  └──────────────────┘   │ date, time, pay  │   │ + margin, income │    │
//! │                         │ rating           │   │ + month, year    │    │
//! │                         └──────────────────┘   └──────────────────┘    │
//! │                                                                         │
//! │  Form pickers: City, Branch, CustomerType, Gender, PaymentMethod,      │
//! │                ProductLine                                             │
//! │  Rates:        TaxRate (bps), Percent (hundredths of a percent)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Labels
//! Every picker enum carries the exact label stored in the `sales` table
//! (`"Credit card"`, `"Health and beauty"`, ...). Serde, sqlx and parsing all
//! use that label, so the form, the JSON view and the database agree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::DEFAULT_RATING;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5.00% (the `Tax 5%` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        crate::DEFAULT_TAX_RATE
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage held in hundredths of a percent (`476` = 4.76%).
///
/// Used for the gross margin percentage, which is persisted rounded to two
/// decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Percent(i64);

impl Percent {
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Percent(hundredths)
    }

    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

// =============================================================================
// Labeled Enums
// =============================================================================

/// Declares a picker enum whose variants map one-to-one onto stored labels.
///
/// Generates `ALL`, `as_str`, `labels`, `Display` and a case-insensitive
/// `FromStr` that reports the allowed labels on failure.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                #[cfg_attr(feature = "sqlx", sqlx(rename = $label))]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in form order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The label stored in the database and shown in the form.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// All labels, in form order.
            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ValidationError::NotAllowed {
                        field: $field.to_string(),
                        allowed: Self::labels().into_iter().map(String::from).collect(),
                    })
            }
        }
    };
}

labeled_enum! {
    /// City where the sale happened.
    pub enum City as "city" {
        Yangon => "Yangon",
        Mandalay => "Mandalay",
        Naypyitaw => "Naypyitaw",
        /// Any city without a branch of its own.
        Others => "Others",
    }
}

labeled_enum! {
    /// Store branch, derived from the city.
    pub enum Branch as "branch" {
        A => "A",
        B => "B",
        C => "C",
        /// Explicit "no branch" marker for cities outside the branch map.
        Unassigned => "N/A",
    }
}

labeled_enum! {
    /// Loyalty status of the customer.
    pub enum CustomerType as "customer type" {
        Normal => "Normal",
        Member => "Member",
    }
}

labeled_enum! {
    pub enum Gender as "gender" {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

labeled_enum! {
    /// How the customer paid.
    pub enum PaymentMethod as "payment" {
        Cash => "Cash",
        CreditCard => "Credit card",
        Ewallet => "Ewallet",
    }
}

labeled_enum! {
    /// Product category of a line.
    pub enum ProductLine as "product line" {
        HealthAndBeauty => "Health and beauty",
        ElectronicAccessories => "Electronic accessories",
        HomeAndLifestyle => "Home and lifestyle",
        SportsAndTravel => "Sports and travel",
        FoodAndBeverages => "Food and beverages",
        FashionAccessories => "Fashion accessories",
    }
}

impl City {
    /// Maps a city onto its branch.
    ///
    /// ```text
    /// Yangon    → A
    /// Mandalay  → B
    /// Naypyitaw → C
    /// Others    → N/A (Branch::Unassigned)
    /// ```
    pub const fn branch(&self) -> Branch {
        match self {
            City::Yangon => Branch::A,
            City::Mandalay => Branch::B,
            City::Naypyitaw => Branch::C,
            City::Others => Branch::Unassigned,
        }
    }
}

impl Default for City {
    fn default() -> Self {
        City::Yangon
    }
}

impl Default for CustomerType {
    fn default() -> Self {
        CustomerType::Normal
    }
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Male
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Product Line Entry
// =============================================================================

/// One product line on the invoice being built.
///
/// Price and quantity are checked at the input boundary
/// (see [`crate::validation::validate_entry`]); the ledger stores what it is
/// given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLineEntry {
    pub product_line: ProductLine,
    pub unit_price: Money,
    pub quantity: i64,
}

impl ProductLineEntry {
    pub fn new(product_line: ProductLine, unit_price: Money, quantity: i64) -> Self {
        ProductLineEntry {
            product_line,
            unit_price,
            quantity,
        }
    }

    /// Cost of goods sold: unit price × quantity, before tax.
    ///
    /// ## Errors
    /// `AmountOverflow` when the product does not fit in `Money`.
    pub fn cogs(&self) -> CoreResult<Money> {
        self.unit_price
            .multiply_quantity(self.quantity)
            .ok_or_else(|| CoreError::AmountOverflow {
                what: format!("{} cost", self.product_line),
            })
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// Invoice-level form fields, everything except the invoice ID.
///
/// ## Defaults
/// Mirrors a fresh form: Yangon, Normal, Male, Cash, rating 5. Date and
/// time come from the caller because this crate never reads the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    pub city: City,
    pub customer_type: CustomerType,
    pub gender: Gender,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub payment: PaymentMethod,
    pub rating: u8,
}

impl InvoiceDetails {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        InvoiceDetails {
            city: City::default(),
            customer_type: CustomerType::default(),
            gender: Gender::default(),
            date,
            time,
            payment: PaymentMethod::default(),
            rating: DEFAULT_RATING,
        }
    }

    #[inline]
    pub fn branch(&self) -> Branch {
        self.city.branch()
    }
}

/// A submitted invoice's header: its ID plus the form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    pub invoice_id: String,
    #[serde(flatten)]
    pub details: InvoiceDetails,
}

impl InvoiceHeader {
    pub fn new(invoice_id: impl Into<String>, details: InvoiceDetails) -> Self {
        InvoiceHeader {
            invoice_id: invoice_id.into(),
            details,
        }
    }

    #[inline]
    pub fn branch(&self) -> Branch {
        self.details.branch()
    }
}

// =============================================================================
// Persisted Sale Row
// =============================================================================

/// One row of the `sales` table.
///
/// An invoice with N product lines becomes N rows. Header fields are
/// duplicated onto every row; the computed fields are per line.
///
/// ## Column Mapping
/// ```text
/// invoice_id         → "Invoice ID"       cogs          → "cogs"
/// branch             → "Branch"           gross_margin  → "gross margin percentage"
/// city               → "City"             gross_income  → "gross income"
/// customer_type      → "Customer type"    rating        → "Rating"
/// gender             → "Gender"           month         → "Month"
/// product_line       → "Product line"     year          → "Year"
/// unit_price         → "Unit price"       date / time   → "Date" / "Time"
/// quantity           → "Quantity"         payment       → "Payment"
/// tax                → "Tax 5%"           total         → "Total"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSaleRow {
    pub invoice_id: String,
    pub branch: Branch,
    pub city: City,
    pub customer_type: CustomerType,
    pub gender: Gender,
    pub product_line: ProductLine,
    pub unit_price: Money,
    pub quantity: i64,
    pub tax: Money,
    pub total: Money,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub payment: PaymentMethod,
    pub cogs: Money,
    pub gross_margin: Percent,
    pub gross_income: Money,
    pub rating: u8,
    pub month: u32,
    pub year: i32,
}

impl PersistedSaleRow {
    /// Month number (1-12) of an invoice date, as stored in `Month`.
    pub fn month_of(date: NaiveDate) -> u32 {
        date.month()
    }

    /// Calendar year of an invoice date, as stored in `Year`.
    pub fn year_of(date: NaiveDate) -> i32 {
        date.year()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
