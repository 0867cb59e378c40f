//! # Invoice ID Format
//!
//! Pure helpers for the `INV-YYYYMMDD-NNN` invoice identifiers.
//!
//! ## Format
//! ```text
//! INV-20240101-007
//! └┬┘ └──┬───┘ └┬┘
//!  │     │      └── per-day sequence, zero-padded to 3 digits
//!  │     └───────── invoice date
//!  └─────────────── fixed tag
//! ```
//!
//! Padding is cosmetic: the 1000th invoice of a day is `INV-20240101-1000`.
//!
//! Reading existing IDs and reserving the next one is a database concern and
//! lives in `mart-db`; this module only does the string work.

use chrono::NaiveDate;

/// Fixed tag every invoice ID starts with.
pub const INVOICE_TAG: &str = "INV";

/// Minimum width of the sequence suffix.
pub const SEQUENCE_WIDTH: usize = 3;

/// Day prefix for a date: `INV-YYYYMMDD`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use mart_core::invoice_id::prefix_for;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(prefix_for(date), "INV-20240101");
/// ```
pub fn prefix_for(date: NaiveDate) -> String {
    format!("{}-{}", INVOICE_TAG, date.format("%Y%m%d"))
}

/// Trailing numeric sequence of an ID, if it has one.
///
/// Only the part after the last `-` counts. IDs whose tail is not all
/// digits return `None` and are ignored by [`next_sequence`].
pub fn parse_suffix(invoice_id: &str) -> Option<u32> {
    let (_, tail) = invoice_id.rsplit_once('-')?;
    if tail.is_empty() || !tail.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok()
}

/// Next sequence number after the given IDs and a reserved floor.
///
/// `floor` is the highest sequence already handed out for the day, whether
/// or not it was ever persisted. Returns `max(max_suffix, floor) + 1`.
pub fn next_sequence<'a, I>(existing_ids: I, floor: u32) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    existing_ids
        .into_iter()
        .filter_map(parse_suffix)
        .fold(floor, u32::max)
        .saturating_add(1)
}

/// Joins a day prefix and a sequence: `INV-20240101` + 8 → `INV-20240101-008`.
pub fn format_invoice_id(prefix: &str, sequence: u32) -> String {
    format!("{}-{:0width$}", prefix, sequence, width = SEQUENCE_WIDTH)
}

/// Next invoice ID for `date` given the IDs already stored for that day.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use mart_core::invoice_id::next_invoice_id;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(next_invoice_id(date, Vec::<&str>::new()), "INV-20240101-001");
/// assert_eq!(
///     next_invoice_id(date, ["INV-20240101-001", "INV-20240101-007"]),
///     "INV-20240101-008"
/// );
/// ```
pub fn next_invoice_id<'a, I>(date: NaiveDate, existing_ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    format_invoice_id(&prefix_for(date), next_sequence(existing_ids, 0))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn new_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_prefix() {
        assert_eq!(prefix_for(new_year()), "INV-20240101");
        assert_eq!(
            prefix_for(NaiveDate::from_ymd_opt(2025, 11, 30).unwrap()),
            "INV-20251130"
        );
    }

    #[test]
    fn test_first_invoice_of_the_day() {
        assert_eq!(next_invoice_id(new_year(), Vec::<&str>::new()), "INV-20240101-001");
    }

    #[test]
    fn test_next_after_gap() {
        let ids = ["INV-20240101-001", "INV-20240101-007"];
        assert_eq!(next_invoice_id(new_year(), ids), "INV-20240101-008");
    }

    #[test]
    fn test_padding_is_cosmetic() {
        assert_eq!(format_invoice_id("INV-20240101", 999), "INV-20240101-999");
        assert_eq!(
            next_invoice_id(new_year(), ["INV-20240101-999"]),
            "INV-20240101-1000"
        );
        assert_eq!(
            next_invoice_id(new_year(), ["INV-20240101-1000", "INV-20240101-998"]),
            "INV-20240101-1001"
        );
    }

    #[test]
    fn test_parse_suffix() {
        assert_eq!(parse_suffix("INV-20240101-007"), Some(7));
        assert_eq!(parse_suffix("INV-20240101-1000"), Some(1000));
        assert_eq!(parse_suffix("INV-20240101-"), None);
        assert_eq!(parse_suffix("INV-20240101-00x"), None);
        assert_eq!(parse_suffix("garbage"), None);
    }

    #[test]
    fn test_floor_wins_over_stored_ids() {
        // Sequence 5 was reserved but never submitted.
        let next = next_sequence(["INV-20240101-003"], 5);
        assert_eq!(next, 6);

        let next = next_sequence(["INV-20240101-009"], 5);
        assert_eq!(next, 10);
    }

    #[test]
    fn test_malformed_ids_are_ignored() {
        let ids = ["INV-20240101-002", "INV-20240101-abc"];
        assert_eq!(next_invoice_id(new_year(), ids), "INV-20240101-003");
    }
}
