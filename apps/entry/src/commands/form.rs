//! # Form Commands
//!
//! Header fields (`set <field> <value>`) and the picker options.

use serde::Serialize;
use tracing::debug;

use mart_core::validation::{parse_date, parse_rating, parse_time};
use mart_core::{City, CustomerType, Gender, PaymentMethod, ProductLine, MAX_RATING, MIN_RATING};

use crate::commands::ledger::InvoiceView;
use crate::error::ApiError;
use crate::state::{ConfigState, SessionState};

/// Field names accepted by `set`.
pub const FIELDS: &[&str] = &["city", "customer", "gender", "payment", "date", "time", "rating"];

/// Allowed values for every picker on the form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub cities: Vec<&'static str>,
    pub customer_types: Vec<&'static str>,
    pub genders: Vec<&'static str>,
    pub payments: Vec<&'static str>,
    pub product_lines: Vec<&'static str>,
    pub min_rating: u8,
    pub max_rating: u8,
}

/// Gets the picker options.
pub fn get_options() -> FormOptions {
    debug!("get_options command");
    FormOptions {
        cities: City::labels(),
        customer_types: CustomerType::labels(),
        genders: Gender::labels(),
        payments: PaymentMethod::labels(),
        product_lines: ProductLine::labels(),
        min_rating: MIN_RATING,
        max_rating: MAX_RATING,
    }
}

/// Sets one invoice-level field.
///
/// ## Fields
/// | field      | value                                   |
/// |------------|-----------------------------------------|
/// | `city`     | Yangon, Mandalay, Naypyitaw, Others     |
/// | `customer` | Normal, Member                          |
/// | `gender`   | Male, Female, Other                     |
/// | `payment`  | Cash, Credit card, Ewallet              |
/// | `date`     | `YYYY-MM-DD`                            |
/// | `time`     | `HH:MM` or `HH:MM:SS`                   |
/// | `rating`   | 1-10                                    |
///
/// The branch follows the city; it is never set directly.
pub fn set_field(
    session: &SessionState,
    config: &ConfigState,
    field: &str,
    value: &str,
) -> Result<InvoiceView, ApiError> {
    debug!(field, value, "set_field command");

    let field = field.trim().to_ascii_lowercase();
    session.with_session_mut(|s| -> Result<InvoiceView, ApiError> {
        let details = s.details_mut()?;
        match field.as_str() {
            "city" => details.city = value.parse()?,
            "customer" | "customer-type" | "customer_type" => {
                details.customer_type = value.parse()?
            }
            "gender" => details.gender = value.parse()?,
            "payment" => details.payment = value.parse()?,
            "date" => details.date = parse_date(value)?,
            "time" => details.time = parse_time(value)?,
            "rating" => details.rating = parse_rating(value)?,
            other => {
                return Err(ApiError::invalid_input(format!(
                    "Unknown field '{}'; expected one of: {}",
                    other,
                    FIELDS.join(", ")
                )))
            }
        }
        Ok(InvoiceView::from_session(s, config.tax_rate())?)
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{NaiveDate, NaiveTime};
    use mart_core::{Branch, InvoiceDetails};

    fn building() -> SessionState {
        let state = SessionState::new(InvoiceDetails::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        ));
        state
            .with_session_mut(|s| s.begin("INV-20240101-001"))
            .unwrap();
        state
    }

    #[test]
    fn test_set_fields() {
        let session = building();
        let config = ConfigState::default();

        set_field(&session, &config, "city", "naypyitaw").unwrap();
        set_field(&session, &config, "customer", "Member").unwrap();
        set_field(&session, &config, "gender", "Female").unwrap();
        set_field(&session, &config, "payment", "credit card").unwrap();
        set_field(&session, &config, "date", "2024-03-05").unwrap();
        set_field(&session, &config, "time", "13:08").unwrap();
        let view = set_field(&session, &config, "RATING", "9").unwrap();

        assert_eq!(view.details.city, City::Naypyitaw);
        assert_eq!(view.branch, Branch::C);
        assert_eq!(view.details.customer_type, CustomerType::Member);
        assert_eq!(view.details.gender, Gender::Female);
        assert_eq!(view.details.payment, PaymentMethod::CreditCard);
        assert_eq!(view.details.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(view.details.time, NaiveTime::from_hms_opt(13, 8, 0).unwrap());
        assert_eq!(view.details.rating, 9);
    }

    #[test]
    fn test_others_city_has_no_branch() {
        let session = building();
        let view = set_field(&session, &ConfigState::default(), "city", "Others").unwrap();
        assert_eq!(view.branch, Branch::Unassigned);
    }

    #[test]
    fn test_bad_values_leave_field_unchanged() {
        let session = building();
        let config = ConfigState::default();

        for (field, value) in [
            ("city", "Bago"),
            ("rating", "11"),
            ("rating", "0"),
            ("date", "05/03/2024"),
            ("time", "25:00"),
            ("branch", "A"),
        ] {
            let err = set_field(&session, &config, field, value).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput, "{} {}", field, value);
        }

        let details = session.with_session(|s| s.details().clone());
        assert_eq!(details.city, City::Yangon);
        assert_eq!(details.rating, mart_core::DEFAULT_RATING);
    }

    #[test]
    fn test_options_list_every_label() {
        let options = get_options();
        assert_eq!(options.cities.len(), 4);
        assert_eq!(options.product_lines.len(), 6);
        assert!(options.payments.contains(&"Credit card"));
        assert_eq!((options.min_rating, options.max_rating), (1, 10));
    }
}
