//! Parsing of raw form input into the typed values of a creation payload.
//!
//! Every parser returns the message to show next to the field when the input
//! is rejected. [FieldErrors] collects those messages per field so a form can
//! report all of its problems at once.

use std::{collections::BTreeMap, str::FromStr};

use time::Date;

use crate::records::{UnknownVariant, wire::ISO_DATE_FORMAT};

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required";

/// The validation errors of a submitted form, keyed by input name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The error message for the input named `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Keep the value of a successful parse, or record the error for `field`.
    pub(crate) fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.0.insert(field, message);
                None
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// A required free text field, trimmed.
pub(crate) fn required_text(value: Option<&str>) -> Result<String, String> {
    non_empty(value)
        .map(str::to_owned)
        .ok_or_else(|| REQUIRED_MESSAGE.to_owned())
}

/// An optional free text field. Blank input is `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Result<Option<String>, String> {
    Ok(non_empty(value).map(str::to_owned))
}

fn parse_finite(text: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| format!("\"{text}\" is not a valid number"))
}

/// A required decimal such as an amount, balance or interest rate.
pub(crate) fn required_decimal(value: Option<&str>) -> Result<f64, String> {
    let text = non_empty(value).ok_or_else(|| REQUIRED_MESSAGE.to_owned())?;
    parse_finite(text)
}

/// An optional decimal such as an EMI amount. Blank input is `None`.
pub(crate) fn optional_decimal(value: Option<&str>) -> Result<Option<f64>, String> {
    non_empty(value).map(parse_finite).transpose()
}

/// An optional tenure in months: a whole number, zero or more.
pub(crate) fn optional_tenure(value: Option<&str>) -> Result<Option<i64>, String> {
    non_empty(value)
        .map(|text| {
            text.parse::<i64>()
                .ok()
                .filter(|months| *months >= 0)
                .ok_or_else(|| format!("\"{text}\" is not a whole number of months"))
        })
        .transpose()
}

/// A required calendar date in `YYYY-MM-DD` form, as sent by date inputs.
pub(crate) fn required_date(value: Option<&str>) -> Result<Date, String> {
    let text = non_empty(value).ok_or_else(|| REQUIRED_MESSAGE.to_owned())?;
    Date::parse(text, ISO_DATE_FORMAT).map_err(|_| format!("\"{text}\" is not a valid date"))
}

/// A required member of a closed set, given by its wire spelling.
pub(crate) fn required_choice<T>(value: Option<&str>) -> Result<T, String>
where
    T: FromStr<Err = UnknownVariant>,
{
    let text = non_empty(value).ok_or_else(|| REQUIRED_MESSAGE.to_owned())?;
    text.parse::<T>().map_err(|error| error.to_string())
}

/// A checkbox: present (any value) means checked.
pub(crate) fn checkbox(value: Option<&str>) -> bool {
    value.is_some()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::records::{AccountType, PaymentMode};

    use super::{
        FieldErrors, REQUIRED_MESSAGE, optional_decimal, optional_tenure, optional_text,
        required_choice, required_date, required_decimal, required_text,
    };

    #[test]
    fn blank_required_text_is_rejected() {
        assert_eq!(required_text(None), Err(REQUIRED_MESSAGE.to_owned()));
        assert_eq!(required_text(Some("   ")), Err(REQUIRED_MESSAGE.to_owned()));
        assert_eq!(required_text(Some(" Rent ")), Ok("Rent".to_owned()));
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(optional_text(Some("")), Ok(None));
        assert_eq!(optional_text(Some("note")), Ok(Some("note".to_owned())));
    }

    #[test]
    fn decimals_must_be_finite_numbers() {
        assert_eq!(required_decimal(Some("-1500.50")), Ok(-1500.5));
        assert!(required_decimal(Some("abc")).is_err());
        assert!(required_decimal(Some("inf")).is_err());
        assert!(required_decimal(Some("NaN")).is_err());
        assert_eq!(required_decimal(None), Err(REQUIRED_MESSAGE.to_owned()));
        assert_eq!(optional_decimal(Some("")), Ok(None));
        assert_eq!(optional_decimal(Some("2500")), Ok(Some(2500.0)));
    }

    #[test]
    fn tenure_is_a_non_negative_integer() {
        assert_eq!(optional_tenure(Some("12")), Ok(Some(12)));
        assert_eq!(optional_tenure(Some("0")), Ok(Some(0)));
        assert_eq!(optional_tenure(None), Ok(None));
        assert!(optional_tenure(Some("-1")).is_err());
        assert!(optional_tenure(Some("1.5")).is_err());
    }

    #[test]
    fn dates_must_exist_on_the_calendar() {
        assert_eq!(required_date(Some("2024-02-29")), Ok(date!(2024 - 02 - 29)));
        assert!(required_date(Some("2023-02-29")).is_err());
        assert!(required_date(Some("15/01/2024")).is_err());
    }

    #[test]
    fn choices_use_wire_spellings() {
        assert_eq!(
            required_choice::<PaymentMode>(Some("ICICI_CC_9003")),
            Ok(PaymentMode::IciciCc9003)
        );
        assert_eq!(
            required_choice::<AccountType>(Some("Bitcoin")),
            Err("\"Bitcoin\" is not a valid account type".to_owned())
        );
    }

    #[test]
    fn collects_one_error_per_field() {
        let mut errors = FieldErrors::default();

        let amount = errors.check("Amount", required_decimal(Some("ten")));
        let description = errors.check("Description", required_text(Some("Rent")));

        assert_eq!(amount, None);
        assert_eq!(description.as_deref(), Some("Rent"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("Amount"), Some("\"ten\" is not a valid number"));
    }
}
