//! Serde helpers for the way the backend encodes decimals and dates.
//!
//! Decimal columns may arrive as JSON numbers or as numeric strings (e.g.
//! `"1500.00"`), so both are accepted. Non-finite values are rejected rather
//! than passed through to the formatters. Dates travel as `YYYY-MM-DD`; any
//! trailing time component is ignored when reading.

use serde::{Deserialize, Deserializer, Serializer, de};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// The date format used on the wire, `YYYY-MM-DD`.
pub const ISO_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Parse the `YYYY-MM-DD` prefix of `text`.
///
/// Returns `None` if `text` does not start with a valid calendar date.
pub fn parse_iso_date(text: &str) -> Option<Date> {
    let prefix = text.trim().get(..10)?;
    Date::parse(prefix, ISO_DATE_FORMAT).ok()
}

/// Render `date` as `YYYY-MM-DD`.
pub fn format_iso_date(date: Date) -> String {
    // Formatting a date with a static date-only description cannot fail.
    date.format(ISO_DATE_FORMAT).unwrap_or_default()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn to_finite(value: NumberOrText) -> Result<f64, String> {
    let number = match value {
        NumberOrText::Number(number) => number,
        NumberOrText::Text(text) => text
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .map_err(|_| format!("\"{text}\" is not a decimal number"))?,
    };

    if number.is_finite() {
        Ok(number)
    } else {
        Err(format!("{number} is not a finite decimal number"))
    }
}

/// A required decimal that may be encoded as a number or a numeric string.
pub mod decimal {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = NumberOrText::deserialize(deserializer)?;
        to_finite(value).map_err(de::Error::custom)
    }
}

/// An optional decimal, `null` or missing maps to `None`.
///
/// Fields using this module also need `#[serde(default)]`.
pub mod optional_decimal {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_some(value),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Option::<NumberOrText>::deserialize(deserializer)?
            .map(|value| to_finite(value).map_err(de::Error::custom))
            .transpose()
    }
}

/// A `YYYY-MM-DD` date.
pub mod iso_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_iso_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_iso_date(&text)
            .ok_or_else(|| de::Error::custom(format!("\"{text}\" is not a YYYY-MM-DD date")))
    }
}

/// An optional `YYYY-MM-DD` date, only used by update payloads.
pub mod optional_iso_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_some(&format_iso_date(*date)),
            None => serializer.serialize_none(),
        }
    }
}
