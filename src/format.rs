//! Display formatting for amounts, dates, flags and rates.
//!
//! These functions never fail: values that cannot be shown are rendered as
//! [MISSING].

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{records::wire::parse_iso_date, table::CellValue};

/// The placeholder for a missing or unrenderable value.
pub const MISSING: &str = "-";

/// The longest description shown in a table cell before it is truncated.
pub const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year]");

/// Format `amount` as rupees with two decimals and thousands separators.
///
/// The amount is rounded to the nearest paisa, so `999.999` shows as
/// `₹1,000.00`. Negative amounts are prefixed with `-₹`, `None` and non-finite
/// amounts render as [MISSING].
pub fn format_amount(amount: Option<f64>) -> String {
    let Some(amount) = amount.filter(|amount| amount.is_finite()) else {
        return MISSING.to_owned();
    };

    let paise = (amount.abs() * 100.0).round();
    let rupees = group_thousands(&format!("{:.0}", (paise / 100.0).trunc()));
    let fraction = (paise % 100.0) as u8;
    // Amounts that round to zero lose their sign.
    let sign = if amount < 0.0 && paise > 0.0 { "-" } else { "" };

    format!("{sign}₹{rupees}.{fraction:02}")
}

/// Insert a comma between every group of three digits, e.g. "1234567" becomes "1,234,567".
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

/// Format an ISO `YYYY-MM-DD` date (optionally followed by a time) as `DD/MM/YYYY`.
///
/// Text that is already `DD/MM/YYYY` is returned unchanged, anything else
/// renders as [MISSING].
pub fn format_date(text: &str) -> String {
    let text = text.trim();

    if let Some(date) = parse_iso_date(text) {
        return format_display_date(date);
    }

    if Date::parse(text, DISPLAY_DATE_FORMAT).is_ok() {
        return text.to_owned();
    }

    MISSING.to_owned()
}

/// Format `date` as `DD/MM/YYYY`.
pub fn format_display_date(date: Date) -> String {
    date.format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| MISSING.to_owned())
}

pub fn format_bool(value: Option<bool>) -> String {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => MISSING,
    }
    .to_owned()
}

/// Format an interest rate given as a percentage, e.g. `12.5%`.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate.filter(|rate| rate.is_finite()) {
        Some(rate) => format!("{rate}%"),
        None => MISSING.to_owned(),
    }
}

/// Shorten `description` to [MAX_DESCRIPTION_GRAPHEMES] user perceived characters.
///
/// Returns the text to display and, if it was shortened, the full text for a tooltip.
pub fn truncate_description(description: &str) -> (String, Option<&str>) {
    if description.graphemes(true).count() <= MAX_DESCRIPTION_GRAPHEMES {
        return (description.to_owned(), None);
    }

    let truncated: String = description
        .graphemes(true)
        .take(MAX_DESCRIPTION_GRAPHEMES - 3)
        .collect();

    (truncated + "...", Some(description))
}

/// The default rendering of a table cell.
pub fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Null => MISSING.to_owned(),
        CellValue::Bool(value) => format_bool(Some(*value)),
        CellValue::Number(value) if value.is_finite() => value.to_string(),
        CellValue::Number(_) => MISSING.to_owned(),
        CellValue::Text(text) if text.is_empty() => MISSING.to_owned(),
        CellValue::Text(text) => text.clone(),
        CellValue::Date(date) => format_display_date(*date),
    }
}
