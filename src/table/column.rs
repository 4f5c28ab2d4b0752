use std::cmp::Ordering;

use time::Date;

use crate::{
    format::{format_cell, truncate_description},
    records::wire::format_iso_date,
};

/// The raw value of one table cell, used for sorting, filtering and statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(Date),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(number) if number.is_finite() => Some(*number),
            _ => None,
        }
    }

    /// The text the global filter matches against.
    ///
    /// This is the raw value, not the display string, so amounts match on
    /// `-50` rather than `-₹50.00` and dates on `2024-01-15`.
    pub fn filter_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(value) => Some(value.to_string()),
            CellValue::Number(value) => Some(value.to_string()),
            CellValue::Text(text) => Some(text.clone()),
            CellValue::Date(date) => Some(format_iso_date(*date)),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Number(_) => 2,
            CellValue::Date(_) => 3,
            CellValue::Text(_) => 4,
        }
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(CellValue::Null, CellValue::Text)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(CellValue::Null, CellValue::Number)
    }
}

/// Order two non-null cells.
///
/// Numbers compare numerically, text case-insensitively with a case-sensitive
/// tie break, `true` sorts before `false` and dates compare chronologically.
/// Cells of different kinds are ordered by kind so the result is still total.
pub fn compare_cells(left: &CellValue, right: &CellValue) -> Ordering {
    match (left, right) {
        (CellValue::Number(left), CellValue::Number(right)) => left.total_cmp(right),
        (CellValue::Text(left), CellValue::Text(right)) => left
            .to_lowercase()
            .cmp(&right.to_lowercase())
            .then_with(|| left.cmp(right)),
        (CellValue::Bool(left), CellValue::Bool(right)) => right.cmp(left),
        (CellValue::Date(left), CellValue::Date(right)) => left.cmp(right),
        (left, right) => left.type_rank().cmp(&right.type_rank()),
    }
}

/// A column of a table of `R` records.
pub struct Column<R> {
    /// The stable identifier used by sort and visibility commands.
    pub key: &'static str,
    pub header: &'static str,
    pub accessor: fn(&R) -> CellValue,
    /// Overrides [format_cell] for display.
    pub formatter: Option<fn(&CellValue) -> String>,
    /// Overrides [compare_cells]. Null handling is then up to the comparator.
    pub comparator: Option<fn(&R, &R) -> Ordering>,
    /// Whether sum, count, average, min and max are computed for this column.
    pub summarize: bool,
    /// Whether long values are shortened, with the full text kept as a tooltip.
    pub truncate: bool,
}

impl<R> Column<R> {
    pub fn new(key: &'static str, header: &'static str, accessor: fn(&R) -> CellValue) -> Self {
        Self {
            key,
            header,
            accessor,
            formatter: None,
            comparator: None,
            summarize: false,
            truncate: false,
        }
    }

    pub fn formatted(mut self, formatter: fn(&CellValue) -> String) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn compared_by(mut self, comparator: fn(&R, &R) -> Ordering) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn summarized(mut self) -> Self {
        self.summarize = true;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncate = true;
        self
    }

    pub fn value(&self, record: &R) -> CellValue {
        (self.accessor)(record)
    }

    /// Render the cell for `record` in this column.
    pub fn display(&self, record: &R) -> DisplayCell {
        let value = self.value(record);
        let text = match self.formatter {
            Some(formatter) => formatter(&value),
            None => format_cell(&value),
        };

        if self.truncate {
            let (shown, tooltip) = truncate_description(&text);
            let tooltip = tooltip.map(str::to_owned);
            DisplayCell {
                text: shown,
                tooltip,
            }
        } else {
            DisplayCell {
                text,
                tooltip: None,
            }
        }
    }
}

/// A formatted cell ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCell {
    pub text: String,
    /// The full text when `text` has been shortened.
    pub tooltip: Option<String>,
}
