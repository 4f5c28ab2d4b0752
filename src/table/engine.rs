//! Derives the visible page of a table from its rows, columns and [TableState].

use std::cmp::Ordering;

use crate::{
    pagination::{PageSize, page_count},
    table::{
        CellValue, Column, DisplayCell, SortDirection, SortKey, TableState, compare_cells,
    },
};

/// A column header of the rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: &'static str,
    pub label: &'static str,
    pub sort: Option<SortDirection>,
}

/// A column as listed in the column visibility controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnToggle {
    pub key: &'static str,
    pub label: &'static str,
    pub visible: bool,
}

/// Summary statistics of a numeric column over the filtered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStatistics {
    pub key: &'static str,
    pub label: &'static str,
    /// The number of rows with a value in this column.
    pub count: usize,
    pub sum: f64,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Everything needed to render one page of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<DisplayCell>>,
    pub columns: Vec<ColumnToggle>,
    pub statistics: Vec<ColumnStatistics>,
    pub total_rows: usize,
    pub filtered_rows: usize,
    /// The zero-based page shown, already clamped to `page_count`.
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: PageSize,
    pub filter: String,
}

impl TablePage {
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    /// The one-based range of filtered rows on this page, `None` if there are none.
    pub fn row_range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            return None;
        }

        let first = self.page_index * self.page_size.get() + 1;
        Some((first, first + self.rows.len() - 1))
    }
}

fn matches_filter<R>(record: &R, columns: &[Column<R>], needle: &str) -> bool {
    columns.iter().any(|column| {
        column
            .value(record)
            .filter_text()
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

/// The indices of the records matching `filter` in any column, hidden or not.
///
/// An empty filter matches every record.
pub fn filter_rows<R>(records: &[R], columns: &[Column<R>], filter: &str) -> Vec<usize> {
    if filter.is_empty() {
        return (0..records.len()).collect();
    }

    let needle = filter.to_lowercase();

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_filter(*record, columns, &needle))
        .map(|(index, _)| index)
        .collect()
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Stable sort of `rows` (indices into `records`) by `sort`.
///
/// Null cells go last whichever way the column is sorted. Sorting by a key
/// that names no column leaves the order unchanged.
pub fn sort_rows<R>(records: &[R], columns: &[Column<R>], sort: Option<&SortKey>, rows: &mut [usize]) {
    let Some(sort) = sort else {
        return;
    };
    let Some(column) = columns.iter().find(|column| column.key == sort.column) else {
        return;
    };

    if let Some(comparator) = column.comparator {
        rows.sort_by(|&a, &b| directed(comparator(&records[a], &records[b]), sort.direction));
        return;
    }

    let mut keyed: Vec<(usize, CellValue)> = rows
        .iter()
        .map(|&index| (index, column.value(&records[index])))
        .collect();

    keyed.sort_by(|(_, a), (_, b)| match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => directed(compare_cells(a, b), sort.direction),
    });

    for (slot, (index, _)) in rows.iter_mut().zip(keyed) {
        *slot = index;
    }
}

/// Sum, count, average, min and max of every summarized column over `rows`.
pub fn column_statistics<R>(
    records: &[R],
    columns: &[Column<R>],
    rows: &[usize],
) -> Vec<ColumnStatistics> {
    columns
        .iter()
        .filter(|column| column.summarize)
        .map(|column| {
            let values: Vec<f64> = rows
                .iter()
                .filter_map(|&index| column.value(&records[index]).as_number())
                .collect();
            let count = values.len();
            let sum: f64 = values.iter().sum();

            ColumnStatistics {
                key: column.key,
                label: column.header,
                count,
                sum,
                average: (count > 0).then(|| sum / count as f64),
                min: values.iter().copied().reduce(f64::min),
                max: values.iter().copied().reduce(f64::max),
            }
        })
        .collect()
}

/// Filter, sort and page `records`, formatting the visible cells.
pub fn render_page<R>(records: &[R], columns: &[Column<R>], state: &TableState) -> TablePage {
    let mut rows = filter_rows(records, columns, state.filter());
    sort_rows(records, columns, state.sort(), &mut rows);

    let page_size = state.page_size();
    let page_count = page_count(rows.len(), page_size);
    let page_index = state.page_index().min(page_count - 1);

    let visible: Vec<&Column<R>> = columns
        .iter()
        .filter(|column| !state.is_hidden(column.key))
        .collect();

    let headers = visible
        .iter()
        .map(|column| HeaderCell {
            key: column.key,
            label: column.header,
            sort: state
                .sort()
                .filter(|sort| sort.column == column.key)
                .map(|sort| sort.direction),
        })
        .collect();

    let page_rows = rows
        .iter()
        .skip(page_index * page_size.get())
        .take(page_size.get())
        .map(|&index| {
            visible
                .iter()
                .map(|column| column.display(&records[index]))
                .collect()
        })
        .collect();

    let column_toggles = columns
        .iter()
        .map(|column| ColumnToggle {
            key: column.key,
            label: column.header,
            visible: !state.is_hidden(column.key),
        })
        .collect();

    TablePage {
        headers,
        rows: page_rows,
        columns: column_toggles,
        statistics: column_statistics(records, columns, &rows),
        total_rows: records.len(),
        filtered_rows: rows.len(),
        page_index,
        page_count,
        page_size,
        filter: state.filter().to_owned(),
    }
}
