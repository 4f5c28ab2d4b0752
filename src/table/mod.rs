//! Sorting, filtering, paging and summarising tables of records.

mod column;
mod columns;
mod engine;
mod state;

pub use column::{CellValue, Column, DisplayCell, compare_cells};
pub use columns::{
    column_keys, filtered_row_count, render_record_set, statement_columns,
};
pub use engine::{
    ColumnStatistics, ColumnToggle, HeaderCell, TablePage, column_statistics, filter_rows,
    render_page, sort_rows,
};
pub use state::{SortDirection, SortKey, TableCommand, TableState};
