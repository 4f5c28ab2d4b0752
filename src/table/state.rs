use std::collections::BTreeSet;

use crate::pagination::PageSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

/// A user interaction with a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    /// Cycle the sort of a column: ascending, descending, unsorted.
    Sort(String),
    /// Replace the global filter text. An empty string clears the filter.
    Filter(String),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    /// Jump to a zero-based page.
    GoToPage(usize),
    PageSize(PageSize),
    /// Show a hidden column or hide a visible one.
    ToggleColumn(String),
}

/// How a table is sorted, filtered, paged and which columns are hidden.
///
/// The state does not know the rows it applies to. Commands that depend on the
/// number of pages take the current page count from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    sort: Option<SortKey>,
    filter: String,
    page_index: usize,
    page_size: PageSize,
    hidden_columns: BTreeSet<String>,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(PageSize::DEFAULT)
    }
}

impl TableState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            sort: None,
            filter: String::new(),
            page_index: 0,
            page_size,
            hidden_columns: BTreeSet::new(),
        }
    }

    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn is_hidden(&self, column: &str) -> bool {
        self.hidden_columns.contains(column)
    }

    /// Apply `command`, where `page_count` is the number of pages before the command.
    pub fn apply(&mut self, command: TableCommand, page_count: usize) {
        match command {
            TableCommand::Sort(column) => self.toggle_sort(&column),
            TableCommand::Filter(text) => self.set_filter(&text),
            TableCommand::FirstPage => self.page_index = 0,
            TableCommand::PreviousPage => self.page_index = self.page_index.saturating_sub(1),
            TableCommand::NextPage => self.go_to_page(self.page_index + 1, page_count),
            TableCommand::LastPage => self.go_to_page(page_count.saturating_sub(1), page_count),
            TableCommand::GoToPage(page_index) => self.go_to_page(page_index, page_count),
            TableCommand::PageSize(page_size) => self.set_page_size(page_size),
            TableCommand::ToggleColumn(column) => self.toggle_column(&column),
        }
    }

    /// Cycle the sort on `column`: a new column starts ascending, then the
    /// same column goes descending and then back to unsorted.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = match self.sort.take() {
            Some(SortKey {
                column: active,
                direction: SortDirection::Ascending,
            }) if active == column => Some(SortKey {
                column: active,
                direction: SortDirection::Descending,
            }),
            Some(SortKey {
                column: active,
                direction: SortDirection::Descending,
            }) if active == column => None,
            _ => Some(SortKey {
                column: column.to_owned(),
                direction: SortDirection::Ascending,
            }),
        };
        self.page_index = 0;
    }

    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.to_owned();
        self.page_index = 0;
    }

    /// Change the page size, keeping the first row of the current page visible.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        let first_row = self.page_index * self.page_size.get();
        self.page_size = page_size;
        self.page_index = first_row / page_size.get();
    }

    pub fn go_to_page(&mut self, page_index: usize, page_count: usize) {
        self.page_index = page_index.min(page_count.saturating_sub(1));
    }

    pub fn toggle_column(&mut self, column: &str) {
        if !self.hidden_columns.remove(column) {
            self.hidden_columns.insert(column.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pagination::PageSize;

    use super::{SortDirection, SortKey, TableCommand, TableState};

    fn sort_key(column: &str, direction: SortDirection) -> Option<SortKey> {
        Some(SortKey {
            column: column.to_owned(),
            direction,
        })
    }

    #[test]
    fn sort_cycles_ascending_descending_none() {
        let mut state = TableState::default();

        state.toggle_sort("Amount");
        assert_eq!(state.sort().cloned(), sort_key("Amount", SortDirection::Ascending));

        state.toggle_sort("Amount");
        assert_eq!(state.sort().cloned(), sort_key("Amount", SortDirection::Descending));

        state.toggle_sort("Amount");
        assert_eq!(state.sort(), None);
    }

    #[test]
    fn sorting_a_new_column_starts_ascending() {
        let mut state = TableState::default();
        state.toggle_sort("Amount");
        state.toggle_sort("Amount");

        state.toggle_sort("Date");

        assert_eq!(state.sort().cloned(), sort_key("Date", SortDirection::Ascending));
    }

    #[test]
    fn filter_and_sort_changes_reset_page() {
        let mut state = TableState::default();
        state.apply(TableCommand::GoToPage(3), 5);
        assert_eq!(state.page_index(), 3);

        state.apply(TableCommand::Filter("serendipity".to_owned()), 5);
        assert_eq!(state.page_index(), 0);

        state.apply(TableCommand::LastPage, 5);
        state.apply(TableCommand::Sort("Date".to_owned()), 5);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn navigation_stays_within_bounds() {
        let mut state = TableState::default();

        state.apply(TableCommand::PreviousPage, 3);
        assert_eq!(state.page_index(), 0);

        state.apply(TableCommand::LastPage, 3);
        assert_eq!(state.page_index(), 2);

        state.apply(TableCommand::NextPage, 3);
        assert_eq!(state.page_index(), 2);

        state.apply(TableCommand::GoToPage(99), 3);
        assert_eq!(state.page_index(), 2);

        state.apply(TableCommand::FirstPage, 3);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn page_size_change_keeps_first_visible_row() {
        let mut state = TableState::default();
        state.apply(TableCommand::GoToPage(4), 10);

        // Rows 40..50 are visible, so row 40 should stay on screen.
        state.apply(TableCommand::PageSize(PageSize::new(30).unwrap()), 10);

        assert_eq!(state.page_index(), 1);
        assert_eq!(state.page_size().get(), 30);
    }

    #[test]
    fn toggling_a_column_twice_shows_it_again() {
        let mut state = TableState::default();

        state.apply(TableCommand::ToggleColumn("Comments".to_owned()), 1);
        assert!(state.is_hidden("Comments"));

        state.apply(TableCommand::ToggleColumn("Comments".to_owned()), 1);
        assert!(!state.is_hidden("Comments"));
    }
}
