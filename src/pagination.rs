//! This modules defines the common functionality for paging tables.

use std::{fmt, str::FromStr};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The number of rows per page for a freshly loaded table.
    pub default_page_size: PageSize,
    /// The maximum number of page links to show in the pagination indicator.
    pub max_pages: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: PageSize::DEFAULT,
            max_pages: 5,
        }
    }
}

/// A page size the user is allowed to choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(usize);

impl PageSize {
    /// The sizes offered in the page size selector.
    pub const OPTIONS: [PageSize; 5] = [
        PageSize(10),
        PageSize(20),
        PageSize(30),
        PageSize(40),
        PageSize(50),
    ];

    pub const DEFAULT: PageSize = PageSize(10);

    /// Returns `None` unless `size` is one of [PageSize::OPTIONS].
    pub fn new(size: usize) -> Option<Self> {
        Self::OPTIONS.into_iter().find(|option| option.0 == size)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The text given for a page size was not a number or not one of the allowed sizes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not an allowed page size")]
pub struct InvalidPageSize(pub String);

impl FromStr for PageSize {
    type Err = InvalidPageSize;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.trim()
            .parse::<usize>()
            .ok()
            .and_then(PageSize::new)
            .ok_or_else(|| InvalidPageSize(text.to_owned()))
    }
}

/// The number of pages needed to show `row_count` rows.
///
/// An empty table still has one (empty) page.
pub fn page_count(row_count: usize, page_size: PageSize) -> usize {
    row_count.div_ceil(page_size.get()).max(1)
}

/// One entry in the row of page links under a table. Pages are zero-based.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(usize),
    CurrPage(usize),
    Ellipsis,
}

/// Lay out at most `max_pages` page links centred on `page_index`.
///
/// The first and last pages are always reachable, with an ellipsis standing in
/// for any pages skipped in between.
pub fn create_pagination_indicators(
    page_index: usize,
    page_count: usize,
    max_pages: usize,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == page_index {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let max_pages = max_pages.max(1);

    if page_count <= max_pages {
        return (0..page_count).map(map_page).collect();
    }

    let start = page_index
        .saturating_sub(max_pages / 2)
        .min(page_count - max_pages);
    let end = start + max_pages;

    let mut indicators = Vec::with_capacity(max_pages + 4);

    if start > 0 {
        indicators.push(PaginationIndicator::Page(0));

        if start > 1 {
            indicators.push(PaginationIndicator::Ellipsis);
        }
    }

    indicators.extend((start..end).map(map_page));

    if end < page_count {
        if end < page_count - 1 {
            indicators.push(PaginationIndicator::Ellipsis);
        }

        indicators.push(PaginationIndicator::Page(page_count - 1));
    }

    indicators
}
