//! Page/limit handling for list endpoints.
//!
//! Every list response carries `totalPages`, `currentPage` and `totalItems`
//! next to the page of items. `totalPages` is the ceiling of
//! `totalItems / limit`, so an empty collection reports zero pages.

pub const DEFAULT_PAGE: i32 = 1;
pub const DEFAULT_LIMIT: i32 = 10;

/// A validated page request. Out-of-range query values fall back to the
/// defaults instead of failing the request.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    pub size: usize,
}

impl Page {
    pub fn from_query(page: Option<i32>, limit: Option<i32>) -> Self {
        let number = page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE) as usize;
        let size = limit.filter(|l| *l >= 1).unwrap_or(DEFAULT_LIMIT) as usize;
        Self { number, size }
    }

    /// The items on this page, in the slice's order. Pages past the end are
    /// empty, not an error.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.number - 1).saturating_mul(self.size).min(items.len());
        let end = start.saturating_add(self.size).min(items.len());
        &items[start..end]
    }

    pub fn total_pages(&self, total_items: usize) -> i64 {
        total_items.div_ceil(self.size) as i64
    }

    pub fn current_page(&self) -> i64 {
        self.number as i64
    }
}
