//! Pagination types shared by every listing endpoint.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Pagination query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub page_number: Option<i64>,
}

/// A resolved pagination window. `limit == -1` disables the limit, which
/// SQLite's `LIMIT -1` honors directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_size: i64,
    pub page_number: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageQuery {
    /// Resolve the raw query parameters into a concrete window.
    ///
    /// `page_size` absent or 0 falls back to [`DEFAULT_PAGE_SIZE`], -1 means
    /// unlimited, anything below -1 is invalid. `page_number` is zero-based;
    /// -1 clamps to the first page, anything below -1 is invalid.
    pub fn window(&self) -> Result<PageWindow, String> {
        let size = self.page_size.unwrap_or(0);
        if size < -1 {
            return Err("page_size must be -1, 0, or a positive number".to_string());
        }
        let number = self.page_number.unwrap_or(0);
        if number < -1 {
            return Err("page_number must be -1, 0, or a positive number".to_string());
        }

        let page_size = if size == 0 { DEFAULT_PAGE_SIZE } else { size };
        let page_number = number.max(0);
        let offset = if page_size < 0 {
            0
        } else {
            page_number * page_size
        };

        Ok(PageWindow {
            page_size,
            page_number,
            limit: page_size,
            offset,
        })
    }
}

/// Paged response envelope wrapping the items of one page together with the
/// echoed page parameters and result totals.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub page_size: i64,
    pub page_number: i64,
    pub total_results: i64,
    pub total_pages: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(window: PageWindow, total_results: i64, items: Vec<T>) -> Self {
        Self {
            page_size: window.page_size,
            page_number: window.page_number,
            total_results,
            total_pages: page_count(total_results, window.page_size),
            items,
        }
    }
}

/// Number of pages needed to hold `total` results at `page_size` per page.
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        // Unlimited page size: everything fits on one page.
        return i64::from(total > 0);
    }
    (total + page_size - 1) / page_size
}
