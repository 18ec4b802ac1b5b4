//! Shared query parameter types for API handlers.

use serde::{Deserialize, Serialize};

/// Default number of items per page.
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on items per page.
const MAX_PAGE_SIZE: i64 = 100;

/// Generic pagination parameters (`?page=&page_size=`).
///
/// `page` is 1-based. Out-of-range values are clamped rather than rejected:
/// `page` below 1 becomes 1, `page_size` outside `1..=100` is pulled back
/// into range.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    /// The effective (clamped) page, 1-based.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// The effective (clamped) page size.
    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Convert to SQL `LIMIT` / `OFFSET` values.
    pub fn limit_offset(&self) -> (i64, i64) {
        let limit = self.page_size();
        let offset = (self.page() - 1) * limit;
        (limit, offset)
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

impl PageMeta {
    pub fn new(params: &PageParams, total: i64) -> Self {
        PageMeta {
            page: params.page(),
            page_size: params.page_size(),
            total,
        }
    }
}
