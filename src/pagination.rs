//! Page/per-page arithmetic for list endpoints

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 100;

/// Raw `?page=&per_page=` query parameters.
///
/// Kept as strings so that non-numeric input falls back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl PageQuery {
    pub fn into_pagination(self) -> Pagination {
        Pagination::new(
            parse_positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            parse_positive(self.per_page.as_deref()).unwrap_or(DEFAULT_PER_PAGE),
        )
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
}

/// Pagination request and the `meta` block returned with list responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub page_count: i64,
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
            page_count: 0,
            total: 0,
            next: None,
            previous: None,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Record the total row count and derive page_count/next/previous
    pub fn with_total(mut self, total: i64) -> Self {
        self.total = total;
        self.page_count = (total + self.per_page - 1) / self.per_page;
        self.next = (self.page < self.page_count).then_some(self.page + 1);
        self.previous = (self.page > 1).then_some(self.page - 1);
        self
    }
}

/// Slice an in-memory collection the same way the SQL adapters use OFFSET/LIMIT
pub fn paginate_slice<T: Clone>(items: &[T], pagination: &Pagination) -> Vec<T> {
    items
        .iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .cloned()
        .collect()
}
