//! Pagination types for API responses
//!
//! List endpoints use a page-number envelope:
//! `count`, `next`, `previous`, `page_size`, `current_page`, `total_pages`,
//! `results`.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Pagination parameters (from the query string)
#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Effective page size after clamping to the server maximum
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// SQL offset for the current page
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }
}

/// Paginated list response envelope
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: i64, params: &PageParams, base_url: &str) -> Self {
        let page_size = params.limit();
        let current_page = params.page.max(1);
        let total_pages = if count == 0 {
            1
        } else {
            (count + page_size - 1) / page_size
        };

        let next = (current_page < total_pages).then(|| {
            format!(
                "{}?page={}&page_size={}",
                base_url,
                current_page + 1,
                page_size
            )
        });
        let previous = (current_page > 1).then(|| {
            format!(
                "{}?page={}&page_size={}",
                base_url,
                current_page - 1,
                page_size
            )
        });

        Self {
            count,
            next,
            previous,
            page_size,
            current_page,
            total_pages,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_clamping() {
        let params = PageParams::new(0, 500);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 0);

        let params = PageParams::new(3, 25);
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_envelope_links() {
        let params = PageParams::new(2, 10);
        let page = Paginated::new(vec![1, 2, 3], 35, &params, "/api/v1/clients/");

        assert_eq!(page.count, 35);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.current_page, 2);
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v1/clients/?page=3&page_size=10")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/v1/clients/?page=1&page_size=10")
        );
    }

    #[test]
    fn test_envelope_boundaries() {
        let params = PageParams::default();
        let page: Paginated<i64> = Paginated::new(vec![], 0, &params, "/api/v1/clients/");
        assert_eq!(page.total_pages, 1);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }
}
