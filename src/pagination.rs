//! Page-number pagination for list endpoints

use serde::{Deserialize, Serialize};

/// Default page number when the query omits `page`.
pub const DEFAULT_PAGE: u32 = 1;

/// Default number of items per page when the query omits `page_size`.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on `page_size` to keep list queries cheap.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for paginated list endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.page_size())
    }
}

/// Paginated response envelope
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, query: &PageQuery, total: i64) -> Self {
        Self {
            items,
            page: query.page(),
            page_size: query.page_size(),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_page_one_size_ten() {
        let query = PageQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 10);
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), 10);
    }

    #[test]
    fn clamps_page_and_page_size() {
        let query = PageQuery {
            page: Some(0),
            page_size: Some(0),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 1);

        let query = PageQuery {
            page: Some(2),
            page_size: Some(1000),
        };
        assert_eq!(query.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn pages_of_twenty_five_items_split_ten_ten_five() {
        let total: i64 = 25;
        let counts: Vec<i64> = (1..=3)
            .map(|page| {
                let query = PageQuery {
                    page: Some(page),
                    page_size: Some(10),
                };
                (total - query.offset()).clamp(0, query.limit())
            })
            .collect();
        assert_eq!(counts, vec![10, 10, 5]);
    }

    #[test]
    fn offset_advances_by_page_size() {
        let query = PageQuery {
            page: Some(3),
            page_size: Some(10),
        };
        assert_eq!(query.offset(), 20);
    }
}
