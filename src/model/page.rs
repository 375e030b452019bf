//! Pagination metadata and the page envelope returned by the order listing endpoint.

use super::order::Order;
use serde::{Deserialize, Serialize};

/// Pagination state of one bucket, as last reported by the backend.
///
/// `current_page == 0` means the bucket has never been loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default, alias = "totalCount")]
    pub total_orders: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

impl PageInfo {
    pub fn is_loaded(&self) -> bool {
        self.current_page > 0
    }

    /// Pagination for a listing that reported none: `page` is the last page.
    pub fn single(page: u32, count: usize) -> Self {
        Self {
            current_page: page,
            total_pages: page,
            total_orders: count as u64,
            has_next: false,
            has_prev: page > 1,
        }
    }

    /// The page a "load more" should request, or `None` once the listing is exhausted.
    pub fn next_page(&self) -> Option<u32> {
        if !self.is_loaded() {
            Some(1)
        } else if self.has_next {
            Some(self.current_page + 1)
        } else {
            None
        }
    }
}

/// One fetched page: normalized orders plus the pagination metadata that came with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub page_info: PageInfo,
}

impl OrderPage {
    pub fn new(orders: Vec<Order>, page_info: PageInfo) -> Self {
        Self { orders, page_info }
    }
}
