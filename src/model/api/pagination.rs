use serde::{Deserialize, Serialize};

/// Page size used when the request does not name one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Paging parameters taken from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromForm)]
pub struct PaginationRequest {
    /// One-based page number.
    #[field(default = 1, validate = range(1..))]
    pub page_num: u32,
    #[field(default = DEFAULT_PAGE_SIZE, validate = range(1..))]
    pub page_size: u32,
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self {
            page_num: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationRequest {
    /// How many results precede this page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page_num - 1) * u64::from(self.page_size)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Wrap a page of results together with the paging metadata.
    pub fn to_paginated<T>(self, total: u64, items: Vec<T>) -> Paginated<T> {
        Paginated {
            pagination: PaginationResult {
                page_num: self.page_num,
                page_size: self.page_size,
                total,
            },
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResult {
    pub page_num: u32,
    pub page_size: u32,
    /// Total results across all pages.
    pub total: u64,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub pagination: PaginationResult,
    pub items: Vec<T>,
}
