//! Paginated list responses.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints
pub const DEFAULT_PAGE_LIMIT: u32 = 50;
/// Largest page size a list endpoint accepts
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Pagination metadata returned alongside every list page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_count: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };
        Self {
            page,
            limit,
            total,
            total_count: total,
            total_pages,
        }
    }

    /// Zero-based offset of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }
}

/// One page of items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Only the pagination block of a list response. Clients that just want a
/// count deserialize into this and ignore `data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationEnvelope {
    #[serde(default)]
    pub pagination: Option<PaginationCount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationCount {
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl PaginationEnvelope {
    /// The total count, or zero when the server left it out
    pub fn total_count(&self) -> u64 {
        self.pagination
            .as_ref()
            .and_then(|p| p.total_count)
            .unwrap_or(0)
    }
}
