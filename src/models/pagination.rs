//! Offset pagination over the update feed.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 20;

/// Pagination query parameters (`?page=&limit=`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Number of records to skip before this page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)).saturating_mul(u64::from(self.limit))
    }

    /// Total number of pages for `total` records.
    pub fn pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        let page = query.page.filter(|p| *p > 0).unwrap_or(1);
        let limit = query.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }
}

/// One page of updates plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub updates: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u64,
}

impl<T: Serialize> Page<T> {
    pub fn new(updates: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            updates,
            total,
            page: request.page,
            limit: request.limit,
            pages: request.pages(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(page: Option<u32>, limit: Option<u32>) -> PageRequest {
        PageQuery { page, limit }.into()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(resolve(None, None), PageRequest { page: 1, limit: 20 });
    }

    #[test]
    fn test_zero_values_fall_back() {
        assert_eq!(resolve(Some(0), Some(0)), PageRequest { page: 1, limit: 20 });
    }

    #[test]
    fn test_large_limit_is_kept() {
        let request = resolve(Some(1), Some(500));
        assert_eq!(request.limit, 500);
        assert_eq!(request.pages(1201), 3);
    }

    #[test]
    fn test_skip() {
        assert_eq!(resolve(Some(1), Some(10)).skip(), 0);
        assert_eq!(resolve(Some(3), Some(10)).skip(), 20);
        assert_eq!(resolve(Some(u32::MAX), Some(100)).skip(), (u64::from(u32::MAX) - 1) * 100);
    }

    #[test]
    fn test_pages_is_ceiling() {
        let request = resolve(None, Some(20));
        assert_eq!(request.pages(0), 0);
        assert_eq!(request.pages(1), 1);
        assert_eq!(request.pages(20), 1);
        assert_eq!(request.pages(21), 2);
        assert_eq!(request.pages(45), 3);
    }
}
