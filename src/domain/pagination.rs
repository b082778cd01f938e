//! Page arithmetic for list endpoints.

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// A 1-indexed page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, at least 1.
    pub page: u64,
    /// Items per page, in `[1, MAX_PAGE_SIZE]`.
    pub page_size: u64,
}

impl PageRequest {
    /// Builds a page window from raw caller input, clamping `page` to at
    /// least 1 and `page_size` to `[1, MAX_PAGE_SIZE]`.
    #[must_use]
    pub fn clamped(page: i64, page_size: i64) -> Self {
        let page = u64::try_from(page).unwrap_or(0).max(1);
        let page_size = u64::try_from(page_size)
            .unwrap_or(0)
            .clamp(1, MAX_PAGE_SIZE);
        Self { page, page_size }
    }

    /// Number of items to skip before this page.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Number of pages needed to hold `total` items.
    #[must_use]
    pub const fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
