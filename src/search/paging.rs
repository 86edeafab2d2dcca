//! Page window clamping.

use serde::Serialize;

/// Effective page and page size after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: u32,
    pub per_page: u32,
}

impl PageWindow {
    /// Clamp requested values.
    ///
    /// Page below 1 or absent becomes 1. Page size absent or below 1 becomes
    /// `default_per_page`; every size is capped at `max_per_page`.
    #[must_use]
    pub fn clamp(
        page: Option<i64>,
        per_page: Option<i64>,
        default_per_page: u32,
        max_per_page: u32,
    ) -> Self {
        let max_per_page = max_per_page.max(1);
        let page = page
            .filter(|page| *page >= 1)
            .map_or(1, |page| u32::try_from(page).unwrap_or(u32::MAX));
        let requested = per_page
            .filter(|size| *size >= 1)
            .map_or(default_per_page, |size| {
                u32::try_from(size).unwrap_or(u32::MAX)
            });
        Self {
            page,
            per_page: requested.clamp(1, max_per_page),
        }
    }

    #[must_use]
    pub const fn limit(self) -> i64 {
        self.per_page as i64
    }

    #[must_use]
    pub const fn offset(self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }
}

/// Number of pages needed for `total` items.
#[must_use]
pub const fn total_pages(total: u64, per_page: u32) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page as u64)
}
