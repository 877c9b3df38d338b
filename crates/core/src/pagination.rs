//! Fixed-size page arithmetic shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// Records per page on every paginated list.
pub const PER_PAGE: i64 = 7;

/// Pagination block returned next to every paginated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: i64,
    pub last_page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl PageInfo {
    /// Build page metadata for `total` matching records.
    ///
    /// `last_page` is never below 1 and the requested page is clamped into
    /// `1..=last_page`, so the returned `current_page` always names a page
    /// the caller can actually fetch.
    pub fn new(requested_page: Option<i64>, total: i64) -> Self {
        let total = total.max(0);
        let last_page = ((total + PER_PAGE - 1) / PER_PAGE).max(1);
        let current_page = requested_page.unwrap_or(1).clamp(1, last_page);
        Self {
            current_page,
            last_page,
            per_page: PER_PAGE,
            total,
        }
    }

    /// Row offset of the first record on the current page.
    pub fn offset(&self) -> i64 {
        (self.current_page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_len(page: PageInfo) -> i64 {
        (page.total - page.offset()).clamp(0, page.per_page)
    }

    #[test]
    fn empty_collection_has_one_page() {
        let page = PageInfo::new(None, 0);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.last_page, 1);
        assert_eq!(expected_len(page), 0);
    }

    #[test]
    fn last_page_rounds_up() {
        assert_eq!(PageInfo::new(None, 7).last_page, 1);
        assert_eq!(PageInfo::new(None, 8).last_page, 2);
        assert_eq!(PageInfo::new(None, 15).last_page, 3);
    }

    #[test]
    fn requested_page_is_clamped() {
        assert_eq!(PageInfo::new(Some(0), 20).current_page, 1);
        assert_eq!(PageInfo::new(Some(-4), 20).current_page, 1);
        assert_eq!(PageInfo::new(Some(99), 20).current_page, 3);
    }

    #[test]
    fn page_lengths_add_up_to_total() {
        for total in 0..30 {
            let last = PageInfo::new(None, total).last_page;
            let sum: i64 = (1..=last)
                .map(|p| expected_len(PageInfo::new(Some(p), total)))
                .sum();
            assert_eq!(sum, total, "total {total}");
        }
    }

    #[test]
    fn offset_follows_page() {
        let page = PageInfo::new(Some(3), 30);
        assert_eq!(page.offset(), 14);
        assert_eq!(page.limit(), PER_PAGE);
        assert_eq!(expected_len(page), 7);
        assert_eq!(expected_len(PageInfo::new(Some(5), 30)), 2);
    }
}
