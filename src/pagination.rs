use serde::{Deserialize, Serialize};

/// Rows requested per page. Fixed; the catalog UI never varies it.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Pagination metadata for the visible result set.
///
/// Invariants: `has_next_page == current_page < total_pages`,
/// `has_previous_page == current_page > 1`,
/// `total_pages == ceil(total_count / page_size)`, and `current_page >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub page_size: u32,
}

impl Default for PaginationInfo {
    fn default() -> Self {
        PaginationInfo::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationInfo {
    pub fn new(page_size: u32) -> Self {
        PaginationInfo {
            current_page: 1,
            total_pages: 0,
            total_count: 0,
            has_next_page: false,
            has_previous_page: false,
            page_size: page_size.max(1),
        }
    }

    /// Moves to `page` against the totals already known. Pages below 1 are
    /// clamped to 1.
    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
        self.recompute();
    }

    /// Records a fresh aggregate count, keeping the current page.
    pub fn update_total(&mut self, total_count: u32) {
        self.total_count = total_count;
        self.recompute();
    }

    /// Zero-based row offset of the current page.
    pub fn offset(&self) -> u32 {
        offset_for(self.current_page, self.page_size)
    }

    pub fn can_load_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    fn recompute(&mut self) {
        let window = reconcile(self.current_page, self.page_size, self.total_count);
        self.total_pages = window.total_pages;
        self.has_next_page = window.has_next_page;
        self.has_previous_page = window.has_previous_page;
    }
}

/// Page-derived flags for one `(current_page, page_size, total_count)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    /// Follows the page count, not whether the last fetch returned rows.
    pub can_load_more: bool,
}

pub fn reconcile(current_page: u32, page_size: u32, total_count: u32) -> PageWindow {
    let total_pages = total_count.div_ceil(page_size.max(1));
    PageWindow {
        total_pages,
        has_next_page: current_page < total_pages,
        has_previous_page: current_page > 1,
        can_load_more: current_page < total_pages,
    }
}

pub fn offset_for(page: u32, page_size: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// How a resolved page lands in the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListUpdate {
    /// Page jumps and fresh searches: the page's rows become the list.
    Replace,
    /// "Load more": the page's rows are added after the existing ones.
    Append,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1, 20, 0, 0, false, false)]
    #[case(1, 20, 1, 1, false, false)]
    #[case(1, 20, 20, 1, false, false)]
    #[case(1, 20, 21, 2, true, false)]
    #[case(2, 20, 21, 2, false, true)]
    #[case(3, 20, 1025, 52, true, true)]
    #[case(52, 20, 1025, 52, false, true)]
    #[case(4, 20, 40, 2, false, true)]
    fn test_reconcile(
        #[case] page: u32,
        #[case] size: u32,
        #[case] count: u32,
        #[case] pages: u32,
        #[case] next: bool,
        #[case] previous: bool,
    ) {
        let window = reconcile(page, size, count);
        assert_eq!(window.total_pages, pages);
        assert_eq!(window.has_next_page, next);
        assert_eq!(window.has_previous_page, previous);
        assert_eq!(window.can_load_more, next);
    }

    #[test]
    fn test_info_keeps_invariants_through_updates() {
        let mut info = PaginationInfo::default();
        assert_eq!(info.current_page, 1);
        assert_eq!(info.page_size, DEFAULT_PAGE_SIZE);

        info.update_total(45);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next_page);
        assert!(!info.has_previous_page);

        info.set_current_page(3);
        assert!(!info.has_next_page);
        assert!(info.has_previous_page);
        assert_eq!(info.offset(), 40);

        info.set_current_page(0);
        assert_eq!(info.current_page, 1);
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 20)]
    #[case(5, 80)]
    fn test_offset_for(#[case] page: u32, #[case] expected: u32) {
        assert_eq!(offset_for(page, DEFAULT_PAGE_SIZE), expected);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(PaginationInfo::default()).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["hasNextPage"], false);
        assert_eq!(json["pageSize"], 20);
    }
}
