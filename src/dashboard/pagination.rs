//! Client-side pagination over the fetched image list.

use std::ops::Range;

/// Images shown per page.
pub const PAGE_SIZE: usize = 12;

/// Current page (1-indexed) over a fixed page size.
///
/// Invariant: `1 <= current <= max(1, total_pages(n))` after every
/// [`Pagination::clamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(total / page_size)`; zero items means zero pages.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Move to `page` if it exists for `total` items.
    pub fn go_to(&mut self, page: usize, total: usize) -> bool {
        if page == 0 || page > self.total_pages(total) {
            return false;
        }
        self.current = page;
        true
    }

    /// Pull the current page back into range after the item count changed.
    /// An emptied last page falls back to the new last page.
    pub fn clamp(&mut self, total: usize) {
        let last = self.total_pages(total).max(1);
        self.current = self.current.clamp(1, last);
    }

    /// Index range of the current page within a list of `total` items.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = ((self.current - 1) * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.current < self.total_pages(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_items_make_three_pages() {
        let mut pages = Pagination::default();
        assert_eq!(pages.total_pages(25), 3);

        assert_eq!(pages.range(25).len(), 12);
        assert!(pages.go_to(2, 25));
        assert_eq!(pages.range(25), 12..24);
        assert!(pages.go_to(3, 25));
        assert_eq!(pages.range(25), 24..25);
        assert!(!pages.has_next(25));
        assert!(pages.has_previous());
    }

    #[test]
    fn out_of_range_pages_rejected() {
        let mut pages = Pagination::default();
        assert!(!pages.go_to(0, 25));
        assert!(!pages.go_to(4, 25));
        assert!(!pages.go_to(1, 0));
        assert_eq!(pages.current(), 1);
    }

    #[test]
    fn clamp_after_last_page_emptied() {
        let mut pages = Pagination::default();
        assert!(pages.go_to(3, 25));
        pages.clamp(24);
        assert_eq!(pages.current(), 2);
        assert_eq!(pages.range(24), 12..24);
    }

    #[test]
    fn clamp_with_no_items_stays_on_first_page() {
        let mut pages = Pagination::default();
        assert!(pages.go_to(2, 13));
        pages.clamp(0);
        assert_eq!(pages.current(), 1);
        assert_eq!(pages.range(0), 0..0);
        assert!(!pages.has_next(0));
        assert!(!pages.has_previous());
    }

    #[test]
    fn clamp_keeps_valid_page() {
        let mut pages = Pagination::default();
        assert!(pages.go_to(2, 30));
        pages.clamp(40);
        assert_eq!(pages.current(), 2);
    }
}
