use serde::Serialize;
use std::ops::Range;

/// One page of a derived list. `page` is 1-based and always within
/// `1..=total_pages`; an empty list still has a single empty page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl PageWindow {
    /// Clamp `requested` into the available range instead of failing.
    pub fn clamp(requested: usize, page_size: usize, total_items: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size).max(1);
        Self {
            page: requested.clamp(1, total_pages),
            page_size,
            total_items,
            total_pages,
        }
    }

    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_list_has_one_empty_page() {
        let window = PageWindow::clamp(4, 10, 0);
        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.range(), 0..0);
        assert!(!window.has_next());
    }

    #[test]
    fn out_of_range_pages_clamp() {
        assert_eq!(PageWindow::clamp(0, 10, 25).page, 1);
        let last = PageWindow::clamp(99, 10, 25);
        assert_eq!(last.page, 3);
        assert_eq!(last.range(), 20..25);
        assert!(last.has_previous());
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let window = PageWindow::clamp(2, 0, 3);
        assert_eq!(window.page_size, 1);
        assert_eq!(window.range(), 1..2);
    }
}
