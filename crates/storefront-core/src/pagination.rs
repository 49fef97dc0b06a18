//! Page-range calculation for numbered pagination controls
//!
//! Computes which page numbers (and ellipsis markers) a pagination control
//! renders for a list of `total_items` split into pages of `page_size`.
//! The calculation is pure and cheap; callers may memoize it on its inputs.

use std::num::NonZeroU32;

use serde::{Serialize, Serializer};

/// Number of page links shown on each side of the current page by default
pub const DEFAULT_SIBLING_COUNT: u32 = 1;

/// Marker rendered in place of an elided run of page numbers
pub const ELLIPSIS: &str = "...";

/// One entry of a pagination control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageItem {
    /// A clickable page number (1-indexed)
    Page(u32),
    /// A gap standing for one or more hidden page numbers
    Ellipsis,
}

impl PageItem {
    /// Page number, if this entry is not an ellipsis
    #[inline]
    pub fn page(self) -> Option<u32> {
        match self {
            Self::Page(n) => Some(n),
            Self::Ellipsis => None,
        }
    }

    #[inline]
    pub fn is_ellipsis(self) -> bool {
        matches!(self, Self::Ellipsis)
    }
}

impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u32(*n),
            Self::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

/// Computed page links for a given position in a paginated list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRange {
    current_page: u32,
    total_pages: u32,
    items: Vec<PageItem>,
}

impl PageRange {
    /// The current page the range was computed for
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Total number of pages in the list
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Page links in display order
    pub fn items(&self) -> &[PageItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<PageItem> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether a pagination control should be shown at all.
    ///
    /// A control with fewer than two entries, or positioned on page 0, is hidden.
    pub fn should_render(&self) -> bool {
        self.current_page != 0 && self.items.len() >= 2
    }

    /// Whether a "previous" link is meaningful
    pub fn has_previous(&self) -> bool {
        self.current_page > 1 && self.current_page <= self.total_pages
    }

    /// Whether a "next" link is meaningful
    pub fn has_next(&self) -> bool {
        self.current_page >= 1 && self.current_page < self.total_pages
    }
}

/// Number of pages needed to show `total_items` at `page_size` per page
pub fn total_pages(total_items: u64, page_size: NonZeroU32) -> u32 {
    let pages = total_items.div_ceil(u64::from(page_size.get()));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Compute the page links for a pagination control.
///
/// The result is empty when there are no pages or when `current_page` is 0.
/// `current_page` beyond the last page is not clamped; the range is still
/// computed from the sibling window and simply won't contain it.
pub fn page_range(
    total_items: u64,
    page_size: NonZeroU32,
    current_page: u32,
    sibling_count: u32,
) -> PageRange {
    let total = total_pages(total_items, page_size);

    let items = if total == 0 || current_page == 0 {
        Vec::new()
    } else {
        compress(total, current_page, sibling_count)
    };

    PageRange {
        current_page,
        total_pages: total,
        items,
    }
}

fn dense(from: u32, to: u32) -> impl Iterator<Item = PageItem> {
    (from..=to).map(PageItem::Page)
}

fn compress(total: u32, current: u32, siblings: u32) -> Vec<PageItem> {
    // pages shown on the side that has no ellipsis
    let edge_count = siblings.saturating_mul(2).saturating_add(3);

    // Compress once more than `siblings + 5` pages exist, but never into an
    // ellipsis that would stand for no page at all: the one-sided layout
    // shows `edge_count + 1` pages, so at least `edge_count + 2` must exist.
    let dense_up_to = siblings
        .saturating_add(5)
        .max(edge_count.saturating_add(1));
    if total <= dense_up_to {
        return dense(1, total).collect();
    }

    let left_sibling = current.saturating_sub(siblings).max(1);
    let right_sibling = current.saturating_add(siblings).min(total);

    // total > edge_count + 1 >= 4, so neither subtraction can wrap
    let show_left = left_sibling > 2;
    let show_right = right_sibling < total - 2;

    match (show_left, show_right) {
        (false, true) => dense(1, edge_count)
            .chain([PageItem::Ellipsis, PageItem::Page(total)])
            .collect(),
        (true, false) => [PageItem::Page(1), PageItem::Ellipsis]
            .into_iter()
            .chain(dense(total - edge_count + 1, total))
            .collect(),
        (true, true) => [PageItem::Page(1), PageItem::Ellipsis]
            .into_iter()
            .chain(dense(left_sibling, right_sibling))
            .chain([PageItem::Ellipsis, PageItem::Page(total)])
            .collect(),
        // unreachable once `total > edge_count + 1`
        (false, false) => dense(1, total).collect(),
    }
}
