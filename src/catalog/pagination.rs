//! Pagination math for the catalog list view.
//!
//! The upstream API reports its full item count, but the list view is
//! pinned to a fixed catalog size. Every request is clamped so the final
//! page never reaches past that size.

const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    catalog_size: usize,
    page_size: usize,
}

/// The `limit`/`offset` pair for one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl Pagination {
    /// Both sizes are raised to at least 1.
    #[must_use]
    pub fn new(catalog_size: usize, page_size: usize) -> Self {
        Self { catalog_size: catalog_size.max(1), page_size: page_size.max(1) }
    }

    #[must_use]
    pub fn catalog_size(&self) -> usize {
        self.catalog_size
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.catalog_size.div_ceil(self.page_size)
    }

    /// Offset of a 1-based page. Page 0 is treated as page 1. Saturates
    /// for page numbers too large to address.
    #[must_use]
    pub fn offset(&self, page: usize) -> usize {
        page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Request window for `page`, or `None` when the page starts past the
    /// end of the catalog and must not be requested at all.
    #[must_use]
    pub fn window(&self, page: usize) -> Option<PageWindow> {
        let offset = page.saturating_sub(1).checked_mul(self.page_size)?;
        self.window_at_offset(offset)
    }

    /// Request window starting at a raw offset, clamped to the catalog size.
    #[must_use]
    pub fn window_at_offset(&self, offset: usize) -> Option<PageWindow> {
        if offset >= self.catalog_size {
            return None;
        }
        let limit = self.page_size.min(self.catalog_size - offset);
        Some(PageWindow { offset, limit })
    }

    #[must_use]
    pub fn previous(&self, page: usize) -> usize {
        page.saturating_sub(1).max(1)
    }

    #[must_use]
    pub fn next(&self, page: usize) -> usize {
        page.saturating_add(1).clamp(1, self.total_pages())
    }

    #[must_use]
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages())
    }

    /// Page-number strip for the pager. `None` marks an ellipsis.
    #[must_use]
    pub fn page_numbers(&self, page: usize) -> Vec<Option<usize>> {
        let total = self.total_pages();
        if total <= MAX_VISIBLE_PAGES {
            return (1..=total).map(Some).collect();
        }

        let mut pages = Vec::with_capacity(MAX_VISIBLE_PAGES + 2);
        if page <= 3 {
            pages.extend((1..=4).map(Some));
            pages.push(None);
            pages.push(Some(total));
        } else if page >= total - 2 {
            pages.push(Some(1));
            pages.push(None);
            pages.extend((total - 3..=total).map(Some));
        } else {
            pages.push(Some(1));
            pages.push(None);
            pages.extend((page - 1..=page + 1).map(Some));
            pages.push(None);
            pages.push(Some(total));
        }
        pages
    }
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod pagination_test;
