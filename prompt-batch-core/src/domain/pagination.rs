use serde::{Deserialize, Serialize};

/// Position within a paged listing.
///
/// `current_page` is kept within `1..=total_pages`, and `total_pages` is never
/// less than one, so an empty listing still has a single (empty) page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationState {
    page_size: u32,
    current_page: u32,
    total_count: u64,
}

impl PaginationState {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            total_count: 0,
        }
    }

    /// Normalizes counts reported by the data service for the page that was requested.
    pub fn from_counts(page_size: u32, requested_page: u32, total_count: u64) -> Self {
        let mut state = Self {
            page_size: page_size.max(1),
            current_page: 1,
            total_count,
        };
        state.current_page = requested_page.clamp(1, state.total_pages());
        state
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u32 {
        let pages = self.total_count.div_ceil(u64::from(self.page_size)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    // Navigation computes the page to request; the state itself only moves
    // once the service has answered for that page.

    pub fn next_target(&self) -> Option<u32> {
        self.has_next().then(|| self.current_page + 1)
    }

    pub fn previous_target(&self) -> Option<u32> {
        self.has_previous().then(|| self.current_page - 1)
    }

    pub fn first_target(&self) -> u32 {
        1
    }

    pub fn last_target(&self) -> u32 {
        self.total_pages()
    }

    /// Pagination controls are only worth showing when there is somewhere to go.
    pub fn show_controls(&self) -> bool {
        self.total_pages() > 1
    }

    /// "start - end of total", e.g. "21 - 40 of 57".
    pub fn range_label(&self) -> String {
        if self.total_count == 0 {
            return "0 - 0 of 0".to_string();
        }
        let page_size = u64::from(self.page_size);
        let start = u64::from(self.current_page - 1) * page_size + 1;
        let end = (u64::from(self.current_page) * page_size).min(self.total_count);
        format!("{} - {} of {}", start, end, self.total_count)
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(crate::domain::config::DEFAULT_RECORD_PAGE_SIZE)
    }
}
