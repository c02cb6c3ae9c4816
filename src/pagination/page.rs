//! Page and page request types

use serde::{Deserialize, Serialize};

use super::DEFAULT_PAGE_SIZE;

/// Which page to return, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page_number")]
    pub page_number: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_number() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl PageRequest {
    pub fn new(page_number: usize, page_size: usize) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// First page at the given size
    pub fn first(page_size: usize) -> Self {
        Self::new(1, page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of an ordered result set plus navigation metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_items: usize,
    /// At least 1, even for an empty result set
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of the previous page, if there is one
    pub fn previous_page(&self) -> Option<usize> {
        self.has_previous.then(|| self.page_number - 1)
    }

    /// Number of the next page, if there is one
    pub fn next_page(&self) -> Option<usize> {
        self.has_next.then(|| self.page_number + 1)
    }

    /// Page numbers for a navigation bar.
    ///
    /// Always includes the first two and last two pages and two pages on
    /// either side of the current one. `None` marks a gap.
    pub fn page_numbers(&self) -> Vec<Option<usize>> {
        const EDGE: usize = 2;
        const AROUND: usize = 2;

        let mut numbers = Vec::new();
        let mut last = 0;
        for num in 1..=self.total_pages {
            let near_start = num <= EDGE;
            let near_end = num.saturating_add(EDGE) > self.total_pages;
            let near_current = num.saturating_add(AROUND) >= self.page_number
                && num <= self.page_number.saturating_add(AROUND);

            if near_start || near_end || near_current {
                if last + 1 != num {
                    numbers.push(None);
                }
                numbers.push(Some(num));
                last = num;
            }
        }
        numbers
    }
}
