//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `(offset, limit)`
    pub fn normalize(self) -> (usize, usize) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page as usize - 1) * per_page as usize, per_page as usize)
    }

    /// Slice an already ordered list down to this page.
    pub fn apply<T>(self, items: Vec<T>) -> Vec<T> {
        let (offset, limit) = self.normalize();
        items.into_iter().skip(offset).take(limit).collect()
    }

    /// Build from optional query values; `None` when neither is given.
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Option<Self> {
        if page.is_none() && per_page.is_none() {
            return None;
        }
        let d = Self::default();
        Some(Self { page: page.unwrap_or(d.page), per_page: per_page.unwrap_or(d.per_page) })
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}
