use std::ops::Range;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 5;

/// A 1-based page window. Both fields are always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Page {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Number of items before this page.
    pub fn row_offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// The slice of a `len`-long sequence covered by this page, or `None`
    /// when the page starts past the end.
    pub fn window(&self, len: usize) -> Option<Range<usize>> {
        let start = usize::try_from(self.row_offset()).ok()?;
        if start >= len {
            return None;
        }
        let end = start.saturating_add(self.per_page as usize).min(len);
        Some(start..end)
    }
}
