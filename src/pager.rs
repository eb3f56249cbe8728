//! Incremental pagination over the filtered working set: a monotonically
//! growing page count exposing a prefix of the set, reset to one page
//! whenever the set itself changes.

/// Rows revealed per "load more" step.
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pages: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

impl Pager {
    pub fn new() -> Self {
        Self { pages: 1 }
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Size of the visible prefix for a working set of `total` rows.
    pub fn visible_count(&self, total: usize) -> usize {
        total.min(self.pages * PAGE_SIZE)
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible_count(total) < total
    }

    /// Reveal one more page. The caller gates this on `has_more` and on the
    /// controller being idle; the pager itself only grows.
    pub fn advance(&mut self) {
        self.pages += 1;
    }

    /// Hard reset back to a single page. Used whenever the filtered set
    /// changes so the visible slice can never point past its new bounds.
    pub fn reset(&mut self) {
        self.pages = 1;
    }
}
