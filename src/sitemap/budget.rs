// src/sitemap/budget.rs
// =============================================================================
// The crawl budget: how many sitemap documents one run may consume.
//
// The crawler reserves a slot *before* it descends into a sitemap, and the
// descent itself refuses to fetch once the counter has reached the maximum.
// Keeping both steps here makes that ordering explicit and testable.
// =============================================================================

/// Default cap on sitemap documents per crawl
pub const DEFAULT_MAX_SITEMAPS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlBudget {
    used: usize,
    max: usize,
}

impl CrawlBudget {
    pub fn new(max: usize) -> Self {
        Self { used: 0, max }
    }

    /// Slots consumed so far
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// True once the counter has reached the maximum
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }

    // Check-then-increment: takes one slot if any is left
    //
    // Returns false (and changes nothing) when the budget is exhausted.
    pub fn try_reserve(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.used += 1;
        true
    }
}

impl Default for CrawlBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SITEMAPS)
    }
}
