// src/sitemap/table.rs
// =============================================================================
// In-memory tables produced by a sitemap crawl.
//
// - SitemapTable: the URLs one sitemap listed, in document order, plus the
//   optional path segments derived from them
// - CrawlResult: every analyzed sitemap address -> its table
//
// Rust concepts:
// - BTreeMap: a sorted map, so iteration (and export) order is stable
// - Option<Vec<...>>: the segment column only exists after segmentation
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;

/// Prefix stripped from article URLs before splitting them into segments
pub const DEFAULT_SEGMENT_PREFIX: &str = "https://medium.com/";

// URLs discovered in one sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SitemapTable {
    /// Every <loc> the sitemap listed, in document order
    pub urls: Vec<String>,
    /// One segment list per URL, present once segment_paths() has run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdirs: Option<Vec<Vec<String>>>,
}

impl SitemapTable {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls, subdirs: None }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    // Fills the subdirs column from the current URLs
    pub fn segment_paths(&mut self, prefix: &str) {
        let segments = self
            .urls
            .iter()
            .map(|url| segment_url(url, prefix))
            .collect();
        self.subdirs = Some(segments);
    }
}

// Strips `prefix` and splits what's left on '/'
//
// The strip is a plain replace, not a guarded match: a URL that doesn't
// start with the prefix is split as-is.
//
// Example (prefix "https://medium.com/"):
//   "https://medium.com/@alice/my-post" -> ["@alice", "my-post"]
//   "https://example.com/a"             -> ["https:", "", "example.com", "a"]
pub fn segment_url(url: &str, prefix: &str) -> Vec<String> {
    url.replace(prefix, "")
        .split('/')
        .map(str::to_string)
        .collect()
}

// Every sitemap address analyzed in a crawl, with its table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CrawlResult {
    tables: BTreeMap<String, SitemapTable>,
}

impl CrawlResult {
    pub fn new() -> Self {
        Self::default()
    }

    // Records the table for `address`, replacing any earlier one
    pub fn insert(&mut self, address: String, table: SitemapTable) {
        self.tables.insert(address, table);
    }

    /// Number of analyzed sitemaps
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total URLs across all tables
    pub fn url_count(&self) -> usize {
        self.tables.values().map(SitemapTable::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SitemapTable)> {
        self.tables.iter()
    }

    // Adds the subdirs column to every recorded table
    pub fn segment_paths(&mut self, prefix: &str) {
        for table in self.tables.values_mut() {
            table.segment_paths(prefix);
        }
    }
}

#[cfg(test)]
impl CrawlResult {
    pub fn get(&self, address: &str) -> Option<&SitemapTable> {
        self.tables.get(address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.tables.contains_key(address)
    }
}
