// src/sitemap/mod.rs
// =============================================================================
// This module discovers a site's sitemaps and records every URL they list.
//
// Pipeline:
//   robots.txt -> seed sitemaps -> depth-first crawl (budgeted)
//   -> one table per sitemap -> optional path segmentation -> CSV export
//
// Submodules:
// - budget:  the cap on sitemap documents per run
// - robots:  `Sitemap:` directives from robots.txt
// - xml:     <loc> extraction
// - table:   SitemapTable / CrawlResult and path segmentation
// - crawler: the traversal itself
// - export:  one CSV per sitemap
// =============================================================================

mod budget;
mod crawler;
mod export;
mod robots;
mod table;
mod xml;

pub use budget::DEFAULT_MAX_SITEMAPS;
pub use crawler::{CrawlerConfig, SitemapCrawler};
pub use export::{export_results, DEFAULT_EXPORT_DIR};
pub use table::{CrawlResult, DEFAULT_SEGMENT_PREFIX};
