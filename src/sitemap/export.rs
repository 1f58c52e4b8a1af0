// src/sitemap/export.rs
// =============================================================================
// Writes every sitemap table to its own CSV file.
//
// File naming: the text after the last '/' of the sitemap address, plus
// ".csv". So "https://example.com/sitemap/posts.xml" becomes
// "posts.xml.csv". Two sitemaps with the same final segment overwrite each
// other, as does any file already in the directory.
//
// Columns:
// - URLs     one row per discovered URL
// - Subdirs  only if segment_paths() ran; the segments as a JSON array
//
// Unlike fetching, export failures are real errors: losing the crawl
// output silently is worse than stopping.
// =============================================================================

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::table::{CrawlResult, SitemapTable};

/// Default output directory for exported sitemap tables
pub const DEFAULT_EXPORT_DIR: &str = "extracted_sitemaps";

const URLS_HEADER: &str = "URLs";
const SUBDIRS_HEADER: &str = "Subdirs";

// "https://example.com/a/sitemap.xml" -> "sitemap.xml.csv"
pub fn export_file_name(address: &str) -> String {
    let last = address.rsplit('/').next().unwrap_or(address);
    format!("{}.csv", last)
}

// Creates `dir` if needed and writes one CSV per recorded sitemap
//
// Returns the paths written, in the result's iteration order.
pub fn export_results(result: &CrawlResult, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(result.len());
    for (address, table) in result.iter() {
        let path = dir.join(export_file_name(address));
        write_table(table, &path)
            .with_context(|| format!("Failed to export {} to {}", address, path.display()))?;
        debug!(sitemap = %address, file = %path.display(), rows = table.len(), "exported");
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "export complete");
    Ok(written)
}

fn write_table(table: &SitemapTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    match &table.subdirs {
        Some(subdirs) => {
            writer.write_record([URLS_HEADER, SUBDIRS_HEADER])?;
            for (url, segments) in table.urls.iter().zip(subdirs) {
                let segments = serde_json::to_string(segments)?;
                writer.write_record([url.as_str(), segments.as_str()])?;
            }
        }
        None => {
            writer.write_record([URLS_HEADER])?;
            for url in &table.urls {
                writer.write_record([url.as_str()])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}
