// src/box_office/pipeline.rs
// =============================================================================
// Scrapes the highest-grossing stars chart for a range of years.
//
// How it works:
// 1. For each year, build the chart URL
// 2. Read the pagination links on that page (no links = single page)
// 3. Scrape the table on every page and tag each row with its year
// 4. Stack all pages into one table
//
// Network failures never stop the run: a page that can't be fetched just
// contributes no rows.
// =============================================================================

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use super::chart::{parse_chart_table, parse_pagination_links, ChartTable};
use crate::fetch::{Fetcher, DESKTOP_USER_AGENT};

/// Site that hosts the yearly star charts
pub const DEFAULT_SITE_BASE: &str = "https://the-numbers.com";

const YEAR_COLUMN: &str = "Year";

pub struct BoxOfficeScraper {
    fetcher: Fetcher,
    site_base: String,
    start_year: i32,
    end_year: i32,
}

impl BoxOfficeScraper {
    // Creates a scraper for start_year..=end_year against the real site
    pub fn new(start_year: i32, end_year: i32) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(DESKTOP_USER_AGENT)?,
            site_base: DEFAULT_SITE_BASE.to_string(),
            start_year,
            end_year,
        })
    }

    pub fn year_url(&self, year: i32) -> String {
        format!(
            "{}/box-office-star-records/domestic/yearly-acting/highest-grossing-{}-stars",
            self.site_base, year
        )
    }

    // All pagination URLs for a year's chart; empty if there are none
    pub async fn pagination_urls(&self, year_url: &str) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(year_url).await.into_text();
        parse_pagination_links(&html, &self.site_base)
    }

    // The chart table on one page; empty if the page failed
    pub async fn table_data(&self, page_url: &str) -> Result<ChartTable> {
        let html = self.fetcher.fetch(page_url).await.into_text();
        parse_chart_table(&html)
    }

    // Scrapes every year in the range and stacks the pages
    pub async fn scrape(&self) -> Result<ChartTable> {
        let mut all = ChartTable::default();

        for year in self.start_year..=self.end_year {
            println!("📅 Scraping data for the year: {}", year);
            let year_url = self.year_url(year);

            let mut pages = self.pagination_urls(&year_url).await?;
            if pages.is_empty() {
                pages.push(year_url);
            }

            for page_url in pages {
                let mut page = self.table_data(&page_url).await?;
                debug!(page = %page_url, rows = page.rows.len(), "scraped chart page");
                page.set_constant_column(YEAR_COLUMN, &year.to_string());
                all.append(page);
            }
        }

        info!(rows = all.rows.len(), columns = all.headers.len(), "box office scrape finished");
        Ok(all)
    }
}

// Writes the table to `path` as CSV (header row first)
pub fn save_csv(table: &ChartTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
impl BoxOfficeScraper {
    /// Points the scraper at a different host
    pub fn with_site_base(mut self, site_base: &str) -> Self {
        self.site_base = site_base.trim_end_matches('/').to_string();
        self
    }
}
