// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, filtered by RUST_LOG or --verbose)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod box_office; // src/box_office/ - yearly star chart scraper
mod cli; // src/cli.rs - command-line parsing
mod fetch; // src/fetch/ - fail-soft HTTP downloads
mod logging; // src/logging.rs - tracing subscriber setup
mod movies; // src/movies/ - paginated movie API fetcher
mod sitemap; // src/sitemap/ - robots.txt + sitemap crawler

use std::path::Path;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::warn;
use url::Url;

use cli::{Cli, Commands};
use sitemap::{CrawlResult, CrawlerConfig, SitemapCrawler};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    logging::setup_logging(if cli.verbose {
        "web_harvest=debug"
    } else {
        "web_harvest=info"
    });

    match cli.command {
        Commands::Sitemaps {
            root_url,
            max_sitemaps,
            segment,
            prefix,
            output_dir,
            json,
        } => {
            let prefix = segment.then_some(prefix.as_str());
            handle_sitemaps(&root_url, max_sitemaps, prefix, &output_dir, json).await
        }
        Commands::Movies {
            api_key,
            pages,
            output,
            json,
        } => handle_movies(&api_key, pages, &output, json).await,
        Commands::BoxOffice {
            start_year,
            end_year,
            output,
        } => handle_box_office(start_year, end_year, &output).await,
    }
}

// Handles the 'sitemaps' subcommand
//
// Parameters:
//   root_url: site root, e.g. "https://medium.com"
//   max_sitemaps: crawl budget
//   segment_prefix: Some(prefix) to add the Subdirs column
//   output_dir: where the CSV files go
//   json: print JSON instead of a table
async fn handle_sitemaps(
    root_url: &str,
    max_sitemaps: usize,
    segment_prefix: Option<&str>,
    output_dir: &Path,
    json: bool,
) -> Result<i32> {
    // Reject obvious typos early; the crawler itself never errors
    let root = Url::parse(root_url).map_err(|e| anyhow!("Invalid URL '{}': {}", root_url, e))?;
    if !matches!(root.scheme(), "http" | "https") {
        return Err(anyhow!("Only http(s) sites can be crawled: {}", root_url));
    }

    // Keep stdout clean for --json
    if !json {
        println!("🔍 Reading sitemaps of: {}", root_url);
        println!("📊 Sitemap budget: {}", max_sitemaps);
    }

    let fetcher = fetch::Fetcher::new(fetch::DEFAULT_USER_AGENT)?;
    let mut crawler = SitemapCrawler::new(root_url, fetcher, CrawlerConfig { max_sitemaps });
    crawler.crawl().await;

    let budget = *crawler.budget();
    let mut result = crawler.into_result();

    if let Some(prefix) = segment_prefix {
        result.segment_paths(prefix);
    }

    let written = sitemap::export_results(&result, output_dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_sitemap_table(&result);
        println!("   🎫 Budget used: {}/{}", budget.used(), budget.max());
        println!("   💾 {} file(s) written to {}", written.len(), output_dir.display());
    }

    Ok(0)
}

// Handles the 'movies' subcommand
async fn handle_movies(api_key: &str, pages: u32, output: &Path, json: bool) -> Result<i32> {
    if !json {
        println!("🎬 Fetching {} page(s) of top-rated movies", pages);
    }

    let mut fetcher = movies::MovieFetcher::new(api_key)?;
    fetcher.fetch_pages(pages).await;
    fetcher.export_csv(output)?;

    if json {
        println!("{}", serde_json::to_string_pretty(fetcher.movies())?);
    } else {
        println!("📄 {} movie(s) saved to {}", fetcher.movies().len(), output.display());
    }

    Ok(0)
}

// Handles the 'box-office' subcommand
async fn handle_box_office(start_year: i32, end_year: i32, output: &Path) -> Result<i32> {
    if start_year > end_year {
        warn!(start_year, end_year, "start year is after end year, nothing to scrape");
    }

    let scraper = box_office::BoxOfficeScraper::new(start_year, end_year)?;
    let table = scraper.scrape().await?;
    box_office::save_csv(&table, output)?;

    print_chart_summary(&table);
    println!("💾 Data saved to {}", output.display());

    Ok(0)
}

// Prints one line per sitemap with its URL count
fn print_sitemap_table(result: &CrawlResult) {
    if result.is_empty() {
        println!("⚠️  No sitemaps found");
        return;
    }

    println!("{:<80} {:>8}", "SITEMAP", "URLS");
    println!("{}", "=".repeat(89));

    for (address, table) in result.iter() {
        // Truncate long addresses for display
        let address_display = if address.chars().count() > 77 {
            format!("{}...", address.chars().take(77).collect::<String>())
        } else {
            address.clone()
        };
        let marker = if table.is_empty() { "  ⚠️ empty" } else { "" };
        println!("{:<80} {:>8}{}", address_display, table.len(), marker);
    }

    println!();
    println!("📊 Summary:");
    println!("   🗺️  Sitemaps: {}", result.len());
    println!("   🔗 URLs: {}", result.url_count());
}

fn print_chart_summary(table: &box_office::ChartTable) {
    if table.is_empty() {
        println!("⚠️  No rows scraped");
    }
    println!("📊 Summary:");
    println!("   📋 Rows: {}", table.rows.len());
    println!("   🧱 Columns: {}", table.headers.join(", "));
}
