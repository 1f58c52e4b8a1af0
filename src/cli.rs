// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three independent scrapers live behind one binary:
// - sitemaps:   crawl a site's sitemaps and export one CSV per sitemap
// - movies:     fetch the top-rated movie list from a JSON API
// - box-office: scrape yearly star box-office charts
//
// We use clap's "derive" API, so the CLI is described by the structs below.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::sitemap::{DEFAULT_EXPORT_DIR, DEFAULT_MAX_SITEMAPS, DEFAULT_SEGMENT_PREFIX};

#[derive(Parser, Debug)]
#[command(
    name = "web-harvest",
    version,
    about = "Crawl sitemaps and scrape movie and box-office tables into CSV files",
    long_about = "web-harvest discovers a site's sitemaps through robots.txt and records every URL \
                  they list, and can also collect top-rated movie data or yearly box-office \
                  star charts. Everything ends up in plain CSV files."
)]
pub struct Cli {
    /// Show debug logs (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover sitemaps via robots.txt and export the URLs they list
    ///
    /// Example: web-harvest sitemaps https://medium.com --segment
    Sitemaps {
        /// Site root (robots.txt is read from <ROOT_URL>/robots.txt)
        root_url: String,

        /// Maximum number of sitemap documents to consume
        #[arg(long, default_value_t = DEFAULT_MAX_SITEMAPS)]
        max_sitemaps: usize,

        /// Split every URL into path segments (adds a Subdirs column)
        #[arg(long)]
        segment: bool,

        /// Prefix removed from URLs before splitting them
        #[arg(long, default_value = DEFAULT_SEGMENT_PREFIX)]
        prefix: String,

        /// Directory that receives one CSV per sitemap
        #[arg(long, default_value = DEFAULT_EXPORT_DIR)]
        output_dir: PathBuf,

        /// Print the crawl result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Fetch top-rated movies from The Movie Database API
    ///
    /// Example: web-harvest movies --api-key KEY --pages 5
    Movies {
        /// API key for The Movie Database
        #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Number of result pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// CSV file to write
        #[arg(long, default_value = "top_rated_movies.csv")]
        output: PathBuf,

        /// Print the movies as JSON instead of writing only the CSV summary
        #[arg(long)]
        json: bool,
    },

    /// Scrape the highest-grossing stars chart for a range of years
    ///
    /// Example: web-harvest box-office --start-year 2019 --end-year 2023
    BoxOffice {
        /// First year to scrape
        #[arg(long)]
        start_year: i32,

        /// Last year to scrape (inclusive)
        #[arg(long)]
        end_year: i32,

        /// CSV file to write
        #[arg(long, default_value = "box_office.csv")]
        output: PathBuf,
    },
}
