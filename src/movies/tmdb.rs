// src/movies/tmdb.rs
// =============================================================================
// Fetches the top-rated movie list from The Movie Database API, page by page.
//
// Each page is one GET:
//   {api_base}/3/movie/top_rated?api_key=...&language=en-US&page=N
//
// We keep a fixed set of columns from every result and append them in page
// order. A page that fails (bad status, network error, unexpected JSON) is
// logged and skipped; the remaining pages are still fetched.
//
// Rust concepts:
// - serde: #[derive(Deserialize)] maps the JSON straight onto our struct
// - #[serde(default)]: fields the API leaves out get their Default value
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::fetch::{FetchOutcome, Fetcher, DEFAULT_USER_AGENT};

/// Public API host
pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org";

const TOP_RATED_PATH: &str = "/3/movie/top_rated";
const LANGUAGE: &str = "en-US";

/// Query params never written to the logs
const SECRET_PARAMS: &[&str] = &["api_key"];

// One row of the movie table
//
// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

// The part of a top_rated response we read; other keys are ignored
#[derive(Debug, Deserialize)]
struct TopRatedPage {
    results: Vec<Movie>,
}

pub struct MovieFetcher {
    fetcher: Fetcher,
    api_base: String,
    api_key: String,
    movies: Vec<Movie>,
}

impl MovieFetcher {
    pub fn new(api_key: &str) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(DEFAULT_USER_AGENT)?,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.to_string(),
            movies: Vec::new(),
        })
    }

    // Fetches pages 1..=pages and appends their movies
    pub async fn fetch_pages(&mut self, pages: u32) -> &[Movie] {
        for page in 1..=pages {
            match self.fetch_page(page).await {
                Some(movies) => {
                    debug!(page, movies = movies.len(), "fetched movie page");
                    self.movies.extend(movies);
                }
                None => continue,
            }
        }

        info!(movies = self.movies.len(), "movie fetch finished");
        &self.movies
    }

    // One page of results, or None (already logged) if it failed
    async fn fetch_page(&self, page: u32) -> Option<Vec<Movie>> {
        let url = format!("{}{}", self.api_base, TOP_RATED_PATH);
        let page_param = page.to_string();
        let params = [
            ("api_key", self.api_key.as_str()),
            ("language", LANGUAGE),
            ("page", page_param.as_str()),
        ];

        let body = match self.fetcher.fetch_with_query(&url, &params, SECRET_PARAMS).await {
            FetchOutcome::Body(body) => body,
            FetchOutcome::Failed(reason) => {
                warn!(page, %reason, "Data fetch error");
                return None;
            }
        };

        match serde_json::from_str::<TopRatedPage>(&body) {
            Ok(parsed) => Some(parsed.results),
            Err(e) => {
                warn!(page, error = %e, "Data fetch error: unexpected response body");
                None
            }
        }
    }

    /// Everything fetched so far, in page order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    // Writes the table to `path` as CSV with a header row
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        // serialize() writes the header from the first record; an empty
        // table still gets one
        if self.movies.is_empty() {
            writer.write_record([
                "id",
                "title",
                "overview",
                "release_date",
                "popularity",
                "vote_average",
                "vote_count",
            ])?;
        }
        for movie in &self.movies {
            writer.serialize(movie)?;
        }
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
impl MovieFetcher {
    /// Points the fetcher at a different host
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}
