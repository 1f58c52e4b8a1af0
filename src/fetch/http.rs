// src/fetch/http.rs
// =============================================================================
// This module downloads documents over HTTP without ever failing loudly.
//
// Key functionality:
// - Makes HTTP GET requests with a browser-like User-Agent header
// - Returns the body on a 2xx response
// - Turns every other outcome (bad status, timeout, DNS, ...) into a
//   FetchFailure value instead of an error, so one bad document never
//   aborts a whole crawl
//
// Rust concepts:
// - Enums with data: FetchOutcome carries either a body or a reason
// - thiserror: derives Display for our failure reasons
// - async/await: for network I/O
// =============================================================================

use anyhow::{Context, Result};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Short identifying header used by the sitemap crawler
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Full desktop browser header; some chart sites refuse the short form
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

// Why a download did not produce a body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// Server answered with a non-2xx status code
    #[error("HTTP {0}")]
    Status(u16),
    /// Request timed out
    #[error("request timed out")]
    Timeout,
    /// Redirect loop or too many hops
    #[error("too many redirects")]
    TooManyRedirects,
    /// DNS or TCP/TLS connection problem
    #[error("connection failed: {0}")]
    Connect(String),
    /// Headers arrived but the body could not be read
    #[error("could not read response body: {0}")]
    Body(String),
    /// Anything else reqwest reports
    #[error("{0}")]
    Other(String),
}

// The result of a single fail-soft download
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Body(String),
    Failed(FetchFailure),
}

impl FetchOutcome {
    /// The body text, or an empty string when the fetch failed
    ///
    /// Parsing an empty document yields zero entries, which is exactly
    /// how a failed download should look to the parsers downstream.
    pub fn into_text(self) -> String {
        match self {
            FetchOutcome::Body(body) => body,
            FetchOutcome::Failed(_) => String::new(),
        }
    }
}

// A reusable HTTP client with a fixed User-Agent
//
// Client is cheap to clone (it's reference counted internally), so the
// Fetcher is too.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Builds a fetcher that sends `user_agent` on every request
    //
    // No timeout override: we keep reqwest's defaults.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    // Downloads `url` and returns its body text or the reason it failed
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        self.get(url, url).await
    }

    // Same as fetch(), but appends `params` to the query string first
    //
    // Values of the params named in `hidden` are masked in every log line.
    pub async fn fetch_with_query(
        &self,
        base: &str,
        params: &[(&str, &str)],
        hidden: &[&str],
    ) -> FetchOutcome {
        match Url::parse_with_params(base, params) {
            Ok(url) => self.get(url.as_str(), &redact_query(&url, hidden)).await,
            Err(e) => {
                warn!(url = base, error = %e, "invalid URL");
                FetchOutcome::Failed(FetchFailure::Other(format!("invalid URL: {}", e)))
            }
        }
    }

    // Sends the request to `url` but only ever logs `shown`
    async fn get(&self, url: &str, shown: &str) -> FetchOutcome {
        debug!(url = shown, "GET");

        // reqwest errors carry the full URL; drop it, we log `shown` instead
        let outcome = match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    FetchOutcome::Failed(FetchFailure::Status(status.as_u16()))
                } else {
                    match response.text().await {
                        Ok(body) => FetchOutcome::Body(body),
                        Err(e) => FetchOutcome::Failed(FetchFailure::Body(e.without_url().to_string())),
                    }
                }
            }
            Err(e) => FetchOutcome::Failed(categorize_error(&e.without_url())),
        };

        if let FetchOutcome::Failed(reason) = &outcome {
            warn!(url = shown, %reason, "fetch failed, continuing with an empty document");
        }

        outcome
    }
}

/// Placeholder logged in place of a hidden query value
const REDACTED: &str = "***";

// The URL as text, with the values of the `hidden` query params masked
//
// Example:
//   "https://api.example.com/list?api_key=abc&page=2", hidden = ["api_key"]
//   -> "https://api.example.com/list?api_key=***&page=2"
fn redact_query(url: &Url, hidden: &[&str]) -> String {
    if hidden.is_empty() || url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if hidden.contains(&&*name) {
                REDACTED.to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

// Categorizes the different error types reqwest can return
//
// reqwest exposes is_timeout(), is_redirect(), ... so we just ask it in
// order; DNS and TLS problems both surface as connect errors.
fn categorize_error(error: &reqwest::Error) -> FetchFailure {
    let error_string = error.to_string();

    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_redirect() {
        FetchFailure::TooManyRedirects
    } else if error.is_connect() {
        FetchFailure::Connect(error_string)
    } else if error.is_body() || error.is_decode() {
        FetchFailure::Body(error_string)
    } else {
        FetchFailure::Other(error_string)
    }
}
