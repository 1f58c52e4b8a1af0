// src/fetch/mod.rs
// =============================================================================
// This module contains the HTTP layer shared by every scraper.
//
// Submodules:
// - http: fail-soft GET requests that return a FetchOutcome
//
// Every pipeline in this tool treats a failed download as an empty
// document, so the crawl keeps going when one page is broken.
// =============================================================================

mod http;

pub use http::{FetchOutcome, Fetcher, DEFAULT_USER_AGENT, DESKTOP_USER_AGENT};
