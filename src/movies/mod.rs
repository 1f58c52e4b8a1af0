// src/movies/mod.rs
// =============================================================================
// This module collects top-rated movie data from a paginated JSON API.
//
// Submodules:
// - tmdb: the API client and the Movie row type
// =============================================================================

mod tmdb;

pub use tmdb::MovieFetcher;
