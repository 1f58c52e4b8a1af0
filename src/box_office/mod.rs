// src/box_office/mod.rs
// =============================================================================
// This module scrapes yearly box-office star charts into one table.
//
// Submodules:
// - chart:    HTML -> pagination links / ChartTable
// - pipeline: the per-year, per-page pipeline and CSV output
// =============================================================================

mod chart;
mod pipeline;

pub use chart::ChartTable;
pub use pipeline::{save_csv, BoxOfficeScraper};
