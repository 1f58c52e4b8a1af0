// src/box_office/chart.rs
// =============================================================================
// This module pulls the yearly star chart out of a box-office HTML page.
//
// The chart pages have several <div id="page_filling_chart"> blocks; the
// third one holds both the pagination links and the data table.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Tolerates the duplicated ids these pages ship with
//
// Rust concepts:
// - Option<T>: "this page didn't have the structure we expected"
// - Iterators: nth(), skip(), map()
// =============================================================================

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

/// Index of the chart block that holds the data (the third one)
const CHART_BLOCK_INDEX: usize = 2;

// A simple column-oriented table: header names plus string rows
//
// Every row has exactly headers.len() cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ChartTable {
    // Builds a table, padding or truncating rows to the header width
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // Adds (or overwrites) a column holding the same value in every row
    pub fn set_constant_column(&mut self, name: &str, value: &str) {
        let idx = match self.headers.iter().position(|h| h == name) {
            Some(idx) => idx,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        };
        for row in &mut self.rows {
            row[idx] = value.to_string();
        }
    }

    // Appends `other` below this table, lining columns up by name
    //
    // The n-th column called "X" in `other` goes to the n-th column called
    // "X" here, so repeated header names stay separate columns. Columns only
    // `other` has are added at the end; cells a row has no value for are
    // left empty.
    pub fn append(&mut self, other: ChartTable) {
        let mut positions = Vec::with_capacity(other.headers.len());

        for (i, header) in other.headers.iter().enumerate() {
            let occurrence = other.headers[..i].iter().filter(|h| *h == header).count();
            let existing = self
                .headers
                .iter()
                .enumerate()
                .filter(|(_, mine)| *mine == header)
                .map(|(idx, _)| idx)
                .nth(occurrence);

            let idx = match existing {
                Some(idx) => idx,
                None => {
                    self.headers.push(header.clone());
                    for row in &mut self.rows {
                        row.push(String::new());
                    }
                    self.headers.len() - 1
                }
            };
            positions.push(idx);
        }

        for row in other.rows {
            let mut aligned = vec![String::new(); self.headers.len()];
            for (cell, &idx) in row.into_iter().zip(&positions) {
                aligned[idx] = cell;
            }
            self.rows.push(aligned);
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid CSS selector {:?}: {:?}", css, e))
}

// Text of an element with every text node trimmed, then concatenated
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

fn chart_block<'a>(document: &'a Html) -> Result<Option<ElementRef<'a>>> {
    let blocks = selector("div#page_filling_chart")?;
    Ok(document.select(&blocks).nth(CHART_BLOCK_INDEX))
}

// Extracts the pagination links of a chart page as absolute URLs
//
// Returns an empty list when the page doesn't have the expected layout.
//
// Example:
//   <div id="page_filling_chart"><div><a href="/p/2">2</a></div></div> (third block)
//   site_base = "https://the-numbers.com"
//   result = ["https://the-numbers.com/p/2"]
pub fn parse_pagination_links(html: &str, site_base: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let Some(block) = chart_block(&document)? else {
        return Ok(Vec::new());
    };

    let Some(nav) = block.select(&selector("div")?).next() else {
        return Ok(Vec::new());
    };

    let links = nav
        .select(&selector("a")?)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| format!("{}{}", site_base, href))
        .collect();

    Ok(links)
}

// Extracts the data table of a chart page
//
// Headers are every <th>; rows are every <tr> after the first, one cell
// per <td>. Returns an empty table when the layout isn't there.
pub fn parse_chart_table(html: &str) -> Result<ChartTable> {
    let document = Html::parse_document(html);
    let Some(block) = chart_block(&document)? else {
        return Ok(ChartTable::default());
    };

    let Some(table) = block.select(&selector("table")?).next() else {
        return Ok(ChartTable::default());
    };

    let th = selector("th")?;
    let tr = selector("tr")?;
    let td = selector("td")?;

    let headers: Vec<String> = table.select(&th).map(stripped_text).collect();
    let rows: Vec<Vec<String>> = table
        .select(&tr)
        .skip(1)
        .map(|row| row.select(&td).map(stripped_text).collect::<Vec<String>>())
        .collect();

    Ok(ChartTable::new(headers, rows))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why nth(2)?
//    - document.select() returns an iterator over matching elements
//    - nth(2) skips two and gives us the third (indexes start at 0)
//    - It returns Option, because there may be fewer than three
//
// 2. What does element.select() search?
//    - Only the element's descendants, in document order
//    - .next() therefore means "the first nested match"
//
// 3. What is let-else?
//    - let Some(x) = ... else { return ...; };
//    - Binds x if the pattern matches, otherwise runs the else block
//    - The else block must leave the function (return, continue, ...)
// -----------------------------------------------------------------------------
