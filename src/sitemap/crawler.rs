// src/sitemap/crawler.rs
// =============================================================================
// This module implements the sitemap crawl with a depth-first approach.
//
// How it works:
// 1. Fetch {root}/robots.txt and read its `Sitemap:` lines (the seeds)
// 2. For each seed, reserve one budget slot and analyze it
// 3. Analyzing a sitemap records every <loc> it lists, in order. When a
//    <loc> ends in ".xml" and a slot is left, that sitemap is analyzed
//    *before* moving on to the next <loc> (pre-order, depth-first)
// 4. Every analyzed sitemap gets a table, even an empty one
//
// Instead of recursion we keep an explicit stack of frames, one per sitemap
// being read. The top frame is the sitemap we're currently in; pushing a
// frame is "descending", popping it is "returning" and stores its table.
//
// Loop breaking:
// - The budget caps how many sitemaps a run may consume
// - A visited set stops a sitemap that lists itself (or an ancestor) from
//   being entered twice
//
// Rust concepts:
// - Vec as a stack: push()/last_mut()/pop()
// - HashSet: addresses already entered
// =============================================================================

use std::collections::HashSet;

use tracing::{debug, info};

use super::budget::{CrawlBudget, DEFAULT_MAX_SITEMAPS};
use super::robots::parse_sitemap_directives;
use super::table::{CrawlResult, SitemapTable};
use super::xml::extract_locs;
use crate::fetch::Fetcher;

/// Suffix that marks a <loc> as a nested sitemap
const SITEMAP_SUFFIX: &str = ".xml";

// Settings for one crawl
#[derive(Debug, Clone, Copy)]
pub struct CrawlerConfig {
    /// Maximum number of sitemap slots one run may reserve
    pub max_sitemaps: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_sitemaps: DEFAULT_MAX_SITEMAPS,
        }
    }
}

// One sitemap being read
#[derive(Debug)]
struct Frame {
    address: String,
    locs: Vec<String>,
    next: usize,
    table: Vec<String>,
}

// What the top frame wants to do next
enum Step {
    /// Enter this nested sitemap before continuing
    Descend(String),
    /// Recorded an entry, keep reading this sitemap
    Continue,
    /// No entries left in this sitemap
    Finished,
}

pub struct SitemapCrawler {
    root: String,
    fetcher: Fetcher,
    budget: CrawlBudget,
    visited: HashSet<String>,
    result: CrawlResult,
}

impl SitemapCrawler {
    pub fn new(root: &str, fetcher: Fetcher, config: CrawlerConfig) -> Self {
        Self {
            root: root.trim_end_matches('/').to_string(),
            fetcher,
            budget: CrawlBudget::new(config.max_sitemaps),
            visited: HashSet::new(),
            result: CrawlResult::new(),
        }
    }

    pub fn budget(&self) -> &CrawlBudget {
        &self.budget
    }

    pub fn into_result(self) -> CrawlResult {
        self.result
    }

    // Fetches robots.txt and returns the seed sitemap addresses
    //
    // A missing or unreachable robots.txt simply yields no seeds.
    pub async fn discover_seeds(&self) -> Vec<String> {
        let robots_url = format!("{}/robots.txt", self.root);
        let robots = self.fetcher.fetch(&robots_url).await.into_text();
        let seeds = parse_sitemap_directives(&robots);

        info!(robots = %robots_url, seeds = seeds.len(), "read robots.txt");
        seeds
    }

    // Runs the whole crawl: seeds from robots.txt, then each seed in order
    //
    // Seeds found after the budget is exhausted are skipped entirely.
    pub async fn crawl(&mut self) -> &CrawlResult {
        let seeds = self.discover_seeds().await;
        for seed in seeds {
            if self.visited.contains(&seed) {
                debug!(seed = %seed, "seed already analyzed, skipping");
                continue;
            }
            if !self.budget.try_reserve() {
                debug!(seed = %seed, "budget exhausted, skipping seed");
                continue;
            }
            self.analyze(&seed).await;
        }

        info!(
            sitemaps = self.result.len(),
            urls = self.result.url_count(),
            budget_used = self.budget.used(),
            "sitemap crawl finished"
        );
        &self.result
    }

    // Analyzes one sitemap and, depth-first, every nested sitemap it lists
    //
    // The caller must already have reserved a budget slot for `address`.
    pub async fn analyze(&mut self, address: &str) {
        let mut stack: Vec<Frame> = Vec::new();

        if let Some(frame) = self.enter(address).await {
            stack.push(frame);
        }

        while !stack.is_empty() {
            let step = self.advance(&mut stack);

            match step {
                Step::Descend(child) => {
                    if let Some(frame) = self.enter(&child).await {
                        stack.push(frame);
                    }
                }
                Step::Continue => {}
                Step::Finished => {
                    if let Some(frame) = stack.pop() {
                        debug!(sitemap = %frame.address, urls = frame.table.len(), "sitemap analyzed");
                        self.result.insert(frame.address, SitemapTable::new(frame.table));
                    }
                }
            }
        }
    }

    // Reads the next <loc> of the top frame
    fn advance(&mut self, stack: &mut [Frame]) -> Step {
        let Some(frame) = stack.last_mut() else {
            return Step::Finished;
        };
        let Some(url) = frame.locs.get(frame.next).cloned() else {
            return Step::Finished;
        };
        frame.next += 1;
        frame.table.push(url.clone());

        if !url.ends_with(SITEMAP_SUFFIX) {
            return Step::Continue;
        }
        if self.visited.contains(&url) {
            debug!(sitemap = %url, "already analyzed or in progress, not descending");
            return Step::Continue;
        }
        if !self.budget.try_reserve() {
            return Step::Continue;
        }
        Step::Descend(url)
    }

    // Entry guard, then fetch and parse
    //
    // Once the counter has reached the maximum nothing more is fetched,
    // even for a slot that was just reserved.
    async fn enter(&mut self, address: &str) -> Option<Frame> {
        if self.budget.is_exhausted() {
            debug!(sitemap = %address, "budget reached, not fetching");
            return None;
        }
        self.visited.insert(address.to_string());

        let body = self.fetcher.fetch(address).await.into_text();
        let locs = extract_locs(&body);
        debug!(sitemap = %address, entries = locs.len(), "fetched sitemap");

        Some(Frame {
            address: address.to_string(),
            locs,
            next: 0,
            table: Vec::new(),
        })
    }
}

#[cfg(test)]
impl SitemapCrawler {
    pub fn result(&self) -> &CrawlResult {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::DEFAULT_USER_AGENT;
    use mockito::{Mock, Server, ServerGuard};

    fn crawler(server: &ServerGuard, max_sitemaps: usize) -> SitemapCrawler {
        let fetcher = Fetcher::new(DEFAULT_USER_AGENT).unwrap();
        SitemapCrawler::new(&server.url(), fetcher, CrawlerConfig { max_sitemaps })
    }

    fn urlset(locs: &[String]) -> String {
        let entries: String = locs
            .iter()
            .map(|loc| format!("<url><loc>{}</loc></url>", loc))
            .collect();
        format!(
            r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
            entries
        )
    }

    async fn serve(server: &mut ServerGuard, path: &str, body: String, hits: usize) -> Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_robots_without_sitemaps_yields_empty_result() {
        let mut server = Server::new_async().await;
        let _robots = serve(&mut server, "/robots.txt", "User-agent: *\nDisallow: /private".into(), 1).await;

        let mut crawler = crawler(&server, 30);
        crawler.crawl().await;

        assert!(crawler.result().is_empty());
        assert_eq!(crawler.budget().used(), 0);
    }

    #[tokio::test]
    async fn test_missing_robots_yields_empty_result() {
        let server = Server::new_async().await;

        // Unmatched requests get a 501 from mockito, which is a soft failure
        let mut crawler = crawler(&server, 30);
        crawler.crawl().await;

        assert!(crawler.result().is_empty());
    }

    #[tokio::test]
    async fn test_seed_with_nested_sitemaps() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let _robots = serve(&mut server, "/robots.txt", format!("Sitemap: {}/index.xml", base), 1).await;
        let _index = serve(
            &mut server,
            "/index.xml",
            urlset(&[format!("{}/posts.xml", base), format!("{}/about", base)]),
            1,
        )
        .await;
        let _posts = serve(
            &mut server,
            "/posts.xml",
            urlset(&[format!("{}/post-1", base), format!("{}/post-2", base)]),
            1,
        )
        .await;

        let mut crawler = crawler(&server, 30);
        crawler.crawl().await;
        let result = crawler.result();

        assert_eq!(result.len(), 2);
        assert_eq!(
            result.get(&format!("{}/index.xml", base)).unwrap().urls,
            vec![format!("{}/posts.xml", base), format!("{}/about", base)]
        );
        assert_eq!(
            result.get(&format!("{}/posts.xml", base)).unwrap().urls,
            vec![format!("{}/post-1", base), format!("{}/post-2", base)]
        );
        assert_eq!(crawler.budget().used(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_sitemap_gets_empty_table() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let _robots = serve(&mut server, "/robots.txt", format!("Sitemap: {}/broken.xml", base), 1).await;
        let _broken = serve(&mut server, "/broken.xml", "<urlset><url><loc>x</url>".into(), 1).await;

        let mut crawler = crawler(&server, 30);
        crawler.crawl().await;

        let table = crawler.result().get(&format!("{}/broken.xml", base)).unwrap();
        assert!(table.is_empty());
        assert_eq!(crawler.budget().used(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_gets_empty_table() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let _robots = serve(&mut server, "/robots.txt", format!("Sitemap: {}/gone.xml", base), 1).await;
        let _gone = server
            .mock("GET", "/gone.xml")
            .with_status(404)
            .create_async()
            .await;

        let mut crawler = crawler(&server, 30);
        crawler.crawl().await;

        assert!(crawler.result().get(&format!("{}/gone.xml", base)).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chain_shorter_than_budget_is_fully_traversed() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let _robots = serve(&mut server, "/robots.txt", format!("Sitemap: {}/s1.xml", base), 1).await;
        let m1 = serve(&mut server, "/s1.xml", urlset(&[format!("{}/s2.xml", base)]), 1).await;
        let m2 = serve(&mut server, "/s2.xml", urlset(&[format!("{}/s3.xml", base)]), 1).await;
        let m3 = serve(&mut server, "/s3.xml", urlset(&[format!("{}/leaf", base)]), 1).await;

        let mut crawler = crawler(&server, 30);
        crawler.crawl().await;

        assert_eq!(crawler.result().len(), 3);
        assert_eq!(crawler.budget().used(), 3);
        m1.assert_async().await;
        m2.assert_async().await;
        m3.assert_async().await;
    }

    #[tokio::test]
    async fn test_chain_stops_when_budget_reached() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let _robots = serve(&mut server, "/robots.txt", format!("Sitemap: {}/s1.xml", base), 1).await;
        let m1 = serve(&mut server, "/s1.xml", urlset(&[format!("{}/s2.xml", base)]), 1).await;
        let m2 = serve(&mut server, "/s2.xml", urlset(&[format!("{}/s3.xml", base)]), 1).await;
        let m3 = serve(&mut server, "/s3.xml", urlset(&[format!("{}/s4.xml", base)]), 0).await;
        let m4 = serve(&mut server, "/s4.xml", urlset(&[]), 0).await;

        let mut crawler = crawler(&server, 3);
        crawler.crawl().await;

        // The slot that fills the budget is reserved but never fetched
        assert_eq!(crawler.budget().used(), 3);
        assert_eq!(crawler.result().len(), 2);
        assert!(!crawler.result().contains(&format!("{}/s3.xml", base)));

        // s2 still records the entry it could not descend into
        assert_eq!(
            crawler.result().get(&format!("{}/s2.xml", base)).unwrap().urls,
            vec![format!("{}/s3.xml", base)]
        );

        m1.assert_async().await;
        m2.assert_async().await;
        m3.assert_async().await;
        m4.assert_async().await;
    }

    #[tokio::test]
    async fn test_traversal_is_depth_first() {
        let mut server = Server::new_async().await;
        let base = server.url();

        // index -> [a.xml, b.xml], a -> [a1.xml]
        // Depth-first spends the last usable slot on a1, not b.
        let _robots = serve(&mut server, "/robots.txt", format!("Sitemap: {}/index.xml", base), 1).await;
        let _index = serve(
            &mut server,
            "/index.xml",
            urlset(&[format!("{}/a.xml", base), format!("{}/b.xml", base)]),
            1,
        )
        .await;
        let _a = serve(&mut server, "/a.xml", urlset(&[format!("{}/a1.xml", base)]), 1).await;
        let a1 = serve(&mut server, "/a1.xml", urlset(&[format!("{}/page", base)]), 1).await;
        let b = serve(&mut server, "/b.xml", urlset(&[]), 0).await;

        let mut crawler = crawler(&server, 4);
        crawler.crawl().await;

        assert_eq!(crawler.result().len(), 3);
        assert!(crawler.result().contains(&format!("{}/a1.xml", base)));
        assert!(!crawler.result().contains(&format!("{}/b.xml", base)));
        a1.assert_async().await;
        b.assert_async().await;
    }

    #[tokio::test]
    async fn test_seeds_after_budget_are_skipped() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let _robots = serve(
            &mut server,
            "/robots.txt",
            format!(
                "Sitemap: {0}/one.xml\nSitemap: {0}/two.xml\nSitemap: {0}/three.xml",
                base
            ),
            1,
        )
        .await;
        let one = serve(&mut server, "/one.xml", urlset(&[format!("{}/p1", base)]), 1).await;
        let two = serve(&mut server, "/two.xml", urlset(&[format!("{}/p2", base)]), 1).await;
        let three = serve(&mut server, "/three.xml", urlset(&[]), 0).await;

        let mut crawler = crawler(&server, 3);
        crawler.crawl().await;

        assert_eq!(crawler.result().len(), 2);
        assert!(crawler.result().len() <= crawler.budget().max());
        one.assert_async().await;
        two.assert_async().await;
        three.assert_async().await;
    }

    #[tokio::test]
    async fn test_self_referencing_sitemap_is_entered_once() {
        let mut server = Server::new_async().await;
        let base = server.url();
        let looped = format!("{}/loop.xml", base);

        let _robots = serve(&mut server, "/robots.txt", format!("Sitemap: {}", looped), 1).await;
        let mock = serve(
            &mut server,
            "/loop.xml",
            urlset(&[looped.clone(), format!("{}/page", base)]),
            1,
        )
        .await;

        let mut crawler = crawler(&server, 30);
        crawler.crawl().await;

        assert_eq!(
            crawler.result().get(&looped).unwrap().urls,
            vec![looped.clone(), format!("{}/page", base)]
        );
        assert_eq!(crawler.budget().used(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ancestor_is_not_entered_again() {
        let mut server = Server::new_async().await;
        let base = server.url();
        let a = format!("{}/a.xml", base);
        let b = format!("{}/b.xml", base);

        // a -> b -> a
        let _robots = serve(&mut server, "/robots.txt", format!("Sitemap: {}", a), 1).await;
        let ma = serve(&mut server, "/a.xml", urlset(&[b.clone()]), 1).await;
        let mb = serve(&mut server, "/b.xml", urlset(&[a.clone(), format!("{}/page", base)]), 1).await;

        let mut crawler = crawler(&server, 30);
        crawler.crawl().await;

        assert_eq!(crawler.result().len(), 2);
        assert_eq!(
            crawler.result().get(&b).unwrap().urls,
            vec![a.clone(), format!("{}/page", base)]
        );
        assert_eq!(crawler.budget().used(), 2);
        ma.assert_async().await;
        mb.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_seed_gets_empty_table() {
        let mut server = Server::new_async().await;

        let _robots = serve(&mut server, "/robots.txt", "Sitemap: \n".into(), 1).await;

        let mut crawler = crawler(&server, 30);
        crawler.crawl().await;

        assert!(crawler.result().get("").unwrap().is_empty());
        assert_eq!(crawler.budget().used(), 1);
    }

    #[tokio::test]
    async fn test_zero_budget_fetches_no_sitemaps() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let _robots = serve(&mut server, "/robots.txt", format!("Sitemap: {}/s.xml", base), 1).await;
        let s = serve(&mut server, "/s.xml", urlset(&[]), 0).await;

        let mut crawler = crawler(&server, 0);
        crawler.crawl().await;

        assert!(crawler.result().is_empty());
        s.assert_async().await;
    }
}
