// src/sitemap/robots.rs
// =============================================================================
// Reads `Sitemap:` directives out of a robots.txt file.
//
// We only care about one directive. Lines are matched exactly as written:
// the line must *start* with `Sitemap:` (case-sensitive, no leading
// whitespace) and the address is whatever follows the first ": ".
// =============================================================================

use tracing::warn;

const SITEMAP_DIRECTIVE: &str = "Sitemap:";
const SEPARATOR: &str = ": ";

// Extracts seed sitemap addresses in the order they appear
//
// Example:
//   "User-agent: *\nSitemap: https://example.com/sitemap.xml"
//   -> ["https://example.com/sitemap.xml"]
pub fn parse_sitemap_directives(robots: &str) -> Vec<String> {
    let mut seeds = Vec::new();

    for line in robots.lines() {
        if !line.starts_with(SITEMAP_DIRECTIVE) {
            continue;
        }

        // "Sitemap:https://..." has no ": " separator at all
        let Some((_, address)) = line.split_once(SEPARATOR) else {
            warn!(line, "Sitemap directive without \": \" separator, skipping");
            continue;
        };

        // An empty address is still a seed; fetching it just fails softly
        seeds.push(address.trim().to_string());
    }

    seeds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_directives_keep_order() {
        let robots = "User-agent: *\n\
                      Disallow: /admin\n\
                      Sitemap: https://example.com/b.xml\n\
                      Sitemap: https://example.com/a.xml  \n";
        assert_eq!(
            parse_sitemap_directives(robots),
            vec!["https://example.com/b.xml", "https://example.com/a.xml"]
        );
    }

    #[test]
    fn test_no_directives() {
        assert!(parse_sitemap_directives("User-agent: *\nDisallow:").is_empty());
        assert!(parse_sitemap_directives("").is_empty());
    }

    #[test]
    fn test_prefix_is_case_sensitive_and_anchored() {
        let robots = "sitemap: https://example.com/lower.xml\n  Sitemap: https://example.com/indented.xml";
        assert!(parse_sitemap_directives(robots).is_empty());
    }

    #[test]
    fn test_missing_separator_is_skipped() {
        let robots = "Sitemap:https://example.com/tight.xml\nSitemap: https://example.com/ok.xml";
        assert_eq!(parse_sitemap_directives(robots), vec!["https://example.com/ok.xml"]);
    }

    #[test]
    fn test_empty_address_is_kept() {
        let robots = "Sitemap: \nSitemap: https://example.com/ok.xml";
        assert_eq!(parse_sitemap_directives(robots), vec!["", "https://example.com/ok.xml"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let robots = "Sitemap: https://example.com/sitemap.xml\r\nUser-agent: *\r\n";
        assert_eq!(parse_sitemap_directives(robots), vec!["https://example.com/sitemap.xml"]);
    }
}
