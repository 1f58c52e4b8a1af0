// src/sitemap/xml.rs
// =============================================================================
// Pulls the text of every <loc> element out of a sitemap document.
//
// Both kinds of sitemap use <loc>: a urlset lists pages, a sitemapindex
// lists further sitemaps. We don't care which one we're reading; we collect
// every <loc> in document order, wherever it sits and whatever namespace
// prefix it carries.
//
// Malformed XML is not an error here: the whole document yields zero
// entries and we log a warning.
// =============================================================================

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

const LOC: &[u8] = b"loc";

// Returns the trimmed text of every <loc> element in document order
pub fn extract_locs(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locs = Vec::new();
    // Some(text) while we're inside a <loc> element
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == LOC => {
                current = Some(String::new());
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == LOC => {
                locs.push(String::new());
            }
            Ok(Event::Text(text)) => {
                if let Some(buf) = current.as_mut() {
                    match text.unescape() {
                        Ok(s) => buf.push_str(&s),
                        Err(e) => {
                            warn!(error = %e, "invalid escape in sitemap, discarding document");
                            return Vec::new();
                        }
                    }
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(buf) = current.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == LOC => {
                if let Some(text) = current.take() {
                    locs.push(text.trim().to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(
                    position = reader.error_position(),
                    error = %e,
                    "malformed sitemap XML, treating as empty"
                );
                return Vec::new();
            }
            _ => {}
        }
    }

    locs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/page1</loc>
    <lastmod>2024-01-01</lastmod>
  </url>
  <url>
    <loc>
      https://example.com/page2
    </loc>
  </url>
</urlset>"#;

        assert_eq!(
            extract_locs(xml),
            vec!["https://example.com/page1", "https://example.com/page2"]
        );
    }

    #[test]
    fn test_sitemap_index() {
        let xml = r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://example.com/posts.xml</loc></sitemap>
  <sitemap><loc>https://example.com/tags.xml</loc></sitemap>
</sitemapindex>"#;

        assert_eq!(
            extract_locs(xml),
            vec!["https://example.com/posts.xml", "https://example.com/tags.xml"]
        );
    }

    #[test]
    fn test_prefixed_namespace_and_entities() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sm:url><sm:loc>https://example.com/?a=1&amp;b=2</sm:loc></sm:url>
  <sm:url><sm:loc><![CDATA[https://example.com/cdata]]></sm:loc></sm:url>
</sm:urlset>"#;

        assert_eq!(
            extract_locs(xml),
            vec!["https://example.com/?a=1&b=2", "https://example.com/cdata"]
        );
    }

    #[test]
    fn test_malformed_xml_yields_nothing() {
        let xml = "<urlset><url><loc>https://example.com/a</loc></url></sitemapindex>";
        assert!(extract_locs(xml).is_empty());
    }

    #[test]
    fn test_empty_and_non_xml_input() {
        assert!(extract_locs("").is_empty());
        assert!(extract_locs("this is not xml at all").is_empty());
        assert!(extract_locs("<urlset></urlset>").is_empty());
    }
}
