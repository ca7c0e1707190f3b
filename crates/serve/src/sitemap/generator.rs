//! Sitemap XML generation.
//!
//! Emits the standard sitemap protocol schema:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2026-01-01T00:00:00Z</lastmod>
//!     <changefreq>daily</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use crate::sitemap::PageDetector;
use domain::sitemap::{ChangeFreq, SitemapUrl};
use std::borrow::Cow;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub struct SitemapGenerator {
    base_url: String,
}

impl SitemapGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Sitemap entries for every detected static page.
    ///
    /// `lastmod` is supplied by the caller so repeated generation over the
    /// same inputs stays byte-identical.
    pub fn collect_urls(&self, detector: &PageDetector, lastmod: Option<&str>) -> Vec<SitemapUrl> {
        detector
            .detect_pages()
            .into_iter()
            .map(|page| SitemapUrl {
                loc: format!("{}{}", self.base_url, page.path),
                lastmod: lastmod.map(str::to_string),
                changefreq: Some(page.changefreq),
                priority: Some(page.priority),
            })
            .collect()
    }

    /// Minimal one-entry sitemap used when generation fails or detects
    /// nothing: the site root, crawled daily. A sitemap is never empty.
    pub fn fallback(&self, lastmod: Option<&str>) -> Vec<SitemapUrl> {
        vec![SitemapUrl {
            loc: format!("{}/", self.base_url),
            lastmod: lastmod.map(str::to_string),
            changefreq: Some(ChangeFreq::Daily),
            priority: Some(1.0),
        }]
    }

    pub fn to_xml(&self, urls: &[SitemapUrl]) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for url in urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&url.loc));
            xml.push_str("</loc>\n");
            if let Some(lastmod) = &url.lastmod {
                xml.push_str("    <lastmod>");
                xml.push_str(&escape_xml(lastmod));
                xml.push_str("</lastmod>\n");
            }
            if let Some(changefreq) = url.changefreq {
                xml.push_str("    <changefreq>");
                xml.push_str(changefreq.as_str());
                xml.push_str("</changefreq>\n");
            }
            if let Some(priority) = url.priority {
                xml.push_str("    <priority>");
                xml.push_str(&format!("{priority:.1}"));
                xml.push_str("</priority>\n");
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Escape the five reserved XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::detector::PAGE_FILE;
    use std::fs;
    use tempfile::TempDir;

    fn unescape_xml(s: &str) -> String {
        s.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }

    #[test]
    fn escape_covers_the_five_reserved_characters() {
        assert_eq!(escape_xml("plain"), "plain");
        assert_eq!(
            escape_xml("<a href=\"x\">link & 'text'</a>"),
            "&lt;a href=&quot;x&quot;&gt;link &amp; &apos;text&apos;&lt;/a&gt;"
        );
    }

    #[test]
    fn escape_then_unescape_restores_the_original() {
        let input = "search?q=a&b=\"c\"<d>'e'";
        assert_eq!(unescape_xml(&escape_xml(input)), input);
    }

    #[test]
    fn xml_generation_is_idempotent() {
        let generator = SitemapGenerator::new("https://karaoke.example/");
        let urls = vec![
            SitemapUrl {
                loc: "https://karaoke.example/".to_string(),
                lastmod: Some("2026-08-01T00:00:00Z".to_string()),
                changefreq: Some(ChangeFreq::Daily),
                priority: Some(1.0),
            },
            SitemapUrl {
                loc: "https://karaoke.example/web/search?q=a&b=c".to_string(),
                lastmod: None,
                changefreq: Some(ChangeFreq::Weekly),
                priority: Some(0.8),
            },
        ];

        let first = generator.to_xml(&urls);
        let second = generator.to_xml(&urls);
        assert_eq!(first, second);

        assert!(first.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(first.contains("<loc>https://karaoke.example/web/search?q=a&amp;b=c</loc>"));
        assert!(first.contains("<changefreq>daily</changefreq>"));
        assert!(first.contains("<priority>1.0</priority>"));
        assert!(first.contains("<priority>0.8</priority>"));
        assert!(first.ends_with("</urlset>\n"));
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let generator = SitemapGenerator::new("https://karaoke.example");
        let urls = vec![SitemapUrl {
            loc: "https://karaoke.example/web/".to_string(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }];

        let xml = generator.to_xml(&urls);
        assert!(xml.contains("<loc>https://karaoke.example/web/</loc>"));
        assert!(!xml.contains("<lastmod>"));
        assert!(!xml.contains("<changefreq>"));
        assert!(!xml.contains("<priority>"));
    }

    #[test]
    fn empty_url_list_still_produces_a_valid_urlset() {
        let generator = SitemapGenerator::new("https://karaoke.example");
        let xml = generator.to_xml(&[]);

        assert!(xml.contains("<urlset"));
        assert!(xml.contains("</urlset>"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn fallback_is_the_root_entry_with_daily_frequency() {
        let generator = SitemapGenerator::new("https://karaoke.example");
        let urls = generator.fallback(Some("2026-08-01T00:00:00Z"));

        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].loc, "https://karaoke.example/");
        assert_eq!(urls[0].priority, Some(1.0));
        assert_eq!(urls[0].changefreq, Some(ChangeFreq::Daily));
    }

    #[test]
    fn collect_urls_joins_base_url_and_detected_paths() {
        let tmp = TempDir::new().expect("tempdir");
        let web = tmp.path().join("web");
        fs::create_dir_all(&web).expect("create route dir");
        fs::write(web.join(PAGE_FILE), "<html></html>").expect("write page file");

        let detector = PageDetector::new(tmp.path());
        let generator = SitemapGenerator::new("https://karaoke.example");
        let urls = generator.collect_urls(&detector, Some("2026-08-01T00:00:00Z"));

        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].loc, "https://karaoke.example/web");
        assert_eq!(urls[0].lastmod.as_deref(), Some("2026-08-01T00:00:00Z"));
    }
}
