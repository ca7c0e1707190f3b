//! Sitemap records and the path-scoring heuristics.
//!
//! The priority/changefreq table is a published contract (crawlers key off
//! it); keep the values stable.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl std::fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crawl priority for a page path.
pub fn priority_for(path: &str) -> f32 {
    if path == "/" {
        1.0
    } else if path.contains("/ranking") {
        0.9
    } else if path.contains("/search") {
        0.8
    } else if path.contains("/artist") || path.contains("/song") {
        0.7
    } else if path.contains("/blog") {
        0.6
    } else {
        0.5
    }
}

/// Expected change frequency for a page path.
pub fn changefreq_for(path: &str) -> ChangeFreq {
    if path == "/" {
        ChangeFreq::Daily
    } else if path.contains("/ranking") {
        if path.contains("/weekly") {
            ChangeFreq::Weekly
        } else if path.contains("/monthly") {
            ChangeFreq::Monthly
        } else {
            // `/daily` and the bare ranking page both refresh daily.
            ChangeFreq::Daily
        }
    } else if path.contains("/search") || path.contains("/blog") {
        ChangeFreq::Weekly
    } else if path.contains("/artist") || path.contains("/song") {
        ChangeFreq::Weekly
    } else {
        ChangeFreq::Monthly
    }
}

/// A statically detected page route.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedPage {
    pub path: String,
    pub priority: f32,
    pub changefreq: ChangeFreq,
    pub is_static: bool,
}

impl DetectedPage {
    /// Score a detected path with the heuristic table.
    pub fn scored(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            priority: priority_for(&path),
            changefreq: changefreq_for(&path),
            is_static: true,
            path,
        }
    }
}

/// One `<url>` entry of a sitemap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: Option<String>,
    pub changefreq: Option<ChangeFreq>,
    pub priority: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_table_matches_the_published_contract() {
        let expect = [
            ("/", 1.0, ChangeFreq::Daily),
            ("/web/ranking", 0.9, ChangeFreq::Daily),
            ("/web/ranking/daily", 0.9, ChangeFreq::Daily),
            ("/web/ranking/weekly", 0.9, ChangeFreq::Weekly),
            ("/web/ranking/monthly", 0.9, ChangeFreq::Monthly),
            ("/web/search", 0.8, ChangeFreq::Weekly),
            ("/web/artist", 0.7, ChangeFreq::Weekly),
            ("/web/song", 0.7, ChangeFreq::Weekly),
            ("/web/blog", 0.6, ChangeFreq::Weekly),
            ("/web/about", 0.5, ChangeFreq::Monthly),
        ];

        for (path, priority, freq) in expect {
            assert_eq!(priority_for(path), priority, "priority for {path}");
            assert_eq!(changefreq_for(path), freq, "changefreq for {path}");
        }
    }

    #[test]
    fn scored_page_carries_path_and_table_values() {
        let page = DetectedPage::scored("/web/blog");

        assert_eq!(page.path, "/web/blog");
        assert_eq!(page.priority, 0.6);
        assert_eq!(page.changefreq, ChangeFreq::Weekly);
        assert!(page.is_static);
    }
}
