//! Static page detection over the route directory tree.
//!
//! A page is a directory containing `page.html`; its URL path is the
//! directory path relative to the routes root. Grouping directories
//! (parenthesized names) are transparent, the `api` subtree is never a
//! page source, and dynamic segments (`[slug]`) are excluded because no
//! concrete URL exists for them at detection time.

use domain::sitemap::DetectedPage;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Filename convention marking a routable page.
pub const PAGE_FILE: &str = "page.html";

pub struct PageDetector {
    routes_root: PathBuf,
}

impl PageDetector {
    pub fn new(routes_root: impl Into<PathBuf>) -> Self {
        Self {
            routes_root: routes_root.into(),
        }
    }

    pub fn routes_root(&self) -> &Path {
        &self.routes_root
    }

    /// All static pages, deduplicated by path (first occurrence wins) and
    /// sorted with the root path first, then lexicographically.
    ///
    /// Walk errors (unreadable directories, vanished entries) are logged
    /// and skipped; detection itself never fails.
    pub fn detect_pages(&self) -> Vec<DetectedPage> {
        let mut seen = HashSet::new();
        let mut pages = Vec::new();

        let walker = WalkDir::new(&self.routes_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(entry.file_type().is_dir() && entry.file_name() == "api"));

        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("route scan error: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name() != PAGE_FILE {
                continue;
            }

            let Some(path) = self.url_path_for(entry.path()) else {
                continue;
            };
            if seen.insert(path.clone()) {
                pages.push(DetectedPage::scored(path));
            }
        }

        pages.sort_by(|a, b| match (a.path == "/", b.path == "/") {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.path.cmp(&b.path),
        });

        pages
    }

    /// URL path for a `page.html` location, `None` when the route is
    /// dynamic.
    fn url_path_for(&self, page_file: &Path) -> Option<String> {
        let rel = page_file.parent()?.strip_prefix(&self.routes_root).ok()?;

        let mut segments = Vec::new();
        for component in rel.components() {
            let name = component.as_os_str().to_string_lossy();
            if name.starts_with('(') && name.ends_with(')') {
                // grouping directory: children are promoted to the parent
                continue;
            }
            if name.contains('[') && name.contains(']') {
                return None;
            }
            segments.push(name.into_owned());
        }

        Some(if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", segments.join("/"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::sitemap::ChangeFreq;
    use std::fs;
    use tempfile::TempDir;

    fn add_page(root: &Path, dir: &str) {
        let dir = if dir.is_empty() {
            root.to_path_buf()
        } else {
            root.join(dir)
        };
        fs::create_dir_all(&dir).expect("create route dir");
        fs::write(dir.join(PAGE_FILE), "<html></html>").expect("write page file");
    }

    fn paths(detector: &PageDetector) -> Vec<String> {
        detector
            .detect_pages()
            .into_iter()
            .map(|p| p.path)
            .collect()
    }

    #[test]
    fn detects_pages_root_first_then_sorted() {
        let tmp = TempDir::new().expect("tempdir");
        add_page(tmp.path(), "");
        add_page(tmp.path(), "web");
        add_page(tmp.path(), "web/samplePages");
        add_page(tmp.path(), "web/blog");

        let detector = PageDetector::new(tmp.path());
        assert_eq!(
            paths(&detector),
            vec!["/", "/web", "/web/blog", "/web/samplePages"]
        );
    }

    #[test]
    fn dynamic_segments_are_excluded_and_static_siblings_kept() {
        let tmp = TempDir::new().expect("tempdir");
        add_page(tmp.path(), "web/blog");
        add_page(tmp.path(), "web/blog/[slug]");

        let detector = PageDetector::new(tmp.path());
        let pages = detector.detect_pages();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, "/web/blog");
        assert_eq!(pages[0].priority, 0.6);
        assert_eq!(pages[0].changefreq, ChangeFreq::Weekly);
    }

    #[test]
    fn api_subtree_is_skipped() {
        let tmp = TempDir::new().expect("tempdir");
        add_page(tmp.path(), "web");
        add_page(tmp.path(), "api/revalidate");

        let detector = PageDetector::new(tmp.path());
        assert_eq!(paths(&detector), vec!["/web"]);
    }

    #[test]
    fn grouping_directories_are_transparent_and_duplicates_collapse() {
        let tmp = TempDir::new().expect("tempdir");
        add_page(tmp.path(), "(marketing)/about");
        add_page(tmp.path(), "about");

        let detector = PageDetector::new(tmp.path());
        assert_eq!(paths(&detector), vec!["/about"]);
    }

    #[test]
    fn missing_routes_root_yields_no_pages() {
        let detector = PageDetector::new("/nonexistent/routes");
        assert!(detector.detect_pages().is_empty());
    }
}
