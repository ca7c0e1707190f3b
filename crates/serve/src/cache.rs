//! In-process cache of rendered pages, keyed by request path.
//!
//! This is the target of on-demand revalidation: the webhook handlers
//! invalidate paths here, and the next request for an invalidated path
//! regenerates the page from fresh data. Keys are full paths as the
//! webhook rules emit them, including query forms such as
//! `/web/samplePages/?category=9`.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

struct Entry {
    body: Arc<str>,
    stored_at: Instant,
}

pub struct PageCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fresh cached body for `path`, if any.
    pub fn get(&self, path: &str) -> Option<Arc<str>> {
        let entries = self.entries.read();
        entries
            .get(path)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.body))
    }

    pub fn insert(&self, path: impl Into<String>, body: impl Into<Arc<str>>) {
        let path = path.into();
        debug!(path = %path, "page cached");
        self.entries.write().insert(
            path,
            Entry {
                body: body.into(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop the cached body for `path`. Returns whether an entry existed;
    /// invalidating an uncached path is a successful no-op.
    pub fn invalidate(&self, path: &str) -> bool {
        let existed = self.entries.write().remove(path).is_some();
        debug!(path = %path, existed, "page invalidated");
        existed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_round_trips() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.insert("/web/", "<html>top</html>");

        assert_eq!(cache.get("/web/").as_deref(), Some("<html>top</html>"));
        assert_eq!(cache.get("/web/other"), None);
    }

    #[test]
    fn invalidate_removes_only_the_named_path() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.insert("/web/samplePages/123", "detail");
        cache.insert("/web/samplePages/", "listing");

        assert!(cache.invalidate("/web/samplePages/123"));
        assert!(!cache.invalidate("/web/samplePages/123"));
        assert_eq!(cache.get("/web/samplePages/123"), None);
        assert_eq!(cache.get("/web/samplePages/").as_deref(), Some("listing"));
    }

    #[test]
    fn entries_expire_after_the_ttl() {
        let cache = PageCache::new(Duration::from_secs(0));
        cache.insert("/web/", "top");

        assert_eq!(cache.get("/web/"), None);
        assert_eq!(cache.len(), 1);
    }
}
