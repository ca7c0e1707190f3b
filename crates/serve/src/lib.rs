pub mod cache;
pub mod sitemap;

pub use cache::PageCache;
pub use sitemap::{PageDetector, SitemapGenerator};
