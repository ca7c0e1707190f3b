use adapt::{GatewayError, KurocoGateway};
use domain::SiteConfig;
use serve::PageCache;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

/// Shared application state; cheap to clone, handed to axum behind `Arc`s.
///
/// `draft_mode` is the coarse process-level preview flag; the preview
/// token itself travels in the `previewToken` cookie. Activation sets
/// both, exit clears both.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub gateway: Arc<KurocoGateway>,
    pub cache: Arc<PageCache>,
    draft_mode: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: SiteConfig) -> Result<Self, GatewayError> {
        let gateway = KurocoGateway::from_config(&config)?;
        let cache = PageCache::new(Duration::from_secs(config.page_cache_ttl_secs));

        Ok(Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
            cache: Arc::new(cache),
            draft_mode: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn enable_draft_mode(&self) {
        self.draft_mode.store(true, Ordering::Relaxed);
    }

    pub fn disable_draft_mode(&self) {
        self.draft_mode.store(false, Ordering::Relaxed);
    }

    pub fn is_draft_mode(&self) -> bool {
        self.draft_mode.load(Ordering::Relaxed)
    }
}
