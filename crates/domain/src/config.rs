//! Typed site configuration, loaded from the process environment.
//!
//! Every knob is a plain environment variable (`KUROCO_API_BASE_URL`,
//! `SITE_URL`, ...). Malformed values surface as a typed `ConfigError` at
//! startup; the Kuroco credentials are optional here because the gateway
//! and the webhook handlers degrade per-request when they are unset.

use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Process-wide configuration, injected into services at construction.
///
/// No global singleton: `main` loads this once and hands it to `AppState`,
/// the gateway and the sitemap builder by reference.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Kuroco API origin, e.g. `https://example.g.kuroco.app`.
    /// Optional: fetches return fallback results while it is unset.
    pub kuroco_api_base_url: Option<String>,

    /// Access token sent as `X-RCMS-API-ACCESS-TOKEN`; also the shared
    /// secret the content-revalidation webhook is validated against.
    pub kuroco_api_key: Option<String>,

    /// Shared secret for preview activation.
    pub kuroco_preview_secret: Option<String>,

    /// Bearer token for the sitemap revalidation endpoint.
    pub sitemap_revalidation_token: Option<String>,

    /// Public origin of this site, used for canonical URLs and sitemap locs.
    pub site_url: String,

    /// Root of the page-route tree (directories containing `page.html`).
    pub routes_dir: PathBuf,

    /// Address the HTTP server binds to.
    pub bind_addr: String,

    /// Default cache lifetime for non-preview Kuroco fetches, in seconds.
    pub default_revalidate_secs: u64,

    /// Lifetime of rendered pages in the in-process page cache, in seconds.
    pub page_cache_ttl_secs: u64,
}

impl SiteConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default().try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let cfg = Config::builder()
            .set_default("site_url", "http://localhost:3000")?
            .set_default("routes_dir", "routes")?
            .set_default("bind_addr", "127.0.0.1:3000")?
            .set_default("default_revalidate_secs", 86_400i64)?
            .set_default("page_cache_ttl_secs", 3_600i64)?
            .add_source(source)
            .build()?;

        Ok(cfg.try_deserialize::<SiteConfig>()?)
    }

    /// Public origin with any trailing slash removed, ready for joining paths.
    pub fn site_origin(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str) -> Result<SiteConfig, ConfigError> {
        SiteConfig::from_source(File::from_str(toml, FileFormat::Toml))
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = from_toml("").expect("empty config should load");

        assert_eq!(cfg.site_url, "http://localhost:3000");
        assert_eq!(cfg.routes_dir, PathBuf::from("routes"));
        assert_eq!(cfg.default_revalidate_secs, 86_400);
        assert!(cfg.kuroco_api_base_url.is_none());
        assert!(cfg.kuroco_preview_secret.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = from_toml(
            r#"
            kuroco_api_base_url = "https://cms.example"
            kuroco_api_key = "key-123"
            site_url = "https://karaoke.example/"
            default_revalidate_secs = 3600
            "#,
        )
        .expect("config should load");

        assert_eq!(cfg.kuroco_api_base_url.as_deref(), Some("https://cms.example"));
        assert_eq!(cfg.kuroco_api_key.as_deref(), Some("key-123"));
        assert_eq!(cfg.default_revalidate_secs, 3600);
        assert_eq!(cfg.site_origin(), "https://karaoke.example");
    }
}
