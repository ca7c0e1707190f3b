//! The generated sitemap, served at `/sitemap.xml` and writable as a
//! build artifact via the `sitemap` CLI subcommand.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use domain::SiteConfig;
use http::header;
use serve::{PageDetector, SitemapGenerator};
use tracing::warn;

use crate::state::AppState;

pub const SITEMAP_PATH: &str = "/sitemap.xml";

/// `GET /sitemap.xml`.
///
/// The rendered document is cached under its own path so the sitemap
/// revalidation webhook can refresh it like any page.
pub async fn serve_xml(State(app): State<AppState>) -> Response {
    if let Some(cached) = app.cache.get(SITEMAP_PATH) {
        return xml_response(cached.to_string());
    }

    let xml = build_sitemap_xml(&app.config);
    app.cache.insert(SITEMAP_PATH, xml.as_str());
    xml_response(xml)
}

/// Build the sitemap document for the configured route tree.
///
/// Never empty: when detection yields nothing (missing or unreadable
/// routes dir), the one-entry root fallback is emitted instead.
pub fn build_sitemap_xml(config: &SiteConfig) -> String {
    let detector = PageDetector::new(&config.routes_dir);
    let generator = SitemapGenerator::new(config.site_origin());
    let lastmod = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut urls = generator.collect_urls(&detector, Some(&lastmod));
    if urls.is_empty() {
        warn!(
            routes_dir = %config.routes_dir.display(),
            "no pages detected, serving the fallback sitemap"
        );
        urls = generator.fallback(Some(&lastmod));
    }

    generator.to_xml(&urls)
}

fn xml_response(xml: String) -> Response {
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        xml,
    )
        .into_response()
}
