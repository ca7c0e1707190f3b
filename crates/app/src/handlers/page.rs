//! Fallback page handler: serves `page.html` documents from the route
//! tree through the page cache.
//!
//! Preview requests (draft flag on plus a token cookie) bypass the cache
//! in both directions so draft content is never cached as published.
//! Page metadata consumes the canonical URL computed by the middleware,
//! falling back to the configured site origin when it is absent.

use axum::{
    extract::{Request, State},
    response::{Html, IntoResponse, Response},
    Extension,
};
use http::{header, StatusCode};
use serve::sitemap::detector::PAGE_FILE;
use std::io;
use std::path::{Path, PathBuf};
use tracing::error;

use crate::handlers::preview::preview_token_from_headers;
use crate::middleware::canonical::CanonicalUrl;
use crate::state::AppState;

pub async fn render(
    State(app): State<AppState>,
    canonical: Option<Extension<CanonicalUrl>>,
    req: Request,
) -> Response {
    let path = req.uri().path().to_string();
    let canonical_url = canonical
        .map(|Extension(CanonicalUrl(url))| url)
        .unwrap_or_else(|| app.config.site_origin().to_string());

    let preview_token = preview_token_from_headers(req.headers());
    let is_preview = app.is_draft_mode() && preview_token.is_some();

    if !is_preview {
        if let Some(body) = app.cache.get(&path) {
            return page_response(body.to_string(), &canonical_url);
        }
    }

    let Some(file) = resolve_page_file(&app.config.routes_dir, &path) else {
        return (StatusCode::NOT_FOUND, "page not found").into_response();
    };

    match tokio::fs::read_to_string(&file).await {
        Ok(body) => {
            if !is_preview {
                app.cache.insert(path, body.as_str());
            }
            page_response(body, &canonical_url)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "page not found").into_response()
        }
        Err(err) => {
            error!(file = %file.display(), "failed to read page: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to load page").into_response()
        }
    }
}

fn page_response(body: String, canonical_url: &str) -> Response {
    (
        [(header::LINK, format!("<{canonical_url}>; rel=\"canonical\""))],
        Html(body),
    )
        .into_response()
}

/// Map a request path onto its `page.html` under the routes root.
///
/// Rejects traversal and hidden segments instead of resolving them.
fn resolve_page_file(routes_root: &Path, path: &str) -> Option<PathBuf> {
    let mut dir = routes_root.to_path_buf();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segment == ".." || segment.starts_with('.') || segment.contains('\\') {
            return None;
        }
        dir.push(segment);
    }
    Some(dir.join(PAGE_FILE))
}
