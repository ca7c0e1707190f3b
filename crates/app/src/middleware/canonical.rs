//! Canonical-URL middleware.
//!
//! Runs ahead of page routing: issues the 301 normalization redirects
//! (`/` and `/web` to `/web/`, mixed-case `web` segment folded), then
//! computes the canonical absolute URL for the request and publishes it
//! on the response as `x-canonical-url`. Fail-open: a value the header
//! cannot carry is skipped, the request is never blocked.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::canonical::{canonicalize, normalization_redirect, CANONICAL_HEADER};
use http::{header, HeaderValue, StatusCode};
use tracing::warn;

use crate::state::AppState;

/// Canonical URL of the current request, stored in request extensions for
/// metadata consumers. Falls back to the configured site origin when a
/// request never passed through the middleware.
#[derive(Debug, Clone)]
pub struct CanonicalUrl(pub String);

pub async fn canonical(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    // API routes declare no canonical URL.
    if path.starts_with("/api") {
        return next.run(req).await;
    }

    if let Some(target) = normalization_redirect(&path) {
        return moved_permanently(&target);
    }

    let query = req.uri().query().map(str::to_string);
    let canonical_url = canonicalize(app.config.site_origin(), &path, query.as_deref());

    req.extensions_mut()
        .insert(CanonicalUrl(canonical_url.clone()));
    let mut response = next.run(req).await;

    match HeaderValue::from_str(&canonical_url) {
        Ok(value) => {
            response.headers_mut().insert(CANONICAL_HEADER, value);
        }
        Err(err) => warn!(url = %canonical_url, "skipping canonical header: {err}"),
    }

    response
}

fn moved_permanently(target: &str) -> Response {
    match Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(header::LOCATION, target)
        .body(Body::empty())
    {
        Ok(response) => response,
        Err(err) => {
            warn!(target = %target, "failed to build redirect: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
