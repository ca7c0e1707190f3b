//! On-demand revalidation webhooks.
//!
//! Kuroco posts a change event here after publishing; the handler
//! classifies it and invalidates the affected page paths. The body is
//! read as raw bytes because the upstream sometimes smuggles the auth
//! token inside the `content-type` header, which would make a typed JSON
//! extractor reject the request before we ever saw it.

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use domain::revalidate::RevalidationEvent;
use http::{header, HeaderMap, StatusCode};
use regex::Regex;
use serde_json::{json, Value};
use std::sync::LazyLock;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Primary header Kuroco sends the webhook token in.
pub const WEBHOOK_TOKEN_HEADER: &str = "x-kuroco-token";

/// Token carriage inside the `content-type` header value.
static CONTENT_TYPE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"x-kuroco-token:\s*([^;]+)").unwrap());

/// The three places the webhook token may arrive in, checked in order:
/// the dedicated header, `Authorization: Bearer`, and embedded in the
/// `content-type` value.
fn extract_webhook_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(WEBHOOK_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(token.to_string());
    }

    if let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    CONTENT_TYPE_TOKEN_RE
        .captures(content_type)
        .map(|caps| caps[1].trim().to_string())
}

/// `POST /api/revalidate`: content change webhook.
#[tracing::instrument(skip_all)]
pub async fn content_webhook(
    State(app): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(expected) = app
        .config
        .kuroco_api_key
        .as_deref()
        .filter(|key| !key.is_empty())
    else {
        error!("KUROCO_API_KEY is not configured, rejecting webhook");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Webhook token not configured" })),
        )
            .into_response();
    };

    match extract_webhook_token(&headers) {
        Some(token) if token == expected => {}
        _ => {
            warn!("webhook token missing or mismatched");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid token" })),
            )
                .into_response();
        }
    }

    let body: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => {
            error!("failed to parse webhook body: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Failed to process webhook",
                    "error": err.to_string(),
                })),
            )
                .into_response();
        }
    };

    let event = match RevalidationEvent::from_json(&body) {
        Ok(event) => event,
        Err(err) => {
            warn!("webhook rejected: {err}");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": err.to_string() })),
            )
                .into_response();
        }
    };

    let paths = event.affected_paths();
    if paths.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "No paths to revalidate" })),
        )
            .into_response();
    }

    info!(
        event_type = event.event_type.as_str(),
        content_type = %event.content_type,
        ?paths,
        "revalidating paths"
    );
    for path in &paths {
        // one path failing must not stop the rest; success is aggregate
        let existed = app.cache.invalidate(path);
        debug!(path = %path, existed, "revalidated");
    }

    Json(json!({
        "revalidated": true,
        "paths": paths,
        "event_type": event.event_type.as_str(),
        "content_type": event.content_type,
    }))
    .into_response()
}

/// `POST /api/revalidate/sitemap`: refresh the cached sitemap.
#[tracing::instrument(skip_all)]
pub async fn sitemap_webhook(State(app): State<AppState>, headers: HeaderMap) -> Response {
    let Some(expected) = app
        .config
        .sitemap_revalidation_token
        .as_deref()
        .filter(|token| !token.is_empty())
    else {
        error!("SITEMAP_REVALIDATION_TOKEN is not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Sitemap revalidation token not configured" })),
        )
            .into_response();
    };

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|auth| auth == format!("Bearer {expected}"))
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid authorization token" })),
        )
            .into_response();
    }

    for path in ["/sitemap.xml", "/sitemap"] {
        app.cache.invalidate(path);
    }
    info!("sitemap revalidated");

    Json(json!({
        "message": "Sitemap revalidated successfully",
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_response()
}
