//! Preview/draft mode controller.
//!
//! Two states, Normal and Preview. Activation validates the shared
//! secret, sets the draft flag plus the preview-token cookie and
//! redirects to the target page; exit unconditionally clears both. The
//! secret check runs before any parameter validation.

use axum::{
    body::Body,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use domain::preview::{PreviewToken, PREVIEW_COOKIE, PREVIEW_COOKIE_MAX_AGE_SECS};
use http::{header, HeaderMap, StatusCode};
use serde::Deserialize;
use tracing::{error, info};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ActivateParams {
    secret: Option<String>,
    id: Option<String>,
    #[serde(rename = "previewToken")]
    preview_token: Option<String>,
    endpoint: Option<String>,
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExitParams {
    path: Option<String>,
}

/// `GET /api/preview`: enter preview mode and redirect to the target.
pub async fn activate(
    State(app): State<AppState>,
    Query(params): Query<ActivateParams>,
) -> Response {
    let expected = app.config.kuroco_preview_secret.as_deref();
    if expected.is_none() || params.secret.as_deref() != expected {
        return (StatusCode::UNAUTHORIZED, "Invalid token").into_response();
    }

    let (Some(id), Some(token), Some(endpoint)) = (params.id, params.preview_token, params.endpoint)
    else {
        return (StatusCode::BAD_REQUEST, "Missing required parameters").into_response();
    };

    // Activation is atomic from the caller's perspective: either the
    // cookie and redirect both happen, or the flag is rolled back and a
    // clean 500 is returned.
    app.enable_draft_mode();
    match activation_response(&app, &id, &token, &endpoint, params.path.as_deref()) {
        Ok(response) => {
            info!(endpoint = %endpoint, id = %id, "preview mode activated");
            response
        }
        Err(err) => {
            app.disable_draft_mode();
            error!("preview activation failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to activate preview mode",
            )
                .into_response()
        }
    }
}

fn activation_response(
    app: &AppState,
    id: &str,
    token: &str,
    endpoint: &str,
    path: Option<&str>,
) -> Result<Response, http::Error> {
    let cookie = format!(
        "{PREVIEW_COOKIE}={token}; Max-Age={PREVIEW_COOKIE_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=Lax{}",
        secure_suffix(app)
    );

    let location = match path {
        Some(path) => path.replace("{id}", id),
        None => format!("/{endpoint}/{id}"),
    };

    Ok(Response::builder()
        .status(StatusCode::FOUND)
        .header(header::SET_COOKIE, cookie)
        .header(header::LOCATION, location)
        .body(Body::empty())?)
}

/// `GET /api/preview/exit`: leave preview mode and redirect back.
///
/// Idempotent: exiting outside preview mode is a plain redirect.
pub async fn exit(State(app): State<AppState>, Query(params): Query<ExitParams>) -> Response {
    app.disable_draft_mode();

    let cookie = format!("{PREVIEW_COOKIE}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax{}", secure_suffix(&app));
    let location = params.path.unwrap_or_else(|| "/".to_string());

    match Response::builder()
        .status(StatusCode::FOUND)
        .header(header::SET_COOKIE, cookie)
        .header(header::LOCATION, location)
        .body(Body::empty())
    {
        Ok(response) => response,
        Err(err) => {
            error!("preview exit redirect failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn secure_suffix(app: &AppState) -> &'static str {
    if app.config.site_url.starts_with("https") {
        "; Secure"
    } else {
        ""
    }
}

/// Resolve the preview token at the page boundary: cookie-based
/// extraction, passed down explicitly from here on.
pub fn preview_token_from_headers(headers: &HeaderMap) -> Option<PreviewToken> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == PREVIEW_COOKIE && !value.is_empty()).then(|| PreviewToken::new(value))
    })
}
