//! JSON content API: the accessor envelopes, exposed for page renderers.
//!
//! An error result is still a 200 carrying the fallback data plus the
//! error string; renderers treat it as "no content" rather than failing.

use adapt::content::{function, information};
use axum::{extract::State, response::Response, Json};
use axum::response::IntoResponse;
use domain::FetchResult;
use http::HeaderMap;
use serde::Serialize;
use serde_json::json;

use crate::handlers::preview::preview_token_from_headers;
use crate::state::AppState;

/// `GET /api/content/information`.
pub async fn information(State(app): State<AppState>, headers: HeaderMap) -> Response {
    let token = preview_token_from_headers(&headers);
    let result = information::fetch_information(&app.gateway, token.as_ref()).await;
    envelope_response(result)
}

/// `GET /api/content/function`.
pub async fn function(State(app): State<AppState>, headers: HeaderMap) -> Response {
    let token = preview_token_from_headers(&headers);
    let result = function::fetch_functions(&app.gateway, token.as_ref()).await;
    envelope_response(result)
}

fn envelope_response<T: Serialize>(result: FetchResult<Vec<T>>) -> Response {
    Json(json!({
        "data": result.data,
        "error": result.error,
        "isPreview": result.is_preview,
    }))
    .into_response()
}
