// crates/adapt/src/content/mod.rs

//! Per-content-type accessors built on the Kuroco gateway.
//!
//! Every accessor follows the same protocol: resolve preview mode from the
//! presence of a token, switch to the `{base}/preview` endpoint with the
//! preview query parameters, delegate to the gateway, then project the
//! normalized list into a narrow output type with empty-value defaults.

pub mod function;
pub mod information;

use crate::gateway::{normalize_response, FetchOptions, KurocoGateway};
use domain::{FetchResult, PreviewToken};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

/// Language tag sent with preview requests.
const PREVIEW_LANG: &str = "ja";

/// Kuroco pagination descriptor on list endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageInfo {
    #[serde(rename = "totalCnt")]
    pub total_cnt: u64,
    #[serde(rename = "endFlg")]
    pub end_flg: bool,
    #[serde(rename = "pageNo")]
    pub page_no: u64,
    #[serde(rename = "pageSize")]
    pub page_size: u64,
}

/// The response shapes Kuroco endpoints produce, decoded at this boundary
/// so nothing downstream inspects untyped data.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    List {
        list: Vec<T>,
        #[serde(rename = "pageInfo")]
        page_info: Option<PageInfo>,
    },
    Details {
        details: T,
    },
    Bare(T),
}

impl<T> Payload<T> {
    /// Normalize to the list shape.
    ///
    /// A preview response carrying a single well-formed item becomes a
    /// one-element list; the same shape outside preview is treated as
    /// empty with a warning rather than an error.
    pub fn into_list(self, is_preview: bool) -> Vec<T> {
        match self {
            Payload::List { list, .. } => list,
            Payload::Details { details } | Payload::Bare(details) if is_preview => vec![details],
            Payload::Details { .. } | Payload::Bare(_) => {
                warn!("non-list Kuroco payload outside preview mode, treating as empty");
                Vec::new()
            }
        }
    }
}

/// Endpoint and options for a preview fetch of `endpoint`.
pub(crate) fn preview_request(endpoint: &str, token: &PreviewToken) -> (String, FetchOptions) {
    let mut params = vec![("lang".to_string(), PREVIEW_LANG.to_string())];
    if let Some(draft_id) = token.draft_id() {
        params.push(("draft_id".to_string(), draft_id.to_string()));
    }
    params.push(("preview_token".to_string(), token.as_str().to_string()));

    (
        format!("{endpoint}/preview"),
        FetchOptions {
            params,
            revalidate_secs: None,
            preview_token: Some(token.clone()),
        },
    )
}

/// Shared accessor body: fetch `endpoint` and project it into `Vec<T>`.
pub(crate) async fn fetch_list<T: DeserializeOwned>(
    gateway: &KurocoGateway,
    endpoint: &str,
    preview_token: Option<&PreviewToken>,
) -> FetchResult<Vec<T>> {
    let is_preview = preview_token.is_some();
    let (endpoint, opts) = match preview_token {
        Some(token) => preview_request(endpoint, token),
        None => (endpoint.to_string(), FetchOptions::default()),
    };

    let result = gateway
        .fetch::<Value>(&endpoint, json!({ "list": [] }), opts)
        .await;
    if let Some(error) = result.error {
        return FetchResult::fallback(Vec::new(), error).with_preview(is_preview);
    }

    decode_list(result.data, is_preview)
}

fn decode_list<T: DeserializeOwned>(value: Value, is_preview: bool) -> FetchResult<Vec<T>> {
    let value = normalize_response(value, is_preview);
    match serde_json::from_value::<Payload<T>>(value) {
        Ok(payload) => FetchResult::ok(payload.into_list(is_preview)).with_preview(is_preview),
        Err(err) => {
            warn!("failed to decode Kuroco payload: {err}");
            FetchResult::fallback(Vec::new(), format!("failed to decode Kuroco payload: {err}"))
                .with_preview(is_preview)
        }
    }
}

/// Drain a paginated list endpoint page by page until `endFlg` is set.
///
/// Any failed page degrades the whole call to the empty fallback; partial
/// pages are never surfaced as a complete listing.
pub async fn fetch_all_pages<T: DeserializeOwned>(
    gateway: &KurocoGateway,
    endpoint: &str,
    page_size: u64,
) -> FetchResult<Vec<T>> {
    let mut all = Vec::new();
    let mut page_no = 1u64;

    loop {
        let opts = FetchOptions {
            params: vec![
                ("pageNo".to_string(), page_no.to_string()),
                ("pageSize".to_string(), page_size.to_string()),
            ],
            ..FetchOptions::default()
        };
        let result = gateway
            .fetch::<Value>(endpoint, json!({ "list": [] }), opts)
            .await;
        if let Some(error) = result.error {
            return FetchResult::fallback(Vec::new(), error);
        }

        match serde_json::from_value::<Payload<T>>(result.data) {
            Ok(Payload::List { list, page_info }) => {
                all.extend(list);
                match page_info {
                    Some(info) if !info.end_flg => page_no += 1,
                    _ => break,
                }
            }
            Ok(_) => break,
            Err(err) => {
                return FetchResult::fallback(
                    Vec::new(),
                    format!("failed to decode Kuroco payload: {err}"),
                );
            }
        }
    }

    FetchResult::ok(all)
}
