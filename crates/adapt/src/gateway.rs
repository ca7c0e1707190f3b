// crates/adapt/src/gateway.rs

//! HTTP gateway to the Kuroco CMS API.
//!
//! One fetch wrapper owns URL construction, auth headers, the response
//! cache and error normalization. Expected failures (unset base URL,
//! non-2xx status, transport errors) never cross this boundary as errors:
//! callers always get a `FetchResult` holding their fallback value.

use domain::{FetchResult, PreviewToken, SiteConfig};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

const ACCESS_TOKEN_HEADER: &str = "X-RCMS-API-ACCESS-TOKEN";
const PREVIEW_TOKEN_HEADER: &str = "X-RCMS-API-PREVIEW-TOKEN";

const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("KUROCO_API_BASE_URL is not configured")]
    MissingBaseUrl,

    #[error("invalid Kuroco URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Kuroco request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Kuroco API responded with status {0}")]
    Status(u16),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Per-call fetch knobs.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Extra query parameters, appended in order.
    pub params: Vec<(String, String)>,

    /// Cache lifetime override for this call; the configured default
    /// applies when unset. Ignored in preview mode (lifetime zero).
    pub revalidate_secs: Option<u64>,

    /// Presence switches the request into preview mode: the preview
    /// header is attached and the response cache is bypassed.
    pub preview_token: Option<PreviewToken>,
}

struct CachedResponse {
    body: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CachedResponse {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) < self.ttl
    }
}

/// Stateless-per-request Kuroco client, constructed once per process from
/// `SiteConfig` and shared by reference.
pub struct KurocoGateway {
    http: reqwest::Client,
    base_url: Option<Url>,
    api_key: String,
    default_revalidate: Duration,
    cache: RwLock<HashMap<String, CachedResponse>>,
}

impl KurocoGateway {
    pub fn from_config(cfg: &SiteConfig) -> Result<Self, GatewayError> {
        let base_url = cfg
            .kuroco_api_base_url
            .as_deref()
            .map(Url::parse)
            .transpose()?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .user_agent("utaportal")
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: cfg.kuroco_api_key.clone().unwrap_or_default(),
            default_revalidate: Duration::from_secs(cfg.default_revalidate_secs),
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Fetch `endpoint`, deserializing into `T`.
    ///
    /// On any expected failure the result carries `fallback` plus an error
    /// string; transport errors are logged here and never propagated raw.
    #[tracing::instrument(skip_all, fields(endpoint = %endpoint))]
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        fallback: T,
        opts: FetchOptions,
    ) -> FetchResult<T> {
        let is_preview = opts.preview_token.is_some();

        let value = match self.fetch_value(endpoint, &opts).await {
            Ok(value) => value,
            Err(err) => {
                error!("Kuroco API error: {err}");
                return FetchResult::fallback(fallback, err.to_string()).with_preview(is_preview);
            }
        };

        match serde_json::from_value::<T>(value) {
            Ok(data) => FetchResult::ok(data).with_preview(is_preview),
            Err(err) => {
                error!("unexpected Kuroco response shape: {err}");
                FetchResult::fallback(fallback, format!("unexpected Kuroco response shape: {err}"))
                    .with_preview(is_preview)
            }
        }
    }

    async fn fetch_value(&self, endpoint: &str, opts: &FetchOptions) -> Result<Value, GatewayError> {
        let base = self.base_url.as_ref().ok_or(GatewayError::MissingBaseUrl)?;

        let mut url = base.join(endpoint)?;
        for (key, value) in &opts.params {
            url.query_pairs_mut().append_pair(key, value);
        }

        let cache_key = url.to_string();
        let is_preview = opts.preview_token.is_some();

        // Preview always revalidates; published content may be served from
        // the response cache.
        if !is_preview {
            if let Some(body) = self.cache_get(&cache_key) {
                debug!(url = %cache_key, "kuroco cache hit");
                return Ok(body);
            }
        }

        let mut request = self
            .http
            .get(url)
            .header(ACCESS_TOKEN_HEADER, self.api_key.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = &opts.preview_token {
            request = request.header(PREVIEW_TOKEN_HEADER, token.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Kuroco API returned an error response");
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body = response.json::<Value>().await?;

        if !is_preview {
            let ttl = opts
                .revalidate_secs
                .map(Duration::from_secs)
                .unwrap_or(self.default_revalidate);
            self.cache_put(cache_key, body.clone(), ttl);
        }

        Ok(body)
    }

    fn cache_get(&self, key: &str) -> Option<Value> {
        let cache = self.cache.read();
        cache
            .get(key)
            .filter(|slot| slot.is_fresh(Instant::now()))
            .map(|slot| slot.body.clone())
    }

    fn cache_put(&self, key: String, body: Value, ttl: Duration) {
        self.cache.write().insert(
            key,
            CachedResponse {
                body,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }
}

/// Fold a preview `{details: ...}` payload into the `{list: [...]}` shape
/// so downstream projection handles one form.
pub fn normalize_response(mut data: Value, is_preview: bool) -> Value {
    if is_preview {
        if let Some(details) = data.get("details").cloned() {
            if let Some(obj) = data.as_object_mut() {
                obj.insert("list".to_string(), Value::Array(vec![details]));
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config(base_url: Option<&str>) -> SiteConfig {
        SiteConfig {
            kuroco_api_base_url: base_url.map(str::to_string),
            kuroco_api_key: Some("test-key".to_string()),
            kuroco_preview_secret: None,
            sitemap_revalidation_token: None,
            site_url: "http://localhost:3000".to_string(),
            routes_dir: "routes".into(),
            bind_addr: "127.0.0.1:3000".to_string(),
            default_revalidate_secs: 86_400,
            page_cache_ttl_secs: 3_600,
        }
    }

    #[tokio::test]
    async fn missing_base_url_returns_fallback_without_a_network_call() {
        let gateway = KurocoGateway::from_config(&test_config(None)).expect("gateway builds");
        let fallback = json!({ "list": [] });

        let result = gateway
            .fetch("/rcms-api/1/information", fallback.clone(), FetchOptions::default())
            .await;

        assert_eq!(result.data, fallback);
        assert_eq!(
            result.error.as_deref(),
            Some("KUROCO_API_BASE_URL is not configured")
        );
        assert!(!result.is_preview);
    }

    #[tokio::test]
    async fn missing_base_url_still_reports_preview_mode() {
        let gateway = KurocoGateway::from_config(&test_config(None)).expect("gateway builds");

        let opts = FetchOptions {
            preview_token: Some(PreviewToken::new("tok_9_x")),
            ..FetchOptions::default()
        };
        let result = gateway.fetch("/rcms-api/1/function", json!(null), opts).await;

        assert!(result.is_err());
        assert!(result.is_preview);
    }

    #[test]
    fn cache_round_trips_until_the_ttl_lapses() {
        let gateway = KurocoGateway::from_config(&test_config(Some("https://cms.example")))
            .expect("gateway builds");

        gateway.cache_put("k".into(), json!({"list": [1]}), Duration::from_secs(60));
        assert_eq!(gateway.cache_get("k"), Some(json!({"list": [1]})));

        gateway.cache_put("stale".into(), json!(1), Duration::from_secs(0));
        assert_eq!(gateway.cache_get("stale"), None);
    }

    #[test]
    fn normalize_wraps_preview_details_into_a_list() {
        let data = json!({ "details": { "text": "draft" } });
        let normalized = normalize_response(data, true);

        assert_eq!(normalized["list"], json!([{ "text": "draft" }]));
        // the original details key stays in place, as upstream sends it
        assert_eq!(normalized["details"], json!({ "text": "draft" }));
    }

    #[test]
    fn normalize_leaves_published_responses_untouched() {
        let data = json!({ "details": { "text": "draft" } });
        let normalized = normalize_response(data.clone(), false);

        assert_eq!(normalized, data);
    }
}
