use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::canonical;
use crate::state::AppState;

/// Portal router: the preview/revalidation API surface, the sitemap, and
/// a fallback page handler for everything under the route tree. The
/// canonical middleware wraps all of it and skips `/api` itself.
#[tracing::instrument(skip_all)]
pub fn build(app_state: AppState) -> Router {
    Router::new()
        .route("/api/preview", get(handlers::preview::activate))
        .route("/api/preview/exit", get(handlers::preview::exit))
        .route("/api/content/information", get(handlers::content::information))
        .route("/api/content/function", get(handlers::content::function))
        .route("/api/revalidate", post(handlers::revalidate::content_webhook))
        .route(
            "/api/revalidate/sitemap",
            post(handlers::revalidate::sitemap_webhook),
        )
        .route("/sitemap.xml", get(handlers::sitemap::serve_xml))
        .fallback(get(handlers::page::render))
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            canonical::canonical,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
