use std::path::Path;
use std::time::Duration;

use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::Span;

use tunetree_catalog::Catalog;

use crate::handler;

/// Shared per-process state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub catalog: Catalog,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(catalog: Catalog, request_timeout: Duration) -> Self {
        Self {
            catalog,
            request_timeout,
        }
    }
}

/// Build the axum router with all tunetree endpoints.
///
/// `static_dir` must hold `index.html`; everything else in it is served
/// under `/static`.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let trace = TraceLayer::new_for_http().on_response(
        |response: &Response, latency: Duration, _span: &Span| {
            let status = response.status();
            if status.as_u16() >= 400 {
                tracing::warn!(%status, ?latency, "request failed");
            } else {
                tracing::debug!(%status, ?latency, "request finished");
            }
        },
    );

    Router::new()
        .route("/api", post(handler::api_handler))
        .route("/audio/*path", get(handler::audio_handler))
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(handler::not_found_handler)
        .layer(trace)
        .with_state(state)
}
