use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::Form;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use tunetree_catalog::{CancellationToken, CatalogRequest, CatalogResponse};

use crate::router::AppState;

/// Form fields posted by the browser client.
#[derive(Debug, Default, Deserialize)]
pub struct ApiForm {
    #[serde(default)]
    pub dffunc: String,
    #[serde(default)]
    pub dfdata: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Catalog entry point. Always answers 200 with a status envelope.
///
/// Store calls are abandoned when the request times out or the client goes
/// away: the token's drop guard fires as soon as this future is dropped.
pub async fn api_handler(
    State(state): State<AppState>,
    Form(form): Form<ApiForm>,
) -> Json<CatalogResponse> {
    let request = CatalogRequest::from_form(&form.dffunc, &form.dfdata);
    debug!(function = request.function_name(), "api request");

    let token = CancellationToken::new();
    let _guard = token.clone().drop_guard();
    let catalog = state.catalog.with_cancellation(token);

    match tokio::time::timeout(state.request_timeout, catalog.dispatch(&request)).await {
        Ok(response) => Json(response),
        Err(_) => {
            warn!(
                function = request.function_name(),
                timeout = ?state.request_timeout,
                "api request timed out"
            );
            Json(CatalogResponse::timed_out(request.callback()))
        }
    }
}

/// Stream one audio object to the client.
pub async fn audio_handler(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match state.catalog.open_audio(&path).await {
        Ok(object) => {
            let headers = [
                (header::CONTENT_TYPE, object.content_type_or_default().to_string()),
                (header::CONTENT_LENGTH, object.length.to_string()),
            ];
            (headers, Body::from_stream(object.body)).into_response()
        }
        Err(err) => {
            warn!(%path, error = %err, "audio request failed");
            (StatusCode::NOT_FOUND, "Audio not found").into_response()
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "tunetree",
        "version": env!("CARGO_PKG_VERSION"),
        "root_prefix": state.catalog.namespace().root(),
    }))
}

pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
