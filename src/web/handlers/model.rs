// GET /api/model: artifact status plus what the live service has loaded.
// POST /api/reload: load the artifacts from disk again and swap them in.
//
// A reload that fails leaves the current model serving and returns 500.
//
// Reload requests must carry the `x-hoaks-reload-token` header, matching
// HOAKS_RELOAD_TOKEN when one is configured. A custom header cannot be sent
// cross-origin without a CORS preflight, and the CORS layer does not allow
// it, so other web pages cannot trigger a reload.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, warn};

use crate::inference::InferenceService;
use crate::status;
use crate::web::{api_error, AppState};

pub async fn get_model(State(state): State<AppState>) -> impl IntoResponse {
    let service = state.service.current().await;
    let artifact = service.artifact();
    let on_disk = status::collect(&state.config, false);

    Json(serde_json::json!({
        "loaded": {
            "vocabulary_size": artifact.vectorizer.vocabulary_size(),
            "created_at": artifact.created_at,
        },
        "settings": {
            "min_chars": service.settings().min_chars,
            "low_confidence_threshold": service.settings().low_confidence_threshold,
            "summary_words": service.settings().summary_words,
        },
        "on_disk": on_disk,
    }))
}

pub const RELOAD_TOKEN_HEADER: &str = "x-hoaks-reload-token";

/// Whether `headers` authorize a reload under `expected`.
fn reload_authorized(headers: &HeaderMap, expected: Option<&str>) -> bool {
    let Some(given) = headers.get(RELOAD_TOKEN_HEADER).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    expected.map_or(true, |token| token == given)
}

pub async fn reload(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !reload_authorized(&headers, state.config.reload_token.as_deref()) {
        warn!("Rejected model reload without a valid token header");
        return api_error(StatusCode::FORBIDDEN, "reload requires a valid x-hoaks-reload-token header");
    }

    let config = state.config.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        InferenceService::load(&config.model_dir, config.inference_settings())
    })
    .await;

    match loaded {
        Ok(Ok(service)) => {
            let vocabulary = service.artifact().vectorizer.vocabulary_size();
            state.service.swap(service).await;
            info!(vocabulary, "Reloaded model artifacts");
            (
                StatusCode::OK,
                Json(serde_json::json!({ "reloaded": true, "vocabulary_size": vocabulary })),
            )
                .into_response()
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Model reload failed; keeping current model");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}
