// Web server: Axum backend for the article check form.
//
// The form (plain HTML + JS) is embedded at compile time via include_dir!.
// All /api/* routes serve JSON; every other path serves the form.
//
// The inference service sits behind an `ArtifactHandle`. Requests clone the
// current `Arc` and keep it for their whole lifetime; a reload builds the new
// service completely before swapping the pointer, so no request ever sees a
// half-loaded model.

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use include_dir::{include_dir, Dir};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::inference::InferenceService;

pub mod handlers;

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/web/static");

/// Largest accepted PDF upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Swappable pointer to the live inference service.
#[derive(Clone)]
pub struct ArtifactHandle {
    inner: Arc<RwLock<Arc<InferenceService>>>,
}

impl ArtifactHandle {
    pub fn new(service: InferenceService) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(service))),
        }
    }

    /// The service to use for one request.
    pub async fn current(&self) -> Arc<InferenceService> {
        self.inner.read().await.clone()
    }

    /// Replace the live service. In-flight requests keep the old one.
    pub async fn swap(&self, service: InferenceService) {
        *self.inner.write().await = Arc::new(service);
    }
}

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: ArtifactHandle,
}

/// Load the model and start the Axum web server; blocks until it exits.
pub async fn run_server(config: Config, port: u16, bind: &str) -> Result<()> {
    config.require_artifacts()?;
    let service = InferenceService::load(&config.model_dir, config.inference_settings())?;

    let state = AppState {
        config: Arc::new(config),
        service: ArtifactHandle::new(service),
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Hoaks checker listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/check", post(handlers::check::check_text))
        .route(
            "/api/check/pdf",
            post(handlers::check::check_pdf).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/model", get(handlers::model::get_model))
        .route("/api/reload", post(handlers::model::reload));

    Router::new()
        .merge(api)
        .route("/health", get(health))
        .fallback(serve_form)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check: always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Serve embedded assets, falling back to the form itself.
async fn serve_form(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    if let Some(file) = ASSETS.get_file(path) {
        return asset_response(file.contents(), path);
    }

    match ASSETS.get_file("index.html") {
        Some(index) => asset_response(index.contents(), "index.html"),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            Body::from("Web assets not found"),
        )
            .into_response(),
    }
}

fn asset_response(contents: &'static [u8], path: &str) -> Response {
    let mime = mime_type(path);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(mime))
        .body(Body::from(contents))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn mime_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript",
        "css" => "text/css",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
