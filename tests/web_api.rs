// HTTP tests for the JSON API, driven through the router without a socket.
#![cfg(feature = "web")]

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use hoaks::config::Config;
use hoaks::web::{build_router, AppState, ArtifactHandle};

const HOAX_TEXT: &str =
    "Viral pesan berantai bahwa vaksin mengandung chip rahasia untuk melacak warga, segera sebarkan!";

/// Router around the fixture model, with `model_dir` pointing at a scratch dir.
fn app(name: &str) -> (Router, AppState) {
    let config = Config {
        model_dir: common::scratch_dir(name),
        ..Config::default()
    };
    let state = AppState {
        config: Arc::new(config),
        service: ArtifactHandle::new(common::fixture_service()),
    };
    (build_router(state.clone()), state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================
// Routes
// ============================================================

#[tokio::test]
async fn health_is_ok() {
    let (app, _) = app("web-health");
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn check_scores_indonesian_text() {
    let (app, _) = app("web-check");
    let (status, body) = send(app, post_json("/api/check", serde_json::json!({ "text": HOAX_TEXT }))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(matches!(body["label"].as_u64(), Some(0 | 1)));
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert!(body["top_terms"].as_array().unwrap().len() <= 5);
    assert!(body["low_confidence"].is_boolean());
}

#[tokio::test]
async fn check_rejects_short_text_with_422() {
    let (app, _) = app("web-reject");
    let (status, body) = send(app, post_json("/api/check", serde_json::json!({ "text": "ab" }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["rejection"]["kind"], "input_too_short");
    assert_eq!(body["rejection"]["min_chars"], 30);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn check_rejects_english_text() {
    let (app, _) = app("web-english");
    let text = "The government announced that the price of rice will fall next week.";
    let (status, body) = send(app, post_json("/api/check", serde_json::json!({ "text": text }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["rejection"]["kind"], "wrong_language");
    assert_eq!(body["rejection"]["detected"], "en");
}

#[tokio::test]
async fn model_reports_loaded_vocabulary() {
    let (app, state) = app("web-model");
    let expected = state.service.current().await.artifact().vectorizer.vocabulary_size();

    let request = Request::get("/api/model").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loaded"]["vocabulary_size"], expected);
    assert_eq!(body["settings"]["min_chars"], 30);
}

fn reload_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/api/reload");
    if let Some(token) = token {
        builder = builder.header("x-hoaks-reload-token", token);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn reload_without_token_header_is_forbidden() {
    let (app, state) = app("web-reload-anon");
    common::fixture_artifact().save(&state.config.model_dir).unwrap();
    let before = state.service.current().await;

    let (status, body) = send(app, reload_request(None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
    assert!(Arc::ptr_eq(&before, &state.service.current().await));
}

#[tokio::test]
async fn reload_with_wrong_token_is_forbidden() {
    let config = Config {
        model_dir: common::scratch_dir("web-reload-secret"),
        reload_token: Some("rahasia".to_string()),
        ..Config::default()
    };
    common::fixture_artifact().save(&config.model_dir).unwrap();
    let state = AppState {
        config: Arc::new(config),
        service: ArtifactHandle::new(common::fixture_service()),
    };

    let (status, _) = send(build_router(state.clone()), reload_request(Some("tebakan"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(build_router(state), reload_request(Some("rahasia"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cors_preflight_does_not_allow_reload_header() {
    let (app, _) = app("web-preflight");
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/reload")
        .header(header::ORIGIN, "https://situs-lain.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-hoaks-reload-token")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    assert!(!allowed.contains("x-hoaks-reload-token"));
}

#[tokio::test]
async fn failed_reload_keeps_current_model() {
    let (app, state) = app("web-reload");
    let before = state.service.current().await;

    let request = reload_request(Some("ya"));
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let after = state.service.current().await;
    assert!(Arc::ptr_eq(&before, &after));
}

#[tokio::test]
async fn successful_reload_swaps_model() {
    let (app, state) = app("web-reload-ok");
    common::fixture_artifact().save(&state.config.model_dir).unwrap();
    let before = state.service.current().await;

    let (status, body) = send(app, reload_request(Some("ya"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reloaded"], true);

    let after = state.service.current().await;
    assert!(!Arc::ptr_eq(&before, &after));
}

#[tokio::test]
async fn unknown_paths_serve_the_form() {
    let (app, _) = app("web-form");
    let response = app
        .oneshot(Request::get("/anything").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}
