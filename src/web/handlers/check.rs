// POST /api/check: score JSON `{ "text": ... }`.
// POST /api/check/pdf: score the text of an uploaded PDF (multipart field `file`).
//
// Both return 200 with the inference result, or 422 with
// `{ "rejection": { "kind": ... }, "message": ... }` when the input is
// rejected. A PDF that cannot be read is a 400.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::warn;

use crate::inference::RejectionReason;
use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub text: String,
}

/// Score one article on the blocking pool and render the outcome.
async fn score(state: &AppState, text: String) -> Response {
    let service = state.service.current().await;
    match tokio::task::spawn_blocking(move || service.infer(&text)).await {
        Ok(Ok(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(Err(reason)) => rejection_response(&reason),
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

pub fn rejection_response(reason: &RejectionReason) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({
            "rejection": reason,
            "message": reason.to_string(),
        })),
    )
        .into_response()
}

pub async fn check_text(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Response {
    score(&state, request.text).await
}

pub async fn check_pdf(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut upload = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => match field.bytes().await {
                Ok(bytes) => {
                    upload = Some(bytes);
                    break;
                }
                Err(e) => {
                    return api_error(StatusCode::BAD_REQUEST, &format!("Upload failed: {e}"))
                }
            },
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => return api_error(StatusCode::BAD_REQUEST, &format!("Upload failed: {e}")),
        }
    }

    let Some(bytes) = upload else {
        return api_error(StatusCode::BAD_REQUEST, "Missing multipart field 'file'");
    };

    let extracted = tokio::task::spawn_blocking(move || crate::pdf::extract_text(&bytes)).await;
    match extracted {
        Ok(Ok(text)) => score(&state, text).await,
        Ok(Err(e)) => {
            warn!(error = %e, "PDF extraction failed");
            api_error(StatusCode::BAD_REQUEST, &format!("{e:#}"))
        }
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}
