use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::transcoder::Transcoder;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "ok": true })))
}

pub async fn health_ready(State(transcoder): State<Arc<dyn Transcoder>>) -> impl IntoResponse {
    match transcoder.ensure_available() {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "transcoder": "available"
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Transcoder not available");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "transcoder": "missing"
                })),
            )
        }
    }
}
