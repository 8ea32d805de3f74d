use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use crate::domain::tts::TtsManager;
use crate::infrastructure::config::Config;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(
    State((tts, config)): State<(Arc<TtsManager>, Arc<Config>)>,
) -> impl IntoResponse {
    let dirs_ok =
        Path::new(&config.upload_dir).is_dir() && Path::new(&config.output_dir).is_dir();

    if tts.is_empty() || !dirs_ok {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "tts": if tts.is_empty() { "no providers configured" } else { "available" },
                "storage": if dirs_ok { "ready" } else { "missing directories" }
            })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "tts": "available",
                "storage": "ready",
                "providers": tts.catalog().len()
            })),
        )
    }
}
