//! # GET /
//!
//! 死活監視用エンドポイントと、未定義ルート用のJSON 404。

use axum::http::StatusCode;
use axum::Json;
use transcribe_types::{ErrorResponse, HealthResponse};

/// GET /: ヘルスチェック。ストレージには触れない。
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Audio Transcription API is running.".to_string(),
    })
}

/// 未定義ルートのフォールバック。
pub async fn handle_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Resource not found.".to_string(),
        }),
    )
}
