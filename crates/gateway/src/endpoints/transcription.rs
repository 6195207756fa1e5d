//! # GET /v1/transcriptions/{transcription_id}
//!
//! 外部の文字起こし処理が書き込んだ結果JSONの取得。

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use transcribe_types::{TranscriptionPendingResponse, TranscriptionStatus};

use crate::auth::Identity;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::keys;

/// GET /v1/transcriptions/{transcription_id}: 文字起こし結果の取得。
///
/// 結果オブジェクトの内容をJSONとして解釈し、そのままレスポンスボディにする。
/// 未生成の場合は `status: "processing or not found"` の404を返す。
pub async fn handle_get_transcription(
    State(state): State<Arc<GatewayState>>,
    Extension(identity): Extension<Identity>,
    Path(transcription_id): Path<String>,
) -> Result<Response, GatewayError> {
    keys::validate_job_id(&transcription_id)?;
    let s3_key = keys::transcript_key(identity.as_str(), &transcription_id);

    let Some(bytes) = state.storage.get(&s3_key).await? else {
        tracing::info!(s3_key = %s3_key, "文字起こし結果はまだありません");
        let body = TranscriptionPendingResponse {
            transcription_id,
            status: TranscriptionStatus::ProcessingOrNotFound,
            message: "Transcription result not available yet or does not exist.".to_string(),
            s3_key,
        };
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    };

    let document: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!(s3_key = %s3_key, error = %e, "文字起こし結果のJSONデコードに失敗");
        GatewayError::MalformedResult(
            "Transcription file found but contains invalid JSON.".to_string(),
        )
    })?;

    Ok(Json(document).into_response())
}
