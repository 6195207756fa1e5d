//! # POST /v1/uploads/presigned-url
//!
//! 音声アップロード用の署名付きURL発行。

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use transcribe_types::PresignedUrlResponse;

use crate::auth::Identity;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::keys;

/// POST /v1/uploads/presigned-url: 署名付きURL発行。
///
/// ジョブ識別子を採番し、`uploads/<user>/<id>/audio.mp3` へのPUTのみを
/// 許可する期限付きURLを返す。ユーザーはトークンからのみ決定する。
pub async fn handle_presigned_url(
    State(state): State<Arc<GatewayState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<PresignedUrlResponse>, GatewayError> {
    let transcription_id = keys::new_job_id();
    let object_key = keys::upload_key(identity.as_str(), &transcription_id);

    let presigned_url = state
        .storage
        .presign_put(&object_key, state.presign_expiry_secs)
        .await?;

    tracing::info!(
        user = %identity.as_str(),
        transcription_id = %transcription_id,
        expires_in = state.presign_expiry_secs,
        "署名付きアップロードURLを発行しました"
    );

    Ok(Json(PresignedUrlResponse {
        presigned_url,
        transcription_id,
    }))
}
