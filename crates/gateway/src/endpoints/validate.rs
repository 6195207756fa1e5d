//! # GET /v1/uploads/validate
//!
//! アップロード済み音声の存在確認。クライアントはこのエンドポイントをポーリングする。

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use transcribe_types::{UploadStatus, UploadValidationResponse, ValidateUploadQuery};

use crate::auth::{ensure_same_identity, Identity};
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::keys;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// バイト数を "1.00MB" 形式に変換する。0バイトは "0MB"。
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0MB".to_string();
    }
    format!("{:.2}MB", bytes as f64 / BYTES_PER_MB)
}

/// GET /v1/uploads/validate: アップロード確認。
///
/// `username` はトークンのユーザーと一致する必要がある（不一致は403）。
/// オブジェクトが存在しない場合は `status: "not_found"` の404を返す。
pub async fn handle_validate_upload(
    State(state): State<Arc<GatewayState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ValidateUploadQuery>,
) -> Result<(StatusCode, Json<UploadValidationResponse>), GatewayError> {
    let (Some(username), Some(transcription_id)) = (
        query.username.filter(|v| !v.is_empty()),
        query.transcription_id.filter(|v| !v.is_empty()),
    ) else {
        return Err(GatewayError::BadRequest(
            "Missing required query parameters: username, transcription_id.".to_string(),
        ));
    };

    ensure_same_identity(&identity, &username)?;
    keys::validate_job_id(&transcription_id)?;

    let s3_key = keys::upload_key(identity.as_str(), &transcription_id);

    match state.storage.head(&s3_key).await? {
        Some(meta) => {
            tracing::info!(s3_key = %s3_key, size = meta.size, "アップロードを確認しました");
            Ok((
                StatusCode::OK,
                Json(UploadValidationResponse {
                    transcription_id,
                    status: UploadStatus::Uploaded,
                    file_size: Some(format_file_size(meta.size)),
                    s3_key,
                }),
            ))
        }
        None => {
            tracing::info!(s3_key = %s3_key, "アップロードが見つかりません");
            Ok((
                StatusCode::NOT_FOUND,
                Json(UploadValidationResponse {
                    transcription_id,
                    status: UploadStatus::NotFound,
                    file_size: None,
                    s3_key,
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_helpers::{test_state, MockObjectStore};

    fn query(username: Option<&str>, transcription_id: Option<&str>) -> Query<ValidateUploadQuery> {
        Query(ValidateUploadQuery {
            username: username.map(str::to_string),
            transcription_id: transcription_id.map(str::to_string),
        })
    }

    fn user1() -> Extension<Identity> {
        Extension(Identity("user1".to_string()))
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0MB");
        assert_eq!(format_file_size(1_048_576), "1.00MB");
        assert_eq!(format_file_size(5_242_880), "5.00MB");
        assert_eq!(format_file_size(1_572_864), "1.50MB");
        assert_eq!(format_file_size(1), "0.00MB");
    }

    /// 存在するオブジェクトのサイズが返ることを確認
    #[tokio::test]
    async fn test_uploaded() {
        let store = MockObjectStore::new();
        store.put("uploads/user1/job-1/audio.mp3", vec![0u8; 1_048_576]);
        let state = test_state(store);

        let (status, body) =
            handle_validate_upload(State(state), user1(), query(Some("user1"), Some("job-1")))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, UploadStatus::Uploaded);
        assert_eq!(body.file_size.as_deref(), Some("1.00MB"));
        assert_eq!(body.s3_key, "uploads/user1/job-1/audio.mp3");
        assert_eq!(body.transcription_id, "job-1");
    }

    /// 存在しないオブジェクトがエラーではなく404ボディになることを確認
    #[tokio::test]
    async fn test_not_found_is_not_an_error() {
        let state = test_state(MockObjectStore::new());

        let (status, body) =
            handle_validate_upload(State(state), user1(), query(Some("user1"), Some("missing")))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.status, UploadStatus::NotFound);
        assert!(body.file_size.is_none());
    }

    /// 他ユーザー名の指定はオブジェクトの有無に関係なく403になることを確認
    #[tokio::test]
    async fn test_username_mismatch_forbidden() {
        let store = MockObjectStore::new();
        store.put("uploads/user2/job-1/audio.mp3", b"audio".to_vec());
        let state = test_state(store);

        for job in ["job-1", "missing"] {
            let err = handle_validate_upload(
                State(state.clone()),
                user1(),
                query(Some("user2"), Some(job)),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, GatewayError::Forbidden(_)), "{job}: {err:?}");
        }
    }

    #[tokio::test]
    async fn test_missing_params() {
        let state = test_state(MockObjectStore::new());
        let cases = [
            query(None, None),
            query(Some("user1"), None),
            query(None, Some("job-1")),
            query(Some(""), Some("job-1")),
        ];
        for q in cases {
            let err = handle_validate_upload(State(state.clone()), user1(), q)
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::BadRequest(_)));
        }
    }

    #[tokio::test]
    async fn test_rejects_path_injection() {
        let state = test_state(MockObjectStore::new());
        let err = handle_validate_upload(
            State(state),
            user1(),
            query(Some("user1"), Some("../user2/job-1")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GatewayError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_storage_failure() {
        let state = test_state(MockObjectStore::failing());
        let err =
            handle_validate_upload(State(state), user1(), query(Some("user1"), Some("job-1")))
                .await
                .unwrap_err();
        assert!(matches!(err, GatewayError::StorageUnavailable(_)));
    }
}
