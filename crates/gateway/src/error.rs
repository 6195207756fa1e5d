//! # Gateway エラー型
//!
//! 全エンドポイントと認証ミドルウェアで共通のエラー型。
//! レスポンスは常に `{"error": "..."}` 形式のJSONボディになる。
//!
//! オブジェクトが存在しないケースはエラーではなく、各ハンドラが
//! ポーリング用の404ボディとして返す。

use axum::http::StatusCode;
use axum::Json;
use transcribe_types::ErrorResponse;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト（必須パラメータの欠落、不正なジョブ識別子）
    #[error("{0}")]
    BadRequest(String),
    /// 認証失敗（Authorizationヘッダーの欠落、未登録のAPIキー）
    #[error("{0}")]
    Unauthenticated(String),
    /// 指定ユーザー名と認証済みユーザーの不一致
    #[error("{0}")]
    Forbidden(String),
    /// 文字起こし結果は存在するがJSONとして解釈できない
    #[error("{0}")]
    MalformedResult(String),
    /// ストレージ操作に失敗（権限エラー・一時的な障害を区別しない）
    #[error("{0}")]
    StorageUnavailable(String),
}

impl GatewayError {
    /// エラーに対応するHTTPステータスコード。
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Forbidden(_) => StatusCode::FORBIDDEN,
            GatewayError::MalformedResult(_) | GatewayError::StorageUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
