//! # Transcribe Gateway 共有型定義
//!
//! GatewayのHTTP APIで送受信するJSONボディをRust構造体として提供する。
//!
//! ## ステータス文字列
//! - `uploaded` / `not_found`: アップロード確認（クライアントはポーリングする）
//! - `processing or not found`: 文字起こし結果が未生成、または存在しない

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// POST /v1/uploads/presigned-url
// ---------------------------------------------------------------------------

/// 署名付きアップロードURL発行レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignedUrlResponse {
    /// 音声ファイルをPUTするための署名付きURL
    pub presigned_url: String,
    /// 新しく採番されたジョブ識別子（UUID v4）
    pub transcription_id: String,
}

// ---------------------------------------------------------------------------
// GET /v1/uploads/validate
// ---------------------------------------------------------------------------

/// アップロード確認のクエリパラメータ。
///
/// 欠落時にaxumの既定エラーではなく400のJSONボディを返すため、両方ともOptionで受ける。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateUploadQuery {
    /// 呼び出し元が主張するユーザー名（トークンのユーザーと一致する必要がある）
    pub username: Option<String>,
    /// 確認対象のジョブ識別子
    pub transcription_id: Option<String>,
}

/// アップロードオブジェクトの状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// オブジェクトが存在する
    Uploaded,
    /// オブジェクトが存在しない（ポーリング中の正常な結果）
    NotFound,
}

/// アップロード確認レスポンス。200と404で同じ形を使う。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadValidationResponse {
    pub transcription_id: String,
    pub status: UploadStatus,
    /// 人間向けのサイズ表記（例: "1.00MB"）。未アップロード時はnull。
    pub file_size: Option<String>,
    /// 確認したオブジェクトキー
    pub s3_key: String,
}

// ---------------------------------------------------------------------------
// GET /v1/transcriptions/{transcription_id}
// ---------------------------------------------------------------------------

/// 文字起こし結果の取得状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptionStatus {
    /// 外部の文字起こし処理が未完了、またはジョブが存在しない
    #[serde(rename = "processing or not found")]
    ProcessingOrNotFound,
}

/// 文字起こし結果が未生成の場合の404ボディ。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionPendingResponse {
    pub transcription_id: String,
    pub status: TranscriptionStatus,
    pub message: String,
    pub s3_key: String,
}

// ---------------------------------------------------------------------------
// 共通
// ---------------------------------------------------------------------------

/// GET / のヘルスチェックレスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// エラーレスポンス。全ての4xx/5xx（ポーリング用404を除く）で使用する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 人間が読めるエラーメッセージ
    pub error: String,
}
