//! # オブジェクトキー導出
//!
//! `<purpose>/<identity>/<job_id>/<filename>` 形式のストレージキーを構築する。
//! ユーザー名は設定由来のため信頼し、呼び出し元から受け取るジョブ識別子のみ検証する。

use std::fmt;

use crate::error::GatewayError;

/// アップロード音声のファイル名
pub const UPLOAD_FILENAME: &str = "audio.mp3";

/// 文字起こし結果のファイル名
pub const TRANSCRIPT_FILENAME: &str = "transcript.json";

/// ジョブ識別子の最大長
pub const MAX_JOB_ID_LEN: usize = 128;

/// キーの先頭セグメント。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// クライアントがアップロードする音声
    Uploads,
    /// 外部の文字起こし処理が書き込む結果
    Transcriptions,
}

impl Purpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::Uploads => "uploads",
            Purpose::Transcriptions => "transcriptions",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ストレージキーを構築する。
pub fn object_key(purpose: Purpose, identity: &str, job_id: &str, filename: &str) -> String {
    format!("{purpose}/{identity}/{job_id}/{filename}")
}

/// アップロード音声のキー。
pub fn upload_key(identity: &str, job_id: &str) -> String {
    object_key(Purpose::Uploads, identity, job_id, UPLOAD_FILENAME)
}

/// 文字起こし結果のキー。
pub fn transcript_key(identity: &str, job_id: &str) -> String {
    object_key(Purpose::Transcriptions, identity, job_id, TRANSCRIPT_FILENAME)
}

/// 新しいジョブ識別子を採番する（UUID v4）。
pub fn new_job_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 呼び出し元から受け取ったジョブ識別子を検証する。
///
/// `/` や `..` によるキーのパス注入を防ぐため、英数字・`-`・`_` のみ許可する。
pub fn validate_job_id(job_id: &str) -> Result<(), GatewayError> {
    if job_id.is_empty() || job_id.len() > MAX_JOB_ID_LEN {
        return Err(GatewayError::BadRequest(format!(
            "transcription_id must be 1 to {MAX_JOB_ID_LEN} characters long."
        )));
    }
    if !job_id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(GatewayError::BadRequest(
            "transcription_id may only contain letters, digits, '-' and '_'.".to_string(),
        ));
    }
    Ok(())
}
