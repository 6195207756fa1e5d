//! # S3互換 ObjectStore 実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用するObjectStore実装。

use s3::error::S3Error;

use super::{ObjectMeta, ObjectStore};
use crate::config::StorageConfig;
use crate::error::GatewayError;

/// S3互換ストレージによるObjectStore実装。
pub struct S3ObjectStore {
    /// HEAD/GETに使用するバケット
    bucket_internal: s3::Bucket,
    /// クライアント向けバケット（署名付きURL生成用）。
    /// Docker内部ホスト名と外部ホスト名が異なる場合に使用。
    /// Noneの場合はbucket_internalを使用する。
    bucket_public: Option<s3::Bucket>,
}

impl S3ObjectStore {
    /// 構築済みのバケットからObjectStoreを作成する。
    pub fn new(bucket_internal: s3::Bucket, bucket_public: Option<s3::Bucket>) -> Self {
        Self {
            bucket_internal,
            bucket_public,
        }
    }

    /// S3互換バケットを初期化する。
    ///
    /// `endpoint` が指定された場合はカスタムエンドポイント（パススタイル）、
    /// 未指定の場合はリージョンからAWS S3のエンドポイントを決定する。
    /// アクセスキーが未設定の場合はAWSの標準的な認証情報チェーンを使用する。
    fn init_bucket(config: &StorageConfig, endpoint: Option<&str>) -> anyhow::Result<s3::Bucket> {
        let credentials = s3::creds::Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )?;

        let bucket = match endpoint {
            Some(endpoint) => {
                let region = s3::Region::Custom {
                    region: config.region.clone(),
                    endpoint: endpoint.to_string(),
                };
                s3::Bucket::new(&config.bucket, region, credentials)?.with_path_style()
            }
            None => {
                let region: s3::Region = config.region.parse()?;
                s3::Bucket::new(&config.bucket, region, credentials)?
            }
        };

        Ok(*bucket)
    }

    /// 設定から構築する。
    pub fn from_config(config: &StorageConfig) -> anyhow::Result<Self> {
        config.check_credentials()?;
        let bucket_internal = Self::init_bucket(config, config.endpoint.as_deref())?;

        let bucket_public = config
            .public_endpoint
            .as_deref()
            .map(|public_ep| {
                tracing::info!(
                    s3_public_endpoint = %public_ep,
                    "クライアント向けS3エンドポイントを設定"
                );
                Self::init_bucket(config, Some(public_ep))
            })
            .transpose()?;

        Ok(Self::new(bucket_internal, bucket_public))
    }
}

/// S3のHTTPステータスを分類する。
/// 2xxは成功、404はオブジェクトなし、それ以外は障害として扱う。
fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Found,
        404 => StatusClass::NotFound,
        other => StatusClass::Fault(other),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum StatusClass {
    Found,
    NotFound,
    Fault(u16),
}

/// S3エラーを分類する。`fail-on-err` 有効時は404もエラーとして届くため、ここで拾う。
fn classify_error(err: S3Error) -> Result<StatusClass, S3Error> {
    match err {
        S3Error::HttpFailWithBody(404, _) => Ok(StatusClass::NotFound),
        other => Err(other),
    }
}

fn fault(operation: &str, key: &str, detail: impl std::fmt::Display) -> GatewayError {
    tracing::error!(operation, key, error = %detail, "S3操作に失敗しました");
    GatewayError::StorageUnavailable(format!("Error {operation} S3 object: {detail}"))
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn presign_put(&self, key: &str, expiry_secs: u32) -> Result<String, GatewayError> {
        let public_bucket = self.bucket_public.as_ref().unwrap_or(&self.bucket_internal);

        public_bucket
            .presign_put(key, expiry_secs, None, None)
            .await
            .map_err(|e| {
                tracing::error!(key, error = %e, "署名付きアップロードURL生成失敗");
                GatewayError::StorageUnavailable("Could not generate presigned URL.".to_string())
            })
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>, GatewayError> {
        let (class, head) = match self.bucket_internal.head_object(key).await {
            Ok((head, status)) => (classify_status(status), Some(head)),
            Err(e) => (classify_error(e).map_err(|e| fault("checking", key, e))?, None),
        };

        match (class, head) {
            (StatusClass::Found, Some(head)) => {
                let size = head.content_length.unwrap_or(0).max(0) as u64;
                Ok(Some(ObjectMeta { size }))
            }
            (StatusClass::NotFound, _) => Ok(None),
            (StatusClass::Fault(status), _) => {
                Err(fault("checking", key, format_args!("HTTP {status}")))
            }
            (StatusClass::Found, None) => Err(fault("checking", key, "missing metadata")),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError> {
        let response = match self.bucket_internal.get_object(key).await {
            Ok(response) => response,
            Err(e) => {
                return match classify_error(e) {
                    Ok(_) => Ok(None),
                    Err(e) => Err(fault("retrieving", key, e)),
                };
            }
        };

        match classify_status(response.status_code()) {
            StatusClass::Found => Ok(Some(response.bytes().to_vec())),
            StatusClass::NotFound => Ok(None),
            StatusClass::Fault(status) => {
                Err(fault("retrieving", key, format_args!("HTTP {status}")))
            }
        }
    }
}
