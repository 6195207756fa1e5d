//! # オブジェクトストレージ
//!
//! Gatewayが利用する3つのストレージ操作（署名付きPUT URL発行・メタデータ取得・
//! オブジェクト取得）の抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

pub mod s3;

pub use s3::S3ObjectStore;

use crate::error::GatewayError;

/// HEADで取得したオブジェクトのメタデータ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMeta {
    /// オブジェクトサイズ（バイト）
    pub size: u64,
}

/// オブジェクトストレージの抽象インターフェース。
///
/// オブジェクトが存在しない場合はエラーではなく `Ok(None)` を返す。
/// それ以外の障害は全て `GatewayError::StorageUnavailable` になる。
/// 各操作はリクエストごとに一度だけ呼ばれ、リトライしない。
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// 指定キーへのPUTのみを許可する署名付きURLを生成する。
    async fn presign_put(&self, key: &str, expiry_secs: u32) -> Result<String, GatewayError>;

    /// メタデータのみを取得して存在確認を行う。
    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>, GatewayError>;

    /// オブジェクト全体を取得する。
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError>;
}
