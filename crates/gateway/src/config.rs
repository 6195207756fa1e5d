//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! 設定は起動時に一度だけ読み込み、ホットリロードはしない。

use anyhow::Context;

use crate::auth::CredentialTable;
use crate::storage::ObjectStore;

/// 署名付きURLのデフォルト有効期限（秒）: 15分
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u32 = 900;

/// SigV4署名付きURLの有効期限の上限（秒）: 7日
pub const MAX_PRESIGN_EXPIRY_SECS: u32 = 7 * 24 * 60 * 60;

/// デフォルトの待受アドレス
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// S3互換ストレージの接続設定。
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// バケット名
    pub bucket: String,
    /// リージョン
    pub region: String,
    /// カスタムエンドポイント（MinIO等）。Noneの場合はAWS S3。
    pub endpoint: Option<String>,
    /// クライアントに渡す署名付きURL専用のエンドポイント
    pub public_endpoint: Option<String>,
    /// アクセスキー。Noneの場合はAWSの標準認証情報チェーンを使用する。
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl StorageConfig {
    /// アクセスキーとシークレットキーが両方設定済み、または両方未設定であることを確認する。
    ///
    /// 片方だけの場合、rust-s3は署名時にpanicするため起動時に拒否する。
    pub fn check_credentials(&self) -> anyhow::Result<()> {
        match (&self.access_key, &self.secret_key) {
            (Some(_), Some(_)) | (None, None) => Ok(()),
            (Some(_), None) => {
                anyhow::bail!("S3_ACCESS_KEYが設定されていますがS3_SECRET_KEYが未設定です")
            }
            (None, Some(_)) => {
                anyhow::bail!("S3_SECRET_KEYが設定されていますがS3_ACCESS_KEYが未設定です")
            }
        }
    }
}

/// Gateway設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub storage: StorageConfig,
    /// 署名付きURLの有効期限（秒）
    pub presign_expiry_secs: u32,
    /// APIキー → ユーザー名テーブル
    pub credentials: CredentialTable,
    /// 待受アドレス
    pub bind_addr: String,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        let storage = StorageConfig {
            bucket: env_or("S3_BUCKET_NAME", "your-audio-bucket-name"),
            region: env_or("AWS_REGION", "us-east-1"),
            endpoint: env_opt("S3_ENDPOINT"),
            public_endpoint: env_opt("S3_PUBLIC_ENDPOINT"),
            access_key: env_opt("S3_ACCESS_KEY"),
            secret_key: env_opt("S3_SECRET_KEY"),
        };
        storage.check_credentials()?;

        let presign_expiry_secs = match env_opt("PRESIGNED_URL_EXPIRATION") {
            Some(raw) => parse_expiry_secs(&raw)?,
            None => DEFAULT_PRESIGN_EXPIRY_SECS,
        };

        let credentials = match env_opt("API_KEYS") {
            Some(raw) => parse_credential_table(&raw)?,
            None => {
                // 開発環境用: 固定のテスト用キーを使用
                tracing::warn!("API_KEYSが未設定です。開発用のAPIキーを使用します");
                development_credentials(
                    &env_or("USER1_API_KEY", "test_key_user1_abc"),
                    &env_or("USER2_API_KEY", "test_key_user2_def"),
                )
            }
        };

        Ok(Self {
            storage,
            presign_expiry_secs,
            credentials,
            bind_addr: env_or("BIND_ADDR", DEFAULT_BIND_ADDR),
        })
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

/// 署名付きURLの有効期限をパースする（1秒〜7日）。
pub fn parse_expiry_secs(raw: &str) -> anyhow::Result<u32> {
    let secs: u32 = raw
        .trim()
        .parse()
        .with_context(|| format!("PRESIGNED_URL_EXPIRATIONが数値ではありません: {raw}"))?;
    if secs == 0 || secs > MAX_PRESIGN_EXPIRY_SECS {
        anyhow::bail!(
            "PRESIGNED_URL_EXPIRATIONは1〜{MAX_PRESIGN_EXPIRY_SECS}秒である必要があります: {secs}"
        );
    }
    Ok(secs)
}

/// `token=identity` をカンマ区切りで並べた文字列から認証情報テーブルを構築する。
///
/// 空要素は無視する。同じトークンが複数回現れた場合は後勝ち。
pub fn parse_credential_table(raw: &str) -> anyhow::Result<CredentialTable> {
    let mut table = CredentialTable::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (token, identity) = entry
            .split_once('=')
            .map(|(t, i)| (t.trim(), i.trim()))
            .filter(|(t, i)| !t.is_empty() && !i.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("API_KEYSの要素は token=identity 形式である必要があります")
            })?;
        if identity.contains('/') {
            anyhow::bail!("API_KEYSのユーザー名に '/' は使用できません: {identity}");
        }
        if table.insert(token, identity).is_some() {
            tracing::warn!(identity, "API_KEYSに重複したトークンがあります。後の定義を使用します");
        }
    }
    if table.is_empty() {
        anyhow::bail!("API_KEYSに有効なエントリがありません");
    }
    Ok(table)
}

/// 開発用の認証情報テーブル（user1, user2）。
fn development_credentials(user1_key: &str, user2_key: &str) -> CredentialTable {
    [(user1_key, "user1"), (user2_key, "user2")]
        .into_iter()
        .collect()
}

/// Gatewayの共有状態。
///
/// 全フィールドは読み取り専用で、リクエスト間の協調は行わない。
pub struct GatewayState {
    /// オブジェクトストレージ（S3互換等、トレイトで抽象化）
    pub storage: Box<dyn ObjectStore>,
    /// APIキー → ユーザー名テーブル
    pub credentials: CredentialTable,
    /// 署名付きURLの有効期限（秒）
    pub presign_expiry_secs: u32,
}
