//! # Transcribe Gateway
//!
//! 音声アップロード用の署名付きURL発行と、外部の文字起こし処理が生成した
//! 結果JSONの取得を提供する薄いHTTPゲートウェイ。
//!
//! ## 役割
//! - クライアント認証（静的APIキーテーブル）
//! - オブジェクトストレージへの署名付きURL発行
//! - アップロード済みオブジェクトの存在確認
//! - 文字起こし結果の取得
//!
//! ## API エンドポイント
//! - `POST /v1/uploads/presigned-url`: 署名付きURL発行
//! - `GET /v1/uploads/validate`: アップロード確認
//! - `GET /v1/transcriptions/{transcription_id}`: 文字起こし結果の取得
//! - `GET /`: ヘルスチェック

mod app;
mod auth;
mod config;
mod endpoints;
mod error;
mod keys;
mod storage;

use std::sync::Arc;

use config::{GatewayConfig, GatewayState};
use storage::S3ObjectStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // ローカル開発用の .env（存在しなければ無視）
    match dotenvy::dotenv() {
        Ok(path) => tracing::info!(path = %path.display(), ".envを読み込みました"),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        bucket = %config.storage.bucket,
        region = %config.storage.region,
        endpoint = config.storage.endpoint.as_deref().unwrap_or("aws"),
        presign_expiry_secs = config.presign_expiry_secs,
        api_keys = config.credentials.len(),
        "設定を読み込みました"
    );

    let storage = S3ObjectStore::from_config(&config.storage)?;

    let state = Arc::new(GatewayState {
        storage: Box::new(storage),
        credentials: config.credentials,
        presign_expiry_secs: config.presign_expiry_secs,
    });

    let app = app::router(state);

    tracing::info!("Gatewayを {} で起動します", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
