//! # ルーター構築
//!
//! `/v1` 配下の3エンドポイントは認証ミドルウェアで包み、
//! `GET /` と未定義ルートのフォールバックは認証なしで公開する。

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::auth::require_api_key;
use crate::config::GatewayState;
use crate::endpoints::{
    handle_get_transcription, handle_health, handle_not_found, handle_presigned_url,
    handle_validate_upload,
};

/// Gatewayのルーターを構築する。
pub fn router(state: Arc<GatewayState>) -> Router {
    let protected = Router::new()
        .route("/v1/uploads/presigned-url", post(handle_presigned_url))
        .route("/v1/uploads/validate", get(handle_validate_upload))
        .route(
            "/v1/transcriptions/{transcription_id}",
            get(handle_get_transcription),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/", get(handle_health))
        .merge(protected)
        .fallback(handle_not_found)
        .with_state(state)
}
