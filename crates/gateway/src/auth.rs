//! # Gateway認証
//!
//! Bearerトークン（APIキー）によるクライアント認証。
//!
//! - 認証情報テーブルは起動時に一度だけ構築され、共有状態として注入される。
//! - `require_api_key` は保護対象ルートを包むミドルウェアで、認証に失敗した
//!   リクエストはハンドラに到達する前に401で拒否される。
//! - 認証済みユーザーは `Identity` としてリクエスト拡張に格納される。

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use crate::config::GatewayState;
use crate::error::GatewayError;

/// 認証済みユーザー名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub String);

impl Identity {
    /// ユーザー名を文字列として返す。
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// APIキー → ユーザー名の静的テーブル。
///
/// トークンは完全一致で照合する（ハッシュ化・有効期限・失効なし）。
#[derive(Debug, Clone, Default)]
pub struct CredentialTable {
    entries: HashMap<String, String>,
}

impl CredentialTable {
    /// 空のテーブルを作成する。
    pub fn new() -> Self {
        Self::default()
    }

    /// エントリを追加する。同じトークンが既に存在する場合は上書きし、以前のユーザー名を返す。
    pub fn insert(&mut self, token: impl Into<String>, identity: impl Into<String>) -> Option<String> {
        self.entries.insert(token.into(), identity.into())
    }

    /// トークンに対応するユーザーを返す。
    pub fn resolve(&self, token: &str) -> Option<Identity> {
        self.entries.get(token).map(|name| Identity(name.clone()))
    }

    /// 登録済みトークン数。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// エントリが1つもない場合にtrue。
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Into<String>, I: Into<String>> FromIterator<(T, I)> for CredentialTable {
    fn from_iter<It: IntoIterator<Item = (T, I)>>(iter: It) -> Self {
        let mut table = Self::new();
        for (token, identity) in iter {
            table.insert(token, identity);
        }
        table
    }
}

/// Authorizationヘッダーを検証し、認証済みユーザーを返す。
pub(crate) fn authenticate(
    table: &CredentialTable,
    headers: &HeaderMap,
) -> Result<Identity, GatewayError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            GatewayError::Unauthenticated(
                "Authorization header missing or invalid (Bearer token required).".to_string(),
            )
        })?;

    table
        .resolve(token)
        .ok_or_else(|| GatewayError::Unauthenticated("Invalid API Key.".to_string()))
}

/// 保護対象ルート用の認証ミドルウェア。
///
/// `axum::middleware::from_fn_with_state` でルーターに組み込む。
pub async fn require_api_key(
    State(state): State<Arc<GatewayState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let identity = match authenticate(&state.credentials, request.headers()) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = %e,
                "認証に失敗しました"
            );
            return Err(e);
        }
    };

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// 呼び出し元が指定したユーザー名が認証済みユーザーと一致することを確認する。
///
/// アップロード確認エンドポイントでのみ使用する。
pub(crate) fn ensure_same_identity(
    authenticated: &Identity,
    provided: &str,
) -> Result<(), GatewayError> {
    if authenticated.as_str() != provided {
        tracing::warn!(
            authenticated = %authenticated.as_str(),
            provided = %provided,
            "指定ユーザー名が認証済みユーザーと一致しません"
        );
        return Err(GatewayError::Forbidden(
            "Provided username does not match authenticated API key.".to_string(),
        ));
    }
    Ok(())
}
