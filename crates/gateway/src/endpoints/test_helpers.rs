//! # エンドポイントテスト用共通ヘルパー
//!
//! S3に接続せずにハンドラとルーターを動かすためのモックストレージと状態構築。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::auth::CredentialTable;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::storage::{ObjectMeta, ObjectStore};

pub const USER1_KEY: &str = "test_key_user1_abc";
pub const USER2_KEY: &str = "test_key_user2_def";

/// テスト用のモックObjectStore。
/// オブジェクトをメモリ上に保持し、`failing` の場合は全操作が障害になる。
#[derive(Clone, Default)]
pub struct MockObjectStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    presigned_keys: Arc<Mutex<Vec<String>>>,
    failing: bool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全操作がStorageUnavailableになるストア
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn put(&self, key: &str, data: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.into());
    }

    /// presign_putに渡されたキーの一覧
    pub fn presigned_keys(&self) -> Vec<String> {
        self.presigned_keys.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), GatewayError> {
        if self.failing {
            return Err(GatewayError::StorageUnavailable(
                "Error checking S3 object: HTTP 503".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn presign_put(&self, key: &str, expiry_secs: u32) -> Result<String, GatewayError> {
        self.check()?;
        self.presigned_keys.lock().unwrap().push(key.to_string());
        Ok(format!(
            "http://mock-storage/{key}?X-Amz-Expires={expiry_secs}&sig=test"
        ))
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>, GatewayError> {
        self.check()?;
        Ok(self.objects.lock().unwrap().get(key).map(|data| ObjectMeta {
            size: data.len() as u64,
        }))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError> {
        self.check()?;
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }
}

/// テスト用GatewayStateを構築するヘルパー（user1, user2を登録済み）
pub fn test_state(store: MockObjectStore) -> Arc<GatewayState> {
    let credentials: CredentialTable = [(USER1_KEY, "user1"), (USER2_KEY, "user2")]
        .into_iter()
        .collect();

    Arc::new(GatewayState {
        storage: Box::new(store),
        credentials,
        presign_expiry_secs: 900,
    })
}

/// ルーター全体を 127.0.0.1 の空きポートで起動し、ベースURLを返す。
pub async fn spawn_gateway(state: Arc<GatewayState>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let app = crate::app::router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{port}")
}
