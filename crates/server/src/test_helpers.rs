//! # テスト用共通ヘルパー
//!
//! Storage Gatewayのモックと、モックを使った `AppState` の構築。

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use dropbox_manta::{StorageError, StorageGateway};
use dropbox_types::{DirectoryOptions, SignUrlRequest};

use crate::config::AppState;

/// テスト用ランディングページ
pub const TEST_HTML: &str = "<!DOCTYPE html><html><body>dropbox</body></html>";

/// 呼び出しを記録するモックStorage Gateway。
/// 署名付きURLは `<path>?signature=mock` を返す。
#[derive(Clone, Default)]
pub struct MockStorage {
    ensured: Arc<Mutex<Vec<(String, DirectoryOptions)>>>,
    signed: Arc<Mutex<Vec<SignUrlRequest>>>,
    fail_directories: bool,
    fail_signatures: bool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// ディレクトリ作成が常に失敗するモック
    pub fn failing_directories() -> Self {
        Self {
            fail_directories: true,
            ..Self::default()
        }
    }

    /// URL署名が常に失敗するモック
    pub fn failing_signatures() -> Self {
        Self {
            fail_signatures: true,
            ..Self::default()
        }
    }

    pub fn ensured(&self) -> Vec<(String, DirectoryOptions)> {
        self.ensured.lock().unwrap().clone()
    }

    pub fn signed(&self) -> Vec<SignUrlRequest> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl StorageGateway for MockStorage {
    async fn ensure_directory(
        &self,
        path: &str,
        options: &DirectoryOptions,
    ) -> Result<(), StorageError> {
        if self.fail_directories {
            return Err(StorageError::Api {
                status: 503,
                code: "ServiceUnavailable".to_string(),
                message: "mock storage is down".to_string(),
            });
        }
        self.ensured
            .lock()
            .unwrap()
            .push((path.to_string(), options.clone()));
        Ok(())
    }

    async fn ensure_directory_tree(
        &self,
        path: &str,
        options: &DirectoryOptions,
    ) -> Result<(), StorageError> {
        self.ensure_directory(path, options).await
    }

    async fn sign_url(&self, request: &SignUrlRequest) -> Result<String, StorageError> {
        if self.fail_signatures {
            return Err(StorageError::InvalidRequest("mock signing failure".to_string()));
        }
        self.signed.lock().unwrap().push(request.clone());
        Ok(format!("{}?signature=mock", request.path))
    }
}

/// モックStorage Gatewayを使う `AppState` を構築する
pub fn test_state(storage: MockStorage) -> AppState {
    AppState {
        storage: Box::new(storage),
        storage_url: "https://manta.example".to_string(),
        dropbox_root: "/alice/stor/cors_demo".to_string(),
        index_html: Bytes::from_static(TEST_HTML.as_bytes()),
    }
}
