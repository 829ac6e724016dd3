//! # Manta Storage Gatewayクライアント
//!
//! ブラウザから直接オブジェクトストアへアップロードさせるために必要な
//! 最小限の操作だけを提供する。
//!
//! ## 操作
//! | 操作 | HTTP | 説明 |
//! |------|------|------|
//! | `ensure_directory` | `PUT <path>` | ディレクトリ作成（冪等） |
//! | `ensure_directory_tree` | `PUT <path>` × n | 親を含めたディレクトリ作成（`mkdir -p`） |
//! | `sign_url` | なし | 期限付き署名付きURLの生成（ローカル計算） |
//!
//! ## 認証
//! HTTP Signature（`ecdsa-sha256`）。署名対象は `date` ヘッダ。

pub mod client;
pub mod error;
pub mod presign;
pub mod signer;

pub use client::MantaClient;
pub use error::StorageError;
pub use signer::MantaSigner;

use dropbox_types::{DirectoryOptions, SignUrlRequest};

/// Storage Gatewayの抽象インターフェース。
///
/// HTTPサーバーはこのトレイト経由でのみストレージに触れる。
/// テストではモック実装に差し替える。
#[async_trait::async_trait]
pub trait StorageGateway: Send + Sync {
    /// ディレクトリを作成する。既に存在する場合も成功として扱う。
    async fn ensure_directory(
        &self,
        path: &str,
        options: &DirectoryOptions,
    ) -> Result<(), StorageError>;

    /// 親ディレクトリを含めてディレクトリを作成する。
    async fn ensure_directory_tree(
        &self,
        path: &str,
        options: &DirectoryOptions,
    ) -> Result<(), StorageError>;

    /// 署名付きURLのパス＋クエリ部分を生成する。
    ///
    /// 戻り値はベースURLを含まない（例: `/user/stor/x?algorithm=...&signature=...`）。
    async fn sign_url(&self, request: &SignUrlRequest) -> Result<String, StorageError>;
}
