//! # Manta CORS Dropbox 共有型定義
//!
//! Storage Gatewayクライアント（`dropbox-manta`）とHTTPサーバー
//! （`dropbox-server`）の間で共有するデータ構造。

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ディレクトリ作成オプション
// ---------------------------------------------------------------------------

/// CORS: 許可するリクエストヘッダ
pub const CORS_ALLOW_HEADERS: &str = "access-control-allow-origin, accept, origin, content-type";
/// CORS: 許可するメソッド
pub const CORS_ALLOW_METHODS: &str = "PUT,GET,HEAD,DELETE";
/// CORS: 許可するオリジン
pub const CORS_ALLOW_ORIGIN: &str = "*";

/// ディレクトリ作成時に付与するメタデータ。
///
/// Storage Gatewayはディレクトリ作成リクエストのヘッダをそのまま
/// ディレクトリのメタデータとして保存する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryOptions {
    /// 付与するヘッダ（名前, 値）。名前は小文字。
    pub headers: Vec<(String, String)>,
}

impl DirectoryOptions {
    /// 任意のオリジンからのPUT/GET/HEAD/DELETEを許可するCORSメタデータ。
    ///
    /// ブラウザはこのサーバーを経由せずStorage Gatewayへ直接アップロードするため、
    /// クロスオリジンリクエストが発生する。
    pub fn cors() -> Self {
        Self {
            headers: vec![
                (
                    "access-control-allow-headers".to_string(),
                    CORS_ALLOW_HEADERS.to_string(),
                ),
                (
                    "access-control-allow-methods".to_string(),
                    CORS_ALLOW_METHODS.to_string(),
                ),
                (
                    "access-control-allow-origin".to_string(),
                    CORS_ALLOW_ORIGIN.to_string(),
                ),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// 署名付きURL
// ---------------------------------------------------------------------------

/// 署名付きURLの発行依頼。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUrlRequest {
    /// 対象オブジェクトのパス（例: `/user/stor/cors_demo/1234/test.txt`）
    pub path: String,
    /// 許可するHTTPメソッド（例: `["OPTIONS", "PUT"]`）
    pub methods: Vec<String>,
    /// 有効期限（UNIX秒）
    pub expires: i64,
}

/// POST /sign のレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlResponse {
    /// Storage GatewayのベースURLを含む完全な署名付きURL
    pub url: String,
}
