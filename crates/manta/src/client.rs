//! # Manta HTTPクライアント
//!
//! `StorageGateway` トレイトの本番実装。全リクエストにHTTP Signature認証を付与する。

use std::collections::HashSet;

use dropbox_types::{DirectoryOptions, SignUrlRequest};
use serde::Deserialize;

use crate::error::StorageError;
use crate::presign::{encode_path, presign_path};
use crate::signer::MantaSigner;
use crate::StorageGateway;

/// ディレクトリ作成時のContent-Type
const DIRECTORY_CONTENT_TYPE: &str = "application/json; type=directory";

/// Storage Gatewayが返すエラーボディ。
#[derive(Debug, Deserialize)]
struct MantaErrorBody {
    code: String,
    #[serde(default)]
    message: String,
}

/// `date` ヘッダ用のRFC 1123形式の現在時刻
fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// パスのセグメント数（`/alice/stor` → 2）
fn depth(path: &str) -> usize {
    path.split('/').filter(|s| !s.is_empty()).count()
}

/// 親ディレクトリのパス
fn parent_dir(path: &str) -> String {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some(("", _)) | None => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
    }
}

/// Manta互換オブジェクトストアのクライアント。
pub struct MantaClient {
    http: reqwest::Client,
    /// 末尾 `/` を除いたベースURL
    base_url: String,
    /// 署名付きURLの署名対象に含めるホスト（`host[:port]`）
    host: String,
    signer: MantaSigner,
}

impl MantaClient {
    /// ベースURLと署名者から構築する。
    pub fn new(base_url: &str, signer: MantaSigner) -> Result<Self, StorageError> {
        Self::with_http_client(reqwest::Client::new(), base_url, signer)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        signer: MantaSigner,
    ) -> Result<Self, StorageError> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| StorageError::InvalidRequest(format!("ベースURLが不正です: {e}")))?;
        let host = parsed.host_str().ok_or_else(|| {
            StorageError::InvalidRequest(format!("ベースURLにホストがありません: {base_url}"))
        })?;
        let host = match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
            signer,
        })
    }

    /// エラーレスポンスを `StorageError::Api` に変換する。
    async fn api_error(response: reqwest::Response) -> StorageError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<MantaErrorBody>(&body) {
            Ok(parsed) => StorageError::Api {
                status: status.as_u16(),
                code: parsed.code,
                message: parsed.message,
            },
            Err(_) => StorageError::Api {
                status: status.as_u16(),
                code: "UnknownError".to_string(),
                message: if body.is_empty() {
                    status.canonical_reason().unwrap_or_default().to_string()
                } else {
                    body
                },
            },
        }
    }
}

#[async_trait::async_trait]
impl StorageGateway for MantaClient {
    async fn ensure_directory(
        &self,
        path: &str,
        options: &DirectoryOptions,
    ) -> Result<(), StorageError> {
        if !path.starts_with('/') {
            return Err(StorageError::InvalidRequest(format!(
                "パスは '/' で始まる必要があります: {path}"
            )));
        }

        let url = format!("{}{}", self.base_url, encode_path(path));
        let date = http_date();

        let mut request = self
            .http
            .put(&url)
            .header("date", &date)
            .header("authorization", self.signer.authorization(&date))
            .header("accept", "application/json")
            .header("content-type", DIRECTORY_CONTENT_TYPE);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        if response.status().is_success() {
            tracing::debug!(path = %path, status = %response.status(), "ディレクトリを作成");
            return Ok(());
        }

        Err(Self::api_error(response).await)
    }

    async fn ensure_directory_tree(
        &self,
        path: &str,
        options: &DirectoryOptions,
    ) -> Result<(), StorageError> {
        // `/<user>/<top-level>` より上は作成できない
        const MIN_DEPTH: usize = 2;

        let mut pending = vec![path.trim_end_matches('/').to_string()];
        let mut ensured = HashSet::new();
        while let Some(dir) = pending.last().cloned() {
            match self.ensure_directory(&dir, options).await {
                Ok(()) => {
                    pending.pop();
                    ensured.insert(dir);
                }
                Err(e) if e.is_missing_parent() => {
                    let parent = parent_dir(&dir);
                    // 作成済みの親でも見つからないと言われたら打ち切る
                    if depth(&parent) < MIN_DEPTH || ensured.contains(&parent) {
                        return Err(e);
                    }
                    tracing::debug!(path = %dir, parent = %parent, "親ディレクトリから作成します");
                    pending.push(parent);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    async fn sign_url(&self, request: &SignUrlRequest) -> Result<String, StorageError> {
        presign_path(&self.signer, &self.host, request)
    }
}
