//! # サーバー エラー型と共通エラーレスポンダ
//!
//! 全ハンドラのエラーは `plain_response` を通して `text/plain` で返す。

use std::path::PathBuf;

use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use dropbox_manta::StorageError;

/// リクエスト処理のエラー型。
#[derive(Debug, thiserror::Error)]
pub enum DropboxError {
    /// セッションクッキーがない
    #[error("クッキーが送信されていません")]
    MissingCookie,
    /// `file` パラメータがない
    #[error("\"file\" パラメータがありません")]
    MissingFile,
    /// 存在しないリソース
    #[error("見つかりません")]
    NotFound,
    /// 許可されていないメソッド。`Some` の場合は許可されている操作を本文に書く。
    #[error("{}", .0.unwrap_or_default())]
    MethodNotAllowed(Option<&'static str>),
    /// Storage Gateway操作に失敗
    #[error("ストレージ操作に失敗")]
    Storage(#[from] StorageError),
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl DropboxError {
    pub fn status(&self) -> StatusCode {
        match self {
            DropboxError::MissingCookie => StatusCode::BAD_REQUEST,
            DropboxError::MissingFile => StatusCode::CONFLICT,
            DropboxError::NotFound => StatusCode::NOT_FOUND,
            DropboxError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            DropboxError::Storage(_) | DropboxError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DropboxError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            DropboxError::NotFound | DropboxError::MethodNotAllowed(None) => {
                plain_response(status, None)
            }
            err => plain_response(status, Some(&err)),
        }
    }
}

/// 起動時の設定・リソース読み込みエラー。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 秘密鍵のパスを決定できない
    #[error("秘密鍵のパスが未指定で、HOMEも設定されていません")]
    NoKeyPath,
    /// ファイル読み込み失敗
    #[error("{}の読み込みに失敗", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Storage Gatewayクライアントの初期化失敗
    #[error("Storage Gatewayクライアントの初期化に失敗")]
    Storage(#[from] StorageError),
}

/// エラーとその原因チェーンを1行ずつ並べた診断テキスト。
pub fn diagnostic(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str("\n    caused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// 共通エラーレスポンダ。
///
/// `text/plain` でステータスコードを返し、エラーがあれば診断テキストを本文に書く。
/// エラーがなければ本文は空。
pub fn plain_response(
    status: StatusCode,
    err: Option<&(dyn std::error::Error + 'static)>,
) -> Response {
    let body = err.map(diagnostic).unwrap_or_default();
    if status.is_server_error() {
        tracing::warn!(status = %status, error = %body, "リクエスト処理に失敗");
    }
    (status, [(CONTENT_TYPE, "text/plain")], body).into_response()
}

/// `/index.html` へのリダイレクト（本文なし）
pub fn redirect_to_index() -> Response {
    let mut response = plain_response(StatusCode::FOUND, None);
    response
        .headers_mut()
        .insert(LOCATION, HeaderValue::from_static("/index.html"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(DropboxError::MissingCookie.status(), StatusCode::BAD_REQUEST);
        assert_eq!(DropboxError::MissingFile.status(), StatusCode::CONFLICT);
        assert_eq!(DropboxError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            DropboxError::MethodNotAllowed(None).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            DropboxError::Storage(StorageError::Key("x".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    /// ストレージエラーは原因チェーンごと本文に書かれる
    #[tokio::test]
    async fn test_storage_error_body_has_chain() {
        let err = DropboxError::Storage(StorageError::Api {
            status: 403,
            code: "AuthorizationFailed".to_string(),
            message: "denied".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");

        let body = body_text(response).await;
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("ストレージ操作に失敗"));
        assert!(lines.next().unwrap().contains("AuthorizationFailed: denied"));
    }

    #[tokio::test]
    async fn test_empty_body_without_detail() {
        let response = DropboxError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        assert!(body_text(response).await.is_empty());

        let response = DropboxError::MethodNotAllowed(Some("POST /sign")).into_response();
        assert_eq!(body_text(response).await, "POST /sign");
    }

    #[tokio::test]
    async fn test_redirect_to_index() {
        let response = redirect_to_index();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/index.html");
        assert!(body_text(response).await.is_empty());
    }
}
