//! # 未定義ルート
//!
//! `/sign`, `/index.html`, `/favicon.ico` 以外、および各パスで許可されていない
//! メソッドへの応答。

use axum::http::Method;
use axum::response::{IntoResponse, Response};

use crate::error::{redirect_to_index, DropboxError};

/// GET|HEAD /favicon.ico — 常に404（本文なし）。
pub async fn handle_favicon() -> DropboxError {
    DropboxError::NotFound
}

/// 未定義のメソッド・パスへの応答。
///
/// - `POST` → 405（許可されている操作 `POST /sign` を本文に書く）
/// - `GET`/`HEAD` → `/index.html` へ302
/// - その他 → 405
pub async fn handle_unrouted(method: Method) -> Response {
    if method == Method::POST {
        DropboxError::MethodNotAllowed(Some("POST /sign")).into_response()
    } else if method == Method::GET || method == Method::HEAD {
        redirect_to_index()
    } else {
        DropboxError::MethodNotAllowed(None).into_response()
    }
}
