//! # POST /sign
//!
//! ブラウザがアップロード先の署名付きURLを取得するエンドポイント。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use dropbox_types::SignedUrlResponse;

use crate::config::AppState;
use crate::dropbox::authorize_upload;
use crate::error::DropboxError;
use crate::session::SessionId;

/// フォームエンコードされた本文から指定キーの最初の値を取り出す。
///
/// Content-Typeは見ない。同じキーが複数あれば先頭を使う。
fn form_value(body: &[u8], key: &str) -> Option<String> {
    form_urlencoded::parse(body)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// POST /sign — 署名付きURL発行。
///
/// 本文は `file=<name>`。クッキーの確認は本文より先に行う。
pub async fn handle_sign(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SignedUrlResponse>, DropboxError> {
    let session = SessionId::from_headers(&headers).ok_or(DropboxError::MissingCookie)?;

    let file = form_value(&body, "file")
        .filter(|f| !f.is_empty())
        .ok_or(DropboxError::MissingFile)?;

    let url = authorize_upload(&state, &session, &file).await?;
    Ok(Json(SignedUrlResponse { url }))
}
