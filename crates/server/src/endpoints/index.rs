//! # GET|HEAD /index.html
//!
//! ランディングページ。セッションディレクトリを用意してからHTMLを返す。

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;

use crate::config::AppState;
use crate::dropbox::prepare_session;
use crate::error::DropboxError;
use crate::session::SessionId;

/// GET|HEAD /index.html — ランディングページ。
///
/// クッキーがなければセッションを発行する。セッションディレクトリの作成が
/// 完了するまで応答しないため、ページを受け取った時点でアップロード可能になっている。
pub async fn handle_index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, DropboxError> {
    let (session, minted) = SessionId::resolve(&headers);
    if minted {
        tracing::info!(session = %session, "新しいセッションを発行");
    }

    prepare_session(&state, &session).await?;

    let body = state.index_html.clone();
    Response::builder()
        .status(StatusCode::OK)
        .header(SET_COOKIE, session.set_cookie())
        .header(CONTENT_TYPE, "text/html")
        .header(CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .map_err(|e| DropboxError::Internal(format!("レスポンスの構築に失敗: {e}")))
}
