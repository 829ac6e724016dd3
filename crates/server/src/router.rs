//! # ルーター
//!
//! メソッドとパスでハンドラに振り分ける。リクエスト間で共有する可変状態はない。
//!
//! | メソッド | パス | 応答 |
//! |----------|------|------|
//! | `POST` | `/sign` | 署名付きURL発行 |
//! | `POST` | その他 | 405 |
//! | `GET`/`HEAD` | `/index.html` | ランディングページ |
//! | `GET`/`HEAD` | `/favicon.ico` | 404 |
//! | `GET`/`HEAD` | その他 | `/index.html` へ302 |
//! | その他 | 全て | 405 |

use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

use crate::config::AppState;
use crate::endpoints::{handle_favicon, handle_index, handle_sign, handle_unrouted};

/// リクエスト行と全ヘッダをdebugレベルで記録する。
async fn log_request(request: Request, next: Next) -> Response {
    tracing::debug!(method = %request.method(), uri = %request.uri(), "リクエスト受信");
    for (name, value) in request.headers() {
        tracing::debug!("{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }

    let response = next.run(request).await;
    tracing::debug!(status = %response.status(), "レスポンス送信");
    response
}

/// 共有状態を注入したルーターを構築する。
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sign", post(handle_sign).fallback(handle_unrouted))
        .route("/index.html", get(handle_index).fallback(handle_unrouted))
        .route("/favicon.ico", get(handle_favicon).fallback(handle_unrouted))
        .fallback(handle_unrouted)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
