//! # Manta CORS Dropbox
//!
//! ブラウザからMantaへ署名付きURLで直接ファイルをアップロードさせるデモサーバー。
//!
//! ## 役割
//! - 訪問者ごとのセッションクッキー発行
//! - セッションごとのアップロードディレクトリ作成（CORS許可付き）
//! - 期限付き署名付きURLの発行
//! - ランディングページ（静的HTML）の配信
//!
//! ## API エンドポイント
//! - `GET|HEAD /index.html` — ランディングページ
//! - `POST /sign` — 署名付きURL発行
//!
//! ## 起動シーケンス
//! 1. 設定読み込み（不足・不正なら終了）
//! 2. 秘密鍵とランディングページの読み込み
//! 3. Dropbox rootの作成（`mkdir -p`、失敗なら終了）
//! 4. 待ち受け開始

mod config;
mod dropbox;
mod endpoints;
mod error;
mod router;
mod session;

#[cfg(test)]
mod test_helpers;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dropbox_types::DirectoryOptions;
use tracing_subscriber::EnvFilter;

use crate::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    let state = Arc::new(AppState::from_config(&config)?);

    // アップロードを受け付ける前にDropbox rootを用意する
    tracing::info!(root = %state.dropbox_root, "Dropbox rootを作成中...");
    state
        .storage
        .ensure_directory_tree(&state.dropbox_root, &DirectoryOptions::cors())
        .await
        .with_context(|| format!("Dropbox root {} の作成に失敗", state.dropbox_root))?;
    tracing::info!("Dropbox root作成完了");

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("http://127.0.0.1:{}/index.html", port);

    axum::serve(listener, router::build_router(state)).await?;

    Ok(())
}
