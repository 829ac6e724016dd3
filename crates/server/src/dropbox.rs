//! # アップロード認可フロー
//!
//! セッションごとのディレクトリを用意し、そこへのアップロードを許可する
//! 期限付き署名付きURLを発行する。発行したURLはサーバー側で追跡しない。

use dropbox_types::{DirectoryOptions, SignUrlRequest};

use crate::config::AppState;
use crate::error::DropboxError;
use crate::session::SessionId;

/// 署名付きURLの有効期間（秒）
pub const UPLOAD_GRACE_SECS: i64 = 3600;

/// 署名付きURLで許可するメソッド
pub const UPLOAD_METHODS: [&str; 2] = ["OPTIONS", "PUT"];

/// セッションディレクトリのパス（`<root>/<session>`）
pub fn session_dir(root: &str, session: &SessionId) -> String {
    format!("{root}/{session}")
}

/// セッションディレクトリを用意する（CORSメタデータ付き）。
pub async fn prepare_session(
    state: &AppState,
    session: &SessionId,
) -> Result<String, DropboxError> {
    let dir = session_dir(&state.dropbox_root, session);
    state
        .storage
        .ensure_directory(&dir, &DirectoryOptions::cors())
        .await
        .map_err(|e| {
            tracing::warn!(session = %session, dir = %dir, error = %e, "セッションディレクトリの作成に失敗");
            e
        })?;
    Ok(dir)
}

/// アップロード用の署名付きURLを発行する。
///
/// 戻り値はStorage GatewayのベースURLを含む完全なURL。
pub async fn authorize_upload(
    state: &AppState,
    session: &SessionId,
    file: &str,
) -> Result<String, DropboxError> {
    let dir = prepare_session(state, session).await?;

    let request = SignUrlRequest {
        path: format!("{dir}/{file}"),
        methods: UPLOAD_METHODS.iter().map(|m| m.to_string()).collect(),
        expires: chrono::Utc::now().timestamp() + UPLOAD_GRACE_SECS,
    };

    let signed = state.storage.sign_url(&request).await.map_err(|e| {
        tracing::warn!(session = %session, path = %request.path, error = %e, "URL署名に失敗");
        e
    })?;

    tracing::info!(session = %session, path = %request.path, expires = request.expires, "署名付きURLを発行");
    Ok(format!("{}{}", state.storage_url, signed))
}
