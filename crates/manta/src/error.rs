//! # Storage Gateway エラー型

/// Storage Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// HTTP送信失敗（接続不可、TLS失敗等）
    #[error("Storage Gatewayへのリクエストに失敗")]
    Request(#[from] reqwest::Error),
    /// Storage Gatewayがエラーを返した
    #[error("Storage GatewayがHTTP {status}を返しました: {code}: {message}")]
    Api {
        /// HTTPステータスコード
        status: u16,
        /// エラーコード（例: `DirectoryDoesNotExist`）
        code: String,
        /// エラーメッセージ
        message: String,
    },
    /// 秘密鍵の読み込み・パース失敗
    #[error("秘密鍵の読み込みに失敗: {0}")]
    Key(String),
    /// 不正なパス・URL・リクエスト
    #[error("不正なリクエスト: {0}")]
    InvalidRequest(String),
}

impl StorageError {
    /// 親ディレクトリが存在しないために失敗したか。
    pub fn is_missing_parent(&self) -> bool {
        matches!(self, StorageError::Api { code, .. } if code == "DirectoryDoesNotExist")
    }
}
