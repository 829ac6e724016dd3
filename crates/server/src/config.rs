//! # サーバー設定・共有状態
//!
//! コマンドライン引数（環境変数でも指定可）からの設定読み込みと、
//! ハンドラ間で共有する状態の定義。

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::body::Bytes;
use clap::builder::NonEmptyStringValueParser;
use dropbox_manta::{MantaClient, MantaSigner, StorageGateway};

use crate::error::ConfigError;

/// 起動時設定。必須値が欠けている場合は起動しない。
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "dropbox-server")]
#[command(about = "Browser-to-Manta upload demo using signed URLs", long_about = None)]
pub struct Config {
    /// Mantaアカウント名
    #[arg(long, env = "MANTA_USER", value_parser = NonEmptyStringValueParser::new())]
    pub manta_user: String,

    /// 鍵のフィンガープリント
    #[arg(long, env = "MANTA_KEY_ID", value_parser = NonEmptyStringValueParser::new())]
    pub manta_key_id: String,

    /// MantaのベースURL（例: https://us-east.manta.joyent.com）
    #[arg(long, env = "MANTA_URL", value_parser = parse_manta_url)]
    pub manta_url: String,

    /// P-256秘密鍵（PEM）のパス。未指定なら $HOME/.ssh/id_ecdsa
    #[arg(long, env = "MANTA_KEY_PATH")]
    pub manta_key_path: Option<PathBuf>,

    /// 待ち受けアドレス
    #[arg(long, env = "DROPBOX_LISTEN", default_value = "0.0.0.0:1234")]
    pub listen: SocketAddr,

    /// ランディングページのHTML
    #[arg(
        long,
        env = "DROPBOX_INDEX_HTML",
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/static/index.html")
    )]
    pub index_html: PathBuf,

    /// アップロード先ディレクトリ名（/<user>/stor/<dir>）
    #[arg(
        long,
        env = "DROPBOX_DIR",
        default_value = "cors_demo",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub dropbox_dir: String,
}

/// `MANTA_URL` の検証。http(s)でホストを持つURLのみ受け付け、末尾の `/` を除く。
fn parse_manta_url(value: &str) -> Result<String, String> {
    let url = reqwest::Url::parse(value).map_err(|e| format!("URLとして解釈できません: {e}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("http/httpsのURLである必要があります: {value}"));
    }
    if url.host_str().is_none() {
        return Err(format!("ホストがありません: {value}"));
    }
    Ok(value.trim_end_matches('/').to_string())
}

impl Config {
    /// 全セッションディレクトリの親（Dropbox root）
    pub fn dropbox_root(&self) -> String {
        format!("/{}/stor/{}", self.manta_user, self.dropbox_dir)
    }

    /// 秘密鍵のパス
    pub fn key_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.manta_key_path {
            return Ok(path.clone());
        }
        let home = std::env::var_os("HOME").ok_or(ConfigError::NoKeyPath)?;
        Ok(PathBuf::from(home).join(".ssh").join("id_ecdsa"))
    }

    /// 秘密鍵を読み込み署名者を構築する。
    pub fn load_signer(&self) -> Result<MantaSigner, ConfigError> {
        let path = self.key_path()?;
        let pem = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(MantaSigner::from_pem(&self.manta_user, &self.manta_key_id, &pem)?)
    }

    /// ランディングページを読み込む。起動時に一度だけ呼ぶ。
    pub fn load_index_html(&self) -> Result<Bytes, ConfigError> {
        std::fs::read(&self.index_html)
            .map(Bytes::from)
            .map_err(|source| ConfigError::Io {
                path: self.index_html.clone(),
                source,
            })
    }
}

/// ハンドラ間の共有状態。
pub struct AppState {
    /// Storage Gateway（Mantaクライアント、トレイトで抽象化）
    pub storage: Box<dyn StorageGateway>,
    /// Storage GatewayのベースURL。署名付きURLの前に付ける。
    pub storage_url: String,
    /// Dropbox root（例: `/alice/stor/cors_demo`）
    pub dropbox_root: String,
    /// 起動時に読み込んだランディングページ
    pub index_html: Bytes,
}

impl AppState {
    /// 設定から共有状態を構築する（鍵とHTMLの読み込みを含む）。
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let signer = config.load_signer()?;
        tracing::info!(key_id = %signer.key_path(), "署名鍵を読み込みました");

        let client = MantaClient::new(&config.manta_url, signer)?;
        let index_html = config.load_index_html()?;

        Ok(Self {
            storage: Box::new(client),
            storage_url: config.manta_url.clone(),
            dropbox_root: config.dropbox_root(),
            index_html,
        })
    }
}
