//! # 署名付きURL
//!
//! ネットワーク通信なしで、指定パスに対する期限付きの署名付きURLを組み立てる。
//!
//! ## 署名対象
//! ```text
//! <METHODS>\n<host>\n<path>\n<query>
//! ```
//! `query` はキー順にソートしたパーセントエンコード済みの
//! `algorithm`, `expires`, `keyId`, `method`。

use dropbox_types::SignUrlRequest;

use crate::error::StorageError;
use crate::signer::{MantaSigner, URL_ALGORITHM};

/// パスをセグメント単位でパーセントエンコードする（`/` は保持）。
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// 署名付きURLのパス＋クエリ部分を生成する。
///
/// `host` はStorage GatewayのベースURLのホスト部（ポートがあれば `host:port`）。
pub fn presign_path(
    signer: &MantaSigner,
    host: &str,
    request: &SignUrlRequest,
) -> Result<String, StorageError> {
    if !request.path.starts_with('/') {
        return Err(StorageError::InvalidRequest(format!(
            "パスは '/' で始まる必要があります: {}",
            request.path
        )));
    }
    if request.methods.is_empty() {
        return Err(StorageError::InvalidRequest(
            "許可メソッドが指定されていません".to_string(),
        ));
    }

    let path = encode_path(&request.path);
    let methods = request.methods.join(",");

    // キー順: algorithm < expires < keyId < method
    let params = [
        ("algorithm", URL_ALGORITHM.to_string()),
        ("expires", request.expires.to_string()),
        ("keyId", signer.key_path()),
        ("method", methods.clone()),
    ];
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let line = format!("{methods}\n{host}\n{path}\n{query}");
    let signature = signer.sign(line.as_bytes());

    Ok(format!(
        "{path}?{query}&signature={}",
        urlencoding::encode(&signature)
    ))
}
