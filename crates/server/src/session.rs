//! # セッション識別子
//!
//! 訪問者ごとの不透明な識別子。サーバー側にセッションストアは持たず、
//! 毎リクエストでクッキーから復元する。
//!
//! クッキーヘッダは最後の `=` 以降をそのまま値として扱う。複数のクッキーを含む
//! ヘッダ（`a=1; name=2`）では最後のクッキーの値が使われるため、別名のクッキーが
//! 後ろにあると誤って解釈される。既知の制限としてそのまま残している。

use std::fmt;

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use rand::Rng;

/// セッションクッキー名
pub const SESSION_COOKIE: &str = "name";

/// 訪問者ごとのセッション識別子。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// 新しい識別子を発行する（[0, 65535] の一様乱数）。
    pub fn mint() -> Self {
        let value: u32 = rand::thread_rng().gen_range(0..=u32::from(u16::MAX));
        Self(value.to_string())
    }

    /// クッキーヘッダ値から識別子を取り出す。
    ///
    /// 最後の `=` 以降の部分文字列を検証なしで返す。`=` がなければヘッダ全体。
    /// 空文字列の場合は `None`。
    pub fn from_cookie_header(header: &str) -> Option<Self> {
        let value = match header.rsplit_once('=') {
            Some((_, value)) => value,
            None => header,
        };
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    /// リクエストヘッダから識別子を取り出す。
    ///
    /// `cookie` ヘッダが複数ある場合は `; ` で連結してから解釈する。
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let joined = headers
            .get_all(COOKIE)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join("; ");
        if joined.is_empty() {
            return None;
        }
        Self::from_cookie_header(&joined)
    }

    /// リクエストのクッキーから取り出し、なければ発行する。
    ///
    /// 2番目の値は新規発行したかどうか。
    pub fn resolve(headers: &HeaderMap) -> (Self, bool) {
        match Self::from_headers(headers) {
            Some(id) => (id, false),
            None => (Self::mint(), true),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `set-cookie` ヘッダ値
    pub fn set_cookie(&self) -> String {
        format!("{}={}", SESSION_COOKIE, self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_mint_in_range() {
        for _ in 0..1000 {
            let id = SessionId::mint();
            let n: u32 = id.as_str().parse().unwrap();
            assert!(n <= 65535);
        }
    }

    #[test]
    fn test_cookie_value_after_last_equals() {
        assert_eq!(
            SessionId::from_cookie_header("name=4242").unwrap().as_str(),
            "4242"
        );
        assert_eq!(
            SessionId::from_cookie_header("name=abc=def").unwrap().as_str(),
            "def"
        );
        // 値は検証しない
        assert_eq!(
            SessionId::from_cookie_header("name=../../x y").unwrap().as_str(),
            "../../x y"
        );
        // `=` がなければ全体
        assert_eq!(SessionId::from_cookie_header("bare").unwrap().as_str(), "bare");
        assert!(SessionId::from_cookie_header("name=").is_none());
        assert!(SessionId::from_cookie_header("").is_none());
    }

    /// 複数クッキーのヘッダは最後の値として解釈される（既知の制限）
    #[test]
    fn test_multi_cookie_header_uses_last_value() {
        let headers = headers_with_cookie("name=2; theme=dark");
        assert_eq!(SessionId::from_headers(&headers).unwrap().as_str(), "dark");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let headers = headers_with_cookie("name=31337");
        let (first, minted) = SessionId::resolve(&headers);
        let (second, _) = SessionId::resolve(&headers);
        assert!(!minted);
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "31337");
    }

    #[test]
    fn test_resolve_mints_without_cookie() {
        let (id, minted) = SessionId::resolve(&HeaderMap::new());
        assert!(minted);
        assert!(id.as_str().parse::<u32>().unwrap() <= 65535);
        assert_eq!(id.set_cookie(), format!("name={id}"));
    }
}
