//! # HTTP Signature 署名
//!
//! アカウントのP-256秘密鍵でリクエストと署名付きURLに署名する。
//! 署名はDER形式のECDSA署名をBase64エンコードしたもの。

use base64::Engine;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::DecodePrivateKey;

use crate::error::StorageError;

/// `authorization` ヘッダで使うアルゴリズム名
pub const AUTH_ALGORITHM: &str = "ecdsa-sha256";

/// 署名付きURLのクエリで使うアルゴリズム名
pub const URL_ALGORITHM: &str = "ECDSA-SHA256";

/// Base64エンジン（Standard）
pub(crate) fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

/// アカウント情報と秘密鍵の組。
pub struct MantaSigner {
    /// アカウント名
    user: String,
    /// 鍵のフィンガープリント
    key_id: String,
    signing_key: SigningKey,
}

impl std::fmt::Debug for MantaSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MantaSigner")
            .field("user", &self.user)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl MantaSigner {
    pub fn new(user: impl Into<String>, key_id: impl Into<String>, signing_key: SigningKey) -> Self {
        Self {
            user: user.into(),
            key_id: key_id.into(),
            signing_key,
        }
    }

    /// PEM形式の秘密鍵から構築する。
    ///
    /// SEC1（`EC PRIVATE KEY`）とPKCS#8（`PRIVATE KEY`）の両方を受け付ける。
    pub fn from_pem(
        user: impl Into<String>,
        key_id: impl Into<String>,
        pem: &str,
    ) -> Result<Self, StorageError> {
        let secret = match p256::SecretKey::from_sec1_pem(pem) {
            Ok(secret) => secret,
            Err(sec1_err) => p256::SecretKey::from_pkcs8_pem(pem).map_err(|pkcs8_err| {
                StorageError::Key(format!(
                    "P-256のSEC1/PKCS#8 PEMとして解釈できません (sec1: {sec1_err}, pkcs8: {pkcs8_err})"
                ))
            })?,
        };
        Ok(Self::new(user, key_id, SigningKey::from(secret)))
    }

    /// `keyId` に使う鍵のパス（`/<user>/keys/<fingerprint>`）
    pub fn key_path(&self) -> String {
        format!("/{}/keys/{}", self.user, self.key_id)
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        *self.signing_key.verifying_key()
    }

    /// 任意のバイト列に署名し、Base64エンコードしたDER署名を返す。
    pub fn sign(&self, data: &[u8]) -> String {
        let signature: Signature = self.signing_key.sign(data);
        b64().encode(signature.to_der().as_bytes())
    }

    /// `date` ヘッダ値に署名した `authorization` ヘッダ値を構築する。
    pub fn authorization(&self, date: &str) -> String {
        let signature = self.sign(format!("date: {date}").as_bytes());
        format!(
            "Signature keyId=\"{}\",algorithm=\"{}\",headers=\"date\",signature=\"{}\"",
            self.key_path(),
            AUTH_ALGORITHM,
            signature
        )
    }
}
