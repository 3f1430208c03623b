//! Abstract encryption interface used by encrypted codecs and casts.
//!
//! Consumers depend on `Arc<dyn DataEncryptor>` and never see raw keys.
//! [`CipherEncryptor`] is the production implementation; tests can use
//! [`PassthroughEncryptor`] when the ciphertext itself is irrelevant.

use crate::cipher;
use crate::error::CryptoError;
use crate::key::{ColumnKey, KdfParams, Salt};
use thiserror::Error;

/// Errors from the encryption layer.
#[derive(Debug, Error)]
pub enum EncryptorError {
    /// Plaintext could not be sealed.
    #[error("encryption failed: {0}")]
    Encryption(String),
    /// Ciphertext is malformed, tampered, or sealed under a foreign key.
    #[error("decryption failed: {0}")]
    Decryption(String),
}

impl From<CryptoError> for EncryptorError {
    fn from(err: CryptoError) -> Self {
        if err.is_decryption() {
            Self::Decryption(err.to_string())
        } else {
            Self::Encryption(err.to_string())
        }
    }
}

pub type EncryptorResult<T> = Result<T, EncryptorError>;

/// Reversible string transform applied to column text.
///
/// Implementations own the key material.
pub trait DataEncryptor: Send + Sync {
    /// Encrypt `plaintext`, returning opaque column text.
    fn encrypt(&self, plaintext: &str) -> EncryptorResult<String>;

    /// Decrypt text previously produced by [`DataEncryptor::encrypt`].
    fn decrypt(&self, ciphertext: &str) -> EncryptorResult<String>;
}

/// ChaCha20-Poly1305 encryptor with optional previous keys for rotation.
///
/// New values are always sealed with the current key. Opening tries the
/// current key first, then each previous key in order.
#[derive(Debug, Clone)]
pub struct CipherEncryptor {
    key: ColumnKey,
    previous_keys: Vec<ColumnKey>,
}

impl CipherEncryptor {
    pub fn new(key: ColumnKey) -> Self {
        Self {
            key,
            previous_keys: Vec::new(),
        }
    }

    /// Derives the key from an application secret.
    pub fn from_secret(secret: &str, salt: &Salt, params: &KdfParams) -> EncryptorResult<Self> {
        Ok(Self::new(ColumnKey::derive(secret, salt, params)?))
    }

    /// Keys that may still open values written before a rotation.
    pub fn with_previous_keys(mut self, keys: impl IntoIterator<Item = ColumnKey>) -> Self {
        self.previous_keys.extend(keys);
        self
    }
}

impl DataEncryptor for CipherEncryptor {
    fn encrypt(&self, plaintext: &str) -> EncryptorResult<String> {
        Ok(cipher::seal_string(&self.key, plaintext)?)
    }

    fn decrypt(&self, ciphertext: &str) -> EncryptorResult<String> {
        let sealed = cipher::SealedValue::from_base64(ciphertext)?;
        let mut last_err = None;
        for key in std::iter::once(&self.key).chain(&self.previous_keys) {
            match cipher::open(key, &sealed) {
                Ok(bytes) => {
                    return String::from_utf8(bytes)
                        .map_err(|e| EncryptorError::Decryption(format!("invalid UTF-8: {e}")));
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err
            .map(EncryptorError::from)
            .unwrap_or_else(|| EncryptorError::Decryption("no key available".to_string())))
    }
}

/// No-op encryptor for tests. Text passes through unchanged.
pub struct PassthroughEncryptor;

impl DataEncryptor for PassthroughEncryptor {
    fn encrypt(&self, plaintext: &str) -> EncryptorResult<String> {
        Ok(plaintext.to_string())
    }

    fn decrypt(&self, ciphertext: &str) -> EncryptorResult<String> {
        Ok(ciphertext.to_string())
    }
}
