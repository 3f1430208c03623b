//! Error types for the encryption layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors from key handling and sealing.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key, tampered or foreign data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Sealed value carries a format version we cannot open.
    #[error("decryption failed: unsupported seal version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Configured key text is not base64.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),
}

impl CryptoError {
    /// True for every variant that means "this ciphertext cannot be opened".
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_) | Self::UnsupportedVersion(_))
    }
}
