//! Column keys.
//!
//! A [`ColumnKey`] comes from one of three places: fresh randomness, an
//! encoded key kept in configuration (`base64:...`), or an application
//! secret stretched with Argon2id.

use crate::error::{CryptoError, CryptoResult};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// ChaCha20 key length.
pub const KEY_SIZE: usize = 32;

pub const SALT_SIZE: usize = 16;

/// Prefix accepted (and written) for keys stored as text.
pub const ENCODED_KEY_PREFIX: &str = "base64:";

/// Key used to seal column values. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ColumnKey([u8; KEY_SIZE]);

impl ColumnKey {
    pub fn random() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        <[u8; KEY_SIZE]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            })
    }

    /// Parses a key kept as text, with or without the `base64:` prefix.
    pub fn from_encoded(encoded: &str) -> CryptoResult<Self> {
        let body = encoded
            .trim()
            .strip_prefix(ENCODED_KEY_PREFIX)
            .unwrap_or(encoded.trim());
        let mut bytes = STANDARD
            .decode(body)
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Text form accepted by [`ColumnKey::from_encoded`].
    pub fn to_encoded(&self) -> String {
        format!("{ENCODED_KEY_PREFIX}{}", STANDARD.encode(&self.0))
    }

    /// Stretches an application secret into a key with Argon2id.
    ///
    /// The same secret, salt and params always give the same key.
    pub fn derive(secret: &str, salt: &Salt, params: &KdfParams) -> CryptoResult<Self> {
        let params = Params::new(
            params.memory_cost,
            params.time_cost,
            params.parallelism,
            Some(KEY_SIZE),
        )
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

        let mut bytes = [0u8; KEY_SIZE];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password_into(secret.as_bytes(), salt.as_bytes(), &mut bytes)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ColumnKey([REDACTED])")
    }
}

/// Argon2id salt. Not secret, but must be stored next to the derived data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Argon2id cost parameters.
///
/// Missing fields in configuration fall back to the defaults (OWASP
/// minimums for Argon2id).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    /// KiB.
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}
