//! Column value sealing using ChaCha20-Poly1305.
//!
//! A sealed value is `base64(version || nonce || ciphertext+tag)`. The
//! version byte lets us reject foreign blobs before touching the AEAD.

use crate::error::{CryptoError, CryptoResult};
use crate::key::ColumnKey;
use base64::{Engine, engine::general_purpose::STANDARD};
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};
use rand::RngCore;
use rand::rngs::OsRng;

/// ChaCha20-Poly1305 nonce length.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// Format version written as the first byte of every sealed value.
pub const SEAL_VERSION: u8 = 1;

const HEADER_SIZE: usize = 1 + NONCE_SIZE;

/// Encrypted bytes together with the nonce needed to open them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedValue {
    /// Fresh for every seal.
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext followed by the tag.
    pub ciphertext: Vec<u8>,
}

impl SealedValue {
    /// Total size of the binary encoding, header included.
    pub fn len(&self) -> usize {
        HEADER_SIZE + self.ciphertext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }

    /// Encodes to base64 text suitable for a database column.
    pub fn to_base64(&self) -> String {
        let mut bytes = Vec::with_capacity(self.len());
        bytes.push(SEAL_VERSION);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        STANDARD.encode(&bytes)
    }

    /// Decodes column text produced by [`SealedValue::to_base64`].
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::Decryption(format!("invalid base64: {e}")))?;

        if bytes.len() < HEADER_SIZE + TAG_SIZE {
            return Err(CryptoError::Decryption("data too short".to_string()));
        }
        if bytes[0] != SEAL_VERSION {
            return Err(CryptoError::UnsupportedVersion(bytes[0]));
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[1..HEADER_SIZE]);
        let ciphertext = bytes[HEADER_SIZE..].to_vec();

        Ok(Self { nonce, ciphertext })
    }
}

/// Encrypts plaintext under `key` with a fresh random nonce.
pub fn seal(key: &ColumnKey, plaintext: &[u8]) -> CryptoResult<SealedValue> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok(SealedValue { nonce, ciphertext })
}

/// Decrypts a sealed value. Fails on a wrong key or tampered bytes.
pub fn open(key: &ColumnKey, sealed: &SealedValue) -> CryptoResult<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(&sealed.nonce);

    cipher.decrypt(nonce, sealed.ciphertext.as_ref()).map_err(|_| {
        CryptoError::Decryption("authentication failed (wrong key or tampered data)".to_string())
    })
}

/// Seals a UTF-8 string and returns the base64 column text.
pub fn seal_string(key: &ColumnKey, plaintext: &str) -> CryptoResult<String> {
    Ok(seal(key, plaintext.as_bytes())?.to_base64())
}

/// Opens base64 column text back into a string.
pub fn open_string(key: &ColumnKey, encoded: &str) -> CryptoResult<String> {
    let sealed = SealedValue::from_base64(encoded)?;
    let plaintext = open(key, &sealed)?;
    String::from_utf8(plaintext).map_err(|e| CryptoError::Decryption(format!("invalid UTF-8: {e}")))
}
