//! Encryption layer for datacast column values.
//!
//! Encrypted casts treat encryption as an opaque, reversible string
//! transform behind [`DataEncryptor`]. This crate supplies the default
//! implementation: ChaCha20-Poly1305 sealing with keys that are random or
//! derived from an application secret via Argon2id.

mod cipher;
mod encryptor;
mod error;
mod key;

pub use cipher::{NONCE_SIZE, SEAL_VERSION, SealedValue, TAG_SIZE, open, open_string, seal, seal_string};
pub use encryptor::{
    CipherEncryptor, DataEncryptor, EncryptorError, EncryptorResult, PassthroughEncryptor,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{ColumnKey, ENCODED_KEY_PREFIX, KEY_SIZE, KdfParams, SALT_SIZE, Salt};
