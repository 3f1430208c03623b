//! Codec that stores payloads as encrypted text.
//!
//! Column text is `encrypt(json)`. Absent values stay absent in both
//! directions and never reach the encryptor.

use crate::codec::{Codec, Encodable};
use crate::error::{MorphError, MorphResult};
use datacast_crypto::DataEncryptor;
use datacast_model::Data;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// [`Codec`] wrapped with a [`DataEncryptor`].
#[derive(Clone)]
pub struct EncryptedCodec {
    codec: Codec,
    encryptor: Arc<dyn DataEncryptor>,
}

impl EncryptedCodec {
    pub fn new(codec: Codec, encryptor: Arc<dyn DataEncryptor>) -> Self {
        Self { codec, encryptor }
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Encodes then encrypts. `None` in, `None` out.
    pub fn encode(&self, declared: &str, instance: Option<&dyn Data>) -> MorphResult<Option<String>> {
        instance
            .map(|instance| {
                let value = self.codec.encode_value(declared, Encodable::One(instance))?;
                self.seal(&value)
            })
            .transpose()
    }

    /// Decrypts then decodes. `None` in, `None` out.
    pub fn decode(&self, declared: &str, stored: Option<&str>) -> MorphResult<Option<Box<dyn Data>>> {
        stored
            .map(|stored| {
                let value = self.open(stored)?;
                self.codec.decode_one_value(declared, value)
            })
            .transpose()
    }

    /// Encodes the collection as one JSON array, then encrypts it.
    pub fn encode_many(
        &self,
        declared: &str,
        items: Option<&[Box<dyn Data>]>,
    ) -> MorphResult<Option<String>> {
        items
            .map(|items| {
                let value = self.codec.encode_value(declared, Encodable::Many(items))?;
                self.seal(&value)
            })
            .transpose()
    }

    pub fn decode_many(
        &self,
        declared: &str,
        stored: Option<&str>,
    ) -> MorphResult<Option<Vec<Box<dyn Data>>>> {
        stored
            .map(|stored| {
                let value = self.open(stored)?;
                self.codec.decode_many_value(declared, value)
            })
            .transpose()
    }

    /// Serializes a JSON value and encrypts the text.
    pub fn seal(&self, value: &Value) -> MorphResult<String> {
        let json = serde_json::to_string(value)?;
        Ok(self.encryptor.encrypt(&json)?)
    }

    /// Decrypts column text and parses the JSON inside.
    ///
    /// Only the decryption step yields [`MorphError::Decryption`]. Authentic
    /// plaintext that is not JSON is a [`MorphError::Serialization`] error,
    /// the same as unencrypted text would be.
    pub fn open(&self, stored: &str) -> MorphResult<Value> {
        let json = self.encryptor.decrypt(stored).map_err(|e| {
            warn!(error = %e, "failed to decrypt stored value");
            MorphError::from(e)
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl fmt::Debug for EncryptedCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedCodec")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
