//! Column casts: live Data values to column text and back.

use crate::error::{StorageError, StorageResult};
use datacast_crypto::DataEncryptor;
use datacast_model::{Data, DataObject};
use datacast_morph::{Codec, Encodable, EncryptedCodec, MorphError};
use datacast_types::{Payload, TypeName, json_kind};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A value assigned to or read from a cast column.
#[derive(Debug, Clone, PartialEq)]
pub enum CastValue {
    Null,
    /// Already-primitive JSON, stored without going through the codec.
    Raw(Value),
    One(Box<dyn Data>),
    Many(Vec<Box<dyn Data>>),
}

impl CastValue {
    pub fn one<T: DataObject>(data: T) -> Self {
        Self::One(Box::new(data))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_one(&self) -> Option<&dyn Data> {
        match self {
            Self::One(data) => Some(data.as_ref()),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Box<dyn Data>]> {
        match self {
            Self::Many(items) => Some(items),
            _ => None,
        }
    }

    /// The single instance as `T`, if that is what this holds.
    pub fn downcast_ref<T: Data>(&self) -> Option<&T> {
        self.as_one()?.downcast_ref::<T>()
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Raw(_) => "raw",
            Self::One(_) => "one",
            Self::Many(_) => "many",
        }
    }
}

impl From<Option<Box<dyn Data>>> for CastValue {
    fn from(value: Option<Box<dyn Data>>) -> Self {
        value.map_or(Self::Null, Self::One)
    }
}

impl From<Vec<Box<dyn Data>>> for CastValue {
    fn from(items: Vec<Box<dyn Data>>) -> Self {
        Self::Many(items)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cardinality {
    One,
    Many,
}

/// Cast configuration for one column.
///
/// ```ignore
/// let cast = ColumnCast::new(codec, "shapes::Shape")
///     .collection()
///     .encrypted(encryptor);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnCast {
    codec: Codec,
    declared: TypeName,
    cardinality: Cardinality,
    encrypted: Option<EncryptedCodec>,
    default_on_null: bool,
}

impl ColumnCast {
    pub fn new(codec: Codec, declared: impl Into<TypeName>) -> Self {
        Self {
            codec,
            declared: declared.into(),
            cardinality: Cardinality::One,
            encrypted: None,
            default_on_null: false,
        }
    }

    /// The column holds an ordered collection of instances.
    pub fn collection(mut self) -> Self {
        self.cardinality = Cardinality::Many;
        self
    }

    /// Column text is encrypted with `encryptor`.
    pub fn encrypted(mut self, encryptor: Arc<dyn DataEncryptor>) -> Self {
        self.encrypted = Some(EncryptedCodec::new(self.codec.clone(), encryptor));
        self
    }

    /// A null column reads as an instance hydrated from an empty payload
    /// (an empty collection for collection casts) instead of null.
    pub fn default_on_null(mut self) -> Self {
        self.default_on_null = true;
        self
    }

    pub fn declared(&self) -> &TypeName {
        &self.declared
    }

    pub fn is_collection(&self) -> bool {
        self.cardinality == Cardinality::Many
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted.is_some()
    }

    /// Converts a value into column text. Null stays null.
    pub fn set(&self, value: &CastValue) -> StorageResult<Option<String>> {
        let declared = self.declared.as_str();
        let json = match (value, self.cardinality) {
            (CastValue::Null, _) => return Ok(None),
            (CastValue::Raw(raw), cardinality) => {
                self.check_raw(raw, cardinality)?;
                raw.clone()
            }
            (CastValue::One(data), Cardinality::One) => {
                self.codec.encode_value(declared, Encodable::One(data.as_ref()))?
            }
            (CastValue::Many(items), Cardinality::Many) => {
                self.codec.encode_value(declared, Encodable::Many(items))?
            }
            (other, _) => {
                return Err(StorageError::InvalidData(format!(
                    "cannot store a {} value in a {} cast of {declared}",
                    other.kind(),
                    self.describe()
                )));
            }
        };
        debug!(declared, kind = value.kind(), encrypted = self.is_encrypted(), "writing cast column");
        let text = match &self.encrypted {
            Some(encrypted) => encrypted.seal(&json)?,
            None => serde_json::to_string(&json)?,
        };
        Ok(Some(text))
    }

    /// Converts column text back into a value.
    pub fn get(&self, stored: Option<&str>) -> StorageResult<CastValue> {
        let declared = self.declared.as_str();
        let Some(stored) = stored else {
            return self.null_value();
        };
        let json = match &self.encrypted {
            Some(encrypted) => encrypted.open(stored).map_err(|err| match err {
                MorphError::Serialization(e) => StorageError::Serialization(e),
                other => StorageError::from(other),
            })?,
            None => serde_json::from_str(stored)?,
        };
        debug!(declared, encrypted = self.is_encrypted(), "reading cast column");
        Ok(match self.cardinality {
            Cardinality::One => CastValue::One(self.codec.decode_one_value(declared, json)?),
            Cardinality::Many => CastValue::Many(self.codec.decode_many_value(declared, json)?),
        })
    }

    fn null_value(&self) -> StorageResult<CastValue> {
        if !self.default_on_null {
            return Ok(CastValue::Null);
        }
        Ok(match self.cardinality {
            Cardinality::One => {
                CastValue::One(self.codec.decode(self.declared.as_str(), &Payload::new())?)
            }
            Cardinality::Many => CastValue::Many(Vec::new()),
        })
    }

    fn check_raw(&self, raw: &Value, cardinality: Cardinality) -> StorageResult<()> {
        let fits = match cardinality {
            Cardinality::One => raw.is_object(),
            Cardinality::Many => raw.is_array(),
        };
        if fits {
            return Ok(());
        }
        Err(StorageError::InvalidData(format!(
            "raw {} does not fit a {} cast of {}",
            json_kind(raw),
            self.describe(),
            self.declared
        )))
    }

    fn describe(&self) -> &'static str {
        match self.cardinality {
            Cardinality::One => "single",
            Cardinality::Many => "collection",
        }
    }
}
