//! Payload codec: Data instances to tagged payloads and back.

use crate::error::{MorphError, MorphResult};
use crate::registry::TypeRegistry;
use crate::resolver::{MorphResolver, Resolution, ResolvedBy};
use datacast_model::{Data, DataObject};
use datacast_types::{Payload, TypeName, into_payload, json_kind};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

/// Encodes and decodes Data objects against a declared type.
///
/// The declared type is either a registered concrete type or a base type.
/// Only base types get a tag: a concrete declaration already says what to
/// hydrate.
#[derive(Debug, Clone)]
pub struct Codec {
    registry: Arc<TypeRegistry>,
}

impl Codec {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> MorphResolver<'_> {
        MorphResolver::new(&self.registry)
    }

    /// Extracts `instance`, adding the tag when `declared` is a base type.
    pub fn encode(&self, declared: &str, instance: &dyn Data) -> MorphResult<Payload> {
        let actual = instance.type_name();
        let mut payload = instance.extract()?;

        if let Some(entry) = self.registry.base(declared) {
            if !entry.has_subtype(actual.as_str()) {
                return Err(MorphError::configuration(format!(
                    "{actual} is not a registered subtype of {declared}"
                )));
            }
            if entry.def().writes_tag() {
                let tag_key = entry.def().key();
                if payload.contains_key(tag_key) {
                    return Err(MorphError::configuration(format!(
                        "{actual} has a field named `{tag_key}`, which is the tag key of {declared}"
                    )));
                }
                let tag = self.registry.tag_for(declared, actual.as_str())?;
                debug!(base = declared, subtype = %actual, tag = %tag, "tagged payload");
                payload.insert(tag_key.to_string(), Value::String(tag));
            }
            return Ok(payload);
        }

        self.expect_concrete(declared, &actual)?;
        Ok(payload)
    }

    /// Hydrates a payload as `declared`, resolving the subtype for bases.
    pub fn decode(&self, declared: &str, payload: &Payload) -> MorphResult<Box<dyn Data>> {
        if self.registry.is_base(declared) {
            let resolution = self.resolver().resolve(declared, &[payload])?;
            return self.hydrate_resolved(declared, &resolution, payload);
        }
        let subtype = self.registry.subtype(declared).ok_or_else(|| unknown_type(declared))?;
        Ok(subtype.hydrate(payload)?)
    }

    /// Resolves over several payloads at once and hydrates their merge.
    ///
    /// Keys in later payloads override earlier ones. The resolver sees every
    /// payload, the tag is read from the first.
    pub fn decode_merged(&self, declared: &str, payloads: &[Payload]) -> MorphResult<Box<dyn Data>> {
        let mut merged = Payload::new();
        for payload in payloads {
            merged.extend(payload.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if self.registry.is_base(declared) {
            let refs: Vec<&Payload> = payloads.iter().collect();
            let resolution = self.resolver().resolve(declared, &refs)?;
            return self.hydrate_resolved(declared, &resolution, &merged);
        }
        self.decode(declared, &merged)
    }

    /// [`Codec::decode`] followed by the type's validation rules.
    pub fn decode_validated(&self, declared: &str, payload: &Payload) -> MorphResult<Box<dyn Data>> {
        let data = self.decode(declared, payload)?;
        data.validate_data()?;
        Ok(data)
    }

    /// Decodes and downcasts to a concrete Rust type.
    pub fn decode_as<T: DataObject>(&self, declared: &str, payload: &Payload) -> MorphResult<T> {
        let data = self.decode(declared, payload)?;
        data.downcast_ref::<T>().cloned().ok_or_else(|| {
            MorphError::configuration(format!(
                "{declared} decoded to {}, not {}",
                data.type_name(),
                T::TYPE_NAME
            ))
        })
    }

    /// Encodes each element, preserving order.
    pub fn encode_many(&self, declared: &str, items: &[Box<dyn Data>]) -> MorphResult<Vec<Payload>> {
        items
            .iter()
            .map(|item| self.encode(declared, item.as_ref()))
            .collect()
    }

    /// Decodes each element, preserving order. Errors carry the index.
    pub fn decode_many(&self, declared: &str, payloads: &[Payload]) -> MorphResult<Vec<Box<dyn Data>>> {
        payloads
            .iter()
            .enumerate()
            .map(|(index, payload)| {
                self.decode(declared, payload)
                    .map_err(|e| e.within(&format!("[{index}]")))
            })
            .collect()
    }

    /// Encodes to a JSON value: an object, or an array for collections.
    pub fn encode_value(&self, declared: &str, value: Encodable<'_>) -> MorphResult<Value> {
        Ok(match value {
            Encodable::One(item) => Value::Object(self.encode(declared, item)?),
            Encodable::Many(items) => Value::Array(
                self.encode_many(declared, items)?
                    .into_iter()
                    .map(Value::Object)
                    .collect(),
            ),
        })
    }

    /// Decodes a JSON object as one instance.
    pub fn decode_one_value(&self, declared: &str, value: Value) -> MorphResult<Box<dyn Data>> {
        let payload = into_payload(value).map_err(|e| payload_error(declared, e))?;
        self.decode(declared, &payload)
    }

    /// Decodes a JSON array as a collection.
    pub fn decode_many_value(&self, declared: &str, value: Value) -> MorphResult<Vec<Box<dyn Data>>> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(MorphError::Hydration {
                    type_name: TypeName::new(declared),
                    path: None,
                    message: format!("expected a JSON array, found {}", json_kind(&other)),
                });
            }
        };
        let payloads = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                into_payload(item).map_err(|e| payload_error(declared, e).within(&format!("[{index}]")))
            })
            .collect::<MorphResult<Vec<_>>>()?;
        self.decode_many(declared, &payloads)
    }

    /// Hydrates the resolved subtype from the payload minus the base's tag.
    ///
    /// The tag belongs to the base, not to the subtype's fields, so it is
    /// dropped whenever it named the subtype or the base writes tags.
    fn hydrate_resolved(
        &self,
        declared: &str,
        resolution: &Resolution<'_>,
        payload: &Payload,
    ) -> MorphResult<Box<dyn Data>> {
        let def = self.registry.base_entry(declared)?.def();
        let by_tag = matches!(
            resolution.resolved_by,
            ResolvedBy::Alias | ResolvedBy::Identifier
        );
        let payload = if (by_tag || def.writes_tag()) && payload.contains_key(def.key()) {
            let mut untagged = payload.clone();
            untagged.remove(def.key());
            Cow::Owned(untagged)
        } else {
            Cow::Borrowed(payload)
        };
        Ok(resolution.subtype.hydrate(&payload)?)
    }

    fn expect_concrete(&self, declared: &str, actual: &TypeName) -> MorphResult<()> {
        if self.registry.subtype(declared).is_none() {
            return Err(unknown_type(declared));
        }
        if declared != actual.as_str() {
            return Err(MorphError::configuration(format!(
                "cannot encode {actual} as {declared}"
            )));
        }
        Ok(())
    }
}

/// What to encode: a single instance or an ordered collection.
#[derive(Debug, Clone, Copy)]
pub enum Encodable<'a> {
    One(&'a dyn Data),
    Many(&'a [Box<dyn Data>]),
}

fn unknown_type(declared: &str) -> MorphError {
    MorphError::configuration(format!("{declared} is not a registered data type"))
}

fn payload_error(declared: &str, err: datacast_types::Error) -> MorphError {
    MorphError::Hydration {
        type_name: TypeName::new(declared),
        path: None,
        message: err.to_string(),
    }
}
