//! Transform options: shaping the mapping a Data object transforms into.
//!
//! Steps run in a fixed order:
//! 1. `only` keeps the listed paths
//! 2. `except` drops paths, so it always wins over `only`
//! 3. `additional` appends key/values, replacing fields of the same name
//! 4. `wrap` nests the result under a single key
//!
//! Paths are dotted (`"owner.address.city"`).

use crate::data::Data;
use crate::error::ModelResult;
use datacast_types::Payload;
use serde_json::Value;

/// Options applied when transforming a Data object to a mapping.
///
/// Passed explicitly to [`Transformable::transform_with`]; instances carry no
/// transform context of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialTransform {
    only: Vec<String>,
    except: Vec<String>,
    additional: Payload,
    wrap: Option<String>,
}

impl PartialTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only these paths (and the objects containing them).
    pub fn only<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Drops these paths.
    pub fn except<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Appends computed key/values to the output.
    pub fn additional<I, K>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.additional
            .extend(values.into_iter().map(|(key, value)| (key.into(), value)));
        self
    }

    /// Nests the output under `key`, e.g. `{"data": {...}}`.
    pub fn wrap(mut self, key: impl Into<String>) -> Self {
        self.wrap = Some(key.into());
        self
    }

    pub fn is_identity(&self) -> bool {
        self.only.is_empty()
            && self.except.is_empty()
            && self.additional.is_empty()
            && self.wrap.is_none()
    }

    /// Applies the options to a payload in place.
    pub fn apply(&self, payload: &mut Payload) {
        if !self.only.is_empty() {
            let paths: Vec<Vec<&str>> = self.only.iter().map(|p| p.split('.').collect()).collect();
            retain_paths(payload, &paths);
        }
        for path in &self.except {
            let segments: Vec<&str> = path.split('.').collect();
            remove_path(payload, &segments);
        }
        payload.extend(self.additional.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(key) = &self.wrap {
            let inner = std::mem::take(payload);
            payload.insert(key.clone(), Value::Object(inner));
        }
    }
}

fn retain_paths(payload: &mut Payload, paths: &[Vec<&str>]) {
    payload.retain(|key, value| {
        let below: Vec<Vec<&str>> = paths
            .iter()
            .filter(|p| p.first() == Some(&key.as_str()))
            .map(|p| p[1..].to_vec())
            .collect();
        if below.is_empty() {
            return false;
        }
        // A bare key keeps the whole subtree.
        if below.iter().any(Vec::is_empty) {
            return true;
        }
        match value {
            Value::Object(nested) => {
                retain_paths(nested, &below);
                true
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    if let Value::Object(nested) = item {
                        retain_paths(nested, &below);
                    }
                }
                true
            }
            _ => true,
        }
    });
}

fn remove_path(payload: &mut Payload, segments: &[&str]) {
    match segments {
        [] => {}
        [last] => {
            payload.remove(*last);
        }
        [head, rest @ ..] => match payload.get_mut(*head) {
            Some(Value::Object(nested)) => remove_path(nested, rest),
            Some(Value::Array(items)) => {
                for item in items.iter_mut() {
                    if let Value::Object(nested) = item {
                        remove_path(nested, rest);
                    }
                }
            }
            _ => {}
        },
    }
}

/// Transformation of a Data object back into plain mappings or JSON.
///
/// Implemented for every [`Data`] type, including `dyn Data`.
pub trait Transformable {
    fn to_payload(&self) -> ModelResult<Payload>;

    fn transform_with(&self, partial: &PartialTransform) -> ModelResult<Payload> {
        let mut payload = self.to_payload()?;
        partial.apply(&mut payload);
        Ok(payload)
    }

    fn to_json(&self) -> ModelResult<String> {
        // A Payload always serializes.
        Ok(Value::Object(self.to_payload()?).to_string())
    }
}

impl<T: Data + ?Sized> Transformable for T {
    fn to_payload(&self) -> ModelResult<Payload> {
        self.extract()
    }
}
