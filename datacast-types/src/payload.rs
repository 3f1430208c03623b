//! Serialized payloads: string-keyed JSON mappings.

use crate::{Error, Result};
use serde_json::{Map, Value};

/// Reserved key holding the morph tag when a base type does not override it.
pub const DEFAULT_TAG_KEY: &str = "type";

/// A string-keyed mapping of property names to JSON values.
pub type Payload = Map<String, Value>;

/// Converts a JSON value into a payload, failing if it is not an object.
pub fn into_payload(value: Value) -> Result<Payload> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::NotAnObject(json_kind(&other))),
    }
}

/// Short name of a JSON value's kind, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
