//! Shared fixtures for cast tests.

#![allow(dead_code)]

use datacast_model::{DataObject, Validatable};
use datacast_morph::{BaseTypeDef, Codec, Subtype, TypeRegistry};
use datacast_types::Payload;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ABSTRACT: &str = "fakes::AbstractData";
pub const VARIANT: &str = "fakes::VariantData";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleData {
    pub string: String,
}

impl SimpleData {
    pub fn new(string: &str) -> Self {
        Self {
            string: string.to_string(),
        }
    }
}

impl Validatable for SimpleData {}

impl DataObject for SimpleData {
    const TYPE_NAME: &'static str = "fakes::SimpleData";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleDataWithDefaultValue {
    #[serde(default = "default_string")]
    pub string: String,
}

fn default_string() -> String {
    "default".to_string()
}

impl Validatable for SimpleDataWithDefaultValue {}

impl DataObject for SimpleDataWithDefaultValue {
    const TYPE_NAME: &'static str = "fakes::SimpleDataWithDefaultValue";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractDataA {
    pub a: String,
}

impl Validatable for AbstractDataA {}

impl DataObject for AbstractDataA {
    const TYPE_NAME: &'static str = "fakes::AbstractDataA";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractDataB {
    pub b: String,
}

impl Validatable for AbstractDataB {}

impl DataObject for AbstractDataB {
    const TYPE_NAME: &'static str = "fakes::AbstractDataB";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DummyBackedEnum {
    Foo,
    Boo,
}

/// Discriminated by its own `variant` property rather than a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDataA {
    pub a: String,
    #[serde(rename = "enum")]
    pub kind: DummyBackedEnum,
    pub variant: String,
}

impl VariantDataA {
    pub fn new(a: &str, kind: DummyBackedEnum) -> Self {
        Self {
            a: a.to_string(),
            kind,
            variant: "a".to_string(),
        }
    }
}

impl Validatable for VariantDataA {}

impl DataObject for VariantDataA {
    const TYPE_NAME: &'static str = "fakes::VariantDataA";
}

pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register::<SimpleData>()
        .unwrap()
        .register::<SimpleDataWithDefaultValue>()
        .unwrap()
        .register_subtypes(
            ABSTRACT,
            [Subtype::of::<AbstractDataA>(), Subtype::of::<AbstractDataB>()],
        )
        .unwrap()
        .define_base(BaseTypeDef::new(VARIANT).resolver(|payloads: &[&Payload]| {
            let variant = payloads
                .iter()
                .find_map(|payload| payload.get("variant"))
                .and_then(|variant| variant.as_str());
            match variant {
                Some("a") => Some(VariantDataA::TYPE_NAME),
                _ => None,
            }
        }))
        .unwrap()
        .register_subtypes(VARIANT, [Subtype::of::<VariantDataA>()])
        .unwrap();
    registry
}

pub fn codec() -> Codec {
    Codec::new(Arc::new(registry()))
}
