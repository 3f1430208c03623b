//! Shared fixtures for morph tests.

#![allow(dead_code)]

use datacast_model::{DataObject, Validatable, ValidationErrors};
use datacast_morph::{BaseTypeDef, Codec, Subtype, TypeRegistry};
use datacast_types::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const SHAPE: &str = "shapes::Shape";
pub const EVENT: &str = "events::Event";
pub const LONELY: &str = "solo::Lonely";

// ── Shapes ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub radius: i64,
}

impl Validatable for Circle {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.radius <= 0 {
            errors.add("radius", "must be positive");
        }
        errors.into_result()
    }
}

impl DataObject for Circle {
    const TYPE_NAME: &'static str = "shapes::Circle";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Square {
    pub side: i64,
}

impl Validatable for Square {}

impl DataObject for Square {
    const TYPE_NAME: &'static str = "shapes::Square";
}

/// Registered as a subtype but never given an alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: i64,
    pub b: i64,
    pub c: i64,
}

impl Validatable for Triangle {}

impl DataObject for Triangle {
    const TYPE_NAME: &'static str = "shapes::Triangle";
}

/// Concrete type with nested structure, not part of any base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub anchor: Point,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Validatable for Label {}

impl DataObject for Label {
    const TYPE_NAME: &'static str = "shapes::Label";
}

/// Has a field that collides with the default tag key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typed {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Validatable for Typed {}

impl DataObject for Typed {
    const TYPE_NAME: &'static str = "shapes::Typed";
}

/// Rejects every key it does not declare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrictCircle {
    pub radius: i64,
}

impl Validatable for StrictCircle {}

impl DataObject for StrictCircle {
    const TYPE_NAME: &'static str = "shapes::StrictCircle";
}

/// A shape whose fields are themselves Data objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    pub name: String,
    pub frame: Square,
    pub parts: Vec<Circle>,
    pub caption: Option<Label>,
}

impl Validatable for Composite {}

impl DataObject for Composite {
    const TYPE_NAME: &'static str = "shapes::Composite";
}

// ── Events ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub x: i64,
    pub y: i64,
}

impl Validatable for ClickEvent {}

impl DataObject for ClickEvent {
    const TYPE_NAME: &'static str = "events::ClickEvent";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
}

impl Validatable for KeyEvent {}

impl DataObject for KeyEvent {
    const TYPE_NAME: &'static str = "events::KeyEvent";
}

// ── Single subtype ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnlyChild {
    pub name: String,
}

impl Validatable for OnlyChild {}

impl DataObject for OnlyChild {
    const TYPE_NAME: &'static str = "solo::OnlyChild";
}

/// Routes resolver logs to the test output. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_test_writer()
        .try_init();
}

// ── Registries ───────────────────────────────────────────────────

/// `Shape` with `Circle` as `c`, `Square` as `s` and an unaliased
/// `Triangle`; plus `Label` as a standalone concrete type.
pub fn shape_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register_subtypes(
            SHAPE,
            [
                Subtype::of::<Circle>(),
                Subtype::of::<Square>(),
                Subtype::of::<Triangle>(),
            ],
        )
        .unwrap()
        .set_morph_map(SHAPE, [("c", Circle::TYPE_NAME), ("s", Square::TYPE_NAME)])
        .unwrap()
        .register::<Label>()
        .unwrap();
    registry
}

/// `Event` resolved by shape: a payload with `x` is a click, anything else
/// a key press.
pub fn event_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .define_base(BaseTypeDef::new(EVENT).resolver(|payloads: &[&Payload]| {
            let clicked = payloads.iter().any(|payload| payload.contains_key("x"));
            Some(if clicked {
                ClickEvent::TYPE_NAME
            } else {
                KeyEvent::TYPE_NAME
            })
        }))
        .unwrap()
        .register_subtypes(EVENT, [Subtype::of::<ClickEvent>(), Subtype::of::<KeyEvent>()])
        .unwrap();
    registry
}

pub fn lonely_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register_subtypes(LONELY, [Subtype::of::<OnlyChild>()])
        .unwrap();
    registry
}

pub fn codec(registry: TypeRegistry) -> Codec {
    Codec::new(Arc::new(registry))
}

pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture payload must be an object, got {other}"),
    }
}
