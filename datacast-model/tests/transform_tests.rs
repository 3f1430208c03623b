use datacast_model::{Data, DataObject, PartialTransform, Transformable, Validatable};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Song {
    title: String,
    artist: Artist,
    tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Artist {
    name: String,
    country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Tag {
    label: String,
    weight: u8,
}

impl Validatable for Song {}

impl DataObject for Song {
    const TYPE_NAME: &'static str = "fakes::Song";
}

fn song() -> Song {
    Song {
        title: "Never Gonna Give You Up".into(),
        artist: Artist {
            name: "Rick Astley".into(),
            country: "UK".into(),
        },
        tags: vec![
            Tag {
                label: "pop".into(),
                weight: 3,
            },
            Tag {
                label: "80s".into(),
                weight: 5,
            },
        ],
    }
}

#[test]
fn identity_transform_returns_everything() {
    let partial = PartialTransform::new();
    assert!(partial.is_identity());
    assert_eq!(
        song().transform_with(&partial).unwrap(),
        song().to_payload().unwrap()
    );
}

#[test]
fn only_top_level_fields() {
    let payload = song()
        .transform_with(&PartialTransform::new().only(["title"]))
        .unwrap();
    assert_eq!(Value::Object(payload), json!({"title": "Never Gonna Give You Up"}));
}

#[test]
fn only_nested_field_keeps_parent() {
    let payload = song()
        .transform_with(&PartialTransform::new().only(["title", "artist.name"]))
        .unwrap();
    assert_eq!(
        Value::Object(payload),
        json!({"title": "Never Gonna Give You Up", "artist": {"name": "Rick Astley"}})
    );
}

#[test]
fn only_reaches_into_arrays_of_objects() {
    let payload = song()
        .transform_with(&PartialTransform::new().only(["tags.label"]))
        .unwrap();
    assert_eq!(
        Value::Object(payload),
        json!({"tags": [{"label": "pop"}, {"label": "80s"}]})
    );
}

#[test]
fn except_removes_nested_field() {
    let payload = song()
        .transform_with(&PartialTransform::new().except(["artist.country", "tags"]))
        .unwrap();
    assert_eq!(
        Value::Object(payload),
        json!({"title": "Never Gonna Give You Up", "artist": {"name": "Rick Astley"}})
    );
}

#[test]
fn except_wins_over_only() {
    let payload = song()
        .transform_with(
            &PartialTransform::new()
                .only(["artist"])
                .except(["artist.country"]),
        )
        .unwrap();
    assert_eq!(Value::Object(payload), json!({"artist": {"name": "Rick Astley"}}));
}

#[test]
fn unknown_paths_are_ignored() {
    let payload = song()
        .transform_with(&PartialTransform::new().except(["nope", "artist.nope.deeper"]))
        .unwrap();
    assert_eq!(payload, song().to_payload().unwrap());
}

#[test]
fn transform_through_trait_object() {
    let data: Box<dyn Data> = Box::new(song());
    let payload = data
        .as_ref()
        .transform_with(&PartialTransform::new().only(["artist.country"]))
        .unwrap();
    assert_eq!(Value::Object(payload), json!({"artist": {"country": "UK"}}));
}

#[test]
fn to_json_renders_payload() {
    let data = Song {
        tags: vec![],
        ..song()
    };
    let json: Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
    assert_eq!(json["artist"]["name"], "Rick Astley");
    assert_eq!(json["tags"], json!([]));
}

#[test]
fn additional_values_are_appended_after_selection() {
    let payload = song()
        .transform_with(
            &PartialTransform::new()
                .only(["title"])
                .additional([("plays", json!(1_000_000)), ("explicit", json!(false))]),
        )
        .unwrap();
    assert_eq!(
        Value::Object(payload),
        json!({"title": "Never Gonna Give You Up", "plays": 1_000_000, "explicit": false})
    );
}

#[test]
fn additional_value_replaces_field_of_same_name() {
    let payload = song()
        .transform_with(
            &PartialTransform::new()
                .only(["title"])
                .additional([("title", json!("Together Forever"))]),
        )
        .unwrap();
    assert_eq!(Value::Object(payload), json!({"title": "Together Forever"}));
}

#[test]
fn wrap_nests_the_output() {
    let partial = PartialTransform::new().only(["artist.name"]).wrap("data");
    assert!(!partial.is_identity());
    let payload = song().transform_with(&partial).unwrap();
    assert_eq!(
        Value::Object(payload),
        json!({"data": {"artist": {"name": "Rick Astley"}}})
    );
}

#[test]
fn wrap_includes_additional_values() {
    let payload = song()
        .transform_with(
            &PartialTransform::new()
                .except(["artist", "tags"])
                .additional([("rank", json!(1))])
                .wrap("song"),
        )
        .unwrap();
    assert_eq!(
        Value::Object(payload),
        json!({"song": {"title": "Never Gonna Give You Up", "rank": 1}})
    );
}
