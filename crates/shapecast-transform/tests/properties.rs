use chrono::{DateTime, Utc};
use proptest::prelude::*;
use serde_json::{json, Value as Json};
use shapecast_schema::{SchemaNode, SchemaRegistry};
use shapecast_transform::{decode, encode, TransformError, Transformer, Value};

const PROFILE_DEFINITIONS: &str = r#"{
    "Profile": {"object": {"fields": [
        {"external": "user_name", "internal": "name", "type": "string"},
        {"external": "signed_up", "internal": "signedUp", "type": "date"},
        {"external": "last_seen", "internal": "lastSeen", "type": {"union": ["absent", "date"]}},
        {"external": "kind", "type": {"enum": ["admin", "member"]}},
        {"external": "tags", "type": {"array": "string"}}
    ], "additional": false}},
    "Choice": {"union": [{"enum": ["auto"]}, "string"]},
    "Renamed": {"union": [
        {"object": {"fields": [{"external": "a", "internal": "alpha", "type": "string"}], "additional": false}},
        {"object": {"fields": [{"external": "a", "internal": "beta", "type": "string"}], "additional": false}}
    ]}
}"#;

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_embedded(&[PROFILE_DEFINITIONS]).unwrap()
}

fn json_value() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9_ -]{0,24}".prop_map(Json::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Json::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|m| Json::Object(m.into_iter().collect())),
        ]
    })
}

fn profile() -> impl Strategy<Value = Json> {
    (
        "[A-Za-z ]{1,20}",
        0i64..4_102_444_800_000,
        proptest::option::of(0i64..4_102_444_800_000),
        prop_oneof![Just("admin"), Just("member")],
        prop::collection::vec("[a-z]{1,6}", 0..4),
    )
        .prop_map(|(name, signed_up, last_seen, kind, tags)| {
            let mut profile = json!({
                "user_name": name,
                "signed_up": canonical(signed_up),
                "kind": kind,
                "tags": tags,
            });
            if let Some(seen) = last_seen {
                profile["last_seen"] = json!(canonical(seen));
            }
            profile
        })
}

fn canonical(millis: i64) -> String {
    shapecast_transform::render_date(&DateTime::<Utc>::from_timestamp_millis(millis).unwrap())
}

proptest! {
    /// An `any` schema accepts every JSON value and returns it untouched.
    #[test]
    fn any_is_identity(raw in json_value()) {
        let registry = SchemaRegistry::builder().build().unwrap();
        let engine = Transformer::new(&registry);
        let decoded = engine.decode(&Value::from(&raw), &SchemaNode::any()).unwrap();
        prop_assert_eq!(decoded.to_json(), raw);
    }

    /// Encoding a decoded profile reproduces the external document.
    #[test]
    fn profile_round_trips(raw in profile()) {
        let registry = registry();
        let internal = decode(&registry, &raw, "Profile").unwrap();
        prop_assert!(internal.get("signedUp").and_then(Value::as_date).is_some());
        prop_assert!(internal.get("user_name").is_none());

        let external = encode(&registry, &internal, "Profile").unwrap();
        prop_assert_eq!(external, raw);
    }

    /// Strings that are not one of the enum members fall through to the
    /// plain string member and come back unchanged.
    #[test]
    fn union_falls_back_to_later_members(text in "[a-z]{1,10}") {
        let registry = registry();
        let decoded = decode(&registry, &json!(text.as_str()), "Choice").unwrap();
        prop_assert_eq!(decoded, Value::from(text.as_str()));
    }
}

#[test]
fn union_order_picks_first_matching_rename() {
    let registry = registry();
    let decoded = decode(&registry, &json!({"a": "x"}), "Renamed").unwrap();
    assert_eq!(decoded.to_json(), json!({"alpha": "x"}));
}

#[test]
fn additional_properties_are_rejected_by_name() {
    let registry = registry();
    let raw = json!({
        "user_name": "Ada",
        "signed_up": "2024-01-01T00:00:00Z",
        "kind": "admin",
        "tags": [],
        "shoe_size": 9
    });

    let err = decode(&registry, &raw, "Profile").unwrap_err();
    let validation = err.as_validation().unwrap();
    assert_eq!(validation.key.as_deref(), Some("shoe_size"));
    assert_eq!(validation.parent.as_deref(), Some("Profile"));
    assert_eq!(validation.expected, "never");
}

#[test]
fn date_nodes_accept_null_and_dates_but_not_garbage() {
    let registry = SchemaRegistry::builder().build().unwrap();
    let engine = Transformer::new(&registry);
    let date = SchemaNode::date();

    assert_eq!(engine.decode(&Value::Null, &date).unwrap(), Value::Null);
    assert!(engine
        .decode(&Value::from("2024-01-01T00:00:00Z"), &date)
        .unwrap()
        .as_date()
        .is_some());

    let err = engine.decode(&Value::from("not-a-date"), &date).unwrap_err();
    let validation = err.as_validation().unwrap();
    assert_eq!(validation.expected, "Date");
    assert_eq!(validation.actual, r#""not-a-date""#);
}

#[test]
fn enum_mismatch_names_the_allowed_values() {
    let registry = registry();
    let raw = json!({
        "user_name": "Ada",
        "signed_up": "2024-01-01",
        "kind": "owner",
        "tags": []
    });

    let err = decode(&registry, &raw, "Profile").unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"Invalid value for key "kind" on Profile. Expected one of ["admin", "member"] but got "owner""#
    );
}

#[test]
fn array_element_errors_carry_the_index() {
    let registry = registry();
    let raw = json!({
        "user_name": "Ada",
        "signed_up": "2024-01-01",
        "kind": "member",
        "tags": ["ok", 7]
    });

    let err = decode(&registry, &raw, "Profile").unwrap_err();
    let validation = err.as_validation().unwrap();
    assert_eq!(validation.key, None);
    assert_eq!(validation.parent.as_deref(), Some("Profile.tags[1]"));
    assert_eq!(validation.actual, "7");
}

#[test]
fn encode_rejects_external_field_names() {
    let registry = registry();
    let internal = Value::from(&json!({
        "user_name": "Ada",
        "signedUp": "2024-01-01T00:00:00.000Z",
        "kind": "member",
        "tags": []
    }));

    let err = encode(&registry, &internal, "Profile").unwrap_err();
    assert_eq!(
        err.as_validation().and_then(|v| v.key.as_deref()),
        Some("name")
    );
}

#[test]
fn unknown_root_type_is_not_a_validation_error() {
    let registry = registry();
    let err = decode(&registry, &json!({}), "Missing").unwrap_err();
    assert!(matches!(err, TransformError::Resolution(_)));
    assert!(!err.is_validation());
}
