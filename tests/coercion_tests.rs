//! End-to-end coercion tests
//!
//! Runs input objects through the public entry points against the fixture
//! schemas and checks the coerced output or the error raised.

use chrono::{TimeZone, Utc};
use serde_json::json;

use schema_coerce::{
    process, process_json, process_unvalidated_schema, Coercer, ErrorKind, Schema, Value,
};

fn base_schema() -> Schema {
    include_str!("fixtures/base_schema.json").parse().unwrap()
}

fn constraints_schema() -> Schema {
    include_str!("fixtures/constraints_schema.json").parse().unwrap()
}

fn run(input: serde_json::Value) -> schema_coerce::Result<serde_json::Value> {
    Coercer::new(base_schema())?.process_json(&input)
}

fn error_kind(input: serde_json::Value) -> ErrorKind {
    run(input).unwrap_err().kind()
}

// =============================================================================
// Primitive Types
// =============================================================================

#[test]
fn test_string_field() {
    assert_eq!(run(json!({ "str": "tata" })).unwrap(), json!({ "str": "tata" }));
    assert_eq!(error_kind(json!({ "str": 2 })), ErrorKind::TypeCoercion);
}

#[test]
fn test_number_field() {
    assert_eq!(run(json!({ "nbr": 2 })).unwrap(), json!({ "nbr": 2 }));
    assert_eq!(run(json!({ "nbr": "2" })).unwrap(), json!({ "nbr": 2 }));
    assert_eq!(run(json!({ "nbr": "2,5" })).unwrap(), json!({ "nbr": 2.5 }));

    assert_eq!(error_kind(json!({ "nbr": "tata" })), ErrorKind::TypeCoercion);
    assert_eq!(error_kind(json!({ "nbr": true })), ErrorKind::TypeCoercion);
}

#[test]
fn test_number_rejects_native_date() {
    let schema = base_schema();
    let mut input = schema_coerce::Map::new();
    input.insert("nbr".into(), Value::Date(Utc::now()));

    let err = process(&schema, &Value::Map(input)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeCoercion);
}

#[test]
fn test_boolean_field() {
    assert_eq!(run(json!({ "bool": false })).unwrap(), json!({ "bool": false }));
    assert_eq!(run(json!({ "bool": true })).unwrap(), json!({ "bool": true }));
    assert_eq!(run(json!({ "bool": "false" })).unwrap(), json!({ "bool": false }));
    assert_eq!(run(json!({ "bool": "true" })).unwrap(), json!({ "bool": true }));

    assert_eq!(error_kind(json!({ "bool": "tata" })), ErrorKind::TypeCoercion);
    assert_eq!(error_kind(json!({ "bool": 2 })), ErrorKind::TypeCoercion);
}

#[test]
fn test_date_field_accepted_forms() {
    let epoch = json!({ "date": "1970-01-01T00:00:00.000Z" });
    assert_eq!(run(json!({ "date": 0 })).unwrap(), epoch);
    assert_eq!(run(json!({ "date": "1970-01-01T00:00:00.000Z" })).unwrap(), epoch);
    assert_eq!(
        run(json!({ "date": "1234567890" })).unwrap(),
        json!({ "date": "1970-01-15T06:56:07.890Z" })
    );
    assert_eq!(
        run(json!({ "date": "Sun Oct 18 2026 10:00:00 GMT+0000 (Coordinated Universal Time)" }))
            .unwrap(),
        json!({ "date": "2026-10-18T10:00:00.000Z" })
    );
}

#[test]
fn test_date_field_partial_and_human_forms() {
    let cases = [
        ("2026", "2026-01-01T00:00:00.000Z"),
        ("2026-10", "2026-10-01T00:00:00.000Z"),
        ("20261018", "2026-10-18T00:00:00.000Z"),
        ("2026-10-18T10:00Z", "2026-10-18T10:00:00.000Z"),
        ("October 18, 2026", "2026-10-18T00:00:00.000Z"),
        ("10/18/2026", "2026-10-18T00:00:00.000Z"),
    ];
    for (raw, iso) in cases {
        assert_eq!(
            run(json!({ "date": raw })).unwrap(),
            json!({ "date": iso }),
            "coercing {raw:?}"
        );
    }
}

#[test]
fn test_date_field_native_timestamp() {
    let mut input = schema_coerce::Map::new();
    input.insert("date".into(), Value::Date(Utc.timestamp_millis_opt(0).unwrap()));

    let out = process(&base_schema(), &Value::Map(input)).unwrap();
    assert_eq!(out["date"].to_json(), json!("1970-01-01T00:00:00.000Z"));
}

#[test]
fn test_date_field_rejections() {
    assert_eq!(error_kind(json!({ "date": 9999999999999999i64 })), ErrorKind::TypeCoercion);
    assert_eq!(error_kind(json!({ "date": -9999999999999999i64 })), ErrorKind::TypeCoercion);
    assert_eq!(error_kind(json!({ "date": "tata" })), ErrorKind::TypeCoercion);
    assert_eq!(error_kind(json!({ "date": true })), ErrorKind::TypeCoercion);
}

#[test]
fn test_idempotent_on_coerced_output() {
    let input = json!({
        "str": "hello",
        "nbr": "2,5",
        "bool": "true",
        "date": 0,
        "strs": "x",
        "obj": "{\"nbr\": \"3\"}"
    });
    let once = run(input).unwrap();
    let twice = run(once.clone()).unwrap();
    assert_eq!(once, twice);
}

// =============================================================================
// Objects
// =============================================================================

#[test]
fn test_object_field() {
    assert_eq!(run(json!({ "obj": { "nbr": 2 } })).unwrap(), json!({ "obj": { "nbr": 2 } }));
    assert_eq!(run(json!({ "obj": { "nbr": "2" } })).unwrap(), json!({ "obj": { "nbr": 2 } }));
}

#[test]
fn test_deep_object_field() {
    let out = run(json!({ "objDeep": { "nested": { "nestedField": "2" } } })).unwrap();
    assert_eq!(out, json!({ "objDeep": { "nested": { "nestedField": 2 } } }));
}

#[test]
fn test_deep_object_error_path() {
    let err = run(json!({ "objDeep": { "nested": { "nestedField": "x" } } })).unwrap_err();
    assert_eq!(err.path(), Some("objDeep.nested.nestedField"));
}

#[test]
fn test_json_string_object() {
    let out = run(json!({ "obj": "{\"nbr\":2}" })).unwrap();
    assert_eq!(out, json!({ "obj": { "nbr": 2 } }));
}

#[test]
fn test_object_rejections() {
    assert_eq!(error_kind(json!({ "obj": "[{\"nbr\":2}]" })), ErrorKind::TypeCoercion);
    assert_eq!(error_kind(json!({ "obj": "nbr: 2" })), ErrorKind::TypeCoercion);
    assert_eq!(error_kind(json!({ "obj": 2 })), ErrorKind::TypeCoercion);
    assert_eq!(error_kind(json!({ "obj": [{ "nbr": 2 }] })), ErrorKind::TypeCoercion);
}

// =============================================================================
// Arrays
// =============================================================================

#[test]
fn test_array_single_value() {
    assert_eq!(run(json!({ "strs": "hello" })).unwrap(), json!({ "strs": ["hello"] }));
    assert_eq!(error_kind(json!({ "strs": 1 })), ErrorKind::TypeCoercion);
}

#[test]
fn test_array_multiple_values() {
    assert_eq!(
        run(json!({ "strs": ["hello", "world"] })).unwrap(),
        json!({ "strs": ["hello", "world"] })
    );

    let err = run(json!({ "strs": [1, 2] })).unwrap_err();
    assert_eq!(err.path(), Some("strs[0]"));
}

// =============================================================================
// Output Shape
// =============================================================================

#[test]
fn test_output_has_declared_and_present_fields_only() {
    let out = run(json!({ "nbr": 2, "undeclared": "x" })).unwrap();
    assert_eq!(out, json!({ "nbr": 2 }));
}

#[test]
fn test_empty_input() {
    assert_eq!(run(json!({})).unwrap(), json!({}));
}

#[test]
fn test_null_value_rejected() {
    assert_eq!(error_kind(json!({ "str": null })), ErrorKind::TypeCoercion);
}

// =============================================================================
// Constraints
// =============================================================================

#[test]
fn test_required_present() {
    let coercer = Coercer::new(constraints_schema()).unwrap();
    let out = coercer.process_json(&json!({ "reqNbr": "2" })).unwrap();
    assert_eq!(
        out,
        json!({
            "reqNbr": 2,
            "page": 1,
            "tags": ["none"],
            "reqObj": { "reqNestedNbr": 1 }
        })
    );
}

#[test]
fn test_required_missing() {
    let coercer = Coercer::new(constraints_schema()).unwrap();
    let err = coercer.process_json(&json!({})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequiredField);
    assert_eq!(err.path(), Some("reqNbr"));
}

#[test]
fn test_required_nested_missing() {
    let schema = json!({
        "reqObj": {
            "type": "object",
            "properties": {
                "reqNestedNbr": { "type": "number", "required": true }
            }
        }
    });
    let err = process_json(&schema, &json!({ "reqObj": {} })).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequiredField);
    assert_eq!(err.to_string(), "\"reqObj.reqNestedNbr\": is required");
}

#[test]
fn test_default_field() {
    let schema = json!({ "reqNbr": { "type": "number", "default": 1 } });
    assert_eq!(process_json(&schema, &json!({})).unwrap(), json!({ "reqNbr": 1 }));
    assert_eq!(
        process_json(&schema, &json!({ "reqNbr": 2 })).unwrap(),
        json!({ "reqNbr": 2 })
    );
}

#[test]
fn test_default_nested_field() {
    let schema = json!({
        "reqObj": {
            "type": "object",
            "properties": {
                "reqNestedNbr": { "type": "number", "default": 1 }
            }
        }
    });
    assert_eq!(
        process_json(&schema, &json!({ "reqObj": {} })).unwrap(),
        json!({ "reqObj": { "reqNestedNbr": 1 } })
    );
}

#[test]
fn test_expected_values() {
    let coercer = Coercer::new(constraints_schema()).unwrap();

    let out = coercer
        .process_json(&json!({ "reqNbr": 1, "color": "blue" }))
        .unwrap();
    assert_eq!(out["color"], json!("blue"));

    let err = coercer
        .process_json(&json!({ "reqNbr": 1, "color": "green" }))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedValue);
    assert!(err.to_string().contains("\"red\" OR \"blue\""));
}

#[test]
fn test_expected_dates() {
    let coercer = Coercer::new(constraints_schema()).unwrap();

    let out = coercer
        .process_json(&json!({ "reqNbr": 1, "since": "2026-10-18" }))
        .unwrap();
    assert_eq!(out["since"], json!("2026-10-18T00:00:00.000Z"));

    assert!(coercer
        .process_json(&json!({ "reqNbr": 1, "since": "1970-01-01T00:00:00.000Z" }))
        .is_ok());

    let err = coercer
        .process_json(&json!({ "reqNbr": 1, "since": 1 }))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedValue);
}

#[test]
fn test_unvalidated_entry_point() {
    let out = process_unvalidated_schema(&base_schema(), &Value::from(json!({ "nbr": "3" })))
        .unwrap();
    assert_eq!(out["nbr"], Value::Number(3.0));
}
