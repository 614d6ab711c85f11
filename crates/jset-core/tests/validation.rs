//! # End-to-End Validation Tests
//!
//! Builds small schema trees the way a downstream application would and
//! checks both successful materialization and the exact route/cause of
//! failures.

use std::sync::Arc;

use jset_core::{
    bounds, Cause, CheckViolation, Node, NumberValue, Numeric, PrimitiveKind, Scalar, Schema,
    Segment, SettingsError,
};
use serde_json::json;

fn float() -> Arc<Schema> {
    Schema::number("Float")
        .value_type(PrimitiveKind::Float)
        .build()
        .unwrap()
}

fn route(err: &SettingsError) -> Vec<String> {
    err.route().segments().iter().map(ToString::to_string).collect()
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[test]
fn test_conforming_record_round_trips_values() {
    let sub = Schema::record("Sub")
        .field("subsetting_1", PrimitiveKind::String)
        .build()
        .unwrap();
    let main = Schema::record("User")
        .field("setting_1", PrimitiveKind::Integer)
        .field("setting_2", &sub)
        .field("flag", PrimitiveKind::Bool)
        .field("ratio", PrimitiveKind::Float)
        .build()
        .unwrap();

    let raw = json!({
        "setting_1": 1,
        "setting_2": {"subsetting_1": "this_is_a_string"},
        "flag": true,
        "ratio": 0.5
    });
    let settings = main.validate(&raw).unwrap();

    assert_eq!(settings.get("setting_1").and_then(Node::as_i64), Some(1));
    assert_eq!(
        settings
            .get("setting_2")
            .and_then(|s| s.get("subsetting_1"))
            .and_then(Node::as_str),
        Some("this_is_a_string")
    );
    assert_eq!(settings.get("flag").and_then(Node::as_bool), Some(true));
    assert_eq!(settings.get("ratio").and_then(Node::as_f64), Some(0.5));
    assert_eq!(settings.source(), &raw);
}

#[test]
fn test_missing_field_reports_not_found_at_field() {
    let main = Schema::record("Main")
        .field("a", PrimitiveKind::Integer)
        .field("b", PrimitiveKind::String)
        .build()
        .unwrap();
    let err = main.validate(&json!({"a": 1})).unwrap_err();
    assert_eq!(err.cause(), &Cause::NotFound);
    assert_eq!(err.route().last(), Some(&Segment::Field("b".to_string())));
}

#[test]
fn test_primitive_type_mismatch() {
    let main = Schema::record("Main")
        .field("a", PrimitiveKind::Integer)
        .build()
        .unwrap();
    let err = main.validate(&json!({"a": "one"})).unwrap_err();
    assert_eq!(err.to_string(), "a -> Expecting: int | Received: str");
}

#[test]
fn test_null_passes_through_primitive_fields() {
    let main = Schema::record("Main")
        .field("a", PrimitiveKind::Integer)
        .build()
        .unwrap();
    let settings = main.validate(&json!({"a": null})).unwrap();
    assert_eq!(settings.get("a").and_then(Node::value), Some(&Scalar::Null));
}

#[test]
fn test_record_requires_mapping() {
    let main = Schema::record("Main")
        .field("a", PrimitiveKind::Integer)
        .build()
        .unwrap();
    let err = main.validate(&json!([1, 2])).unwrap_err();
    assert!(err.route().is_empty());
    assert_eq!(err.to_string(), "Expecting: dict | Received: list");
}

#[test]
fn test_extra_keys_are_ignored() {
    let main = Schema::record("Main")
        .field("a", PrimitiveKind::Integer)
        .build()
        .unwrap();
    let settings = main.validate(&json!({"a": 1, "unused": "x"})).unwrap();
    assert_eq!(settings.root().len(), 1);
}

#[test]
fn test_nested_route_through_records_and_check() {
    let fifth = Schema::terminal("Fifth")
        .value_type(PrimitiveKind::String)
        .check(|value| match value.as_str() {
            Some(s) if s.contains('f') => Ok(()),
            _ => Err(CheckViolation::Range("Must contain the letter \"f\"".to_string())),
        })
        .build()
        .unwrap();
    let final_settings = Schema::record("Final")
        .field("fourth", PrimitiveKind::Integer)
        .field("fifth", &fifth)
        .build()
        .unwrap();
    let second = Schema::record("Second")
        .field("second", &final_settings)
        .field("third", PrimitiveKind::Bool)
        .build()
        .unwrap();
    let main = Schema::record("Main").field("first", &second).build().unwrap();

    let raw = json!({
        "first": {
            "second": {"fourth": 4, "fifth": "nope"},
            "third": false
        }
    });
    let err = main.validate(&raw).unwrap_err();
    assert_eq!(route(&err), vec!["first", "second", "fifth"]);
    assert_eq!(
        err.cause(),
        &Cause::CheckFailed {
            violation: CheckViolation::Range("Must contain the letter \"f\"".to_string()),
            value: json!("nope"),
        }
    );
    assert_eq!(
        err.to_string(),
        "first -> second -> fifth -> Must contain the letter \"f\""
    );
}

#[test]
fn test_consistency_check_failure() {
    let window = Schema::record("Window")
        .field("start", PrimitiveKind::Float)
        .field("end", PrimitiveKind::Float)
        .consistency(|record| {
            let start = record.get("start").and_then(Node::as_f64);
            let end = record.get("end").and_then(Node::as_f64);
            match (start, end) {
                (Some(s), Some(e)) if s > e => Err(format!("start {s} is after end {e}")),
                _ => Ok(()),
            }
        })
        .build()
        .unwrap();
    let main = Schema::record("Main").field("window", &window).build().unwrap();

    assert!(main.validate(&json!({"window": {"start": 0.0, "end": 1.0}})).is_ok());

    let err = main
        .validate(&json!({"window": {"start": 2.0, "end": 1.0}}))
        .unwrap_err();
    assert_eq!(route(&err), vec!["window"]);
    assert!(matches!(err.cause(), Cause::ConsistencyFailed(msg) if msg.contains("after")));
}

// ---------------------------------------------------------------------------
// Sequences and keyed collections
// ---------------------------------------------------------------------------

#[test]
fn test_sequence_of_records() {
    let layer = Schema::record("Layer")
        .field("thickness", &float())
        .build()
        .unwrap();
    let layers = Schema::sequence("Layers").element(&layer).build().unwrap();
    let main = Schema::record("Main").field("layers", &layers).build().unwrap();

    let settings = main
        .validate(&json!({"layers": [{"thickness": 1.0}, {"thickness": 2.0}]}))
        .unwrap();
    let list = settings.get("layers").unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.at(1).and_then(|l| l.get("thickness")).and_then(Node::as_f64), Some(2.0));

    let err = main
        .validate(&json!({"layers": [{"thickness": 1.0}, {"depth": 2.0}]}))
        .unwrap_err();
    assert_eq!(err.to_string(), "layers[1] -> thickness -> Setting not found.");
}

#[test]
fn test_sequence_of_primitives() {
    let names = Schema::sequence("Names")
        .element(PrimitiveKind::String)
        .build()
        .unwrap();
    let node = names.construct(&json!(["a", "b"])).unwrap();
    assert_eq!(node.at(0).and_then(Node::as_str), Some("a"));

    let err = names.construct(&json!(["a", 2])).unwrap_err();
    assert_eq!(err.to_string(), "[1] -> Expecting: str | Received: int");

    let err = names.construct(&json!({"a": 1})).unwrap_err();
    assert_eq!(err.to_string(), "Expecting: list | Received: dict");
}

#[test]
fn test_keyed_collection() {
    let regions = Schema::keyed("Regions").element(&float()).build().unwrap();
    let main = Schema::record("Main").field("regions", &regions).build().unwrap();

    let settings = main
        .validate(&json!({"regions": {"north": 1.5, "south": 2.5}}))
        .unwrap();
    let map = settings.get("regions").unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("south").and_then(Node::as_f64), Some(2.5));
    let keys: Vec<Segment> = map.children().map(|(s, _)| s).collect();
    assert_eq!(
        keys,
        vec![Segment::Key("north".to_string()), Segment::Key("south".to_string())]
    );

    let err = main
        .validate(&json!({"regions": {"north": 1.5, "south": "deep"}}))
        .unwrap_err();
    assert_eq!(route(&err), vec!["regions", "[south]"]);
}

#[test]
fn test_keyed_collection_of_primitives() {
    let counts = Schema::keyed("Counts")
        .element(PrimitiveKind::Integer)
        .build()
        .unwrap();
    let node = counts.construct(&json!({"x": 1, "y": 2})).unwrap();
    assert_eq!(node.get("y").and_then(Node::as_i64), Some(2));
    let err = counts.construct(&json!({"x": 1.0})).unwrap_err();
    assert_eq!(err.to_string(), "[x] -> Expecting: int | Received: float");
}

// ---------------------------------------------------------------------------
// Leaves
// ---------------------------------------------------------------------------

#[test]
fn test_terminal_type_mismatch() {
    let name = Schema::terminal("Name")
        .value_type(PrimitiveKind::String)
        .build()
        .unwrap();
    let err = name.construct(&json!(4)).unwrap_err();
    assert_eq!(
        err.cause(),
        &Cause::TypeMismatch {
            expected: "str".to_string(),
            actual: "int".to_string(),
        }
    );
    assert_eq!(name.construct(&json!("ok")).unwrap().as_str(), Some("ok"));
}

#[test]
fn test_selection_leaf() {
    let mode = Schema::selection("Mode")
        .options(["fast", "accurate"])
        .build()
        .unwrap();
    let main = Schema::record("Main").field("mode", &mode).build().unwrap();

    let settings = main.validate(&json!({"mode": "fast"})).unwrap();
    assert_eq!(settings.get("mode").and_then(Node::as_str), Some("fast"));

    let err = main.validate(&json!({"mode": "slow"})).unwrap_err();
    assert_eq!(err.to_string(), "mode -> must be one of [\"fast\", \"accurate\"]");

    let err = main.validate(&json!({"mode": 1})).unwrap_err();
    assert!(matches!(err.cause(), Cause::TypeMismatch { .. }));
}

#[test]
fn test_number_range_field() {
    let main = Schema::record("Main").field("a", &float()).build().unwrap();
    let settings = main
        .validate(&json!({"a": {"min": 1.0, "max": 3.0, "num": 3}}))
        .unwrap();
    let leaf = settings.get("a").and_then(Node::as_number).unwrap();
    assert!(leaf.is_range());
    assert_eq!(
        leaf.value(),
        &NumberValue::Samples(vec![Numeric::Float(1.0), Numeric::Float(2.0), Numeric::Float(3.0)])
    );
}

#[test]
fn test_number_array_fails_fast_on_first_bad_element() {
    let main = Schema::record("Main").field("a", &float()).build().unwrap();
    let err = main
        .validate(&json!({"a": {"array": [1.0, "x", true]}}))
        .unwrap_err();
    assert_eq!(route(&err), vec!["a", "[1]"]);
    assert_eq!(
        err.cause(),
        &Cause::TypeMismatch {
            expected: "float".to_string(),
            actual: "str".to_string(),
        }
    );
}

#[test]
fn test_number_bound_check_on_range() {
    let positive = Schema::number("Positive")
        .value_type(PrimitiveKind::Float)
        .with_check(bounds::lower_bound(0.0))
        .build()
        .unwrap();
    let main = Schema::record("Main").field("p", &positive).build().unwrap();

    assert!(main.validate(&json!({"p": {"array": [0.0, 1.0]}})).is_ok());

    let err = main
        .validate(&json!({"p": {"min": -1.0, "max": 1.0, "num": 3}}))
        .unwrap_err();
    assert_eq!(err.to_string(), "p -> must be >= 0");
    assert!(matches!(
        err.cause(),
        Cause::CheckFailed { value, .. } if value == &json!({"min": -1.0, "max": 1.0, "num": 3})
    ));
}

#[test]
fn test_range_key_errors_carry_field() {
    let main = Schema::record("Main").field("a", &float()).build().unwrap();
    let err = main.validate(&json!({"a": {"min": 1.0, "max": 2.0}})).unwrap_err();
    assert_eq!(err.to_string(), "a -> No 'num' parameter provided for range");
}

#[test]
fn test_oversized_range_is_an_error_at_field() {
    let main = Schema::record("Main").field("a", &float()).build().unwrap();
    let err = main
        .validate(&json!({"a": {"min": 0.0, "max": 1.0, "num": 9_000_000_000_000_000_000i64}}))
        .unwrap_err();
    assert_eq!(route(&err), vec!["a"]);
    assert!(matches!(
        err.cause(),
        Cause::RangeTooLarge { requested, limit }
            if *requested == 9_000_000_000_000_000_000 && *limit == jset_core::MAX_RANGE_SAMPLES
    ));
}

#[test]
fn test_source_yaml_to_settings() {
    let main = Schema::record("Main")
        .field("a", &float())
        .field("name", PrimitiveKind::String)
        .build()
        .unwrap();
    let raw = jset_core::source::from_yaml_str("a:\n  array: [1.0, 2.0]\nname: x\n").unwrap();
    let settings = main.validate(&raw).unwrap();
    assert_eq!(settings.get("a").and_then(Node::as_samples).map(<[Numeric]>::len), Some(2));
}
