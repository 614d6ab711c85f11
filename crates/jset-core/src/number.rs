//! # Numeric Leaf Assignment
//!
//! A numeric leaf accepts one of three raw shapes:
//!
//! ```text
//! 1.5                                          bare scalar
//! {"array": [1.0, 2.0, 3.0], "match": "g"}     explicit samples
//! {"min": 0.0, "max": 1.0, "num": 5}           interpolated samples
//! ```
//!
//! `match` is optional on both map forms. A range expands to `|num|`
//! evenly spaced samples including both endpoints, cast to the declared
//! kind (integers truncate toward zero). A range may hold at most
//! [`MAX_RANGE_SAMPLES`] samples.

use serde_json::{Map, Value};

use crate::error::{Cause, Segment, SettingsError};
use crate::node::NumberLeaf;
use crate::value::{raw_type_name, NumericKind};

/// Largest sample count a `{"min", "max", "num"}` range may expand to.
pub const MAX_RANGE_SAMPLES: usize = 1 << 24;

/// Assign a raw value to a numeric leaf of the given kind.
pub(crate) fn assign(kind: NumericKind, raw: &Value) -> Result<NumberLeaf, SettingsError> {
    if let Some(value) = kind.extract(raw) {
        return Ok(NumberLeaf::scalar(value));
    }
    match raw {
        Value::Object(map) if map.contains_key("array") => array(kind, map),
        Value::Object(map) => range(kind, map),
        other => Err(SettingsError::type_mismatch(
            format!(
                "{kind} || {{'array': [{kind}]}} || {{'min': {kind}, 'max': {kind}, 'num': int}}"
            ),
            raw_type_name(other),
        )),
    }
}

fn array(kind: NumericKind, map: &Map<String, Value>) -> Result<NumberLeaf, SettingsError> {
    let Some(Value::Array(items)) = map.get("array") else {
        let actual = map.get("array").map_or("null", raw_type_name);
        return Err(SettingsError::type_mismatch(format!("[{kind}]"), actual)
            .within(Segment::Field("array".to_string())));
    };
    let mut samples = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let sample = kind.extract(item).ok_or_else(|| {
            SettingsError::type_mismatch(kind.to_string(), raw_type_name(item))
                .within(Segment::Index(idx))
        })?;
        samples.push(sample);
    }
    Ok(NumberLeaf::samples(kind, samples, match_id(map)?))
}

fn range(kind: NumericKind, map: &Map<String, Value>) -> Result<NumberLeaf, SettingsError> {
    let min = bound(kind, map, "min")?;
    let max = bound(kind, map, "max")?;
    let num = match map.get("num") {
        None => return Err(range_key_missing("num")),
        Some(raw) => match raw {
            Value::Number(n) if !n.is_f64() => n.as_i64().ok_or_else(|| range_type_mismatch("num", "int"))?,
            _ => return Err(range_type_mismatch("num", "int")),
        },
    };
    let requested = num.unsigned_abs();
    let count = usize::try_from(requested)
        .ok()
        .filter(|&count| count <= MAX_RANGE_SAMPLES)
        .ok_or_else(|| SettingsError::new(Cause::RangeTooLarge {
            requested,
            limit: MAX_RANGE_SAMPLES,
        }))?;
    let samples = linspace(min, max, count)
        .into_iter()
        .map(|sample| kind.cast(sample))
        .collect();
    Ok(NumberLeaf::samples(kind, samples, match_id(map)?))
}

fn bound(kind: NumericKind, map: &Map<String, Value>, key: &str) -> Result<f64, SettingsError> {
    let raw = map.get(key).ok_or_else(|| range_key_missing(key))?;
    kind.extract(raw)
        .map(|n| n.as_f64())
        .ok_or_else(|| range_type_mismatch(key, kind.primitive().name()))
}

fn match_id(map: &Map<String, Value>) -> Result<Option<String>, SettingsError> {
    match map.get("match") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id.clone())),
        Some(_) => Err(range_type_mismatch("match", "str")),
    }
}

fn range_key_missing(key: &str) -> SettingsError {
    SettingsError::new(Cause::RangeKeyMissing {
        key: key.to_string(),
    })
}

fn range_type_mismatch(key: &str, expected: &str) -> SettingsError {
    SettingsError::new(Cause::RangeTypeMismatch {
        key: key.to_string(),
        expected: expected.to_string(),
    })
}

/// `num` evenly spaced samples over `[min, max]`, endpoints included.
///
/// Zero samples yields an empty vector; one sample yields `[min]`. The last
/// sample is exactly `max`. The result is allocated up front, so callers
/// handling untrusted input bound `num` first.
pub fn linspace(min: f64, max: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let last = num - 1;
            let step = (max - min) / last as f64;
            (0..num)
                .map(|i| if i == last { max } else { min + step * i as f64 })
                .collect()
        }
    }
}
