//! # Source Decoding
//!
//! Helpers that turn JSON or YAML text into the generic `serde_json::Value`
//! tree consumed by [`crate::Schema::validate`]. Reading the text from disk
//! is the caller's concern.
//!
//! YAML is richer than JSON (tags, non-string keys). Settings documents use
//! only the JSON-compatible subset, so tags are dropped and scalar keys are
//! stringified.

use serde_json::Value;
use thiserror::Error;

/// Error decoding a source document.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The text is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The YAML uses a construct with no JSON equivalent.
    #[error("YAML-to-JSON conversion failed: {0}")]
    Conversion(String),
}

/// Decode a JSON document.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if the text does not parse.
pub fn from_json_str(text: &str) -> Result<Value, SourceError> {
    Ok(serde_json::from_str(text)?)
}

/// Decode a YAML document into the JSON value model.
///
/// # Errors
///
/// Returns [`SourceError::Yaml`] if the text does not parse, or
/// [`SourceError::Conversion`] if it cannot be represented as JSON.
pub fn from_yaml_str(text: &str) -> Result<Value, SourceError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    yaml_to_json_value(&yaml).map_err(SourceError::Conversion)
}

fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(*flag),
        Yaml::Number(number) => yaml_number(number)?,
        Yaml::String(text) => Value::String(text.clone()),
        Yaml::Sequence(items) => {
            let mut array = Vec::with_capacity(items.len());
            for item in items {
                array.push(yaml_to_json_value(item)?);
            }
            Value::Array(array)
        }
        Yaml::Mapping(entries) => {
            let mut object = serde_json::Map::with_capacity(entries.len());
            for (key, item) in entries {
                object.insert(yaml_key(key)?, yaml_to_json_value(item)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json_value(&tagged.value)?,
    })
}

/// Integers keep their integer kind so integer leaves accept them; every
/// other number must be a finite float.
fn yaml_number(number: &serde_yaml::Number) -> Result<Value, String> {
    if let Some(int) = number.as_i64() {
        return Ok(Value::from(int));
    }
    if let Some(int) = number.as_u64() {
        return Ok(Value::from(int));
    }
    number
        .as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("number {number} is not finite"))
}

fn yaml_key(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(text) => Ok(text.clone()),
        serde_yaml::Value::Number(number) => Ok(number.to_string()),
        serde_yaml::Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(format!("setting names must be strings, numbers or booleans, found {other:?}")),
    }
}
