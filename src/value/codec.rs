//! JSON and YAML encoding of values.

use super::value::Value;
use thiserror::Error;

/// CodecError reports a failure to decode or encode a value.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, CodecError> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

/// Serialize a value to indented JSON.
pub fn to_json_pretty(value: &Value) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Parse a value from YAML.
pub fn from_yaml(yaml: &str) -> Result<Value, CodecError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Serialize a value to YAML.
pub fn to_yaml(value: &Value) -> Result<String, CodecError> {
    Ok(serde_yaml::to_string(value)?)
}
