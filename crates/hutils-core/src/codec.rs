//! Text encoding of a dynamic field's backing value.

use serde_json::{Map, Value};

use crate::data_types::{JsonOptions, format_json};
use crate::error::{DynamicError, Result};

/// Turns a dynamic field's mapping into backing text and back.
///
/// Implementations must round-trip every mapping they produce. Key order
/// does not need to be stable.
pub trait Codec {
    fn encode(&self, map: &Map<String, Value>) -> Result<String>;

    fn decode(&self, text: &str) -> Result<Map<String, Value>>;
}

/// JSON backing text, non-ASCII kept literal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json;

impl Codec for Json {
    fn encode(&self, map: &Map<String, Value>) -> Result<String> {
        format_json(map, &JsonOptions::default()).map_err(DynamicError::EncodeField)
    }

    fn decode(&self, text: &str) -> Result<Map<String, Value>> {
        match serde_json::from_str(text).map_err(DynamicError::Decode)? {
            Value::Object(map) => Ok(map),
            other => Err(DynamicError::NotAMapping {
                found: kind_of(&other),
            }),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_empty() {
        assert_eq!(Json.encode(&Map::new()).unwrap(), "{}");
    }

    #[test]
    fn test_roundtrip() {
        let value = json!({"name": "强哥", "tags": ["a", "b"], "nested": {"n": 1.5}});
        let map = value.as_object().unwrap().clone();
        let text = Json.encode(&map).unwrap();
        assert!(text.contains("强哥"));
        assert_eq!(Json.decode(&text).unwrap(), map);
    }

    #[test]
    fn test_decode_invalid() {
        assert!(matches!(Json.decode("{oops"), Err(DynamicError::Decode(_))));
    }

    #[test]
    fn test_decode_not_a_mapping() {
        let err = Json.decode("[1, 2]").unwrap_err();
        assert!(matches!(err, DynamicError::NotAMapping { found: "an array" }));
        assert_eq!(
            err.to_string(),
            "backing field holds an array, expected a JSON object"
        );
    }
}
