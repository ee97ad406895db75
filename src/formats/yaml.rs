//! YAML decoding and encoding through `serde_yaml`.
//!
//! Documents are deserialized straight into [`Value`], so block and flow
//! collections, anchors and aliases are supported. Tagged nodes are rejected
//! rather than silently dropping their tag, and scalar mapping keys of any type
//! are kept as text.

use super::decode_text;
use crate::error::line_column;
use crate::registry::Format;
use crate::{DecodeError, DecodeOptions, EncodeError, EncodeOptions, Mapping, Value};
use serde::Deserialize;

/// The `yaml` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Format for Yaml {
    fn name(&self) -> &str {
        "yaml"
    }

    fn decode(&self, input: &[u8], _options: &DecodeOptions) -> Result<Value, DecodeError> {
        decode_text("yaml", input, |text| {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            let deserializer = serde_yaml::Deserializer::from_str(text);
            Value::deserialize(deserializer).map_err(|e| decode_error(text, &e))
        })
    }

    fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
        let output = if options.sorted {
            serde_yaml::to_string(&sorted(value))
        } else {
            serde_yaml::to_string(value)
        };
        output
            .map(String::into_bytes)
            .map_err(|e| EncodeError::new("yaml", &e.to_string()))
    }
}

fn decode_error(text: &str, err: &serde_yaml::Error) -> DecodeError {
    let reason = err.to_string();
    match err.location() {
        Some(location) => DecodeError::new(
            "yaml",
            location.index(),
            location.line(),
            location.column(),
            &reason,
        ),
        None => {
            let (line, column) = line_column(text, 0);
            DecodeError::new("yaml", 0, line, column, &reason)
        }
    }
}

/// Copies a value with every mapping's keys sorted.
fn sorted(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::List(items.iter().map(sorted).collect()),
        Value::Mapping(map) => {
            let mut out: Mapping = map.iter().map(|(k, v)| (k.clone(), sorted(v))).collect();
            out.sort_keys();
            Value::Mapping(out)
        }
        scalar => scalar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, Number};

    fn decode(input: &str) -> Result<Value, DecodeError> {
        Yaml.decode(input.as_bytes(), &DecodeOptions::new())
    }

    fn encode(value: &Value) -> String {
        String::from_utf8(Yaml.encode(value, &EncodeOptions::new()).unwrap()).unwrap()
    }

    #[test]
    fn test_decode_block_and_flow() {
        let value = decode("a: b\nc:\n  - d\ne: {f: 1, g: [true, null]}\n").unwrap();
        assert_eq!(
            value,
            value!({ "a": "b", "c": ["d"], "e": { "f": 1, "g": [true, null] } })
        );
    }

    #[test]
    fn test_decode_number_provenance() {
        let value = decode("i: 1\nf: 1.0\ns: '1'\n").unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get("i"), Some(&Value::Number(Number::Integer(1))));
        assert_eq!(map.get("f"), Some(&Value::Number(Number::Float(1.0))));
        assert_eq!(map.get("s"), Some(&Value::from("1")));
    }

    #[test]
    fn test_decode_aliases() {
        let value = decode("base: &b {x: 1}\ncopy: *b\n").unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get("base"), map.get("copy"));
    }

    #[test]
    fn test_decode_stringifies_scalar_keys() {
        let value = decode("1: one\ntrue: yes\n").unwrap();
        let keys: Vec<_> = value.as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["1", "true"]);
    }

    #[test]
    fn test_decode_rejects_tags() {
        let err = decode("a: !custom b\n").unwrap_err();
        assert!(err.reason.contains("unsupported tag"), "{}", err.reason);
    }

    #[test]
    fn test_decode_rejects_collection_keys() {
        assert!(decode("? [a, b]\n: c\n").is_err());
    }

    #[test]
    fn test_decode_empty_is_null() {
        assert_eq!(decode("").unwrap(), Value::Null);
        assert_eq!(decode("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_syntax_error_location() {
        let err = decode("a: [1, 2\nb: 3\n").unwrap_err();
        assert_eq!(err.format, "yaml");
        assert!(err.line >= 1);
    }

    #[test]
    fn test_encode_sample() {
        let output = encode(&value!({ "a": "b", "c": ["d"] }));
        assert_eq!(output, "a: b\nc:\n- d\n");
    }

    #[test]
    fn test_encode_quotes_ambiguous_strings() {
        let value = value!({ "s": "true", "n": "1" });
        let back = decode(&encode(&value)).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_encode_large_bigint_fails() {
        let huge = Number::parse_integer(&"9".repeat(50)).unwrap();
        let err = Yaml
            .encode(&Value::Number(huge), &EncodeOptions::new())
            .unwrap_err();
        assert!(err.reason.contains("128-bit"), "{}", err.reason);
    }

    #[test]
    fn test_encode_sorted() {
        let value = value!({ "b": 1, "a": { "d": 2, "c": 3 } });
        let output = String::from_utf8(
            Yaml.encode(&value, &EncodeOptions::new().with_sorted(true))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(output, "a:\n  c: 3\n  d: 2\nb: 1\n");
    }
}
