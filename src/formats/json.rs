//! JSON decoding and encoding.
//!
//! Documents are read and written with `serde_json`, with the
//! `arbitrary_precision` and `preserve_order` features enabled. Numbers keep
//! their integer or float provenance, integers beyond `i64` are kept exactly,
//! object keys keep their order and duplicate keys resolve last-write-wins.
//!
//! ```rust
//! use simple_serializer::{decode, DecodeOptions, Number, Value};
//!
//! let value = decode(br#"{"n": 1, "f": 1.0}"#, "json", &DecodeOptions::new()).unwrap();
//! let map = value.as_mapping().unwrap();
//! assert_eq!(map.get("n"), Some(&Value::Number(Number::Integer(1))));
//! assert_eq!(map.get("f"), Some(&Value::Number(Number::Float(1.0))));
//! ```

use super::decode_text;
use crate::registry::Format;
use crate::{DecodeError, DecodeOptions, EncodeError, EncodeOptions, Mapping, Number, Value};
use serde_json::Value as JsonValue;

/// The `json` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Format for Json {
    fn name(&self) -> &str {
        "json"
    }

    fn decode(&self, input: &[u8], _options: &DecodeOptions) -> Result<Value, DecodeError> {
        decode_text("json", input, |text| parse_document("json", text))
    }

    fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
        let json = to_json("json", value, options.sorted)?;
        let written = if options.pretty {
            serde_json::to_vec_pretty(&json)
        } else {
            serde_json::to_vec(&json)
        };
        written.map_err(|e| EncodeError::new("json", &e.to_string()))
    }
}

/// Parses exactly one JSON value surrounded by optional whitespace.
pub(crate) fn parse_document(format: &str, text: &str) -> Result<Value, DecodeError> {
    let json: JsonValue =
        serde_json::from_str(text).map_err(|e| syntax_error(format, text, &e))?;
    from_json(json).map_err(|literal| {
        let offset = text.find(literal.as_str()).unwrap_or(0);
        DecodeError::at(
            format,
            text,
            offset,
            &format!("number {} is out of range", literal),
        )
    })
}

/// Converts a parsed document, failing with the literal of a number that
/// has no finite `f64` value.
fn from_json(json: JsonValue) -> Result<Value, String> {
    Ok(match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => Value::Number(number_from_json(&n)?),
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(items) => Value::List(
            items
                .into_iter()
                .map(from_json)
                .collect::<Result<_, _>>()?,
        ),
        JsonValue::Object(object) => {
            let mut map = Mapping::with_capacity(object.len());
            for (key, value) in object {
                map.insert(key, from_json(value)?);
            }
            Value::Mapping(map)
        }
    })
}

fn number_from_json(number: &serde_json::Number) -> Result<Number, String> {
    if let Some(i) = number.as_i64() {
        return Ok(Number::Integer(i));
    }
    let literal = number.as_str();
    if let Some(integer) = Number::parse_integer(literal) {
        return Ok(integer);
    }
    number
        .as_f64()
        .map(Number::Float)
        .ok_or_else(|| literal.to_string())
}

/// Builds the `serde_json` tree for a value, sorting keys when asked.
pub(crate) fn to_json(format: &str, value: &Value, sorted: bool) -> Result<JsonValue, EncodeError> {
    Ok(match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => JsonValue::Number(number_to_json(format, n)?),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::List(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| to_json(format, item, sorted))
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            if sorted {
                entries.sort_by(|a, b| a.0.cmp(b.0));
            }
            let mut object = serde_json::Map::with_capacity(entries.len());
            for (key, item) in entries {
                object.insert(key.clone(), to_json(format, item, sorted)?);
            }
            JsonValue::Object(object)
        }
    })
}

fn number_to_json(format: &str, number: &Number) -> Result<serde_json::Number, EncodeError> {
    match number {
        Number::Integer(i) => Ok(serde_json::Number::from(*i)),
        Number::Float(f) if !f.is_finite() => Err(EncodeError::new(
            format,
            &format!("{} has no JSON representation", f),
        )),
        // Rendering from our own text keeps "1.0" and exact big integers.
        _ => number
            .to_string()
            .parse()
            .map_err(|e: serde_json::Error| EncodeError::new(format, &e.to_string())),
    }
}

/// Turns a `serde_json` syntax error into a located decode error.
fn syntax_error(format: &str, text: &str, err: &serde_json::Error) -> DecodeError {
    let offset = if err.line() == 0 {
        0
    } else {
        let line_start: usize = text
            .split_inclusive('\n')
            .take(err.line() - 1)
            .map(str::len)
            .sum();
        (line_start + err.column().saturating_sub(1)).min(text.len())
    };
    let message = err.to_string();
    let reason = message
        .rfind(" at line ")
        .map_or(message.as_str(), |end| &message[..end]);
    DecodeError::at(format, text, offset, reason)
}
