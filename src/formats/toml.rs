//! TOML decoding and encoding through the `toml` crate.
//!
//! A document decodes to a mapping. Dates and times have no counterpart in
//! [`Value`] and decode as their TOML text. Encoding needs a mapping at the
//! top level and fails on `null`, which TOML cannot represent.

use super::decode_text;
use crate::registry::Format;
use crate::{DecodeError, DecodeOptions, EncodeError, EncodeOptions, Mapping, Number, Value};

/// The `toml` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toml;

impl Format for Toml {
    fn name(&self) -> &str {
        "toml"
    }

    fn decode(&self, input: &[u8], _options: &DecodeOptions) -> Result<Value, DecodeError> {
        decode_text("toml", input, |text| {
            let table: ::toml::Table = ::toml::from_str(text).map_err(|e| {
                let offset = e.span().map_or(0, |span| span.start);
                DecodeError::at("toml", text, offset, e.message().trim_end())
            })?;
            Ok(Value::Mapping(from_table(table)))
        })
    }

    fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
        let Value::Mapping(map) = value else {
            return Err(EncodeError::new(
                "toml",
                &format!("expected a mapping, found {}", value.kind()),
            ));
        };
        let table = to_table(map, options.sorted, "")?;
        ::toml::to_string(&table)
            .map(String::into_bytes)
            .map_err(|e| EncodeError::new("toml", &e.to_string()))
    }
}

fn from_table(table: ::toml::Table) -> Mapping {
    table
        .into_iter()
        .map(|(key, value)| (key, from_toml(value)))
        .collect()
}

fn from_toml(value: ::toml::Value) -> Value {
    match value {
        ::toml::Value::String(s) => Value::String(s),
        ::toml::Value::Integer(i) => Value::from(i),
        ::toml::Value::Float(f) => Value::from(f),
        ::toml::Value::Boolean(b) => Value::Bool(b),
        ::toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        ::toml::Value::Array(items) => Value::List(items.into_iter().map(from_toml).collect()),
        ::toml::Value::Table(table) => Value::Mapping(from_table(table)),
    }
}

fn to_table(map: &Mapping, sorted: bool, path: &str) -> Result<::toml::Table, EncodeError> {
    let mut entries: Vec<_> = map.iter().collect();
    if sorted {
        entries.sort_by(|a, b| a.0.cmp(b.0));
    }
    let mut table = ::toml::Table::new();
    for (key, value) in entries {
        let path = if path.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", path, key)
        };
        table.insert(key.clone(), to_toml(value, sorted, &path)?);
    }
    Ok(table)
}

fn to_toml(value: &Value, sorted: bool, path: &str) -> Result<::toml::Value, EncodeError> {
    Ok(match value {
        Value::Null => {
            return Err(EncodeError::new(
                "toml",
                &format!("\"{}\" is null, which TOML cannot represent", path),
            ))
        }
        Value::Bool(b) => ::toml::Value::Boolean(*b),
        Value::Number(Number::Integer(i)) => ::toml::Value::Integer(*i),
        Value::Number(Number::Float(f)) => ::toml::Value::Float(*f),
        Value::Number(Number::BigInt(b)) => {
            return Err(EncodeError::new(
                "toml",
                &format!("\"{}\": integer {} does not fit in 64 bits", path, b),
            ))
        }
        Value::String(s) => ::toml::Value::String(s.clone()),
        Value::List(items) => ::toml::Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| to_toml(item, sorted, &format!("{}[{}]", path, index)))
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(map) => ::toml::Value::Table(to_table(map, sorted, path)?),
    })
}
