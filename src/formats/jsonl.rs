//! JSON Lines: one JSON document per line.
//!
//! Decoding yields a list with one item per non-blank line. Lines that start
//! with the comment marker are skipped, and the `skip_lines` and `limit`
//! options apply. Encoding requires a list and writes each item compactly on
//! its own line.

use super::json::{parse_document, to_json};
use super::{decode_text, lines_with_offsets};
use crate::registry::Format;
use crate::{DecodeError, DecodeOptions, EncodeError, EncodeOptions, Value};

/// The `jsonl` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLines;

impl Format for JsonLines {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn decode(&self, input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
        decode_text("jsonl", input, |text| decode_lines(text, options))
    }

    fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
        let items = match value {
            Value::List(items) => items,
            other => {
                return Err(EncodeError::new(
                    "jsonl",
                    &format!("expected a list, found {}", other.kind()),
                ))
            }
        };

        let mut output = Vec::new();
        let count = options.limit.unwrap_or(items.len());
        for item in items.iter().take(count) {
            let json = to_json("jsonl", item, options.sorted)?;
            serde_json::to_writer(&mut output, &json)
                .map_err(|e| EncodeError::new("jsonl", &e.to_string()))?;
            output.push(b'\n');
        }
        Ok(output)
    }
}

/// Decodes one JSON document per non-blank, non-comment line.
fn decode_lines(text: &str, options: &DecodeOptions) -> Result<Value, DecodeError> {
    let mut items = Vec::new();
    if options.limit == Some(0) {
        return Ok(Value::List(items));
    }

    for (index, (start, line)) in lines_with_offsets(text).enumerate() {
        if index < options.skip_lines {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty()
            || (!options.comment.is_empty() && trimmed.starts_with(&options.comment))
        {
            continue;
        }

        let item = parse_document("jsonl", line).map_err(|e| {
            DecodeError::new("jsonl", start + e.offset, index + e.line, e.column, &e.reason)
        })?;
        items.push(item);

        if options.limit.is_some_and(|limit| items.len() >= limit) {
            break;
        }
    }
    Ok(Value::List(items))
}
