//! Java-style `.properties` files.
//!
//! Each entry is `key=value`, `key: value` or `key value`. Lines starting with the comment
//! marker (`#` unless another is given) or `!` are ignored, a trailing
//! backslash continues the entry on the next line, and backslash escapes
//! protect separators and whitespace. Values always decode as strings.

use super::{decode_text, lines_with_offsets};
use crate::registry::Format;
use crate::{DecodeError, DecodeOptions, EncodeError, EncodeOptions, Mapping, Value};

const DEFAULT_COMMENT: &str = "#";

/// The `properties` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Properties;

impl Format for Properties {
    fn name(&self) -> &str {
        "properties"
    }

    fn decode(&self, input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
        let comment = if options.comment.is_empty() {
            DEFAULT_COMMENT
        } else {
            options.comment.as_str()
        };
        decode_text("properties", input, |text| parse(text, comment))
    }

    fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
        let mut entries = match value {
            Value::Null => Mapping::new(),
            Value::Mapping(map) => map.clone(),
            other => {
                return Err(EncodeError::new(
                    "properties",
                    &format!("expected a mapping, found {}", other.kind()),
                ))
            }
        };
        if options.sorted {
            entries.sort_keys();
        }

        let mut output = String::new();
        for (key, value) in &entries {
            let text = value.scalar_text().ok_or_else(|| {
                EncodeError::new(
                    "properties",
                    &format!("key \"{}\": cannot write a {} as a property", key, value.kind()),
                )
            })?;
            escape_key(&mut output, key, &options.comment);
            output.push('=');
            escape_value(&mut output, &text);
            output.push('\n');
        }
        Ok(output.into_bytes())
    }
}

fn parse(text: &str, comment: &str) -> Result<Value, DecodeError> {
    let mut entries = Mapping::new();
    let mut lines = lines_with_offsets(text);
    while let Some((start, line)) = lines.next() {
        let first = line.trim_start();
        if first.is_empty() || first.starts_with(comment) || first.starts_with('!') {
            continue;
        }

        let mut logical = first.to_string();
        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let offset = start + (line.len() - first.len());
        let (key, value) = split_entry(&logical)
            .map_err(|reason| DecodeError::at("properties", text, offset, &reason))?;
        entries.insert(key, Value::String(value));
    }
    Ok(Value::Mapping(entries))
}

/// A line continues when it ends in an odd number of backslashes.
fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Splits a logical line at its first unescaped `=`, `:` or whitespace.
///
/// A whitespace separator may be followed by one `=` or `:`. Whitespace
/// before the value is dropped.
fn split_entry(line: &str) -> Result<(String, String), String> {
    let mut key = String::new();
    let mut chars = line.char_indices();
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => key.push(unescape_next(&mut chars.by_ref().map(|(_, c)| c))?),
            '=' | ':' => return Ok((key, unescape(line[index + 1..].trim_start())?)),
            ' ' | '\t' | '\u{000C}' => {
                let rest = line[index..].trim_start();
                let rest = rest.strip_prefix(['=', ':']).map_or(rest, str::trim_start);
                return Ok((key, unescape(rest)?));
            }
            c => key.push(c),
        }
    }
    Err(format!("missing separator in entry \"{}\"", line))
}

fn unescape(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(unescape_next(&mut chars)?);
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// Decodes the character after a backslash.
fn unescape_next(chars: &mut impl Iterator<Item = char>) -> Result<char, String> {
    match chars.next() {
        Some('t') => Ok('\t'),
        Some('n') => Ok('\n'),
        Some('r') => Ok('\r'),
        Some('f') => Ok('\u{000C}'),
        Some('u') => {
            let digits: String = chars.take(4).collect();
            u32::from_str_radix(&digits, 16)
                .ok()
                .filter(|_| digits.len() == 4)
                .and_then(char::from_u32)
                .ok_or_else(|| format!("invalid unicode escape \"\\u{}\"", digits))
        }
        Some(c) => Ok(c),
        None => Ok('\\'),
    }
}

fn escape_key(out: &mut String, key: &str, comment: &str) {
    let guard = !comment.is_empty() && key.starts_with(comment);
    for (index, c) in key.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            ' ' => out.push_str("\\ "),
            '=' => out.push_str("\\="),
            ':' => out.push_str("\\:"),
            '#' | '!' if index == 0 => {
                out.push('\\');
                out.push(c);
            }
            c if index == 0 && guard => {
                out.push('\\');
                out.push(c);
            }
            c => escape_common(out, c),
        }
    }
}

fn escape_value(out: &mut String, value: &str) {
    for (index, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            c if index == 0
                && c.is_whitespace()
                && !matches!(c, '\t' | '\n' | '\r' | '\u{000C}') =>
            {
                out.push('\\');
                out.push(c);
            }
            c => escape_common(out, c),
        }
    }
}

fn escape_common(out: &mut String, c: char) {
    match c {
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\u{000C}' => out.push_str("\\f"),
        c => out.push(c),
    }
}
