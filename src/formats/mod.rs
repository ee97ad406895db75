//! Built-in formats.
//!
//! Each module holds both directions of one format family. All of them are
//! registered by [`Registry::with_builtin_formats`](crate::Registry::with_builtin_formats).

mod json;
mod jsonl;
mod properties;
mod tabular;
mod toml;
mod yaml;

pub use json::Json;
pub use jsonl::JsonLines;
pub use properties::Properties;
pub use tabular::Tabular;
pub use self::toml::Toml;
pub use yaml::Yaml;

use crate::{DecodeError, Value};

const BOM: char = '\u{feff}';

/// Runs `decode` over the payload as UTF-8 text without a leading byte order
/// mark. Error offsets still count from the start of the raw payload.
pub(crate) fn decode_text(
    format: &str,
    input: &[u8],
    decode: impl FnOnce(&str) -> Result<Value, DecodeError>,
) -> Result<Value, DecodeError> {
    let text = std::str::from_utf8(input).map_err(|e| DecodeError::from_utf8(format, input, &e))?;
    match text.strip_prefix(BOM) {
        Some(rest) => decode(rest).map_err(|mut err| {
            err.offset += BOM.len_utf8();
            err
        }),
        None => decode(text),
    }
}

/// Splits text into lines, yielding each line's byte offset and its content
/// without the line terminator (`\n` or `\r\n`).
pub(crate) fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        (start, line.strip_suffix('\r').unwrap_or(line))
    })
}
