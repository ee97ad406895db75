//! The conversion façade.
//!
//! Every entry point resolves format names against a [`Registry`] (the
//! process-wide default unless one is passed in), decodes the payload into a
//! [`Value`] and encodes it again. The first failure is returned unchanged.

use crate::registry::{default_registry, Format, Registry};
use crate::{DecodeOptions, EncodeOptions, Error, Header, Result, Side, Value};
use std::sync::Arc;
use tracing::debug;

/// Converts `payload` from `input_format` to `output_format`.
///
/// `header` is a comma-separated list of column names and `comment` a
/// comment-line marker; either may be empty. Both apply to the input and the
/// output side, and formats that have no use for them ignore them.
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] if either name is not registered (the
/// input name is checked first), [`Error::Decode`] if the payload cannot be
/// read and [`Error::Encode`] if the value cannot be written.
///
/// # Examples
///
/// ```rust
/// use simple_serializer::convert;
///
/// let yaml = convert(br#"{"a":"b","c":["d"]}"#, "json", "", "", "yaml").unwrap();
/// assert_eq!(String::from_utf8(yaml).unwrap(), "a: b\nc:\n- d\n");
///
/// let csv = convert(b"1,2\n", "csv", "x,y", "", "json").unwrap();
/// assert_eq!(csv, br#"[{"x":"1","y":"2"}]"#);
/// ```
pub fn convert(
    payload: &[u8],
    input_format: &str,
    header: &str,
    comment: &str,
    output_format: &str,
) -> Result<Vec<u8>> {
    let header = Header::parse(header);
    let decode_options = DecodeOptions::new()
        .with_header(header.clone())
        .with_comment(comment);
    let encode_options = EncodeOptions::new()
        .with_header(header)
        .with_comment(comment);
    convert_with_options(
        payload,
        input_format,
        &decode_options,
        output_format,
        &encode_options,
    )
}

/// Converts `payload` with explicit options for each side.
///
/// # Errors
///
/// See [`convert`].
pub fn convert_with_options(
    payload: &[u8],
    input_format: &str,
    decode_options: &DecodeOptions,
    output_format: &str,
    encode_options: &EncodeOptions,
) -> Result<Vec<u8>> {
    convert_with_registry(
        default_registry(),
        payload,
        input_format,
        decode_options,
        output_format,
        encode_options,
    )
}

/// Converts `payload` using the formats of `registry`.
///
/// # Errors
///
/// See [`convert`].
pub fn convert_with_registry(
    registry: &Registry,
    payload: &[u8],
    input_format: &str,
    decode_options: &DecodeOptions,
    output_format: &str,
    encode_options: &EncodeOptions,
) -> Result<Vec<u8>> {
    let decoder = lookup(registry, Side::Input, input_format)?;
    let encoder = lookup(registry, Side::Output, output_format)?;

    let value = decoder.decode(payload, decode_options)?;
    let output = encoder.encode(&value, encode_options)?;
    debug!(
        input = decoder.name(),
        output = encoder.name(),
        input_bytes = payload.len(),
        output_bytes = output.len(),
        "converted payload"
    );
    Ok(output)
}

/// Decodes `payload` as `format` with the default registry.
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] or [`Error::Decode`].
///
/// # Examples
///
/// ```rust
/// use simple_serializer::{decode, value, DecodeOptions};
///
/// let value = decode(b"a: [1, 2]", "YAML", &DecodeOptions::new()).unwrap();
/// assert_eq!(value, value!({ "a": [1, 2] }));
/// ```
pub fn decode(payload: &[u8], format: &str, options: &DecodeOptions) -> Result<Value> {
    let decoder = lookup(default_registry(), Side::Input, format)?;
    Ok(decoder.decode(payload, options)?)
}

/// Encodes `value` as `format` with the default registry.
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] or [`Error::Encode`].
pub fn encode(value: &Value, format: &str, options: &EncodeOptions) -> Result<Vec<u8>> {
    let encoder = lookup(default_registry(), Side::Output, format)?;
    Ok(encoder.encode(value, options)?)
}

fn lookup<'r>(registry: &'r Registry, side: Side, name: &str) -> Result<&'r Arc<dyn Format>> {
    registry
        .resolve(name)
        .ok_or_else(|| Error::unknown_format(side, name))
}
