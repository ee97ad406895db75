//! Error types for decoding, encoding and converting.
//!
//! Every failure of a conversion is reported as exactly one [`Error`]:
//!
//! - **Unknown formats**: the input or output format name is not registered
//! - **Decode errors**: malformed input, with byte offset, line and column
//! - **Encode errors**: a value whose shape the output format cannot express
//!
//! Registry construction can additionally fail with
//! [`Error::DuplicateFormat`].
//!
//! ## Examples
//!
//! ```rust
//! use simple_serializer::{convert, Error, Side};
//!
//! let err = convert(b"{}", "json", "", "", "bogus").unwrap_err();
//! assert!(matches!(err, Error::UnknownFormat { side: Side::Output, .. }));
//! assert_eq!(err.to_string(), "unknown output format \"bogus\"");
//! ```

use std::fmt;
use thiserror::Error;

/// Which side of a conversion a format name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Input,
    Output,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Input => f.write_str("input"),
            Side::Output => f.write_str("output"),
        }
    }
}

/// Represents all possible errors of this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A format name that the registry does not know
    #[error("unknown {side} format \"{name}\"")]
    UnknownFormat { side: Side, name: String },

    /// The input payload could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The decoded value could not be encoded
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A format was registered twice under the same name
    #[error("format \"{name}\" is already registered")]
    DuplicateFormat { name: String },
}

impl Error {
    pub fn unknown_format(side: Side, name: &str) -> Self {
        Error::UnknownFormat {
            side,
            name: name.to_string(),
        }
    }

    pub fn duplicate_format(name: &str) -> Self {
        Error::DuplicateFormat {
            name: name.to_string(),
        }
    }
}

/// Malformed input, located by byte offset and by 1-based line and column.
///
/// ```rust
/// use simple_serializer::DecodeError;
///
/// let err = DecodeError::new("json", 7, 2, 3, "unexpected character 'x'");
/// assert_eq!(
///     err.to_string(),
///     "failed to decode json at line 2, column 3 (byte 7): unexpected character 'x'"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode {format} at line {line}, column {column} (byte {offset}): {reason}")]
pub struct DecodeError {
    pub format: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub reason: String,
}

impl DecodeError {
    pub fn new(format: &str, offset: usize, line: usize, column: usize, reason: &str) -> Self {
        DecodeError {
            format: format.to_string(),
            offset,
            line,
            column,
            reason: reason.to_string(),
        }
    }

    /// Creates an error at `offset`, deriving line and column from `input`.
    ///
    /// Columns count characters, not bytes.
    pub fn at(format: &str, input: &str, offset: usize, reason: &str) -> Self {
        let (line, column) = line_column(input, offset);
        DecodeError::new(format, offset, line, column, reason)
    }

    /// Rejects input that is not UTF-8, pointing at the first invalid byte.
    pub fn from_utf8(format: &str, input: &[u8], err: &std::str::Utf8Error) -> Self {
        let offset = err.valid_up_to();
        let valid = std::str::from_utf8(&input[..offset]).unwrap_or_default();
        let (line, column) = line_column(valid, offset);
        DecodeError::new(format, offset, line, column, "input is not valid UTF-8")
    }
}

/// A value that the target format cannot express.
///
/// ```rust
/// use simple_serializer::EncodeError;
///
/// let err = EncodeError::new("csv", "expected a list of mappings, found string");
/// assert_eq!(
///     err.to_string(),
///     "failed to encode csv: expected a list of mappings, found string"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode {format}: {reason}")]
pub struct EncodeError {
    pub format: String,
    pub reason: String,
}

impl EncodeError {
    pub fn new(format: &str, reason: &str) -> Self {
        EncodeError {
            format: format.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Computes the 1-based line and column of a byte offset.
pub(crate) fn line_column(input: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(input.len());
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    let before = &input[..end];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

pub type Result<T> = std::result::Result<T, Error>;
