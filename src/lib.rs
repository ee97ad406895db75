//! # simple_serializer
//!
//! Converts structured data between formats through one canonical value
//! model.
//!
//! ## Overview
//!
//! Every conversion decodes the input payload into a [`Value`] and encodes
//! that value in the output format. Nested documents (JSON, YAML, TOML) and flat
//! tables (CSV, TSV, pipe-separated text) share the same model: a table is a
//! list of mappings, one per row, keyed by column name.
//!
//! | Name | Format |
//! |------|--------|
//! | `json` | JSON document |
//! | `jsonl`, `ndjson` | one JSON document per line |
//! | `yaml`, `yml` | YAML document |
//! | `csv`, `tsv`, `psv` | comma, tab and pipe delimited rows |
//! | `properties` | `key=value` lines |
//! | `toml` | TOML document |
//!
//! Format names are matched case-insensitively.
//!
//! ## Quick Start
//!
//! ```rust
//! use simple_serializer::convert;
//!
//! let csv = b"name,role\nalice,admin\nbob,user\n";
//! let json = convert(csv, "csv", "", "", "json").unwrap();
//! assert_eq!(
//!     String::from_utf8(json).unwrap(),
//!     r#"[{"name":"alice","role":"admin"},{"name":"bob","role":"user"}]"#
//! );
//! ```
//!
//! ### Headers and comments
//!
//! The header argument names the columns of a table that has no header row,
//! and the comment argument names a marker for lines that should be skipped.
//! On output the header selects and orders columns.
//!
//! ```rust
//! use simple_serializer::convert;
//!
//! let input = b"# exported nightly\n1,alice\n2,bob\n";
//! let yaml = convert(input, "csv", "id,name", "#", "yaml").unwrap();
//! assert_eq!(
//!     String::from_utf8(yaml).unwrap(),
//!     "- id: '1'\n  name: alice\n- id: '2'\n  name: bob\n"
//! );
//! ```
//!
//! ### Options
//!
//! [`convert_with_options`] takes a [`DecodeOptions`] and an
//! [`EncodeOptions`] for finer control over each side:
//!
//! ```rust
//! use simple_serializer::{convert_with_options, DecodeOptions, EncodeOptions};
//!
//! let input = b"a,b\n1,2,3\n";
//! let output = convert_with_options(
//!     input,
//!     "csv",
//!     &DecodeOptions::new().with_truncate_rows(true),
//!     "json",
//!     &EncodeOptions::new().pretty(),
//! )
//! .unwrap();
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "[\n  {\n    \"a\": \"1\",\n    \"b\": \"2\"\n  }\n]"
//! );
//! ```
//!
//! ### Working with values
//!
//! ```rust
//! use simple_serializer::{decode, encode, value, DecodeOptions, EncodeOptions};
//!
//! let value = decode(br#"{"tags": ["a", "b"]}"#, "json", &DecodeOptions::new()).unwrap();
//! assert_eq!(value, value!({ "tags": ["a", "b"] }));
//!
//! let yaml = encode(&value, "yaml", &EncodeOptions::new()).unwrap();
//! assert_eq!(String::from_utf8(yaml).unwrap(), "tags:\n- a\n- b\n");
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T>`](Result). The [`Error`] names the
//! side of an unknown format, or carries a [`DecodeError`] with the byte
//! offset, line and column of malformed input, or an [`EncodeError`] for a
//! value the output format cannot hold.
//!
//! ```rust
//! use simple_serializer::{convert, Error};
//!
//! match convert(b"[1, 2", "json", "", "", "yaml") {
//!     Err(Error::Decode(err)) => assert_eq!(err.line, 1),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```
//!
//! ## C interface
//!
//! The library also builds as a `cdylib` exporting `Convert`, `Version` and
//! `FreeString`; see [`ffi`] and `include/simple_serializer.h`.
//!
//! ## Logging
//!
//! Registry initialization and each conversion emit `tracing` events at debug
//! level, and per-row tabular decisions at trace level. No subscriber is
//! installed by the library.

mod convert;
pub mod error;
pub mod ffi;
pub mod formats;
pub mod macros;
pub mod map;
pub mod options;
pub mod registry;
pub mod value;

pub use convert::{convert, convert_with_options, convert_with_registry, decode, encode};
pub use error::{DecodeError, EncodeError, Error, Result, Side};
pub use map::Mapping;
pub use options::{DecodeOptions, Delimiter, EncodeOptions, Header};
pub use registry::{default_registry, Format, Registry};
pub use value::{KindError, Number, Value, ValueKind};
