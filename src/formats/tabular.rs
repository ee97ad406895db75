//! Delimited text: CSV, TSV and pipe-separated values.
//!
//! One [`Tabular`] type serves every delimiter. Decoding reads records with
//! RFC 4180 quoting, turns the first record (or the explicit header) into
//! column names and every further record into a [`Mapping`] of strings.
//! Encoding writes a list of flat mappings back out as a header row followed
//! by one record per mapping.
//!
//! ```rust
//! use simple_serializer::{decode, value, DecodeOptions};
//!
//! let table = decode(b"a,b\n1,2\n", "csv", &DecodeOptions::new()).unwrap();
//! assert_eq!(table, value!([{ "a": "1", "b": "2" }]));
//! ```

use super::{decode_text, lines_with_offsets};
use crate::registry::Format;
use crate::{DecodeError, DecodeOptions, Delimiter, EncodeError, EncodeOptions, Mapping, Value};
use csv::{QuoteStyle, StringRecord, Terminator};
use indexmap::IndexSet;
use tracing::trace;

/// A delimited-text format.
#[derive(Debug, Clone, Copy)]
pub struct Tabular {
    name: &'static str,
    delimiter: Delimiter,
}

impl Tabular {
    /// Comma-separated values, registered as `csv`.
    #[must_use]
    pub const fn csv() -> Self {
        Tabular::new("csv", Delimiter::Comma)
    }

    /// Tab-separated values, registered as `tsv`.
    #[must_use]
    pub const fn tsv() -> Self {
        Tabular::new("tsv", Delimiter::Tab)
    }

    /// Pipe-separated values, registered as `psv`.
    #[must_use]
    pub const fn psv() -> Self {
        Tabular::new("psv", Delimiter::Pipe)
    }

    /// A tabular format with a custom name, for registering extra aliases.
    #[must_use]
    pub const fn new(name: &'static str, delimiter: Delimiter) -> Self {
        Tabular { name, delimiter }
    }

    #[must_use]
    pub const fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    fn delimiter_byte(&self) -> u8 {
        // Every delimiter is ASCII.
        self.delimiter.as_char() as u8
    }
}

impl Format for Tabular {
    fn name(&self) -> &str {
        self.name
    }

    fn is_tabular(&self) -> bool {
        true
    }

    fn decode(&self, input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
        decode_text(self.name, input, |text| self.decode_str(text, options))
    }

    fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
        let rows: Vec<&Mapping> = match value {
            Value::Null => Vec::new(),
            Value::Mapping(map) => vec![map],
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Mapping(map) => Ok(map),
                    other => Err(EncodeError::new(
                        self.name,
                        &format!("row {} is a {}, expected a mapping", index + 1, other.kind()),
                    )),
                })
                .collect::<Result<_, _>>()?,
            other => {
                return Err(EncodeError::new(
                    self.name,
                    &format!("expected a list of mappings, found {}", other.kind()),
                ))
            }
        };

        let explicit = !options.header.is_inferred();
        let columns: Vec<String> = if explicit {
            options.header.columns().to_vec()
        } else {
            let mut seen: IndexSet<&str> = IndexSet::new();
            for row in &rows {
                seen.extend(row.keys().map(String::as_str));
            }
            let mut columns: Vec<String> = seen.into_iter().map(str::to_string).collect();
            if options.sorted {
                columns.sort();
            }
            columns
        };

        if columns.is_empty() {
            if rows.is_empty() {
                return Ok(Vec::new());
            }
            return Err(EncodeError::new(self.name, "rows have no columns"));
        }

        let mut output = Vec::new();
        if options.comment_header && !options.comment.is_empty() {
            output.extend_from_slice(options.comment.as_bytes());
            self.write_record(&mut output, &columns, "")?;
        } else {
            self.write_record(&mut output, &columns, &options.comment)?;
        }

        let count = options.limit.unwrap_or(rows.len());
        for (index, row) in rows.iter().take(count).enumerate() {
            let number = index + 1;
            if explicit {
                for key in row.keys() {
                    if columns.contains(key) {
                        continue;
                    }
                    if !options.truncate_rows {
                        return Err(EncodeError::new(
                            self.name,
                            &format!(
                                "row {} has column \"{}\" missing from the header",
                                number, key
                            ),
                        ));
                    }
                    trace!(row = number, column = %key, "dropping column missing from header");
                }
            }

            let mut cells = Vec::with_capacity(columns.len());
            for column in &columns {
                let cell = match row.get(column) {
                    None => String::new(),
                    Some(value) => value.scalar_text().ok_or_else(|| {
                        EncodeError::new(
                            self.name,
                            &format!(
                                "row {}, column \"{}\": cannot write a {} into a cell",
                                number,
                                column,
                                value.kind()
                            ),
                        )
                    })?,
                };
                cells.push(cell);
            }
            self.write_record(&mut output, &cells, &options.comment)?;
        }
        Ok(output)
    }
}

impl Tabular {
    fn decode_str(&self, text: &str, options: &DecodeOptions) -> Result<Value, DecodeError> {
        let comment = options.comment.as_str();
        let native_comment = match comment.as_bytes() {
            [byte] => Some(*byte),
            _ => None,
        };
        let base = lines_with_offsets(text)
            .nth(options.skip_lines)
            .map_or(text.len(), |(start, _)| start);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter_byte())
            .has_headers(false)
            .flexible(true)
            .comment(native_comment)
            .from_reader(text[base..].as_bytes());

        let mut columns = if options.header.is_inferred() {
            None
        } else {
            let columns = options.header.columns().to_vec();
            check_unique(self.name, text, base, &columns)?;
            Some(columns)
        };

        let mut rows = Vec::new();
        let mut record = StringRecord::new();
        loop {
            let more = reader.read_record(&mut record).map_err(|e| {
                let at = e.position().map_or(0, |p| p.byte() as usize);
                DecodeError::at(self.name, text, base + at, &e.to_string())
            })?;
            if !more {
                break;
            }
            let at = record.position().map_or(0, |p| p.byte() as usize);
            let start = record_start(text, base + at, native_comment);
            if !comment.is_empty() && text[start..].starts_with(comment) {
                continue;
            }
            if !options.lazy_quotes {
                if let Some((offset, reason)) =
                    strict_quote_error(&text[start..], self.delimiter_byte())
                {
                    return Err(DecodeError::at(self.name, text, start + offset, reason));
                }
            }

            let Some(header) = columns.as_ref() else {
                let names: Vec<String> = record.iter().map(str::to_string).collect();
                check_unique(self.name, text, start, &names)?;
                columns = Some(names);
                continue;
            };
            if options.limit.is_some_and(|limit| rows.len() >= limit) {
                break;
            }
            rows.push(Value::Mapping(self.row(text, start, header, &record, options)?));
        }
        Ok(Value::List(rows))
    }

    fn row(
        &self,
        text: &str,
        start: usize,
        columns: &[String],
        record: &StringRecord,
        options: &DecodeOptions,
    ) -> Result<Mapping, DecodeError> {
        let width = record.len();
        if width > columns.len() {
            if !options.truncate_rows {
                return Err(DecodeError::at(
                    self.name,
                    text,
                    start,
                    &format!("record has {} fields but header has {}", width, columns.len()),
                ));
            }
            trace!(
                offset = start,
                fields = width,
                columns = columns.len(),
                "truncating wide record"
            );
        }

        let mut fields = record.iter();
        let mut row = Mapping::with_capacity(columns.len());
        for column in columns {
            let value = fields.next().map_or(Value::Null, Value::from);
            row.insert(column.clone(), value);
        }
        Ok(row)
    }

    /// Appends one record. Fields are quoted only where needed, except that a
    /// record which would read back as a comment line or a blank line is
    /// quoted in full.
    fn write_record(
        &self,
        output: &mut Vec<u8>,
        fields: &[String],
        comment: &str,
    ) -> Result<(), EncodeError> {
        let delimiter = self.delimiter.as_char().to_string();
        let guard = match fields {
            [only] if only.is_empty() => true,
            _ => !comment.is_empty() && fields.join(delimiter.as_str()).starts_with(comment),
        };
        let style = if guard {
            QuoteStyle::Always
        } else {
            QuoteStyle::Necessary
        };

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter_byte())
            .quote_style(style)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(output);
        writer
            .write_record(fields)
            .map_err(|e| EncodeError::new(self.name, &e.to_string()))?;
        writer
            .flush()
            .map_err(|e| EncodeError::new(self.name, &e.to_string()))
    }
}

/// Finds where the record the reader reported at `offset` begins, past the
/// line breaks and comment lines consumed ahead of it.
fn record_start(text: &str, mut offset: usize, comment: Option<u8>) -> usize {
    let bytes = text.as_bytes();
    loop {
        match bytes.get(offset) {
            Some(b'\r' | b'\n') => offset += 1,
            Some(&b) if Some(b) == comment => {
                offset = text[offset..]
                    .find('\n')
                    .map_or(text.len(), |n| offset + n + 1);
            }
            _ => return offset,
        }
    }
}

/// Checks the raw text of one record against RFC 4180 quoting, returning the
/// offset and reason of the first violation.
fn strict_quote_error(raw: &str, delimiter: u8) -> Option<(usize, &'static str)> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    loop {
        if bytes.get(i) == Some(&b'"') {
            let opening = i;
            i += 1;
            loop {
                match bytes.get(i) {
                    None => return Some((opening, "unterminated quoted field")),
                    Some(b'"') if bytes.get(i + 1) == Some(&b'"') => i += 2,
                    Some(b'"') => break,
                    Some(_) => i += 1,
                }
            }
            i += 1;
            match bytes.get(i) {
                None | Some(b'\r' | b'\n') => return None,
                Some(&b) if b == delimiter => i += 1,
                Some(_) => return Some((i, "unexpected character after closing quote")),
            }
        } else {
            loop {
                match bytes.get(i) {
                    None | Some(b'\r' | b'\n') => return None,
                    Some(&b) if b == delimiter => {
                        i += 1;
                        break;
                    }
                    Some(b'"') => return Some((i, "bare \" in unquoted field")),
                    Some(_) => i += 1,
                }
            }
        }
    }
}

fn check_unique(
    format: &str,
    text: &str,
    offset: usize,
    columns: &[String],
) -> Result<(), DecodeError> {
    let mut seen = IndexSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(DecodeError::at(
                format,
                text,
                offset,
                &format!("duplicate column \"{}\" in header", column),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, Header};

    fn decode_with(input: &str, options: &DecodeOptions) -> Result<Value, DecodeError> {
        Tabular::csv().decode(input.as_bytes(), options)
    }

    fn decode(input: &str) -> Result<Value, DecodeError> {
        decode_with(input, &DecodeOptions::new())
    }

    fn encode_with(value: &Value, options: &EncodeOptions) -> Result<String, EncodeError> {
        Tabular::csv()
            .encode(value, options)
            .map(|bytes| String::from_utf8(bytes).unwrap())
    }

    fn encode(value: &Value) -> String {
        encode_with(value, &EncodeOptions::new()).unwrap()
    }

    #[test]
    fn test_decode_infers_header() {
        let value = decode("a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(value, value!([{ "a": "1", "b": "2" }, { "a": "3", "b": "4" }]));
    }

    #[test]
    fn test_decode_explicit_header() {
        let options = DecodeOptions::new().with_header(Header::parse("x, y"));
        let value = decode_with("1,2\n", &options).unwrap();
        assert_eq!(value, value!([{ "x": "1", "y": "2" }]));
    }

    #[test]
    fn test_decode_skips_comments() {
        let options = DecodeOptions::new().with_comment("#");
        let with_comment = decode_with("#note\na,b\n1,2\n#tail\n", &options).unwrap();
        assert_eq!(with_comment, decode("a,b\n1,2\n").unwrap());

        let indented = decode_with("a,b\n  # data\n", &options).unwrap();
        assert_eq!(indented, value!([{ "a": "  # data", "b": null }]));
    }

    #[test]
    fn test_decode_multi_byte_comment_marker() {
        let options = DecodeOptions::new().with_comment("//");
        let value = decode_with("// generated\na,b\n/x,1\n// end\n", &options).unwrap();
        assert_eq!(value, value!([{ "a": "/x", "b": "1" }]));
    }

    #[test]
    fn test_decode_error_offsets_skip_comment_lines() {
        let options = DecodeOptions::new().with_comment("#");
        let err = decode_with("a,b\n#skip\n\n1,2,3\n", &options).unwrap_err();
        assert_eq!(err.offset, 11);
        assert_eq!((err.line, err.column), (4, 1));
    }

    #[test]
    fn test_decode_quoted_fields() {
        let value = decode("a,b\n\"x,1\",\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(value, value!([{ "a": "x,1", "b": "say \"hi\"" }]));

        let multiline = decode("a\n\"l1\nl2\"\nnext\n").unwrap();
        assert_eq!(multiline, value!([{ "a": "l1\nl2" }, { "a": "next" }]));
    }

    #[test]
    fn test_decode_crlf_and_blank_lines() {
        let value = decode("a,b\r\n\r\n1,2\r\n\n3,\r\n").unwrap();
        assert_eq!(value, value!([{ "a": "1", "b": "2" }, { "a": "3", "b": "" }]));
    }

    #[test]
    fn test_decode_empty_input() {
        assert_eq!(decode("").unwrap(), Value::List(vec![]));
        assert_eq!(decode("a,b\n").unwrap(), Value::List(vec![]));
    }

    #[test]
    fn test_decode_pads_short_rows() {
        let value = decode("a,b,c\n1\n").unwrap();
        assert_eq!(value, value!([{ "a": "1", "b": null, "c": null }]));
    }

    #[test]
    fn test_decode_wide_row() {
        let err = decode("a,b\n1,2,3\n").unwrap_err();
        assert_eq!(err.reason, "record has 3 fields but header has 2");
        assert_eq!(err.line, 2);
        assert_eq!(err.offset, 4);

        let options = DecodeOptions::new().with_truncate_rows(true);
        let value = decode_with("a,b\n1,2,3\n", &options).unwrap();
        assert_eq!(value, value!([{ "a": "1", "b": "2" }]));
    }

    #[test]
    fn test_decode_strict_quotes() {
        let bare = decode("a\nx\"y\n").unwrap_err();
        assert_eq!(bare.line, 2);
        assert_eq!(bare.column, 2);

        let trailing = decode("a\n\"x\"y\n").unwrap_err();
        assert_eq!(trailing.reason, "unexpected character after closing quote");
        assert_eq!(trailing.offset, 5);

        let open = decode("a\n\"abc").unwrap_err();
        assert_eq!(open.reason, "unterminated quoted field");
        assert_eq!(open.offset, 2);
    }

    #[test]
    fn test_decode_lazy_quotes() {
        let options = DecodeOptions::new().with_lazy_quotes(true);
        assert_eq!(
            decode_with("a\nx\"y\n", &options).unwrap(),
            value!([{ "a": "x\"y" }])
        );
        assert_eq!(
            decode_with("a\n\"abc", &options).unwrap(),
            value!([{ "a": "abc" }])
        );
    }

    #[test]
    fn test_decode_duplicate_header() {
        let err = decode("a,b,a\n1,2,3\n").unwrap_err();
        assert!(err.reason.contains("duplicate column \"a\""));

        let options = DecodeOptions::new().with_header(Header::parse("x,x"));
        assert!(decode_with("1,2\n", &options).is_err());
    }

    #[test]
    fn test_decode_skip_lines_and_limit() {
        let options = DecodeOptions::new().with_skip_lines(2).with_limit(1);
        let value = decode_with("title\n\na,b\n1,2\n3,4\n", &options).unwrap();
        assert_eq!(value, value!([{ "a": "1", "b": "2" }]));
    }

    #[test]
    fn test_decode_other_delimiters() {
        let tsv = Tabular::tsv()
            .decode(b"a\tb\nx,y\tz\n", &DecodeOptions::new())
            .unwrap();
        assert_eq!(tsv, value!([{ "a": "x,y", "b": "z" }]));

        let psv = Tabular::psv()
            .decode(b"a|b\n1|2\n", &DecodeOptions::new())
            .unwrap();
        assert_eq!(psv, value!([{ "a": "1", "b": "2" }]));
    }

    #[test]
    fn test_encode_rows() {
        let value = value!([{ "a": 1, "b": "x" }, { "a": true, "b": null }]);
        assert_eq!(encode(&value), "a,b\n1,x\ntrue,\n");
    }

    #[test]
    fn test_encode_column_union() {
        let value = value!([{ "b": 1 }, { "a": 2, "b": 3 }]);
        assert_eq!(encode(&value), "b,a\n1,\n3,2\n");

        let sorted = encode_with(&value, &EncodeOptions::new().with_sorted(true)).unwrap();
        assert_eq!(sorted, "a,b\n,1\n2,3\n");
    }

    #[test]
    fn test_encode_quoting() {
        let value = value!([{ "a": "x,y", "b": "say \"hi\"", "c": "l1\nl2", "d": " pad" }]);
        assert_eq!(
            encode(&value),
            "a,b,c,d\n\"x,y\",\"say \"\"hi\"\"\",\"l1\nl2\", pad\n"
        );
    }

    #[test]
    fn test_encode_single_empty_cell() {
        let value = value!([{ "a": "" }, { "a": "x" }]);
        let output = encode(&value);
        assert_eq!(output, "a\n\"\"\nx\n");
        assert_eq!(decode(&output).unwrap(), value);
    }

    #[test]
    fn test_encode_guards_comment_marker() {
        let value = value!([{ "a": "#x", "b": "#y" }]);
        let options = EncodeOptions::new().with_comment("#");
        assert_eq!(encode_with(&value, &options).unwrap(), "a,b\n\"#x\",\"#y\"\n");

        let marked = encode_with(&value, &options.clone().with_comment_header(true)).unwrap();
        assert_eq!(marked, "#a,b\n\"#x\",\"#y\"\n");

        let header = value!([{ "#id": "1", "b": "2" }]);
        let output = encode_with(&header, &options).unwrap();
        assert_eq!(output, "\"#id\",\"b\"\n1,2\n");
        let back = decode_with(&output, &DecodeOptions::new().with_comment("#")).unwrap();
        assert_eq!(back, header);
    }

    #[test]
    fn test_tsv_empty_first_cell_survives_comment_marker() {
        let value = value!([{ "a": "", "b": "#x" }, { "a": "", "b": "" }]);
        let tsv = Tabular::tsv();
        let bytes = tsv
            .encode(&value, &EncodeOptions::new().with_comment("#"))
            .unwrap();
        let back = tsv
            .decode(&bytes, &DecodeOptions::new().with_comment("#"))
            .unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_encode_rows_without_columns() {
        let err = encode_with(&value!([{}, {}]), &EncodeOptions::new()).unwrap_err();
        assert_eq!(err.reason, "rows have no columns");
        assert!(encode_with(&value!({}), &EncodeOptions::new()).is_err());
    }

    #[test]
    fn test_encode_rejects_nested_cells() {
        let err = encode_with(&value!([{ "a": 1 }, { "a": [1] }]), &EncodeOptions::new())
            .unwrap_err();
        assert_eq!(err.reason, "row 2, column \"a\": cannot write a list into a cell");

        assert!(encode_with(&value!(["x"]), &EncodeOptions::new()).is_err());
        assert!(encode_with(&value!("x"), &EncodeOptions::new()).is_err());
    }

    #[test]
    fn test_encode_explicit_header() {
        let value = value!([{ "a": 1, "b": 2, "c": 3 }]);
        let options = EncodeOptions::new().with_header(Header::parse("c,a"));
        let err = encode_with(&value, &options).unwrap_err();
        assert!(err.reason.contains("\"b\" missing from the header"));

        let output = encode_with(&value, &options.with_truncate_rows(true)).unwrap();
        assert_eq!(output, "c,a\n3,1\n");
    }

    #[test]
    fn test_encode_single_mapping_and_empty() {
        assert_eq!(encode(&value!({ "a": 1 })), "a\n1\n");
        assert_eq!(encode(&Value::List(vec![])), "");

        let options = EncodeOptions::new().with_header(Header::parse("a,b"));
        assert_eq!(encode_with(&Value::List(vec![]), &options).unwrap(), "a,b\n");
    }

    #[test]
    fn test_encode_limit() {
        let value = value!([{ "a": 1 }, { "a": 2 }]);
        let output = encode_with(&value, &EncodeOptions::new().with_limit(1)).unwrap();
        assert_eq!(output, "a\n1\n");
    }

    #[test]
    fn test_tsv_roundtrip() {
        let value = value!([{ "a": "x\ty", "b": "plain" }]);
        let bytes = Tabular::tsv().encode(&value, &EncodeOptions::new()).unwrap();
        assert_eq!(bytes, b"a\tb\n\"x\ty\"\tplain\n");
        assert_eq!(
            Tabular::tsv().decode(&bytes, &DecodeOptions::new()).unwrap(),
            value
        );
    }
}
