use simple_serializer::formats::{Json, Tabular};
use simple_serializer::{
    convert, convert_with_options, convert_with_registry, decode, encode, value, DecodeError,
    DecodeOptions, Delimiter, EncodeError, EncodeOptions, Error, Format, Header, Number, Registry,
    Side, Value,
};
use std::sync::Arc;

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_unknown_output_format() {
    let err = convert(b"{}", "json", "", "", "bogus").unwrap_err();
    assert_eq!(
        err,
        Error::UnknownFormat {
            side: Side::Output,
            name: "bogus".to_string()
        }
    );
}

#[test]
fn test_unknown_input_format_reported_before_output() {
    let err = convert(b"{}", "bogus", "", "", "also-bogus").unwrap_err();
    assert_eq!(err, Error::unknown_format(Side::Input, "bogus"));
}

#[test]
fn test_format_names_ignore_case() {
    let lower = convert(b"a,b\n1,2\n", "csv", "", "", "json").unwrap();
    let upper = convert(b"a,b\n1,2\n", "CSV", "", "", "Json").unwrap();
    assert_eq!(lower, upper);
}

#[test]
fn test_csv_header_inference() {
    let value = decode(b"a,b\n1,2\n3,4\n", "csv", &DecodeOptions::new()).unwrap();
    assert_eq!(value, value!([{ "a": "1", "b": "2" }, { "a": "3", "b": "4" }]));

    let json = convert(b"a,b\n1,2\n3,4\n", "csv", "", "", "json").unwrap();
    assert_eq!(text(json), r#"[{"a":"1","b":"2"},{"a":"3","b":"4"}]"#);
}

#[test]
fn test_comment_lines_are_skipped() {
    let with_comment = convert(b"#note\na,b\n1,2\n", "csv", "", "#", "json").unwrap();
    let without = convert(b"a,b\n1,2\n", "csv", "", "#", "json").unwrap();
    assert_eq!(with_comment, without);
}

#[test]
fn test_json_to_yaml_sample() {
    let yaml = text(convert(br#"{"a":"b","c":["d"]}"#, "json", "", "", "yaml").unwrap());
    assert!(yaml.contains("a: b"));
    assert!(yaml.contains("c:\n- d"));

    let back = convert(yaml.as_bytes(), "yaml", "", "", "json").unwrap();
    assert_eq!(text(back), r#"{"a":"b","c":["d"]}"#);
}

#[test]
fn test_row_width_mismatch() {
    let input = b"a,b\n1,2,3\n";

    let err = convert(input, "csv", "", "", "json").unwrap_err();
    match err {
        Error::Decode(DecodeError { line, ref reason, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(reason, "record has 3 fields but header has 2");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let output = convert_with_options(
        input,
        "csv",
        &DecodeOptions::new().with_truncate_rows(true),
        "json",
        &EncodeOptions::new(),
    )
    .unwrap();
    assert_eq!(text(output), r#"[{"a":"1","b":"2"}]"#);
}

#[test]
fn test_explicit_header_orders_output_columns() {
    let output = convert(
        br#"[{"id":1,"name":"alice"},{"id":2,"name":"bob"}]"#,
        "json",
        "name,id",
        "",
        "csv",
    )
    .unwrap();
    assert_eq!(text(output), "name,id\nalice,1\nbob,2\n");
}

#[test]
fn test_yaml_table_to_tsv_and_back() {
    let yaml = b"- name: alice\n  team: core\n- name: bob\n  team: tools\n";
    let tsv = convert(yaml, "yaml", "", "", "tsv").unwrap();
    assert_eq!(text(tsv.clone()), "name\tteam\nalice\tcore\nbob\ttools\n");

    let back = decode(&tsv, "tsv", &DecodeOptions::new()).unwrap();
    assert_eq!(back, decode(yaml, "yaml", &DecodeOptions::new()).unwrap());
}

#[test]
fn test_jsonl_and_csv() {
    let jsonl = convert(b"a,b\n1,2\n3,4\n", "csv", "", "", "ndjson").unwrap();
    assert_eq!(text(jsonl.clone()), "{\"a\":\"1\",\"b\":\"2\"}\n{\"a\":\"3\",\"b\":\"4\"}\n");

    let csv = convert(&jsonl, "jsonl", "", "", "csv").unwrap();
    assert_eq!(text(csv), "a,b\n1,2\n3,4\n");
}

#[test]
fn test_nested_values_cannot_become_cells() {
    let err = convert(br#"[{"a":{"b":1}}]"#, "json", "", "", "psv").unwrap_err();
    assert_eq!(
        err,
        Error::Encode(EncodeError::new(
            "psv",
            "row 1, column \"a\": cannot write a mapping into a cell"
        ))
    );
}

#[test]
fn test_number_provenance_survives_json_and_yaml() {
    let input = br#"{"i":1,"f":1.0,"e":2e3,"big":123456789012345678901234567890}"#;
    let value = decode(input, "json", &DecodeOptions::new()).unwrap();
    let map = value.as_mapping().unwrap();
    assert_eq!(map.get("i"), Some(&Value::Number(Number::Integer(1))));
    assert_eq!(map.get("f"), Some(&Value::Number(Number::Float(1.0))));
    assert_eq!(map.get("e"), Some(&Value::Number(Number::Float(2000.0))));
    assert!(matches!(map.get("big"), Some(Value::Number(Number::BigInt(_)))));

    let json = text(encode(&value, "json", &EncodeOptions::new()).unwrap());
    assert_eq!(
        json,
        r#"{"i":1,"f":1.0,"e":2000.0,"big":123456789012345678901234567890}"#
    );

    let yaml = encode(&value, "yaml", &EncodeOptions::new()).unwrap();
    assert_eq!(decode(&yaml, "yaml", &DecodeOptions::new()).unwrap(), value);
}

#[test]
fn test_oversized_integer_cannot_become_yaml() {
    let input = format!("[{}]", "7".repeat(60));
    let err = convert(input.as_bytes(), "json", "", "", "yaml").unwrap_err();
    assert!(matches!(err, Error::Encode(ref e) if e.format == "yaml"), "{:?}", err);
}

#[test]
fn test_toml_and_json() {
    let toml = b"name = \"web\"\n\n[server]\nport = 8080\nhosts = [\"a\", \"b\"]\n";
    let json = convert(toml, "toml", "", "", "json").unwrap();
    assert_eq!(
        text(json.clone()),
        r#"{"name":"web","server":{"port":8080,"hosts":["a","b"]}}"#
    );

    let back = convert(&json, "json", "", "", "toml").unwrap();
    assert_eq!(
        decode(&back, "toml", &DecodeOptions::new()).unwrap(),
        decode(toml, "toml", &DecodeOptions::new()).unwrap()
    );

    let err = convert(br#"{"a":null}"#, "json", "", "", "toml").unwrap_err();
    assert!(matches!(err, Error::Encode(ref e) if e.format == "toml"), "{:?}", err);
}

#[test]
fn test_comment_marker_round_trips_through_tsv() {
    let json = br##"[{"id":"","note":"#x"},{"id":"#1","note":"y"}]"##;
    let tsv = convert(json, "json", "", "#", "tsv").unwrap();
    let back = convert(&tsv, "tsv", "", "#", "json").unwrap();
    assert_eq!(back, json.to_vec());
}

#[test]
fn test_decode_error_display() {
    let err = convert(b"{\n  \"a\": x\n}", "json", "", "", "yaml").unwrap_err();
    assert!(
        err.to_string()
            .starts_with("failed to decode json at line 2, column 8 (byte 9): "),
        "{}",
        err
    );
}

#[test]
fn test_json_output_reads_back_in_serde_json() {
    let documents = [
        r#"{"name":"alice","tags":["a","b"],"score":9.5,"admin":false,"manager":null}"#,
        r#"[1,-2,3.25,"\u00e9\ud83d\ude00","line\nbreak",{"nested":[[],{}]}]"#,
        r#"  {"z":1,"a":2,"m":{"k":"v"}}  "#,
    ];
    for document in documents {
        let ours = decode(document.as_bytes(), "json", &DecodeOptions::new()).unwrap();
        let encoded = encode(&ours, "json", &EncodeOptions::new()).unwrap();
        let reparsed: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        let expected: serde_json::Value = serde_json::from_str(document).unwrap();
        assert_eq!(reparsed, expected, "{}", document);
    }
}

/// Splits a payload into a list of its lines.
struct Lines;

impl Format for Lines {
    fn name(&self) -> &str {
        "lines"
    }

    fn decode(&self, input: &[u8], _options: &DecodeOptions) -> Result<Value, DecodeError> {
        let text = std::str::from_utf8(input)
            .map_err(|e| DecodeError::new("lines", e.valid_up_to(), 1, 1, "invalid UTF-8"))?;
        Ok(Value::List(text.lines().map(Value::from).collect()))
    }

    fn encode(&self, value: &Value, _options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
        let items = value
            .as_list()
            .ok_or_else(|| EncodeError::new("lines", "expected a list"))?;
        let mut out = String::new();
        for item in items {
            let line = item
                .scalar_text()
                .ok_or_else(|| EncodeError::new("lines", "expected scalars"))?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

#[test]
fn test_registry_accepts_new_formats() {
    let mut registry = Registry::with_builtin_formats().unwrap();
    registry.register("lines", Arc::new(Lines)).unwrap();
    registry
        .register("ssv", Arc::new(Tabular::new("ssv", Delimiter::Pipe)))
        .unwrap();

    let output = convert_with_registry(
        &registry,
        b"alpha\nbeta\n",
        "LINES",
        &DecodeOptions::new(),
        "json",
        &EncodeOptions::new(),
    )
    .unwrap();
    assert_eq!(text(output), r#"["alpha","beta"]"#);

    let err = registry.register("Json", Arc::new(Json)).unwrap_err();
    assert_eq!(err, Error::duplicate_format("json"));
}

#[test]
fn test_header_option_round_trip_without_header_row() {
    let options = DecodeOptions::new().with_header(Header::parse("x,y"));
    let value = decode(b"1,2\n3,4\n", "csv", &options).unwrap();
    let csv = encode(
        &value,
        "csv",
        &EncodeOptions::new().with_header(Header::parse("y,x")),
    )
    .unwrap();
    assert_eq!(text(csv), "y,x\n2,1\n4,3\n");
}
