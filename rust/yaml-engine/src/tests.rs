// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Tests of the top-level load and dump functions.

use serde_json::json;

use super::*;

fn load_default(input: &str) -> Value {
    load(input, &LoadSettings::default()).unwrap()
}

fn load_error(input: &str, settings: &LoadSettings) -> YamlError {
    load(input, settings).unwrap_err()
}

#[test]
fn test_empty_input() {
    let settings = LoadSettings::default();
    assert!(load_default("").is_null());
    assert!(compose("", &settings).unwrap().is_none());
    assert!(load_all("", &settings).unwrap().is_empty());
    assert!(load_default("# only a comment\n").is_null());
}

#[test]
fn test_load_nested_structure() {
    let input = "
name: John
address:
  street: 123 Main St
  city: Springfield
items:
  - {name: foo, value: 1}
  - {name: bar, value: 2.5}
flags: [true, null, ~]
";
    let value = load_default(input);
    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!({
            "name": "John",
            "address": {"street": "123 Main St", "city": "Springfield"},
            "items": [{"name": "foo", "value": 1}, {"name": "bar", "value": 2.5}],
            "flags": [true, null, null],
        })
    );
}

#[test]
fn test_load_all() {
    let values = load_all("a\n---\nb\n...\n--- [c]\n", &LoadSettings::default()).unwrap();
    assert_eq!(
        values,
        vec![
            Value::String("a".to_owned()),
            Value::String("b".to_owned()),
            Value::Sequence(vec![Value::String("c".to_owned())]),
        ]
    );
}

#[test]
fn test_single_document_expected() {
    let err = load_error("a\n---\nb\n", &LoadSettings::default());
    assert_eq!(err.kind, ErrorKind::SingleDocumentExpected);
    assert!(err.suggestion().is_some());
}

#[test]
fn test_aliases_load_as_copies() {
    let value = load_default("base: &b {x: 1}\ncopy: *b\n");
    assert_eq!(value.get("base"), value.get("copy"));
}

#[test]
fn test_undefined_alias() {
    let err = load_error("a: *missing\n", &LoadSettings::default());
    assert_eq!(err.kind, ErrorKind::UndefinedAlias("missing".to_owned()));
    let mark = err.problem_mark.as_ref().unwrap();
    assert_eq!((mark.line(), mark.column()), (0, 3));
    assert!(err.suggestion().is_some());
}

#[test]
fn test_duplicate_keys() {
    let err = load_error("{a: 1, a: 2}", &LoadSettings::default());
    assert!(matches!(err.kind, ErrorKind::DuplicateKey(_)));

    let settings = LoadSettings::builder()
        .with_allow_duplicate_keys(true)
        .build()
        .unwrap();
    let value = load("{a: 1, b: 0, a: 2}", &settings).unwrap();
    assert_eq!(value.get("a"), Some(&Value::Int(2)));
    assert_eq!(value.as_mapping().map(<[_]>::len), Some(2));
}

#[test]
fn test_code_point_limit() {
    let settings = LoadSettings::builder()
        .with_code_point_limit(4)
        .build()
        .unwrap();
    let err = parse("abcdefgh", &settings).unwrap_err();
    assert_eq!(err.kind, ErrorKind::CodePointLimit(4));
    assert!(load("abc", &settings).is_ok());
}

#[test]
fn test_error_display_has_snippet() {
    let err = load_error("key: [a, b\n", &LoadSettings::default());
    let text = err.to_string();
    assert!(text.contains("line 2"), "{text}");
    assert!(text.contains('^'), "{text}");
}

#[test]
fn test_parse_then_emit() {
    let input = "- a\n- &x b\n- *x\n- {k: v}\n";
    let events = parse(input, &LoadSettings::default())
        .unwrap()
        .collect::<Result<Vec<_>>>()
        .unwrap();
    let notation: Vec<String> = events.iter().map(Event::notation).collect();
    assert_eq!(
        notation,
        vec![
            "+STR", "+DOC", "+SEQ", "=VAL :a", "=VAL &x :b", "=ALI *x", "+MAP {}", "=VAL :k",
            "=VAL :v", "-MAP", "-SEQ", "-DOC", "-STR",
        ]
    );
    assert_eq!(emit(events, &DumpSettings::default()).unwrap(), input);
}

#[test]
fn test_dump() {
    let input = "name: demo\nitems:\n- 1\n- 2.5\n- true\n- null\n- 'text'\nnested:\n  key: value\n";
    let text = dump(&load_default(input), &DumpSettings::default()).unwrap();
    assert_eq!(
        text,
        "name: demo\nitems:\n- 1\n- 2.5\n- true\n- null\n- text\nnested:\n  key: value\n"
    );
}

#[test]
fn test_dump_quotes_strings_that_resolve_otherwise() {
    let value = Value::Sequence(vec![
        Value::String("true".to_owned()),
        Value::String("12".to_owned()),
        Value::String("null".to_owned()),
        Value::String("plain".to_owned()),
    ]);
    let text = dump(&value, &DumpSettings::default()).unwrap();
    assert_eq!(text, "- 'true'\n- '12'\n- 'null'\n- plain\n");
    assert_eq!(load_default(&text), value);
}

#[test]
fn test_dump_all() {
    let values = [Value::Int(1), Value::String("two".to_owned())];
    let text = dump_all(&values, &DumpSettings::default()).unwrap();
    assert_eq!(text, "1\n--- two\n");
    assert_eq!(load_all(&text, &LoadSettings::default()).unwrap(), values);
}

#[test]
fn test_comments_survive_compose_and_serialize() {
    let input = "# head\na: 1 # tail\n\nb: 2\n";
    let load_settings = LoadSettings::builder()
        .with_parse_comments(true)
        .build()
        .unwrap();
    let document = compose(input, &load_settings).unwrap().unwrap();

    let dump_settings = DumpSettings::builder()
        .with_dump_comments(true)
        .build()
        .unwrap();
    assert_eq!(serialize(&document, &dump_settings).unwrap(), input);
    assert_eq!(
        serialize(&document, &DumpSettings::default()).unwrap(),
        "a: 1\nb: 2\n"
    );
}
