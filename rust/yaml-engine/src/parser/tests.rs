// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Unit tests for the event parser.

use super::*;
use crate::settings::LoadSettings;

fn parser(input: &str, settings: &LoadSettings) -> Parser {
    Parser::new(Scanner::new(input, settings).unwrap())
}

fn events_with(input: &str, settings: &LoadSettings) -> Vec<String> {
    parser(input, settings)
        .map(|event| event.unwrap().notation())
        .collect()
}

fn events(input: &str) -> Vec<String> {
    events_with(input, &LoadSettings::default())
}

fn parse_error(input: &str) -> YamlError {
    parser(input, &LoadSettings::default())
        .collect::<Result<Vec<_>>>()
        .unwrap_err()
}

#[test]
fn test_empty_stream() {
    assert_eq!(events(""), vec!["+STR", "-STR"]);
    assert_eq!(events("# only a comment\n"), vec!["+STR", "-STR"]);
}

#[test]
fn test_block_collections() {
    assert_eq!(
        events("a: 1\nb:\n  - x\n  - y\n"),
        vec![
            "+STR", "+DOC", "+MAP", "=VAL :a", "=VAL :1", "=VAL :b", "+SEQ", "=VAL :x",
            "=VAL :y", "-SEQ", "-MAP", "-DOC", "-STR",
        ]
    );
}

#[test]
fn test_indentless_sequence() {
    assert_eq!(
        events("a:\n- 1\n- 2\nb: 3\n"),
        vec![
            "+STR", "+DOC", "+MAP", "=VAL :a", "+SEQ", "=VAL :1", "=VAL :2", "-SEQ", "=VAL :b",
            "=VAL :3", "-MAP", "-DOC", "-STR",
        ]
    );
}

#[test]
fn test_empty_values() {
    assert_eq!(
        events("a:\nb:\n- \n"),
        vec![
            "+STR", "+DOC", "+MAP", "=VAL :a", "=VAL :", "=VAL :b", "+SEQ", "=VAL :", "-SEQ",
            "-MAP", "-DOC", "-STR",
        ]
    );
    assert_eq!(
        events("? complex\n"),
        vec![
            "+STR", "+DOC", "+MAP", "=VAL :complex", "=VAL :", "-MAP", "-DOC", "-STR",
        ]
    );
}

#[test]
fn test_flow_collections() {
    assert_eq!(
        events("{a: [1, 2], b, ? c : d}"),
        vec![
            "+STR", "+DOC", "+MAP {}", "=VAL :a", "+SEQ []", "=VAL :1", "=VAL :2", "-SEQ",
            "=VAL :b", "=VAL :", "=VAL :c", "=VAL :d", "-MAP", "-DOC", "-STR",
        ]
    );
}

#[test]
fn test_single_pair_mapping_in_flow_sequence() {
    assert_eq!(
        events("[a: 1, b]"),
        vec![
            "+STR", "+DOC", "+SEQ []", "+MAP {}", "=VAL :a", "=VAL :1", "-MAP", "=VAL :b",
            "-SEQ", "-DOC", "-STR",
        ]
    );
}

#[test]
fn test_scalar_styles() {
    assert_eq!(
        events("- plain\n- 'single'\n- \"double\"\n- |\n  literal\n- >\n  folded\n"),
        vec![
            "+STR", "+DOC", "+SEQ", "=VAL :plain", "=VAL 'single", "=VAL \"double",
            "=VAL |literal\\n", "=VAL >folded\\n", "-SEQ", "-DOC", "-STR",
        ]
    );
}

#[test]
fn test_anchors_aliases_and_tags() {
    assert_eq!(
        events("- &a !!str x\n- *a\n- !local y\n- !<tag:e.com,2000:z> z\n- ! 1\n"),
        vec![
            "+STR",
            "+DOC",
            "+SEQ",
            "=VAL &a <tag:yaml.org,2002:str> :x",
            "=ALI *a",
            "=VAL <!local> :y",
            "=VAL <tag:e.com,2000:z> :z",
            "=VAL <!> :1",
            "-SEQ",
            "-DOC",
            "-STR",
        ]
    );
    // Properties on their own line belong to the collection below.
    assert_eq!(
        events("&m !!map\na: b\n"),
        vec![
            "+STR",
            "+DOC",
            "+MAP &m <tag:yaml.org,2002:map>",
            "=VAL :a",
            "=VAL :b",
            "-MAP",
            "-DOC",
            "-STR",
        ]
    );
}

#[test]
fn test_tag_directives() {
    assert_eq!(
        events("%TAG !e! tag:example.com,2000:\n--- !e!foo x\n"),
        vec![
            "+STR",
            "+DOC ---",
            "=VAL <tag:example.com,2000:foo> :x",
            "-DOC",
            "-STR"
        ]
    );
    // Directives apply to one document only.
    let err = parse_error("%TAG !e! tag:example.com,2000:\n--- a\n...\n--- !e!foo x\n");
    assert!(err.to_string().contains("found undefined tag handle !e!"), "{err}");
}

#[test]
fn test_implicit_flags() {
    let mut parser = parser("- a\n- 'b'\n- !!str c\n- ! d\n", &LoadSettings::default());
    let mut implicit = Vec::new();
    while let Some(event) = parser.next_event().unwrap() {
        if let EventKind::Scalar { implicit: flags, .. } = event.kind {
            implicit.push((flags.plain, flags.quoted));
        }
    }
    assert_eq!(
        implicit,
        vec![(true, false), (false, true), (false, false), (true, false)]
    );
}

#[test]
fn test_multiple_documents() {
    assert_eq!(
        events("a\n---\nb\n...\nc\n"),
        vec![
            "+STR", "+DOC", "=VAL :a", "-DOC", "+DOC ---", "=VAL :b", "-DOC ...", "+DOC",
            "=VAL :c", "-DOC", "-STR",
        ]
    );
    assert_eq!(
        events("---\n---\n"),
        vec![
            "+STR", "+DOC ---", "=VAL :", "-DOC", "+DOC ---", "=VAL :", "-DOC", "-STR",
        ]
    );
}

#[test]
fn test_document_start_carries_directives() {
    let mut parser = parser(
        "%YAML 1.2\n%TAG !e! tag:example.com,2000:\n---\nx\n",
        &LoadSettings::default(),
    );
    parser.next_event().unwrap();
    let event = parser.next_event().unwrap().unwrap();
    let EventKind::DocumentStart {
        explicit,
        version,
        tags,
    } = event.kind
    else {
        panic!("expected a document start, got {event}");
    };
    assert!(explicit);
    assert_eq!(version, Some((1, 2)));
    assert_eq!(
        tags.get("!e!").map(String::as_str),
        Some("tag:example.com,2000:")
    );
    assert!(!tags.contains_key("!!"));
}

#[test]
fn test_comment_events() {
    let settings = LoadSettings::builder()
        .with_parse_comments(true)
        .build()
        .unwrap();
    assert_eq!(
        events_with("# head\na: 1 # tail\n\nb: 2\n", &settings),
        vec![
            "+STR", "# head", "+DOC", "+MAP", "=VAL :a", "=VAL :1", "# tail", "#", "=VAL :b",
            "=VAL :2", "-MAP", "-DOC", "-STR",
        ]
    );
}

#[test]
fn test_peek_and_check() {
    let mut parser = parser("a", &LoadSettings::default());
    assert!(parser.check_event(&[EventId::StreamStart]).unwrap());
    assert_eq!(parser.peek_event().unwrap().unwrap().id(), EventId::StreamStart);
    assert_eq!(parser.next_event().unwrap().unwrap().id(), EventId::StreamStart);
    assert!(parser.check_event(&[EventId::DocumentStart]).unwrap());
}

#[test]
fn test_parser_errors() {
    let test_cases = [
        ("- a\nb: c\n", "while parsing a block collection"),
        ("[a, b", "expected ',' or ']'"),
        ("{a: b", "expected ',' or '}'"),
        ("%YAML 1.2\n%YAML 1.2\n---\n", "found duplicate YAML directive"),
        ("%YAML 2.0\n---\n", "found incompatible YAML document"),
        (
            "%TAG !e! a:\n%TAG !e! b:\n---\n",
            "duplicate tag handle !e!",
        ),
        ("!x!y z", "found undefined tag handle !x!"),
        ("%YAML 1.2\nfoo\n", "expected '<document start>'"),
        ("[a]\n%YAML 1.2\n---\n", "'<document end>' before directives"),
        ("- ]", "while parsing a block node"),
    ];
    for (input, message) in test_cases {
        let err = parse_error(input);
        assert!(err.to_string().contains(message), "{input:?}: {err}");
    }
}

#[test]
fn test_parser_is_fused_after_error() {
    let mut parser = parser("[a, b", &LoadSettings::default());
    let mut saw_error = false;
    for event in parser.by_ref() {
        if event.is_err() {
            saw_error = true;
            break;
        }
    }
    assert!(saw_error);
    assert!(parser.next().is_none());
}
