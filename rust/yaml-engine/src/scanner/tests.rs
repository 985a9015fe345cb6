// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Unit tests for the scanner.

use super::*;
use crate::anchor::Anchor;

fn scan(input: &str) -> Vec<Token> {
    scan_with(input, &LoadSettings::default())
}

fn scan_with(input: &str, settings: &LoadSettings) -> Vec<Token> {
    Scanner::new(input, settings)
        .unwrap()
        .collect::<Result<Vec<_>>>()
        .unwrap()
}

fn ids(input: &str) -> Vec<TokenId> {
    scan(input).iter().map(Token::id).collect()
}

fn scalars(input: &str) -> Vec<(String, ScalarStyle)> {
    scan(input)
        .into_iter()
        .filter_map(|token| match token.kind {
            TokenKind::Scalar { value, style, .. } => Some((value, style)),
            _ => None,
        })
        .collect()
}

fn scan_error(input: &str) -> YamlError {
    Scanner::new(input, &LoadSettings::default())
        .unwrap()
        .collect::<Result<Vec<_>>>()
        .unwrap_err()
}

#[test]
fn test_empty_stream() {
    assert_eq!(ids(""), vec![TokenId::StreamStart, TokenId::StreamEnd]);
}

#[test]
fn test_block_mapping() {
    use TokenId::*;
    assert_eq!(
        ids("a: 1\nb: 2\n"),
        vec![
            StreamStart,
            BlockMappingStart,
            Key,
            Scalar,
            Value,
            Scalar,
            Key,
            Scalar,
            Value,
            Scalar,
            BlockEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_nested_block_sequence_in_mapping() {
    use TokenId::*;
    // The sequence is indentless: no BlockSequenceStart.
    assert_eq!(
        ids("key:\n- a\n- b\n"),
        vec![
            StreamStart,
            BlockMappingStart,
            Key,
            Scalar,
            Value,
            BlockEntry,
            Scalar,
            BlockEntry,
            Scalar,
            BlockEnd,
            StreamEnd,
        ]
    );
    assert_eq!(
        ids("- - a\n  - b\n- c\n"),
        vec![
            StreamStart,
            BlockSequenceStart,
            BlockEntry,
            BlockSequenceStart,
            BlockEntry,
            Scalar,
            BlockEntry,
            Scalar,
            BlockEnd,
            BlockEntry,
            Scalar,
            BlockEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_flow_collections() {
    use TokenId::*;
    assert_eq!(
        ids("{a: [1, 2], b}"),
        vec![
            StreamStart,
            FlowMappingStart,
            Key,
            Scalar,
            Value,
            FlowSequenceStart,
            Scalar,
            FlowEntry,
            Scalar,
            FlowSequenceEnd,
            FlowEntry,
            Scalar,
            FlowMappingEnd,
            StreamEnd,
        ]
    );
}

#[test]
fn test_documents_and_directives() {
    use TokenId::*;
    assert_eq!(
        ids("%YAML 1.2\n--- a\n...\n"),
        vec![
            StreamStart,
            Directive,
            DocumentStart,
            Scalar,
            DocumentEnd,
            StreamEnd
        ]
    );
    let tokens = scan("%TAG !e! tag:example.com,2000:app/\n---\n");
    assert!(tokens.iter().any(|token| matches!(
        &token.kind,
        TokenKind::TagDirective { handle, prefix }
            if handle == "!e!" && prefix == "tag:example.com,2000:app/"
    )));
}

#[test]
fn test_properties() {
    let tokens = scan("&a !!str x: *a\n");
    let kinds: Vec<&TokenKind> = tokens.iter().map(|token| &token.kind).collect();
    assert!(kinds.contains(&&TokenKind::Anchor(Anchor::new("a").unwrap())));
    assert!(kinds.contains(&&TokenKind::Alias(Anchor::new("a").unwrap())));
    assert!(kinds.contains(&&TokenKind::Tag {
        handle: Some("!!".to_owned()),
        suffix: "str".to_owned(),
    }));

    let verbatim = scan("!<tag:yaml.org,2002:int> 1");
    assert!(verbatim.iter().any(|token| token.kind
        == TokenKind::Tag {
            handle: None,
            suffix: "tag:yaml.org,2002:int".to_owned(),
        }));

    let escaped = scan("!e%21x 1");
    assert!(escaped.iter().any(|token| token.kind
        == TokenKind::Tag {
            handle: Some("!".to_owned()),
            suffix: "e!x".to_owned(),
        }));
}

#[test]
fn test_plain_scalars() {
    let test_cases = [
        ("a b", "a b"),
        ("a\n b\n\n c", "a b\nc"),
        ("url: http://x.y/z", "http://x.y/z"),
        ("-x", "-x"),
        ("a # comment", "a"),
        ("a#b", "a#b"),
    ];
    for (input, expected) in test_cases {
        let values = scalars(input);
        let last = values.last().unwrap();
        assert_eq!(last.0, expected, "{input:?}");
        assert_eq!(last.1, ScalarStyle::Plain);
    }
    assert_eq!(
        scalars("[a:b, c]")
            .into_iter()
            .map(|(value, _)| value)
            .collect::<Vec<_>>(),
        vec!["a:b", "c"]
    );
}

#[test]
fn test_quoted_scalars() {
    let test_cases = [
        ("'it''s'", "it's", ScalarStyle::SingleQuoted),
        ("'a\n  b'", "a b", ScalarStyle::SingleQuoted),
        ("'a\n\n  b'", "a\nb", ScalarStyle::SingleQuoted),
        (r#""a\tb\n""#, "a\tb\n", ScalarStyle::DoubleQuoted),
        (r#""\x41\u00e9\U0001F600""#, "Aé😀", ScalarStyle::DoubleQuoted),
        ("\"a\\\n  b\"", "ab", ScalarStyle::DoubleQuoted),
        (r#""\N\_\L\P\/""#, "\u{85}\u{a0}\u{2028}\u{2029}/", ScalarStyle::DoubleQuoted),
    ];
    for (input, expected, style) in test_cases {
        assert_eq!(
            scalars(input),
            vec![(expected.to_owned(), style)],
            "{input:?}"
        );
    }
}

#[test]
fn test_block_scalars() {
    let test_cases = [
        ("|\n  a\n  b\n", "a\nb\n"),
        ("|-\n  a\n\n", "a"),
        ("|+\n  a\n\n", "a\n\n"),
        (">\n  a\n  b\n\n  c\n", "a b\nc\n"),
        (">\n  a\n    b\n  c\n", "a\n  b\nc\n"),
        ("|2\n   a\n", " a\n"),
        ("|-2\n   a\n", " a"),
        ("|2-\n   a\n", " a"),
        ("|\n  a", "a"),
    ];
    for (input, expected) in test_cases {
        let values = scalars(input);
        assert_eq!(values.len(), 1, "{input:?}");
        assert_eq!(values[0].0, expected, "{input:?}");
    }
}

#[test]
fn test_comments_are_tokens_when_enabled() {
    let settings = LoadSettings::builder()
        .with_parse_comments(true)
        .build()
        .unwrap();
    let tokens = scan_with("# head\n\na: 1 # tail\n", &settings);
    let comments: Vec<(CommentType, String)> = tokens
        .into_iter()
        .filter_map(|token| match token.kind {
            TokenKind::Comment {
                comment_type,
                value,
            } => Some((comment_type, value)),
            _ => None,
        })
        .collect();
    assert_eq!(
        comments,
        vec![
            (CommentType::Block, " head".to_owned()),
            (CommentType::Blank, String::new()),
            (CommentType::InLine, " tail".to_owned()),
        ]
    );
    assert!(!ids("# head\na: 1 # tail\n").contains(&TokenId::Comment));
}

#[test]
fn test_marks() {
    let tokens = scan("a:\n  b: c\n");
    let scalar = tokens
        .iter()
        .find(|token| token.kind
            == TokenKind::Scalar {
                value: "c".to_owned(),
                plain: true,
                style: ScalarStyle::Plain,
            })
        .unwrap();
    assert_eq!(scalar.start.line(), 1);
    assert_eq!(scalar.start.column(), 5);
    assert_eq!(scalar.end.column(), 6);
}

#[test]
fn test_scanner_errors() {
    let test_cases = [
        ("\"abc", "found unexpected end of stream"),
        ("a: \"\\q\"", "found unknown escape character q"),
        ("key: @value", "found character '@' that cannot start any token"),
        ("a: 1\nb\nc: 2", "could not find expected ':'"),
        ("|0\n a", "expected indentation indicator in the range 1-9, but found 0"),
        ("a: b: c", "mapping values are not allowed here"),
        ("!<tag 1", "expected '>', but found  "),
        ("%YAML 1\n---", "expected a digit or '.', but found \\n"),
    ];
    for (input, problem) in test_cases {
        let err = scan_error(input);
        assert!(
            err.to_string().contains(problem),
            "{input:?}: {err}"
        );
    }
}

#[test]
fn test_simple_key_length_limit() {
    let settings = LoadSettings::builder()
        .with_max_simple_key_length(4)
        .build()
        .unwrap();
    let err = Scanner::new("- abcdefgh: 1", &settings)
        .unwrap()
        .collect::<Result<Vec<_>>>()
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Scanner(_)));
    assert!(
        Scanner::new("abc: 1", &settings)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .is_ok()
    );
}

#[test]
fn test_tabs() {
    // Tabs may separate tokens but never indent block content.
    assert_eq!(scalars("a:\tb").last().unwrap().0, "b");
    assert!(
        Scanner::new("a:\n\tb: c", &LoadSettings::default())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .is_err()
    );
}

#[test]
fn test_scanner_is_fused_after_error() {
    let mut scanner = Scanner::new("\"abc", &LoadSettings::default()).unwrap();
    assert!(matches!(scanner.next(), Some(Ok(_))));
    assert!(matches!(scanner.next(), Some(Err(_))));
    assert!(scanner.next().is_none());
}
