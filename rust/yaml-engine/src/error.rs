// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Error types shared by every stage of the pipeline.

use crate::mark::Mark;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, YamlError>;

/// An error raised while loading or dumping YAML.
///
/// Marked errors carry up to two positions: the `context_mark` points at the
/// construct being processed ("while scanning a block scalar") and the
/// `problem_mark` points at the offending character or event.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlError {
    /// The kind of error, including the problem description
    pub kind: ErrorKind,
    /// What was being processed when the problem was found
    pub context: Option<String>,
    /// Where the context started
    pub context_mark: Option<Mark>,
    /// Where the problem was found
    pub problem_mark: Option<Mark>,
}

/// The kind of error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input contains a character outside the YAML printable set
    Reader(String),

    /// The input exceeds the configured code point limit
    CodePointLimit(usize),

    /// Lexical error raised by the scanner
    Scanner(String),

    /// Grammar error raised by the parser
    Parser(String),

    /// An alias refers to an anchor that was never defined
    UndefinedAlias(String),

    /// More aliases to collections than allowed by the load settings
    TooManyAliases(usize),

    /// Collections are nested deeper than the load settings allow
    NestingDepth(usize),

    /// A mapping key refers back to one of its ancestors
    RecursiveKey,

    /// The same key appears twice in a mapping
    DuplicateKey(String),

    /// A node that contains itself cannot become an owned value
    RecursiveValue,

    /// No constructor is registered for an explicit tag
    MissingConstructor(String),

    /// A scalar cannot be constructed as its tag demands
    InvalidScalar { tag: String, value: String },

    /// An anchor name contains characters YAML does not allow
    InvalidAnchor(String),

    /// The event stream cannot be written as YAML text
    Emitter(String),

    /// A settings builder rejected a value
    InvalidSetting { name: &'static str, reason: String },

    /// `compose` found more than one document
    SingleDocumentExpected,

    /// The output sink refused the text
    Write,

    /// A pipeline invariant does not hold
    Internal(String),
}

impl ErrorKind {
    /// Get a suggestion for how to fix this error.
    ///
    /// Returns `Some(suggestion)` if a helpful fix suggestion is available,
    /// or `None` if no specific suggestion applies.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UndefinedAlias(_) => {
                Some("Define the anchor with &name before referencing it with *name")
            }
            Self::TooManyAliases(_) => Some(
                "Raise LoadSettings::max_aliases_for_collections if the document is trusted",
            ),
            Self::RecursiveKey => {
                Some("Enable LoadSettings::allow_recursive_keys to accept self-referencing keys")
            }
            Self::DuplicateKey(_) => Some("Remove or rename one of the duplicate keys"),
            Self::CodePointLimit(_) => {
                Some("Raise LoadSettings::code_point_limit or split the input into smaller streams")
            }
            Self::SingleDocumentExpected => {
                Some("Use compose_all or load_all to read multi-document streams")
            }
            Self::InvalidAnchor(_) => {
                Some("Anchor names must not contain whitespace or any of ,[]{}*&")
            }
            Self::NestingDepth(_) => Some("Raise LoadSettings::max_nesting_depth if the document is trusted"),
            // No specific suggestion for these
            Self::Reader(_)
            | Self::Scanner(_)
            | Self::Parser(_)
            | Self::RecursiveValue
            | Self::MissingConstructor(_)
            | Self::InvalidScalar { .. }
            | Self::Emitter(_)
            | Self::InvalidSetting { .. }
            | Self::Write
            | Self::Internal(_) => None,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reader(problem)
            | Self::Scanner(problem)
            | Self::Parser(problem)
            | Self::Emitter(problem) => write!(f, "{problem}"),
            Self::CodePointLimit(limit) => write!(
                f,
                "The incoming YAML document exceeds the limit: {limit} code points."
            ),
            Self::UndefinedAlias(name) => write!(f, "found undefined alias {name}"),
            Self::TooManyAliases(max) => write!(
                f,
                "Number of aliases for non-scalar nodes exceeds the specified max={max}"
            ),
            Self::NestingDepth(max) => {
                write!(f, "Nesting depth exceeds the specified max={max}")
            }
            Self::RecursiveKey => write!(
                f,
                "Recursive key for mapping is detected but it is not configured to be allowed"
            ),
            Self::DuplicateKey(key) => write!(f, "found duplicate key {key}"),
            Self::RecursiveValue => {
                write!(f, "found recursive node, which cannot be constructed")
            }
            Self::MissingConstructor(tag) => {
                write!(f, "could not determine a constructor for the tag {tag}")
            }
            Self::InvalidScalar { tag, value } => {
                write!(f, "cannot construct {tag} from '{value}'")
            }
            Self::InvalidAnchor(name) => write!(f, "invalid anchor name: {name}"),
            Self::InvalidSetting { name, reason } => {
                write!(f, "invalid setting {name}: {reason}")
            }
            Self::SingleDocumentExpected => {
                write!(f, "expected a single document in the stream")
            }
            Self::Write => write!(f, "failed to write the emitted text"),
            Self::Internal(detail) => write!(f, "internal error: {detail}"),
        }
    }
}

impl YamlError {
    /// Create an error with a kind and an optional problem position.
    #[must_use]
    pub const fn new(kind: ErrorKind, problem_mark: Option<Mark>) -> Self {
        Self {
            kind,
            context: None,
            context_mark: None,
            problem_mark,
        }
    }

    /// Attach the context the problem was found in.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>, mark: Option<Mark>) -> Self {
        self.context = Some(context.into());
        self.context_mark = mark;
        self
    }

    pub(crate) fn scanner(
        context: &str,
        context_mark: Mark,
        problem: impl Into<String>,
        problem_mark: Mark,
    ) -> Self {
        Self::new(ErrorKind::Scanner(problem.into()), Some(problem_mark))
            .with_context(context, Some(context_mark))
    }

    pub(crate) fn parser(problem: impl Into<String>, problem_mark: Mark) -> Self {
        Self::new(ErrorKind::Parser(problem.into()), Some(problem_mark))
    }

    pub(crate) fn emitter(problem: impl Into<String>) -> Self {
        Self::new(ErrorKind::Emitter(problem.into()), None)
    }

    pub(crate) fn setting(name: &'static str, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::InvalidSetting {
                name,
                reason: reason.into(),
            },
            None,
        )
    }

    /// Get a suggestion for how to fix this error.
    ///
    /// Delegates to [`ErrorKind::suggestion()`].
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        self.kind.suggestion()
    }
}

impl std::fmt::Display for YamlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines: Vec<String> = Vec::with_capacity(4);
        if let Some(context) = &self.context {
            lines.push(context.clone());
        }
        // The context mark is redundant when it points at the problem itself.
        if let Some(context_mark) = &self.context_mark
            && self.problem_mark.as_ref().is_none_or(|problem_mark| {
                context_mark.line() != problem_mark.line()
                    || context_mark.column() != problem_mark.column()
            })
        {
            lines.push(context_mark.to_string());
        }
        lines.push(self.kind.to_string());
        if let Some(problem_mark) = &self.problem_mark {
            lines.push(problem_mark.to_string());
        }
        write!(f, "{}", lines.join("\n"))
    }
}

impl std::error::Error for YamlError {}

impl From<std::fmt::Error> for YamlError {
    fn from(_: std::fmt::Error) -> Self {
        Self::new(ErrorKind::Write, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn mark_at(input: &str, pointer: usize) -> Mark {
        let buffer: Arc<[char]> = input.chars().collect();
        let (mut line, mut column) = (0, 0);
        for ch in buffer.iter().take(pointer) {
            if *ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        Mark::new(Arc::from("reader"), pointer, line, column, buffer, pointer)
    }

    #[test]
    fn test_error_kind_display() {
        let test_cases = [
            (
                ErrorKind::UndefinedAlias("foo".to_owned()),
                "found undefined alias foo",
            ),
            (
                ErrorKind::TooManyAliases(50),
                "Number of aliases for non-scalar nodes exceeds the specified max=50",
            ),
            (
                ErrorKind::RecursiveKey,
                "Recursive key for mapping is detected but it is not configured to be allowed",
            ),
            (ErrorKind::DuplicateKey("a".to_owned()), "found duplicate key a"),
            (
                ErrorKind::MissingConstructor("!custom".to_owned()),
                "could not determine a constructor for the tag !custom",
            ),
            (
                ErrorKind::InvalidSetting {
                    name: "indent",
                    reason: "must be in 1..=10".to_owned(),
                },
                "invalid setting indent: must be in 1..=10",
            ),
            (
                ErrorKind::SingleDocumentExpected,
                "expected a single document in the stream",
            ),
        ];

        for (kind, expected_msg) in test_cases {
            assert_eq!(kind.to_string(), expected_msg);
        }
    }

    #[test]
    fn test_marked_error_display() {
        let err = YamlError::scanner(
            "while scanning a quoted scalar",
            mark_at("key: \"value", 5),
            "found unexpected end of stream",
            mark_at("key: \"value", 11),
        );
        let text = err.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "while scanning a quoted scalar");
        assert_eq!(lines[1], " in reader, line 1, column 6:");
        assert_eq!(lines[4], "found unexpected end of stream");
        assert_eq!(lines[5], " in reader, line 1, column 12:");
    }

    #[test]
    fn test_context_mark_omitted_when_same_position() {
        let mark = mark_at("[a", 0);
        let err = YamlError::scanner("while scanning", mark.clone(), "problem", mark);
        assert_eq!(err.to_string().matches("line 1, column 1").count(), 1);
    }

    #[test]
    fn test_error_suggestions() {
        let with_suggestions = [
            ErrorKind::UndefinedAlias("a".to_owned()),
            ErrorKind::TooManyAliases(1),
            ErrorKind::RecursiveKey,
            ErrorKind::DuplicateKey("k".to_owned()),
            ErrorKind::CodePointLimit(10),
            ErrorKind::SingleDocumentExpected,
        ];
        for kind in with_suggestions {
            assert!(
                kind.suggestion().is_some(),
                "{kind:?} should have a suggestion"
            );
        }

        let without_suggestions = [
            ErrorKind::Scanner("x".to_owned()),
            ErrorKind::Parser("x".to_owned()),
            ErrorKind::RecursiveValue,
            ErrorKind::Write,
        ];
        for kind in without_suggestions {
            assert!(
                kind.suggestion().is_none(),
                "{kind:?} should not have a suggestion"
            );
        }
    }
}
