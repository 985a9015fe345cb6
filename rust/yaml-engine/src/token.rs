// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Token types produced by the scanner.

use derive_more::Display;

use crate::anchor::Anchor;
use crate::mark::Mark;

/// Presentation style of a scalar.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScalarStyle {
    #[default]
    #[display("plain")]
    Plain,
    #[display("single-quoted")]
    SingleQuoted,
    #[display("double-quoted")]
    DoubleQuoted,
    #[display("literal")]
    Literal,
    #[display("folded")]
    Folded,
}

impl ScalarStyle {
    /// The character that introduces the style, as used by the test-suite
    /// event notation.
    #[must_use]
    pub const fn indicator(self) -> char {
        match self {
            Self::Plain => ':',
            Self::SingleQuoted => '\'',
            Self::DoubleQuoted => '"',
            Self::Literal => '|',
            Self::Folded => '>',
        }
    }

    #[must_use]
    pub const fn is_block(self) -> bool {
        matches!(self, Self::Literal | Self::Folded)
    }
}

/// Block scalar chomping indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chomping {
    /// `-` strip all trailing newlines
    Strip,
    /// (default) clip to single trailing newline
    #[default]
    Clip,
    /// `+` keep all trailing newlines
    Keep,
}

/// Where a comment sat relative to the surrounding content.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentType {
    /// An empty line
    #[display("blank line")]
    Blank,
    /// A comment on a line of its own
    #[display("block comment")]
    Block,
    /// A comment after content on the same line
    #[display("in-line comment")]
    InLine,
}

/// A token with its source range.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: Mark,
    pub end: Mark,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, start: Mark, end: Mark) -> Self {
        Self { kind, start, end }
    }

    #[must_use]
    pub const fn id(&self) -> TokenId {
        self.kind.id()
    }
}

/// Token payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    StreamStart,
    StreamEnd,
    /// `%YAML major.minor`
    VersionDirective { major: u32, minor: u32 },
    /// `%TAG handle prefix`
    TagDirective { handle: String, prefix: String },
    /// Any other `%NAME ...` directive
    ReservedDirective { name: String },
    DocumentStart,
    DocumentEnd,
    BlockSequenceStart,
    BlockMappingStart,
    BlockEnd,
    FlowSequenceStart,
    FlowSequenceEnd,
    FlowMappingStart,
    FlowMappingEnd,
    BlockEntry,
    FlowEntry,
    Key,
    Value,
    Alias(Anchor),
    Anchor(Anchor),
    /// `handle` is `None` for verbatim tags and the lone `!`.
    Tag {
        handle: Option<String>,
        suffix: String,
    },
    Scalar {
        value: String,
        plain: bool,
        style: ScalarStyle,
    },
    Comment {
        comment_type: CommentType,
        value: String,
    },
}

impl TokenKind {
    #[must_use]
    pub const fn id(&self) -> TokenId {
        match self {
            Self::StreamStart => TokenId::StreamStart,
            Self::StreamEnd => TokenId::StreamEnd,
            Self::VersionDirective { .. }
            | Self::TagDirective { .. }
            | Self::ReservedDirective { .. } => TokenId::Directive,
            Self::DocumentStart => TokenId::DocumentStart,
            Self::DocumentEnd => TokenId::DocumentEnd,
            Self::BlockSequenceStart => TokenId::BlockSequenceStart,
            Self::BlockMappingStart => TokenId::BlockMappingStart,
            Self::BlockEnd => TokenId::BlockEnd,
            Self::FlowSequenceStart => TokenId::FlowSequenceStart,
            Self::FlowSequenceEnd => TokenId::FlowSequenceEnd,
            Self::FlowMappingStart => TokenId::FlowMappingStart,
            Self::FlowMappingEnd => TokenId::FlowMappingEnd,
            Self::BlockEntry => TokenId::BlockEntry,
            Self::FlowEntry => TokenId::FlowEntry,
            Self::Key => TokenId::Key,
            Self::Value => TokenId::Value,
            Self::Alias(_) => TokenId::Alias,
            Self::Anchor(_) => TokenId::Anchor,
            Self::Tag { .. } => TokenId::Tag,
            Self::Scalar { .. } => TokenId::Scalar,
            Self::Comment { .. } => TokenId::Comment,
        }
    }
}

/// Payload-free token discriminant, used for look-ahead checks and messages.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenId {
    #[display("<stream start>")]
    StreamStart,
    #[display("<stream end>")]
    StreamEnd,
    #[display("<directive>")]
    Directive,
    #[display("<document start>")]
    DocumentStart,
    #[display("<document end>")]
    DocumentEnd,
    #[display("<block sequence start>")]
    BlockSequenceStart,
    #[display("<block mapping start>")]
    BlockMappingStart,
    #[display("<block end>")]
    BlockEnd,
    #[display("[")]
    FlowSequenceStart,
    #[display("]")]
    FlowSequenceEnd,
    #[display("{{")]
    FlowMappingStart,
    #[display("}}")]
    FlowMappingEnd,
    #[display("-")]
    BlockEntry,
    #[display(",")]
    FlowEntry,
    #[display("?")]
    Key,
    #[display(":")]
    Value,
    #[display("<alias>")]
    Alias,
    #[display("<anchor>")]
    Anchor,
    #[display("<tag>")]
    Tag,
    #[display("<scalar>")]
    Scalar,
    #[display("#comment")]
    Comment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_id_display() {
        assert_eq!(TokenId::BlockEnd.to_string(), "<block end>");
        assert_eq!(TokenId::FlowMappingStart.to_string(), "{");
        assert_eq!(TokenId::FlowMappingEnd.to_string(), "}");
        assert_eq!(TokenId::Value.to_string(), ":");
    }

    #[test]
    fn test_directive_kinds_share_an_id() {
        let version = TokenKind::VersionDirective { major: 1, minor: 2 };
        let reserved = TokenKind::ReservedDirective {
            name: "FOO".to_owned(),
        };
        assert_eq!(version.id(), TokenId::Directive);
        assert_eq!(reserved.id(), TokenId::Directive);
    }

    #[test]
    fn test_scalar_style_indicator() {
        assert_eq!(ScalarStyle::Plain.indicator(), ':');
        assert_eq!(ScalarStyle::Folded.indicator(), '>');
        assert!(ScalarStyle::Literal.is_block());
        assert!(!ScalarStyle::DoubleQuoted.is_block());
    }
}
