// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Parser events.
//!
//! Events are the interface shared by both pipelines: the parser produces
//! them from tokens and the composer consumes them, while the serializer
//! produces them from a node graph and the emitter writes them out.

use std::fmt;

use derive_more::Display;
use ordermap::OrderMap;

use crate::anchor::Anchor;
use crate::mark::Mark;
use crate::tag::Tag;
use crate::token::{CommentType, ScalarStyle};

/// Whether a collection is written with brackets or with indentation.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowStyle {
    /// `[a, b]` and `{a: b}`
    #[display("flow")]
    Flow,
    /// Indentation-based
    #[default]
    #[display("block")]
    Block,
    /// Flow for collections of plain scalars, block otherwise
    #[display("auto")]
    Auto,
}

/// Whether a scalar's tag may be omitted when written.
///
/// `plain` holds when the tag is the one a plain scalar resolves to, and
/// `quoted` when it is the one any other style resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImplicitTuple {
    pub plain: bool,
    pub quoted: bool,
}

impl ImplicitTuple {
    #[must_use]
    pub const fn new(plain: bool, quoted: bool) -> Self {
        Self { plain, quoted }
    }

    /// Neither style may omit the tag.
    #[must_use]
    pub const fn both_false(self) -> bool {
        !self.plain && !self.quoted
    }
}

/// An event with its source range.
///
/// Marks are absent on events built by the serializer.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub start: Option<Mark>,
    pub end: Option<Mark>,
}

impl Event {
    #[must_use]
    pub const fn new(kind: EventKind, start: Option<Mark>, end: Option<Mark>) -> Self {
        Self { kind, start, end }
    }

    /// An event without source marks.
    #[must_use]
    pub const fn unmarked(kind: EventKind) -> Self {
        Self::new(kind, None, None)
    }

    #[must_use]
    pub const fn id(&self) -> EventId {
        self.kind.id()
    }

    /// The event in test-suite notation.
    #[must_use]
    pub fn notation(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// Event payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    StreamStart,
    StreamEnd,
    DocumentStart {
        /// The document began with `---`
        explicit: bool,
        /// `%YAML major.minor`
        version: Option<(u32, u32)>,
        /// `%TAG` directives in source order, handle to prefix
        tags: OrderMap<String, String>,
    },
    DocumentEnd {
        /// The document ended with `...`
        explicit: bool,
    },
    Alias {
        anchor: Anchor,
    },
    Scalar {
        anchor: Option<Anchor>,
        tag: Option<Tag>,
        implicit: ImplicitTuple,
        value: String,
        style: ScalarStyle,
    },
    SequenceStart {
        anchor: Option<Anchor>,
        tag: Option<Tag>,
        implicit: bool,
        flow_style: FlowStyle,
    },
    SequenceEnd,
    MappingStart {
        anchor: Option<Anchor>,
        tag: Option<Tag>,
        implicit: bool,
        flow_style: FlowStyle,
    },
    MappingEnd,
    Comment {
        comment_type: CommentType,
        value: String,
    },
}

impl EventKind {
    #[must_use]
    pub const fn id(&self) -> EventId {
        match self {
            Self::StreamStart => EventId::StreamStart,
            Self::StreamEnd => EventId::StreamEnd,
            Self::DocumentStart { .. } => EventId::DocumentStart,
            Self::DocumentEnd { .. } => EventId::DocumentEnd,
            Self::Alias { .. } => EventId::Alias,
            Self::Scalar { .. } => EventId::Scalar,
            Self::SequenceStart { .. } => EventId::SequenceStart,
            Self::SequenceEnd => EventId::SequenceEnd,
            Self::MappingStart { .. } => EventId::MappingStart,
            Self::MappingEnd => EventId::MappingEnd,
            Self::Comment { .. } => EventId::Comment,
        }
    }

    /// The anchor carried by a node event.
    #[must_use]
    pub const fn anchor(&self) -> Option<&Anchor> {
        match self {
            Self::Scalar { anchor, .. }
            | Self::SequenceStart { anchor, .. }
            | Self::MappingStart { anchor, .. } => anchor.as_ref(),
            Self::Alias { anchor } => Some(anchor),
            _ => None,
        }
    }
}

/// Test-suite event notation: `+STR`, `+DOC ---`, `=VAL &a <tag> :text`...
impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn properties(
            f: &mut fmt::Formatter<'_>,
            anchor: Option<&Anchor>,
            tag: Option<&Tag>,
        ) -> fmt::Result {
            if let Some(anchor) = anchor {
                write!(f, " &{anchor}")?;
            }
            if let Some(tag) = tag {
                write!(f, " <{tag}>")?;
            }
            Ok(())
        }

        match self {
            Self::StreamStart => write!(f, "+STR"),
            Self::StreamEnd => write!(f, "-STR"),
            Self::DocumentStart { explicit, .. } => {
                write!(f, "+DOC{}", if *explicit { " ---" } else { "" })
            }
            Self::DocumentEnd { explicit } => {
                write!(f, "-DOC{}", if *explicit { " ..." } else { "" })
            }
            Self::Alias { anchor } => write!(f, "=ALI *{anchor}"),
            Self::Scalar {
                anchor,
                tag,
                value,
                style,
                ..
            } => {
                write!(f, "=VAL")?;
                properties(f, anchor.as_ref(), tag.as_ref())?;
                write!(f, " {}{}", style.indicator(), escape_notation(value))
            }
            Self::SequenceStart {
                anchor,
                tag,
                flow_style,
                ..
            } => {
                write!(f, "+SEQ")?;
                if *flow_style == FlowStyle::Flow {
                    write!(f, " []")?;
                }
                properties(f, anchor.as_ref(), tag.as_ref())
            }
            Self::SequenceEnd => write!(f, "-SEQ"),
            Self::MappingStart {
                anchor,
                tag,
                flow_style,
                ..
            } => {
                write!(f, "+MAP")?;
                if *flow_style == FlowStyle::Flow {
                    write!(f, " {{}}")?;
                }
                properties(f, anchor.as_ref(), tag.as_ref())
            }
            Self::MappingEnd => write!(f, "-MAP"),
            Self::Comment { value, .. } => write!(f, "#{}", escape_notation(value)),
        }
    }
}

fn escape_notation(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\0' => escaped.push_str("\\0"),
            '\u{8}' => escaped.push_str("\\b"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Payload-free event discriminant, used for look-ahead checks and messages.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventId {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    Alias,
    Scalar,
    SequenceStart,
    SequenceEnd,
    MappingStart,
    MappingEnd,
    Comment,
}
