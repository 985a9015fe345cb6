// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Event parser.
//!
//! This module implements the second phase of loading: converting the
//! token stream into events. The grammar is driven by an explicit stack of
//! [`Production`]s rather than by recursion, so arbitrarily deep documents
//! cannot overflow the call stack here and the parser can hand out one
//! event at a time.
//!
//! Every production yields exactly one event. Comment tokens met between
//! nodes are turned into `Comment` events and queued ahead of that event.

mod block;
mod flow;

use std::collections::VecDeque;

use log::{debug, trace, warn};
use ordermap::OrderMap;

use crate::anchor::Anchor;
use crate::error::{ErrorKind, Result, YamlError};
use crate::event::{Event, EventId, EventKind, FlowStyle, ImplicitTuple};
use crate::mark::Mark;
use crate::scanner::Scanner;
use crate::tag::Tag;
use crate::token::{ScalarStyle, Token, TokenId, TokenKind};

/// Grammar productions, named after the construct they expect next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Production {
    StreamStart,
    ImplicitDocumentStart,
    DocumentStart,
    DocumentContent,
    DocumentEnd,
    BlockNode,
    BlockNodeOrIndentlessSequence,
    FlowNode,
    BlockSequenceFirstEntry,
    BlockSequenceEntry,
    IndentlessSequenceEntry,
    BlockMappingFirstKey,
    BlockMappingKey,
    BlockMappingValue,
    FlowSequenceFirstEntry,
    FlowSequenceEntry,
    FlowSequenceEntryMappingKey,
    FlowSequenceEntryMappingValue,
    FlowSequenceEntryMappingEnd,
    FlowMappingFirstKey,
    FlowMappingKey,
    FlowMappingValue,
    FlowMappingEmptyValue,
    End,
}

fn default_tag_handles() -> OrderMap<String, String> {
    OrderMap::from([
        ("!".to_owned(), "!".to_owned()),
        ("!!".to_owned(), Tag::PREFIX.to_owned()),
    ])
}

/// Pull parser over a [`Scanner`].
#[derive(Debug)]
pub struct Parser {
    scanner: Scanner,
    state: Production,
    states: Vec<Production>,
    marks: Vec<Mark>,
    /// Handles in effect for the current document, defaults included
    tag_handles: OrderMap<String, String>,
    /// Events produced but not yet handed out
    events: VecDeque<Event>,
    failed: bool,
}

impl Parser {
    #[must_use]
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner,
            state: Production::StreamStart,
            states: Vec::new(),
            marks: Vec::new(),
            tag_handles: default_tag_handles(),
            events: VecDeque::new(),
            failed: false,
        }
    }

    /// Whether the next event is one of `choices`.
    ///
    /// # Errors
    ///
    /// Propagates scanning and parsing errors.
    pub fn check_event(&mut self, choices: &[EventId]) -> Result<bool> {
        Ok(self
            .peek_event()?
            .is_some_and(|event| choices.contains(&event.id())))
    }

    /// The next event, without consuming it.
    ///
    /// # Errors
    ///
    /// Propagates scanning and parsing errors.
    pub fn peek_event(&mut self) -> Result<Option<&Event>> {
        self.fill()?;
        Ok(self.events.front())
    }

    /// Consume the next event.
    ///
    /// Returns `None` after `StreamEnd` or after the first error.
    ///
    /// # Errors
    ///
    /// Propagates scanning and parsing errors.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        self.fill()?;
        Ok(self.events.pop_front())
    }

    fn fill(&mut self) -> Result<()> {
        if !self.events.is_empty() || self.failed || self.state == Production::End {
            return Ok(());
        }
        match self.produce() {
            Ok(event) => {
                self.events.push_back(event);
                Ok(())
            }
            Err(error) => {
                self.failed = true;
                self.events.clear();
                Err(error)
            }
        }
    }

    fn produce(&mut self) -> Result<Event> {
        trace!("parser production {:?}", self.state);
        if !matches!(
            self.state,
            Production::StreamStart | Production::FlowSequenceEntryMappingEnd
        ) {
            self.stash_comments()?;
        }
        match self.state {
            Production::StreamStart => self.parse_stream_start(),
            Production::ImplicitDocumentStart => self.parse_document_start(true),
            Production::DocumentStart => self.parse_document_start(false),
            Production::DocumentContent => self.parse_document_content(),
            Production::DocumentEnd => self.parse_document_end(),
            Production::BlockNode => self.parse_node(true, false),
            Production::BlockNodeOrIndentlessSequence => self.parse_node(true, true),
            Production::FlowNode => self.parse_node(false, false),
            Production::BlockSequenceFirstEntry => self.parse_block_sequence_entry(true),
            Production::BlockSequenceEntry => self.parse_block_sequence_entry(false),
            Production::IndentlessSequenceEntry => self.parse_indentless_sequence_entry(),
            Production::BlockMappingFirstKey => self.parse_block_mapping_key(true),
            Production::BlockMappingKey => self.parse_block_mapping_key(false),
            Production::BlockMappingValue => self.parse_block_mapping_value(),
            Production::FlowSequenceFirstEntry => self.parse_flow_sequence_entry(true),
            Production::FlowSequenceEntry => self.parse_flow_sequence_entry(false),
            Production::FlowSequenceEntryMappingKey => self.parse_flow_sequence_entry_mapping_key(),
            Production::FlowSequenceEntryMappingValue => {
                self.parse_flow_sequence_entry_mapping_value()
            }
            Production::FlowSequenceEntryMappingEnd => {
                self.parse_flow_sequence_entry_mapping_end()
            }
            Production::FlowMappingFirstKey => self.parse_flow_mapping_key(true),
            Production::FlowMappingKey => self.parse_flow_mapping_key(false),
            Production::FlowMappingValue => self.parse_flow_mapping_value(false),
            Production::FlowMappingEmptyValue => self.parse_flow_mapping_value(true),
            Production::End => Err(YamlError::new(
                ErrorKind::Internal("parser polled after the end of the stream".to_owned()),
                None,
            )),
        }
    }

    // Token access.

    fn peek_token(&mut self) -> Result<&Token> {
        match self.scanner.peek_token()? {
            Some(token) => Ok(token),
            None => Err(YamlError::new(
                ErrorKind::Internal("token stream ended before <stream end>".to_owned()),
                None,
            )),
        }
    }

    fn peek_id(&mut self) -> Result<TokenId> {
        Ok(self.peek_token()?.id())
    }

    fn check_token(&mut self, choices: &[TokenId]) -> Result<bool> {
        Ok(choices.contains(&self.peek_id()?))
    }

    fn next_token(&mut self) -> Result<Token> {
        match self.scanner.next_token()? {
            Some(token) => Ok(token),
            None => Err(YamlError::new(
                ErrorKind::Internal("token stream ended before <stream end>".to_owned()),
                None,
            )),
        }
    }

    fn peek_start_mark(&mut self) -> Result<Mark> {
        Ok(self.peek_token()?.start.clone())
    }

    fn peek_end_mark(&mut self) -> Result<Mark> {
        Ok(self.peek_token()?.end.clone())
    }

    /// Queue every comment token ahead as a `Comment` event.
    fn stash_comments(&mut self) -> Result<()> {
        while self.check_token(&[TokenId::Comment])? {
            let token = self.next_token()?;
            if let TokenKind::Comment {
                comment_type,
                value,
            } = token.kind
            {
                self.events.push_back(Event::new(
                    EventKind::Comment {
                        comment_type,
                        value,
                    },
                    Some(token.start),
                    Some(token.end),
                ));
            }
        }
        Ok(())
    }

    fn pop_state(&mut self) -> Result<Production> {
        self.states.pop().ok_or_else(|| {
            YamlError::new(
                ErrorKind::Internal("parser state stack is empty".to_owned()),
                None,
            )
        })
    }

    fn pop_mark(&mut self) -> Result<Mark> {
        self.marks.pop().ok_or_else(|| {
            YamlError::new(
                ErrorKind::Internal("parser mark stack is empty".to_owned()),
                None,
            )
        })
    }

    /// `expected X, but found 'Y'` with the context the error occurred in.
    fn unexpected(
        &mut self,
        context: &str,
        context_mark: Option<Mark>,
        expected: &str,
    ) -> Result<YamlError> {
        let token = self.peek_token()?;
        let error = YamlError::parser(
            format!("expected {expected}, but found '{}'", token.id()),
            token.start.clone(),
        );
        Ok(error.with_context(context, context_mark))
    }

    // Stream and documents.

    fn parse_stream_start(&mut self) -> Result<Event> {
        let token = self.next_token()?;
        if token.id() != TokenId::StreamStart {
            return Err(YamlError::parser(
                format!("expected '<stream start>', but found '{}'", token.id()),
                token.start,
            ));
        }
        self.state = Production::ImplicitDocumentStart;
        Ok(Event::new(
            EventKind::StreamStart,
            Some(token.start),
            Some(token.end),
        ))
    }

    /// `implicit` is set at the start of the stream and after an explicit
    /// `...`, where a bare document may follow.
    fn parse_document_start(&mut self, implicit: bool) -> Result<Event> {
        // Extra document end markers are allowed.
        while self.check_token(&[TokenId::DocumentEnd])? {
            self.next_token()?;
            self.stash_comments()?;
        }

        if self.check_token(&[TokenId::StreamEnd])? {
            let token = self.next_token()?;
            if !self.states.is_empty() || !self.marks.is_empty() {
                return Err(YamlError::new(
                    ErrorKind::Internal(format!(
                        "{} states and {} marks left at the end of the stream",
                        self.states.len(),
                        self.marks.len()
                    )),
                    Some(token.start),
                ));
            }
            self.state = Production::End;
            return Ok(Event::new(
                EventKind::StreamEnd,
                Some(token.start),
                Some(token.end),
            ));
        }

        if implicit && !self.check_token(&[TokenId::Directive, TokenId::DocumentStart])? {
            // A bare document.
            self.tag_handles = default_tag_handles();
            let mark = self.peek_start_mark()?;
            self.states.push(Production::DocumentEnd);
            self.state = Production::BlockNode;
            return Ok(Event::new(
                EventKind::DocumentStart {
                    explicit: false,
                    version: None,
                    tags: OrderMap::new(),
                },
                Some(mark.clone()),
                Some(mark),
            ));
        }

        let start = self.peek_start_mark()?;
        let (version, tags) = self.process_directives()?;
        if !self.check_token(&[TokenId::DocumentStart])? {
            return Err(self.unexpected("while parsing a document", None, "'<document start>'")?);
        }
        let token = self.next_token()?;
        self.states.push(Production::DocumentEnd);
        self.state = Production::DocumentContent;
        Ok(Event::new(
            EventKind::DocumentStart {
                explicit: true,
                version,
                tags,
            },
            Some(start),
            Some(token.end),
        ))
    }

    fn parse_document_content(&mut self) -> Result<Event> {
        if self.check_token(&[
            TokenId::Directive,
            TokenId::DocumentStart,
            TokenId::DocumentEnd,
            TokenId::StreamEnd,
        ])? {
            let mark = self.peek_start_mark()?;
            self.state = self.pop_state()?;
            Ok(empty_scalar(mark))
        } else {
            self.parse_node(true, false)
        }
    }

    fn parse_document_end(&mut self) -> Result<Event> {
        let start = self.peek_start_mark()?;
        let mut end = start.clone();
        let explicit = self.check_token(&[TokenId::DocumentEnd])?;
        if explicit {
            end = self.next_token()?.end;
            self.state = Production::ImplicitDocumentStart;
        } else {
            if self.check_token(&[TokenId::Directive])? {
                return Err(self.unexpected(
                    "while parsing a document",
                    None,
                    "'<document end>' before directives",
                )?);
            }
            self.state = Production::DocumentStart;
        }
        self.tag_handles = default_tag_handles();
        Ok(Event::new(
            EventKind::DocumentEnd { explicit },
            Some(start),
            Some(end),
        ))
    }

    /// Consume the `%YAML` and `%TAG` directives of a document prolog.
    ///
    /// Returns the version and the explicitly declared handles; the default
    /// handles are added to the parser's table but not reported.
    #[allow(
        clippy::type_complexity,
        reason = "mirrors the DocumentStart event payload"
    )]
    fn process_directives(&mut self) -> Result<(Option<(u32, u32)>, OrderMap<String, String>)> {
        let mut version = None;
        let mut tags = OrderMap::new();
        self.tag_handles = OrderMap::new();
        while self.check_token(&[TokenId::Directive])? {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::VersionDirective { major, minor } => {
                    if version.is_some() {
                        return Err(YamlError::parser("found duplicate YAML directive", token.start));
                    }
                    if major != 1 {
                        return Err(YamlError::parser(
                            format!("found incompatible YAML document (version {major}.{minor})"),
                            token.start,
                        ));
                    }
                    if minor > 2 {
                        warn!("document declares YAML 1.{minor}, reading it as YAML 1.2");
                    }
                    debug!("%YAML {major}.{minor}");
                    version = Some((major, minor));
                }
                TokenKind::TagDirective { handle, prefix } => {
                    if self.tag_handles.contains_key(&handle) {
                        return Err(YamlError::parser(
                            format!("duplicate tag handle {handle}"),
                            token.start,
                        ));
                    }
                    debug!("%TAG {handle} {prefix}");
                    self.tag_handles.insert(handle.clone(), prefix.clone());
                    tags.insert(handle, prefix);
                }
                TokenKind::ReservedDirective { name } => {
                    warn!("ignoring reserved directive %{name}");
                }
                _ => {}
            }
            self.stash_comments()?;
        }
        for (handle, prefix) in default_tag_handles() {
            self.tag_handles.entry(handle).or_insert(prefix);
        }
        Ok((version, tags))
    }

    // Nodes.

    /// Parse a node: an alias, a scalar, the start of a collection or an
    /// empty scalar carrying only properties.
    ///
    /// Collection start tokens are left for the first-entry productions.
    fn parse_node(&mut self, block: bool, indentless_sequence: bool) -> Result<Event> {
        if self.check_token(&[TokenId::Alias])? {
            let token = self.next_token()?;
            self.state = self.pop_state()?;
            let TokenKind::Alias(anchor) = token.kind else {
                return Err(YamlError::new(
                    ErrorKind::Internal("alias token without a name".to_owned()),
                    Some(token.start),
                ));
            };
            return Ok(Event::new(
                EventKind::Alias { anchor },
                Some(token.start),
                Some(token.end),
            ));
        }

        let mut start = None;
        let mut end = None;
        let mut anchor: Option<Anchor> = None;
        let mut tag_token: Option<(Option<String>, String, Mark)> = None;
        // Properties come in either order, at most one of each.
        for _ in 0..2 {
            match self.peek_id()? {
                TokenId::Anchor if anchor.is_none() => {
                    let token = self.next_token()?;
                    start.get_or_insert_with(|| token.start.clone());
                    end = Some(token.end);
                    if let TokenKind::Anchor(name) = token.kind {
                        anchor = Some(name);
                    }
                }
                TokenId::Tag if tag_token.is_none() => {
                    let token = self.next_token()?;
                    start.get_or_insert_with(|| token.start.clone());
                    end = Some(token.end);
                    if let TokenKind::Tag { handle, suffix } = token.kind {
                        tag_token = Some((handle, suffix, token.start));
                    }
                }
                _ => break,
            }
            self.stash_comments()?;
        }

        let tag = match tag_token {
            None => None,
            Some((None, suffix, _)) => Some(Tag::new(suffix)),
            Some((Some(handle), suffix, tag_mark)) => match self.tag_handles.get(&handle) {
                Some(prefix) => Some(Tag::new(format!("{prefix}{suffix}"))),
                None => {
                    return Err(YamlError::parser(
                        format!("found undefined tag handle {handle}"),
                        tag_mark,
                    )
                    .with_context("while parsing a node", start));
                }
            },
        };

        let start = match start {
            Some(mark) => mark,
            None => self.peek_start_mark()?,
        };
        let implicit = tag.as_ref().is_none_or(|tag| *tag == "!");

        match self.peek_id()? {
            TokenId::BlockEntry if indentless_sequence => {
                let end = self.peek_end_mark()?;
                self.state = Production::IndentlessSequenceEntry;
                Ok(Event::new(
                    EventKind::SequenceStart {
                        anchor,
                        tag,
                        implicit,
                        flow_style: FlowStyle::Block,
                    },
                    Some(start),
                    Some(end),
                ))
            }
            TokenId::Scalar => {
                let token = self.next_token()?;
                self.state = self.pop_state()?;
                let TokenKind::Scalar {
                    value,
                    plain,
                    style,
                } = token.kind
                else {
                    return Err(YamlError::new(
                        ErrorKind::Internal("scalar token without a value".to_owned()),
                        Some(token.start),
                    ));
                };
                let implicit = if (plain && tag.is_none()) || tag.as_ref().is_some_and(|tag| *tag == "!") {
                    ImplicitTuple::new(true, false)
                } else if tag.is_none() {
                    ImplicitTuple::new(false, true)
                } else {
                    ImplicitTuple::new(false, false)
                };
                Ok(Event::new(
                    EventKind::Scalar {
                        anchor,
                        tag,
                        implicit,
                        value,
                        style,
                    },
                    Some(start),
                    Some(token.end),
                ))
            }
            id @ (TokenId::FlowSequenceStart | TokenId::FlowMappingStart) => {
                let end = self.peek_end_mark()?;
                let kind = if id == TokenId::FlowSequenceStart {
                    self.state = Production::FlowSequenceFirstEntry;
                    EventKind::SequenceStart {
                        anchor,
                        tag,
                        implicit,
                        flow_style: FlowStyle::Flow,
                    }
                } else {
                    self.state = Production::FlowMappingFirstKey;
                    EventKind::MappingStart {
                        anchor,
                        tag,
                        implicit,
                        flow_style: FlowStyle::Flow,
                    }
                };
                Ok(Event::new(kind, Some(start), Some(end)))
            }
            id @ (TokenId::BlockSequenceStart | TokenId::BlockMappingStart) if block => {
                let end = self.peek_end_mark()?;
                let kind = if id == TokenId::BlockSequenceStart {
                    self.state = Production::BlockSequenceFirstEntry;
                    EventKind::SequenceStart {
                        anchor,
                        tag,
                        implicit,
                        flow_style: FlowStyle::Block,
                    }
                } else {
                    self.state = Production::BlockMappingFirstKey;
                    EventKind::MappingStart {
                        anchor,
                        tag,
                        implicit,
                        flow_style: FlowStyle::Block,
                    }
                };
                Ok(Event::new(kind, Some(start), Some(end)))
            }
            _ if anchor.is_some() || tag.is_some() => {
                // Properties without content: an empty scalar.
                self.state = self.pop_state()?;
                Ok(Event::new(
                    EventKind::Scalar {
                        anchor,
                        tag,
                        implicit: ImplicitTuple::new(implicit, false),
                        value: String::new(),
                        style: ScalarStyle::Plain,
                    },
                    Some(start),
                    end,
                ))
            }
            _ => {
                let context = if block {
                    "while parsing a block node"
                } else {
                    "while parsing a flow node"
                };
                Err(self.unexpected(context, Some(start), "the node content")?)
            }
        }
    }
}

/// The empty plain scalar standing in for omitted content.
fn empty_scalar(mark: Mark) -> Event {
    Event::new(
        EventKind::Scalar {
            anchor: None,
            tag: None,
            implicit: ImplicitTuple::new(true, false),
            value: String::new(),
            style: ScalarStyle::Plain,
        },
        Some(mark.clone()),
        Some(mark),
    )
}

impl Iterator for Parser {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

#[cfg(test)]
mod tests;
