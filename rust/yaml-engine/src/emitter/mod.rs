// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Event emitter.
//!
//! The last phase of dumping: turning events back into YAML text. Like the
//! parser, the emitter is a state machine; each state names what it
//! expects next. A few events of look-ahead are buffered so that empty
//! collections and simple keys can be recognised before anything about
//! them is written.
//!
//! Comment events never change the state. They are held back and written
//! at the next point where a line may start: in-line comments close the
//! current line, block comments go on lines of their own at the current
//! indentation. Comments inside flow collections are dropped.

mod analysis;
mod writer;

use std::collections::VecDeque;
use std::fmt;

use log::{debug, trace};

use crate::anchor::is_anchor_char;
use crate::error::{ErrorKind, Result, YamlError};
use crate::event::{Event, EventId, EventKind, FlowStyle};
use crate::settings::{DumpSettings, is_valid_tag_handle};
use crate::tag::Tag;
use crate::token::{CommentType, ScalarStyle};

use analysis::{ScalarAnalysis, analyze_scalar};

/// What the emitter expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StreamStart,
    FirstDocumentStart,
    DocumentStart,
    DocumentContent,
    DocumentEnd,
    FirstFlowSequenceItem,
    FlowSequenceItem,
    FirstFlowMappingKey,
    FlowMappingKey,
    FlowMappingSimpleValue,
    FlowMappingValue,
    FirstBlockSequenceItem,
    BlockSequenceItem,
    FirstBlockMappingKey,
    BlockMappingKey,
    BlockMappingSimpleValue,
    BlockMappingValue,
    End,
}

/// Where a node sits in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeContext {
    Root,
    Sequence,
    Mapping,
    SimpleKey,
}

/// Writes events as YAML text into any [`fmt::Write`] sink.
#[allow(
    clippy::struct_excessive_bools,
    reason = "the writer position is tracked by independent flags"
)]
pub struct Emitter<W: fmt::Write> {
    writer: W,
    settings: DumpSettings,
    state: State,
    states: Vec<State>,
    /// Events received but not yet written
    events: VecDeque<Event>,

    indents: Vec<Option<usize>>,
    indent: Option<usize>,
    flow_level: usize,

    root_context: bool,
    mapping_context: bool,
    simple_key_context: bool,

    line: usize,
    column: usize,
    whitespace: bool,
    indention: bool,
    /// A keep-chomped block scalar may swallow what follows
    open_ended: bool,
    /// The previous document was closed with `...`
    document_closed: bool,

    best_indent: usize,
    best_width: usize,
    allow_unicode: bool,

    /// Tag prefix to handle, for the current document
    tag_prefixes: Vec<(String, String)>,

    prepared_anchor: Option<String>,
    prepared_tag: Option<String>,
    analysis: Option<ScalarAnalysis>,
    style: Option<ScalarStyle>,

    pending_in_line: Vec<String>,
    pending_block: Vec<(CommentType, String)>,
}

fn default_tag_prefixes() -> Vec<(String, String)> {
    vec![
        ("!".to_owned(), "!".to_owned()),
        (Tag::PREFIX.to_owned(), "!!".to_owned()),
    ]
}

fn unexpected(expected: &str, event: &Event) -> YamlError {
    YamlError::emitter(format!("expected {expected}, but got {}", event.id()))
}

impl<W: fmt::Write> Emitter<W> {
    #[must_use]
    pub fn new(settings: &DumpSettings, writer: W) -> Self {
        let best_indent = settings.indent();
        let best_width = if settings.width() > best_indent * 2 {
            settings.width()
        } else {
            80
        };
        Self {
            writer,
            settings: settings.clone(),
            state: State::StreamStart,
            states: Vec::new(),
            events: VecDeque::new(),
            indents: Vec::new(),
            indent: None,
            flow_level: 0,
            root_context: false,
            mapping_context: false,
            simple_key_context: false,
            line: 0,
            column: 0,
            whitespace: true,
            indention: true,
            open_ended: false,
            document_closed: false,
            best_indent,
            best_width,
            allow_unicode: settings.use_unicode_encoding(),
            tag_prefixes: default_tag_prefixes(),
            prepared_anchor: None,
            prepared_tag: None,
            analysis: None,
            style: None,
            pending_in_line: Vec::new(),
            pending_block: Vec::new(),
        }
    }

    /// The sink the text is written to.
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Accept one event, writing whatever it completes.
    ///
    /// # Errors
    ///
    /// Fails when the event is out of order, when an anchor or tag cannot
    /// be written, or when the sink refuses the text.
    pub fn emit(&mut self, event: Event) -> Result<()> {
        self.events.push_back(event);
        while !self.need_more_events() {
            let Some(event) = self.events.pop_front() else {
                break;
            };
            if let EventKind::Comment {
                comment_type,
                value,
            } = event.kind
            {
                self.buffer_comment(comment_type, value);
                continue;
            }
            self.state_machine(&event)?;
        }
        Ok(())
    }

    // Look-ahead. Comments are invisible to it.

    fn next_node_event(&self) -> Option<&Event> {
        self.events
            .iter()
            .find(|event| event.id() != EventId::Comment)
    }

    fn need_more_events(&self) -> bool {
        let Some(front) = self.events.front() else {
            return true;
        };
        match front.kind {
            EventKind::Comment { .. } => false,
            EventKind::DocumentStart { .. } => self.need_events(1),
            EventKind::SequenceStart { .. } => self.need_events(2),
            EventKind::MappingStart { .. } => self.need_events(3),
            _ => false,
        }
    }

    fn need_events(&self, count: usize) -> bool {
        let mut level = 0_i64;
        let mut seen = 0;
        for event in self
            .events
            .iter()
            .filter(|event| event.id() != EventId::Comment)
        {
            seen += 1;
            if seen == 1 {
                continue;
            }
            match event.id() {
                EventId::DocumentStart | EventId::SequenceStart | EventId::MappingStart => {
                    level += 1;
                }
                EventId::DocumentEnd | EventId::SequenceEnd | EventId::MappingEnd => level -= 1,
                EventId::StreamEnd => level = -1,
                _ => {}
            }
            if level < 0 {
                return false;
            }
        }
        seen < count + 1
    }

    fn buffer_comment(&mut self, comment_type: CommentType, value: String) {
        if self.flow_level > 0 {
            trace!("dropping {comment_type} inside a flow collection");
            return;
        }
        match comment_type {
            CommentType::InLine => self.pending_in_line.push(value),
            CommentType::Block | CommentType::Blank => self.pending_block.push((comment_type, value)),
        }
    }

    fn state_machine(&mut self, event: &Event) -> Result<()> {
        trace!("emitter state {:?} on {}", self.state, event.id());
        match self.state {
            State::StreamStart => self.expect_stream_start(event),
            State::FirstDocumentStart => self.expect_document_start(event, true),
            State::DocumentStart => self.expect_document_start(event, false),
            State::DocumentContent => self.expect_document_root(event),
            State::DocumentEnd => self.expect_document_end(event),
            State::FirstFlowSequenceItem => self.expect_flow_sequence_item(event, true),
            State::FlowSequenceItem => self.expect_flow_sequence_item(event, false),
            State::FirstFlowMappingKey => self.expect_flow_mapping_key(event, true),
            State::FlowMappingKey => self.expect_flow_mapping_key(event, false),
            State::FlowMappingSimpleValue => self.expect_flow_mapping_simple_value(event),
            State::FlowMappingValue => self.expect_flow_mapping_value(event),
            State::FirstBlockSequenceItem => self.expect_block_sequence_item(event, true),
            State::BlockSequenceItem => self.expect_block_sequence_item(event, false),
            State::FirstBlockMappingKey => self.expect_block_mapping_key(event, true),
            State::BlockMappingKey => self.expect_block_mapping_key(event, false),
            State::BlockMappingSimpleValue => self.expect_block_mapping_simple_value(event),
            State::BlockMappingValue => self.expect_block_mapping_value(event),
            State::End => Err(unexpected("nothing", event)),
        }
    }

    fn pop_state(&mut self) -> Result<()> {
        self.state = self.states.pop().ok_or_else(|| {
            YamlError::new(ErrorKind::Internal("emitter state stack is empty".to_owned()), None)
        })?;
        Ok(())
    }

    fn pop_indent(&mut self) -> Result<()> {
        self.indent = self.indents.pop().ok_or_else(|| {
            YamlError::new(ErrorKind::Internal("emitter indent stack is empty".to_owned()), None)
        })?;
        Ok(())
    }

    fn increase_indent(&mut self, flow: bool, indentless: bool) {
        self.indents.push(self.indent);
        self.indent = match self.indent {
            None if flow => Some(self.best_indent),
            None => Some(0),
            Some(indent) if !indentless => Some(indent + self.best_indent),
            Some(indent) => Some(indent),
        };
    }

    // Stream and document states.

    fn expect_stream_start(&mut self, event: &Event) -> Result<()> {
        if event.id() != EventId::StreamStart {
            return Err(unexpected("StreamStart", event));
        }
        self.state = State::FirstDocumentStart;
        Ok(())
    }

    fn expect_document_start(&mut self, event: &Event, first: bool) -> Result<()> {
        match &event.kind {
            EventKind::DocumentStart {
                explicit,
                version,
                tags,
            } => {
                let has_directives = version.is_some() || !tags.is_empty();
                if has_directives && (self.open_ended || (!first && !self.document_closed)) {
                    self.write_indicator("...", true, false, false)?;
                    self.write_indent()?;
                }
                if let Some((major, minor)) = *version {
                    if major != 1 {
                        return Err(YamlError::emitter(format!(
                            "unsupported YAML version: {major}.{minor}"
                        )));
                    }
                    self.write_version_directive(&format!("{major}.{minor}"))?;
                }
                self.tag_prefixes = default_tag_prefixes();
                for (handle, prefix) in tags {
                    let handle_text = prepare_tag_handle(handle)?;
                    let prefix_text = prepare_tag_prefix(prefix)?;
                    self.tag_prefixes.push((prefix.clone(), handle.clone()));
                    self.write_tag_directive(&handle_text, &prefix_text)?;
                }
                let implicit = first
                    && !explicit
                    && !self.settings.canonical()
                    && !has_directives
                    && !self.check_empty_document();
                if !implicit {
                    self.write_indent()?;
                    self.write_indicator("---", true, false, false)?;
                    if self.settings.canonical() {
                        self.write_indent()?;
                    }
                }
                self.document_closed = false;
                self.state = State::DocumentContent;
                Ok(())
            }
            EventKind::StreamEnd => {
                self.flush_comments()?;
                if self.open_ended {
                    self.write_indicator("...", true, false, false)?;
                    self.write_indent()?;
                }
                debug!("emitted {} lines", self.line);
                self.state = State::End;
                Ok(())
            }
            _ => Err(unexpected("DocumentStart", event)),
        }
    }

    fn expect_document_root(&mut self, event: &Event) -> Result<()> {
        self.states.push(State::DocumentEnd);
        self.expect_node(event, NodeContext::Root)
    }

    fn expect_document_end(&mut self, event: &Event) -> Result<()> {
        let EventKind::DocumentEnd { explicit } = event.kind else {
            return Err(unexpected("DocumentEnd", event));
        };
        self.flush_comments()?;
        self.write_indent()?;
        if explicit {
            self.write_indicator("...", true, false, false)?;
            self.write_indent()?;
        }
        self.document_closed = explicit;
        self.state = State::DocumentStart;
        Ok(())
    }

    // Nodes.

    fn expect_node(&mut self, event: &Event, context: NodeContext) -> Result<()> {
        self.root_context = context == NodeContext::Root;
        self.mapping_context = matches!(context, NodeContext::Mapping | NodeContext::SimpleKey);
        self.simple_key_context = context == NodeContext::SimpleKey;
        let starts_block_collection = match &event.kind {
            EventKind::SequenceStart { flow_style, .. } | EventKind::MappingStart { flow_style, .. } => {
                !self.writes_flow(*flow_style, event)
            }
            _ => false,
        };
        if !self.pending_block.is_empty() && !starts_block_collection {
            if self.root_context {
                self.write_block_comments()?;
            } else {
                trace!("dropping {} comments before an inline node", self.pending_block.len());
                self.pending_block.clear();
            }
        }

        match &event.kind {
            EventKind::Alias { .. } => self.expect_alias(event),
            EventKind::Scalar { .. } => {
                self.process_anchor(event, "&")?;
                self.process_tag(event)?;
                self.expect_scalar(event)
            }
            EventKind::SequenceStart { .. } => {
                self.process_anchor(event, "&")?;
                self.process_tag(event)?;
                if starts_block_collection {
                    self.expect_block_sequence();
                    Ok(())
                } else {
                    self.expect_flow_sequence()
                }
            }
            EventKind::MappingStart { .. } => {
                self.process_anchor(event, "&")?;
                self.process_tag(event)?;
                if starts_block_collection {
                    self.expect_block_mapping();
                    Ok(())
                } else {
                    self.expect_flow_mapping()
                }
            }
            _ => Err(unexpected("a node", event)),
        }
    }

    /// Whether a collection starting with `event` is written in flow style.
    fn writes_flow(&self, flow_style: FlowStyle, event: &Event) -> bool {
        self.flow_level > 0
            || self.settings.canonical()
            || flow_style == FlowStyle::Flow
            || self.check_empty_collection(event)
    }

    fn expect_alias(&mut self, event: &Event) -> Result<()> {
        self.process_anchor(event, "*")?;
        self.pop_state()
    }

    fn expect_scalar(&mut self, event: &Event) -> Result<()> {
        self.increase_indent(true, false);
        self.process_scalar(event)?;
        self.pop_indent()?;
        self.pop_state()
    }

    // Flow collections.

    fn expect_flow_sequence(&mut self) -> Result<()> {
        self.write_indicator("[", true, true, false)?;
        self.flow_level += 1;
        self.increase_indent(true, false);
        self.state = State::FirstFlowSequenceItem;
        Ok(())
    }

    fn expect_flow_sequence_item(&mut self, event: &Event, first: bool) -> Result<()> {
        if event.id() == EventId::SequenceEnd {
            self.pop_indent()?;
            self.flow_level -= 1;
            if !first {
                if self.settings.canonical() {
                    self.write_indicator(",", false, false, false)?;
                    self.write_indent()?;
                } else if self.settings.multi_line_flow() {
                    self.write_indent()?;
                }
            }
            self.write_indicator("]", false, false, false)?;
            return self.pop_state();
        }
        if !first {
            self.write_indicator(",", false, false, false)?;
        }
        if self.flow_line_break_due() {
            self.write_indent()?;
        }
        self.states.push(State::FlowSequenceItem);
        self.expect_node(event, NodeContext::Sequence)
    }

    fn expect_flow_mapping(&mut self) -> Result<()> {
        self.write_indicator("{", true, true, false)?;
        self.flow_level += 1;
        self.increase_indent(true, false);
        self.state = State::FirstFlowMappingKey;
        Ok(())
    }

    fn expect_flow_mapping_key(&mut self, event: &Event, first: bool) -> Result<()> {
        if event.id() == EventId::MappingEnd {
            self.pop_indent()?;
            self.flow_level -= 1;
            if !first {
                if self.settings.canonical() {
                    self.write_indicator(",", false, false, false)?;
                    self.write_indent()?;
                } else if self.settings.multi_line_flow() {
                    self.write_indent()?;
                }
            }
            self.write_indicator("}", false, false, false)?;
            return self.pop_state();
        }
        if !first {
            self.write_indicator(",", false, false, false)?;
        }
        if self.flow_line_break_due() {
            self.write_indent()?;
        }
        if !self.settings.canonical() && self.check_simple_key(event)? {
            self.states.push(State::FlowMappingSimpleValue);
            self.expect_node(event, NodeContext::SimpleKey)
        } else {
            self.write_indicator("?", true, false, false)?;
            self.states.push(State::FlowMappingValue);
            self.expect_node(event, NodeContext::Mapping)
        }
    }

    fn expect_flow_mapping_simple_value(&mut self, event: &Event) -> Result<()> {
        self.write_indicator(":", false, false, false)?;
        self.states.push(State::FlowMappingKey);
        self.expect_node(event, NodeContext::Mapping)
    }

    fn expect_flow_mapping_value(&mut self, event: &Event) -> Result<()> {
        if self.settings.canonical() || self.column > self.best_width {
            self.write_indent()?;
        }
        self.write_indicator(":", true, false, false)?;
        self.states.push(State::FlowMappingKey);
        self.expect_node(event, NodeContext::Mapping)
    }

    fn flow_line_break_due(&self) -> bool {
        self.settings.canonical()
            || (self.column > self.best_width && self.settings.split_lines())
            || self.settings.multi_line_flow()
    }

    // Block collections.

    fn expect_block_sequence(&mut self) {
        let indentless = self.mapping_context && !self.indention;
        self.increase_indent(false, indentless);
        self.state = State::FirstBlockSequenceItem;
    }

    fn expect_block_sequence_item(&mut self, event: &Event, first: bool) -> Result<()> {
        if !first && event.id() == EventId::SequenceEnd {
            self.flush_comments()?;
            self.pop_indent()?;
            return self.pop_state();
        }
        self.start_line()?;
        let indicator_indent = self.settings.indicator_indent();
        if !self.settings.indent_with_indicator() || first {
            self.write_whitespace(indicator_indent)?;
        }
        self.write_indicator("-", true, false, true)?;
        if self.settings.indent_with_indicator() && first {
            self.indent = self.indent.map(|indent| indent + indicator_indent);
        }
        self.states.push(State::BlockSequenceItem);
        self.expect_node(event, NodeContext::Sequence)
    }

    fn expect_block_mapping(&mut self) {
        self.increase_indent(false, false);
        self.state = State::FirstBlockMappingKey;
    }

    fn expect_block_mapping_key(&mut self, event: &Event, first: bool) -> Result<()> {
        if !first && event.id() == EventId::MappingEnd {
            self.flush_comments()?;
            self.pop_indent()?;
            return self.pop_state();
        }
        self.start_line()?;
        if self.check_simple_key(event)? {
            self.states.push(State::BlockMappingSimpleValue);
            self.expect_node(event, NodeContext::SimpleKey)
        } else {
            self.write_indicator("?", true, false, true)?;
            self.states.push(State::BlockMappingValue);
            self.expect_node(event, NodeContext::Mapping)
        }
    }

    fn expect_block_mapping_simple_value(&mut self, event: &Event) -> Result<()> {
        self.write_indicator(":", false, false, false)?;
        self.states.push(State::BlockMappingKey);
        self.expect_node(event, NodeContext::Mapping)
    }

    fn expect_block_mapping_value(&mut self, event: &Event) -> Result<()> {
        self.start_line()?;
        self.write_indicator(":", true, false, true)?;
        self.states.push(State::BlockMappingKey);
        self.expect_node(event, NodeContext::Mapping)
    }

    // Checkers.

    fn check_empty_collection(&self, event: &Event) -> bool {
        let end = match event.kind {
            EventKind::SequenceStart { .. } => EventId::SequenceEnd,
            EventKind::MappingStart { .. } => EventId::MappingEnd,
            _ => return false,
        };
        self.next_node_event().is_some_and(|next| next.id() == end)
    }

    fn check_empty_document(&self) -> bool {
        match self.next_node_event().map(|event| &event.kind) {
            Some(EventKind::Scalar {
                anchor: None,
                tag,
                implicit,
                value,
                ..
            }) => value.is_empty() && (tag.is_none() || implicit.plain),
            _ => false,
        }
    }

    fn check_simple_key(&mut self, event: &Event) -> Result<bool> {
        let mut length = 0;
        if let Some(anchor) = event.kind.anchor()
            && event.id() != EventId::Alias
        {
            if self.prepared_anchor.is_none() {
                self.prepared_anchor = Some(prepare_anchor(anchor.as_str())?);
            }
            length += self.prepared_anchor.as_ref().map_or(0, |anchor| anchor.chars().count());
        }
        let tag = match &event.kind {
            EventKind::Scalar { tag, .. }
            | EventKind::SequenceStart { tag, .. }
            | EventKind::MappingStart { tag, .. } => tag.as_ref(),
            _ => None,
        };
        if let Some(tag) = tag {
            if self.prepared_tag.is_none() {
                self.prepared_tag = Some(self.prepare_tag(tag.as_str())?);
            }
            length += self.prepared_tag.as_ref().map_or(0, |tag| tag.chars().count());
        }
        let fits = match &event.kind {
            EventKind::Alias { anchor } => {
                length += anchor.as_str().chars().count();
                true
            }
            EventKind::Scalar { value, .. } => {
                let analysis = self.analysis(value);
                length += analysis.length;
                !analysis.empty && !analysis.multiline
            }
            EventKind::SequenceStart { .. } | EventKind::MappingStart { .. } => {
                self.check_empty_collection(event)
            }
            _ => false,
        };
        Ok(fits && length < self.settings.max_simple_key_length())
    }

    // Anchors, tags and scalars.

    fn process_anchor(&mut self, event: &Event, indicator: &str) -> Result<()> {
        let Some(anchor) = event.kind.anchor() else {
            self.prepared_anchor = None;
            return Ok(());
        };
        let prepared = match self.prepared_anchor.take() {
            Some(prepared) => prepared,
            None => prepare_anchor(anchor.as_str())?,
        };
        self.write_indicator(&format!("{indicator}{prepared}"), true, false, false)
    }

    fn process_tag(&mut self, event: &Event) -> Result<()> {
        let canonical = self.settings.canonical();
        let tag = match &event.kind {
            EventKind::Scalar { tag, implicit, .. } => {
                let style = match self.style {
                    Some(style) => style,
                    None => {
                        let style = self.choose_scalar_style(event);
                        self.style = Some(style);
                        style
                    }
                };
                let omit = if style == ScalarStyle::Plain {
                    implicit.plain
                } else {
                    implicit.quoted
                };
                if (!canonical || tag.is_none()) && omit {
                    self.prepared_tag = None;
                    return Ok(());
                }
                if implicit.plain && tag.is_none() {
                    self.prepared_tag = None;
                    Some("!".to_owned())
                } else {
                    tag.as_ref().map(|tag| tag.as_str().to_owned())
                }
            }
            EventKind::SequenceStart { tag, implicit, .. }
            | EventKind::MappingStart { tag, implicit, .. } => {
                if (!canonical || tag.is_none()) && *implicit {
                    self.prepared_tag = None;
                    return Ok(());
                }
                tag.as_ref().map(|tag| tag.as_str().to_owned())
            }
            _ => return Ok(()),
        };
        let Some(tag) = tag else {
            return Err(YamlError::emitter("tag is not specified"));
        };
        let prepared = match self.prepared_tag.take() {
            Some(prepared) => prepared,
            None => self.prepare_tag(&tag)?,
        };
        if !prepared.is_empty() {
            self.write_indicator(&prepared, true, false, false)?;
        }
        Ok(())
    }

    fn analysis(&mut self, value: &str) -> ScalarAnalysis {
        let allow_unicode = self.allow_unicode;
        *self
            .analysis
            .get_or_insert_with(|| analyze_scalar(value, allow_unicode))
    }

    fn choose_scalar_style(&mut self, event: &Event) -> ScalarStyle {
        let EventKind::Scalar {
            implicit,
            value,
            style,
            ..
        } = &event.kind
        else {
            return ScalarStyle::Plain;
        };
        let analysis = self.analysis(value);
        if *style == ScalarStyle::DoubleQuoted || self.settings.canonical() {
            return ScalarStyle::DoubleQuoted;
        }
        if *style == ScalarStyle::Plain
            && implicit.plain
            && !(self.simple_key_context && (analysis.empty || analysis.multiline))
            && ((self.flow_level > 0 && analysis.allow_flow_plain)
                || (self.flow_level == 0 && analysis.allow_block_plain))
        {
            return ScalarStyle::Plain;
        }
        if style.is_block()
            && self.flow_level == 0
            && !self.simple_key_context
            && analysis.allow_block
            && self.indentation_hint_fits(value)
        {
            return *style;
        }
        if matches!(style, ScalarStyle::Plain | ScalarStyle::SingleQuoted)
            && analysis.allow_single_quoted
            && !(self.simple_key_context && analysis.multiline)
        {
            return ScalarStyle::SingleQuoted;
        }
        ScalarStyle::DoubleQuoted
    }

    /// An indentation indicator is a single digit.
    fn indentation_hint_fits(&self, value: &str) -> bool {
        self.best_indent <= 9 || !value.starts_with([' ', '\n'])
    }

    fn process_scalar(&mut self, event: &Event) -> Result<()> {
        let EventKind::Scalar { value, .. } = &event.kind else {
            return Ok(());
        };
        let style = match self.style {
            Some(style) => style,
            None => self.choose_scalar_style(event),
        };
        let split = !self.simple_key_context && self.settings.split_lines();
        match style {
            ScalarStyle::DoubleQuoted => self.write_double_quoted(value, split)?,
            ScalarStyle::SingleQuoted => self.write_single_quoted(value, split)?,
            ScalarStyle::Folded => self.write_folded(value, split)?,
            ScalarStyle::Literal => self.write_literal(value)?,
            ScalarStyle::Plain => self.write_plain(value, split)?,
        }
        self.analysis = None;
        self.style = None;
        Ok(())
    }

    /// Shorthand for `tag` using the document's tag directives, or the
    /// verbatim `!<tag>` form.
    fn prepare_tag(&self, tag: &str) -> Result<String> {
        if tag.is_empty() {
            return Err(YamlError::emitter("tag must not be empty"));
        }
        if tag == "!" {
            return Ok(tag.to_owned());
        }
        let mut prefixes: Vec<&(String, String)> = self.tag_prefixes.iter().collect();
        prefixes.sort();
        let mut handle = None;
        let mut suffix = tag;
        for (prefix, prefix_handle) in prefixes {
            if tag.starts_with(prefix.as_str()) && (prefix == "!" || prefix.len() < tag.len()) {
                handle = Some(prefix_handle.as_str());
                suffix = &tag[prefix.len()..];
            }
        }
        // Flow indicators end a shorthand tag; only the verbatim form keeps them.
        let suffix = percent_encode(suffix, |ch| {
            is_uri_char(ch, handle.is_none()) || (ch == '!' && handle != Some("!"))
        });
        Ok(match handle {
            Some(handle) => format!("{handle}{suffix}"),
            None => format!("!<{suffix}>"),
        })
    }

    // Comments.

    /// Close the current line with any held-back comments and move to the
    /// indentation of the next entry.
    fn start_line(&mut self) -> Result<()> {
        self.flush_comments()?;
        self.write_indent()
    }

    fn flush_comments(&mut self) -> Result<()> {
        self.write_in_line_comments()?;
        self.write_block_comments()
    }

    fn write_in_line_comments(&mut self) -> Result<()> {
        for value in std::mem::take(&mut self.pending_in_line) {
            if self.column > 0 {
                self.write_text(" ")?;
            }
            self.write_text("#")?;
            self.write_text(&value)?;
            self.whitespace = false;
        }
        Ok(())
    }

    fn write_block_comments(&mut self) -> Result<()> {
        if self.pending_block.is_empty() {
            return Ok(());
        }
        if self.column != 0 {
            self.write_line_break()?;
        }
        let indent = self.indent.unwrap_or(0);
        for (comment_type, value) in std::mem::take(&mut self.pending_block) {
            if comment_type != CommentType::Blank {
                self.write_whitespace(indent)?;
                self.write_text("#")?;
                self.write_text(&value)?;
            }
            self.write_line_break()?;
        }
        Ok(())
    }
}

fn prepare_anchor(anchor: &str) -> Result<String> {
    if anchor.is_empty() {
        return Err(YamlError::new(ErrorKind::InvalidAnchor(String::new()), None));
    }
    if !anchor.chars().all(is_anchor_char) {
        return Err(YamlError::new(
            ErrorKind::InvalidAnchor(anchor.to_owned()),
            None,
        ));
    }
    Ok(anchor.to_owned())
}

fn prepare_tag_handle(handle: &str) -> Result<String> {
    if !is_valid_tag_handle(handle) {
        return Err(YamlError::emitter(format!("invalid tag handle: {handle}")));
    }
    Ok(handle.to_owned())
}

fn prepare_tag_prefix(prefix: &str) -> Result<String> {
    if prefix.is_empty() {
        return Err(YamlError::emitter("tag prefix must not be empty"));
    }
    // A local prefix keeps its leading `!`.
    let (head, rest) = match prefix.strip_prefix('!') {
        Some(rest) => ("!", rest),
        None => ("", prefix),
    };
    Ok(format!(
        "{head}{}",
        percent_encode(rest, |ch| is_uri_char(ch, true) || ch == '!')
    ))
}

const fn is_uri_char(ch: char, verbatim: bool) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '-' | ';' | '/' | '?' | ':' | '@' | '&' | '=' | '+' | '$' | '_' | '.' | '~' | '*'
                | '\'' | '(' | ')'
        )
        || (verbatim && matches!(ch, ',' | '[' | ']'))
}

/// `%XX`-escape the UTF-8 bytes of every character `keep` rejects.
fn percent_encode(text: &str, keep: impl Fn(char) -> bool) -> String {
    let mut encoded = String::with_capacity(text.len());
    for ch in text.chars() {
        if keep(ch) {
            encoded.push(ch);
        } else {
            let mut buffer = [0; 4];
            for byte in ch.encode_utf8(&mut buffer).bytes() {
                encoded.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    encoded
}
