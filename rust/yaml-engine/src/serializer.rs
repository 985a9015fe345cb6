// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Serializer: walks a [`Document`] and feeds its events to an [`Emitter`].
//!
//! A node reached more than once is written in full the first time, with
//! an anchor, and as an alias afterwards. Anchors are only generated for
//! such nodes; the names come from the [`AnchorStrategy`] of the settings.
//!
//! [`AnchorStrategy`]: crate::anchor::AnchorStrategy

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use log::debug;
use ordermap::OrderMap;

use crate::anchor::Anchor;
use crate::emitter::Emitter;
use crate::error::{ErrorKind, Result, YamlError};
use crate::event::{Event, EventKind, FlowStyle, ImplicitTuple};
use crate::node::{CommentLine, Document, Node, NodeId, NodeKind};
use crate::settings::DumpSettings;
use crate::tag::Tag;
use crate::token::ScalarStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    NotOpened,
    Open,
    Closed,
}

pub struct Serializer<'a, W: fmt::Write> {
    emitter: &'a mut Emitter<W>,
    settings: DumpSettings,
    state: StreamState,
    /// Every node of the current document; `Some` for those needing an anchor
    anchors: HashMap<NodeId, Option<Anchor>>,
    serialized: HashSet<NodeId>,
}

impl<'a, W: fmt::Write> Serializer<'a, W> {
    #[must_use]
    pub fn new(settings: &DumpSettings, emitter: &'a mut Emitter<W>) -> Self {
        Self {
            emitter,
            settings: settings.clone(),
            state: StreamState::NotOpened,
            anchors: HashMap::new(),
            serialized: HashSet::new(),
        }
    }

    /// Start the stream.
    ///
    /// # Errors
    ///
    /// Fails when the stream was already opened, or when the emitter fails.
    pub fn open(&mut self) -> Result<()> {
        match self.state {
            StreamState::NotOpened => {
                self.emit(EventKind::StreamStart)?;
                self.state = StreamState::Open;
                Ok(())
            }
            StreamState::Open => Err(YamlError::emitter("serializer is already opened")),
            StreamState::Closed => Err(YamlError::emitter("serializer is closed")),
        }
    }

    /// End the stream. Closing twice is allowed.
    ///
    /// # Errors
    ///
    /// Fails when the stream was never opened, or when the emitter fails.
    pub fn close(&mut self) -> Result<()> {
        match self.state {
            StreamState::NotOpened => Err(YamlError::emitter("serializer is not opened")),
            StreamState::Open => {
                self.emit(EventKind::StreamEnd)?;
                self.state = StreamState::Closed;
                Ok(())
            }
            StreamState::Closed => Ok(()),
        }
    }

    /// Write one document.
    ///
    /// # Errors
    ///
    /// Fails outside an open stream, or when the emitter fails.
    pub fn serialize_document(&mut self, document: &Document) -> Result<()> {
        match self.state {
            StreamState::NotOpened => return Err(YamlError::emitter("serializer is not opened")),
            StreamState::Closed => return Err(YamlError::emitter("serializer is closed")),
            StreamState::Open => {}
        }

        let tags = merged_tag_directives(document, &self.settings);
        self.emit(EventKind::DocumentStart {
            explicit: self.settings.explicit_start() || document.explicit_start,
            version: document.version.or_else(|| self.settings.yaml_directive()),
            tags,
        })?;

        if document.is_empty() {
            self.emit(EventKind::Scalar {
                anchor: None,
                tag: Some(Tag::from(Tag::NULL)),
                implicit: ImplicitTuple::new(true, false),
                value: String::new(),
                style: ScalarStyle::Plain,
            })?;
        } else {
            self.anchor_nodes(document);
            self.serialize_node(document, document.root())?;
        }

        self.emit(EventKind::DocumentEnd {
            explicit: self.settings.explicit_end() || document.explicit_end,
        })?;
        debug!(
            "serialized a document of {} nodes with {} anchors",
            document.len(),
            self.anchors.values().filter(|anchor| anchor.is_some()).count()
        );
        self.anchors.clear();
        self.serialized.clear();
        Ok(())
    }

    fn emit(&mut self, kind: EventKind) -> Result<()> {
        self.emitter.emit(Event::unmarked(kind))
    }

    /// Name every node that is reached twice, in document order.
    fn anchor_nodes(&mut self, document: &Document) {
        let mut generator = self.settings.anchor_strategy().generator();
        let mut stack = vec![document.root()];
        while let Some(id) = stack.pop() {
            match self.anchors.entry(id) {
                Entry::Occupied(mut entry) => {
                    if entry.get().is_none() {
                        entry.insert(Some(generator.next_anchor(document.node(id))));
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(None);
                    stack.extend(document.node(id).children().into_iter().rev());
                }
            }
        }
    }

    fn serialize_node(&mut self, document: &Document, id: NodeId) -> Result<()> {
        let anchor = self.anchors.get(&id).cloned().flatten();
        if !self.serialized.insert(id) {
            let Some(anchor) = anchor else {
                return Err(YamlError::new(
                    ErrorKind::Internal(format!("node {} has no anchor", id.index())),
                    None,
                ));
            };
            return self.emit(EventKind::Alias { anchor });
        }

        let node = document.node(id);
        self.emit_comments(&node.block_comments)?;
        match &node.kind {
            NodeKind::Scalar { value, style } => {
                let schema = self.settings.schema();
                let implicit = ImplicitTuple::new(
                    node.tag == schema.resolve(value, true),
                    node.tag == schema.resolve(value, false),
                );
                self.emit(EventKind::Scalar {
                    anchor,
                    tag: Some(node.tag.clone()),
                    implicit,
                    value: value.clone(),
                    style: *style,
                })?;
                self.emit_comments(&node.in_line_comments)?;
                self.emit_comments(&node.end_comments)?;
            }
            NodeKind::Sequence { items, flow_style } => {
                self.emit(EventKind::SequenceStart {
                    anchor,
                    tag: Some(node.tag.clone()),
                    implicit: node.tag == Tag::SEQ,
                    flow_style: concrete_flow_style(document, node, *flow_style),
                })?;
                for item in items {
                    self.serialize_node(document, *item)?;
                }
                self.emit_comments(&node.end_comments)?;
                self.emit(EventKind::SequenceEnd)?;
                self.emit_comments(&node.in_line_comments)?;
            }
            NodeKind::Mapping { pairs, flow_style } => {
                self.emit(EventKind::MappingStart {
                    anchor,
                    tag: Some(node.tag.clone()),
                    implicit: node.tag == Tag::MAP,
                    flow_style: concrete_flow_style(document, node, *flow_style),
                })?;
                for (key, value) in pairs {
                    self.serialize_node(document, *key)?;
                    self.serialize_node(document, *value)?;
                }
                self.emit_comments(&node.end_comments)?;
                self.emit(EventKind::MappingEnd)?;
                self.emit_comments(&node.in_line_comments)?;
            }
        }
        Ok(())
    }

    fn emit_comments(&mut self, comments: &[CommentLine]) -> Result<()> {
        if !self.settings.dump_comments() {
            return Ok(());
        }
        for comment in comments {
            self.emit(EventKind::Comment {
                comment_type: comment.comment_type,
                value: comment.value.clone(),
            })?;
        }
        Ok(())
    }
}

/// `Auto` becomes flow when every child is a scalar.
fn concrete_flow_style(document: &Document, node: &Node, flow_style: FlowStyle) -> FlowStyle {
    if flow_style != FlowStyle::Auto {
        return flow_style;
    }
    if node
        .children()
        .into_iter()
        .all(|child| !document.node(child).is_collection())
    {
        FlowStyle::Flow
    } else {
        FlowStyle::Block
    }
}

/// The document's own directives first, then those of the settings.
fn merged_tag_directives(
    document: &Document,
    settings: &DumpSettings,
) -> OrderMap<String, String> {
    let mut tags = document.tag_directives.clone();
    for (handle, prefix) in settings.tag_directives() {
        tags.entry(handle.clone()).or_insert_with(|| prefix.clone());
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AnchorStrategy;
    use crate::token::CommentType;

    fn serialize(document: &Document, settings: &DumpSettings) -> String {
        let mut emitter = Emitter::new(settings, String::new());
        let mut serializer = Serializer::new(settings, &mut emitter);
        serializer.open().unwrap();
        serializer.serialize_document(document).unwrap();
        serializer.close().unwrap();
        emitter.into_inner()
    }

    fn str_node(value: &str) -> Node {
        Node::scalar(Tag::from(Tag::STR), value, ScalarStyle::Plain)
    }

    #[test]
    fn test_shared_node_is_anchored_once() {
        let mut document = Document::new(Node::sequence(Tag::from(Tag::SEQ), FlowStyle::Block));
        let root = document.root();
        let shared = document.alloc(Node::mapping(Tag::from(Tag::MAP), FlowStyle::Block));
        let key = document.alloc(str_node("k"));
        let value = document.alloc(str_node("v"));
        document.push_pair(shared, key, value);
        document.push_item(root, shared);
        document.push_item(root, shared);

        assert_eq!(
            serialize(&document, &DumpSettings::default()),
            "- &id001\n  k: v\n- *id001\n"
        );
    }

    #[test]
    fn test_recursive_sequence() {
        let mut document = Document::new(Node::sequence(Tag::from(Tag::SEQ), FlowStyle::Block));
        let root = document.root();
        document.push_item(root, root);
        assert_eq!(
            serialize(&document, &DumpSettings::default()),
            "&id001\n- *id001\n"
        );
    }

    #[test]
    fn test_reuse_anchor_strategy() {
        let mut document = Document::new(Node::sequence(Tag::from(Tag::SEQ), FlowStyle::Flow));
        let root = document.root();
        let mut item = str_node("x");
        item.anchor = Some(Anchor::new("mine").unwrap());
        let item = document.alloc(item);
        document.push_item(root, item);
        document.push_item(root, item);

        let settings = DumpSettings::builder()
            .with_anchor_strategy(AnchorStrategy::Reuse)
            .build()
            .unwrap();
        assert_eq!(serialize(&document, &settings), "[&mine x, *mine]\n");
    }

    #[test]
    fn test_tags_are_omitted_when_resolvable() {
        let int = Document::new(Node::scalar(Tag::from(Tag::INT), "42", ScalarStyle::Plain));
        assert_eq!(serialize(&int, &DumpSettings::default()), "42\n");

        let text = Document::new(str_node("42"));
        assert_eq!(serialize(&text, &DumpSettings::default()), "'42'\n");

        let mut custom = Document::new(Node::sequence(Tag::new("!thing"), FlowStyle::Block));
        let root = custom.root();
        let item = custom.alloc(str_node("a"));
        custom.push_item(root, item);
        assert_eq!(serialize(&custom, &DumpSettings::default()), "!thing\n- a\n");
    }

    #[test]
    fn test_auto_flow_style() {
        let mut document = Document::new(Node::mapping(Tag::from(Tag::MAP), FlowStyle::Block));
        let root = document.root();
        let key = document.alloc(str_node("k"));
        let list = document.alloc(Node::sequence(Tag::from(Tag::SEQ), FlowStyle::Auto));
        let item = document.alloc(str_node("a"));
        document.push_item(list, item);
        document.push_pair(root, key, list);
        assert_eq!(serialize(&document, &DumpSettings::default()), "k: [a]\n");
    }

    #[test]
    fn test_comments_follow_dump_setting() {
        let mut document = Document::new(Node::mapping(Tag::from(Tag::MAP), FlowStyle::Block));
        let root = document.root();
        let mut key = str_node("a");
        key.block_comments
            .push(CommentLine::new(CommentType::Block, " note"));
        let key = document.alloc(key);
        let mut value = Node::scalar(Tag::from(Tag::INT), "1", ScalarStyle::Plain);
        value
            .in_line_comments
            .push(CommentLine::new(CommentType::InLine, " tail"));
        let value = document.alloc(value);
        document.push_pair(root, key, value);

        assert_eq!(serialize(&document, &DumpSettings::default()), "a: 1\n");
        let settings = DumpSettings::builder()
            .with_dump_comments(true)
            .build()
            .unwrap();
        assert_eq!(serialize(&document, &settings), "# note\na: 1 # tail\n");
    }

    #[test]
    fn test_explicit_markers_and_directives() {
        let settings = DumpSettings::builder()
            .with_explicit_start(true)
            .with_explicit_end(true)
            .build()
            .unwrap();
        let document = Document::new(str_node("a"));
        assert_eq!(serialize(&document, &settings), "--- a\n...\n");

        let settings = DumpSettings::builder()
            .with_yaml_directive(Some((1, 2)))
            .build()
            .unwrap();
        assert_eq!(serialize(&document, &settings), "%YAML 1.2\n--- a\n");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(
            serialize(&Document::default(), &DumpSettings::default()),
            "---\n"
        );
    }

    #[test]
    fn test_stream_state_errors() {
        let settings = DumpSettings::default();
        let mut emitter = Emitter::new(&settings, String::new());
        let mut serializer = Serializer::new(&settings, &mut emitter);
        let document = Document::new(str_node("a"));
        let err = serializer.serialize_document(&document).unwrap_err();
        assert!(err.to_string().contains("serializer is not opened"), "{err}");

        serializer.open().unwrap();
        serializer.close().unwrap();
        serializer.close().unwrap();
        let err = serializer.serialize_document(&document).unwrap_err();
        assert!(err.to_string().contains("serializer is closed"), "{err}");
    }
}
