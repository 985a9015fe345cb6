// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The node graph.
//!
//! A [`Document`] owns its nodes in an arena; collections refer to their
//! children by [`NodeId`]. An alias is simply a second reference to the
//! same id, so shared and cyclic structures need no special representation.

use ordermap::OrderMap;

use crate::anchor::Anchor;
use crate::event::FlowStyle;
use crate::mark::Mark;
use crate::tag::Tag;
use crate::token::{CommentType, ScalarStyle};

/// Index of a node in its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One comment line attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentLine {
    pub comment_type: CommentType,
    /// Text after the `#`, empty for blank lines
    pub value: String,
    pub start: Option<Mark>,
    pub end: Option<Mark>,
}

impl CommentLine {
    #[must_use]
    pub fn new(comment_type: CommentType, value: impl Into<String>) -> Self {
        Self {
            comment_type,
            value: value.into(),
            start: None,
            end: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar {
        value: String,
        style: ScalarStyle,
    },
    Sequence {
        items: Vec<NodeId>,
        flow_style: FlowStyle,
    },
    Mapping {
        pairs: Vec<(NodeId, NodeId)>,
        flow_style: FlowStyle,
    },
}

/// A node of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: Tag,
    pub kind: NodeKind,
    /// The anchor the node was loaded with
    pub anchor: Option<Anchor>,
    /// The tag was inferred rather than written
    pub resolved: bool,
    /// The node contains itself
    pub recursive: bool,
    pub start_mark: Option<Mark>,
    pub end_mark: Option<Mark>,
    /// Comments on the lines before the node
    pub block_comments: Vec<CommentLine>,
    /// Comments after the node on its own line
    pub in_line_comments: Vec<CommentLine>,
    /// Comments after the last entry of a collection
    pub end_comments: Vec<CommentLine>,
}

impl Node {
    #[must_use]
    pub const fn new(tag: Tag, kind: NodeKind) -> Self {
        Self {
            tag,
            kind,
            anchor: None,
            resolved: false,
            recursive: false,
            start_mark: None,
            end_mark: None,
            block_comments: Vec::new(),
            in_line_comments: Vec::new(),
            end_comments: Vec::new(),
        }
    }

    #[must_use]
    pub fn scalar(tag: Tag, value: impl Into<String>, style: ScalarStyle) -> Self {
        Self::new(
            tag,
            NodeKind::Scalar {
                value: value.into(),
                style,
            },
        )
    }

    /// An empty sequence; items are pushed once they are allocated.
    #[must_use]
    pub const fn sequence(tag: Tag, flow_style: FlowStyle) -> Self {
        Self::new(
            tag,
            NodeKind::Sequence {
                items: Vec::new(),
                flow_style,
            },
        )
    }

    /// An empty mapping; pairs are pushed once they are allocated.
    #[must_use]
    pub const fn mapping(tag: Tag, flow_style: FlowStyle) -> Self {
        Self::new(
            tag,
            NodeKind::Mapping {
                pairs: Vec::new(),
                flow_style,
            },
        )
    }

    /// The scalar text, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        !matches!(self.kind, NodeKind::Scalar { .. })
    }

    /// Child ids in document order; keys before their values.
    #[must_use]
    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Scalar { .. } => Vec::new(),
            NodeKind::Sequence { items, .. } => items.clone(),
            NodeKind::Mapping { pairs, .. } => pairs
                .iter()
                .flat_map(|(key, value)| [*key, *value])
                .collect(),
        }
    }

    pub(crate) fn has_comments(&self) -> bool {
        !self.block_comments.is_empty()
            || !self.in_line_comments.is_empty()
            || !self.end_comments.is_empty()
    }
}

/// A composed document: the node arena plus the prolog it was read with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    /// The document began with `---`
    pub explicit_start: bool,
    /// The document ended with `...`
    pub explicit_end: bool,
    /// `%YAML` version
    pub version: Option<(u32, u32)>,
    /// `%TAG` directives, handle to prefix
    pub tag_directives: OrderMap<String, String>,
}

impl Document {
    /// A document whose root is `root`.
    #[must_use]
    pub fn new(root: Node) -> Self {
        let mut document = Self::default();
        document.root = document.alloc(root);
        document
    }

    /// Reserve an id for `node`.
    ///
    /// Collections are allocated empty and filled through
    /// [`Document::node_mut`], which lets a child refer back to an ancestor.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub const fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` was allocated by another document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// # Panics
    ///
    /// Panics when `id` was allocated by another document.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[must_use]
    pub fn root_node(&self) -> &Node {
        self.node(self.root)
    }

    /// Append an item to the sequence `parent`.
    pub fn push_item(&mut self, parent: NodeId, item: NodeId) {
        if let NodeKind::Sequence { items, .. } = &mut self.node_mut(parent).kind {
            items.push(item);
        }
    }

    /// Append a pair to the mapping `parent`.
    pub fn push_pair(&mut self, parent: NodeId, key: NodeId, value: NodeId) {
        if let NodeKind::Mapping { pairs, .. } = &mut self.node_mut(parent).kind {
            pairs.push((key, value));
        }
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_then_populate() {
        let mut document = Document::default();
        let root = document.alloc(Node::sequence(Tag::from(Tag::SEQ), FlowStyle::Block));
        document.set_root(root);
        let item = document.alloc(Node::scalar(Tag::from(Tag::STR), "a", ScalarStyle::Plain));
        document.push_item(root, item);
        // A sequence containing itself.
        document.push_item(root, root);

        assert_eq!(document.len(), 2);
        assert_eq!(document.root_node().children(), vec![item, root]);
        assert_eq!(document.node(item).as_scalar(), Some("a"));
        assert!(document.root_node().is_collection());
    }

    #[test]
    fn test_mapping_children_order() {
        let mut document = Document::new(Node::mapping(Tag::from(Tag::MAP), FlowStyle::Flow));
        let root = document.root();
        let key = document.alloc(Node::scalar(Tag::from(Tag::STR), "k", ScalarStyle::Plain));
        let value = document.alloc(Node::scalar(Tag::from(Tag::INT), "1", ScalarStyle::Plain));
        document.push_pair(root, key, value);
        assert_eq!(document.node(root).children(), vec![key, value]);
        assert_eq!(root.index(), 0);
    }
}
