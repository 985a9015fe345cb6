// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Composer: turns the event stream into [`Document`]s.
//!
//! Collections are allocated empty and registered under their anchor before
//! their children are composed, so an alias inside a collection may refer
//! to the collection itself. Such a node is flagged `recursive`.
//!
//! Comment events are attached to the nodes around them: comments on the
//! lines before a node become its block comments, a comment on the line of
//! a finished node becomes its in-line comment and comments after the last
//! entry of a collection become its end comments.

use std::collections::{HashMap, HashSet};
use std::mem;

use log::{debug, trace};

use crate::anchor::Anchor;
use crate::error::{ErrorKind, Result, YamlError};
use crate::event::{Event, EventId, EventKind, ImplicitTuple};
use crate::mark::Mark;
use crate::node::{CommentLine, Document, Node, NodeId};
use crate::parser::Parser;
use crate::settings::LoadSettings;
use crate::tag::Tag;
use crate::token::{CommentType, ScalarStyle};

/// Pull composer over a [`Parser`].
///
/// Iterating yields one [`Document`] per document in the stream.
pub struct Composer {
    parser: Parser,
    settings: LoadSettings,
    /// Anchors defined so far in the current document
    anchors: HashMap<Anchor, NodeId>,
    /// Collections whose children are being composed
    in_progress: HashSet<NodeId>,
    /// Aliases to collections in the current document
    collection_aliases: usize,
    /// Aliases that closed a cycle in the current document
    recursive_aliases: usize,
    /// Block comments waiting for the next node
    pending_comments: Vec<CommentLine>,
    /// The node an in-line comment would belong to
    last_node: Option<NodeId>,
    done: bool,
}

impl Composer {
    #[must_use]
    pub fn new(parser: Parser, settings: &LoadSettings) -> Self {
        Self {
            parser,
            settings: settings.clone(),
            anchors: HashMap::new(),
            in_progress: HashSet::new(),
            collection_aliases: 0,
            recursive_aliases: 0,
            pending_comments: Vec::new(),
            last_node: None,
            done: false,
        }
    }

    /// Compose the next document of the stream.
    ///
    /// Returns `None` once the stream is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates scanning and parsing errors, and fails on undefined
    /// aliases, recursive keys, too many aliases or too deep nesting.
    pub fn compose_document(&mut self) -> Result<Option<Document>> {
        if self.done {
            return Ok(None);
        }
        match self.compose_next() {
            Ok(Some(document)) => Ok(Some(document)),
            Ok(None) => {
                self.done = true;
                Ok(None)
            }
            Err(error) => {
                self.done = true;
                Err(error)
            }
        }
    }

    /// Compose the only document of the stream.
    ///
    /// Returns `None` for a stream without documents.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::SingleDocumentExpected`] when the stream
    /// holds a second document, and for every error of
    /// [`Composer::compose_document`].
    pub fn compose_single(&mut self) -> Result<Option<Document>> {
        let document = self.compose_document()?;
        if let Some(event) = self.parser.peek_event()?
            && event.id() == EventId::DocumentStart
        {
            let mark = event.start.clone();
            self.done = true;
            return Err(YamlError::new(ErrorKind::SingleDocumentExpected, mark)
                .with_context("but found another document", None));
        }
        Ok(document)
    }

    fn compose_next(&mut self) -> Result<Option<Document>> {
        if self.parser.check_event(&[EventId::StreamStart])? {
            self.next_event()?;
        }
        self.last_node = None;
        let mut document = Document::default();
        self.collect_comments(&mut document)?;
        if self.parser.check_event(&[EventId::StreamEnd])? {
            self.next_event()?;
            if !self.pending_comments.is_empty() {
                trace!(
                    "dropping {} comments of a stream without documents",
                    self.pending_comments.len()
                );
                self.pending_comments.clear();
            }
            return Ok(None);
        }

        let start = self.next_event()?;
        let EventKind::DocumentStart {
            explicit,
            version,
            tags,
        } = start.kind
        else {
            return Err(unexpected_event("DocumentStart", &start));
        };
        document.explicit_start = explicit;
        document.version = version;
        document.tag_directives = tags;
        self.anchors.clear();
        self.in_progress.clear();
        self.collection_aliases = 0;
        self.recursive_aliases = 0;
        self.last_node = None;

        let root = self.compose_node(&mut document, 0)?;
        document.set_root(root);

        self.collect_comments(&mut document)?;
        self.attach_end_comments(&mut document, root);
        let end = self.next_event()?;
        let EventKind::DocumentEnd { explicit } = end.kind else {
            return Err(unexpected_event("DocumentEnd", &end));
        };
        document.explicit_end = explicit;

        // Comments after the last document belong to it; any others are
        // kept for the next document.
        self.last_node = None;
        self.collect_comments(&mut document)?;
        if self.parser.check_event(&[EventId::StreamEnd])? {
            self.attach_end_comments(&mut document, root);
        }

        debug!(
            "composed document: {} nodes, {} aliases to collections, {} recursive",
            document.len(),
            self.collection_aliases,
            self.recursive_aliases
        );
        self.anchors.clear();
        Ok(Some(document))
    }

    fn next_event(&mut self) -> Result<Event> {
        match self.parser.next_event()? {
            Some(event) => Ok(event),
            None => Err(YamlError::new(
                ErrorKind::Internal("event stream ended before <stream end>".to_owned()),
                None,
            )),
        }
    }

    /// Consume comment events, attaching in-line comments to the last node
    /// and keeping the others for the next one.
    fn collect_comments(&mut self, document: &mut Document) -> Result<()> {
        while self.parser.check_event(&[EventId::Comment])? {
            let event = self.next_event()?;
            let EventKind::Comment {
                comment_type,
                value,
            } = event.kind
            else {
                continue;
            };
            let comment = CommentLine {
                comment_type,
                value,
                start: event.start,
                end: event.end,
            };
            match (comment_type, self.last_node) {
                (CommentType::InLine, Some(id)) => {
                    document.node_mut(id).in_line_comments.push(comment);
                }
                _ => self.pending_comments.push(comment),
            }
        }
        Ok(())
    }

    /// Comments collected before the end of `id` become its end comments.
    fn attach_end_comments(&mut self, document: &mut Document, id: NodeId) {
        if !self.pending_comments.is_empty() {
            let comments = mem::take(&mut self.pending_comments);
            document.node_mut(id).end_comments.extend(comments);
        }
    }

    fn compose_node(&mut self, document: &mut Document, depth: usize) -> Result<NodeId> {
        self.collect_comments(document)?;
        let event = self.next_event()?;
        match event.kind {
            EventKind::Alias { anchor } => self.compose_alias(document, anchor, event.start),
            EventKind::Scalar {
                anchor,
                tag,
                implicit,
                value,
                style,
            } => Ok(self.compose_scalar(
                document,
                ScalarEvent {
                    anchor,
                    tag,
                    implicit,
                    value,
                    style,
                },
                event.start,
                event.end,
            )),
            EventKind::SequenceStart {
                anchor,
                tag,
                flow_style,
                ..
            } => {
                let tag = collection_tag(tag, Tag::SEQ);
                let node = Node::sequence(tag.0, flow_style);
                self.compose_collection(
                    document,
                    node,
                    tag.1,
                    anchor,
                    event.start,
                    depth,
                    EventId::SequenceEnd,
                )
            }
            EventKind::MappingStart {
                anchor,
                tag,
                flow_style,
                ..
            } => {
                let tag = collection_tag(tag, Tag::MAP);
                let node = Node::mapping(tag.0, flow_style);
                self.compose_collection(
                    document,
                    node,
                    tag.1,
                    anchor,
                    event.start,
                    depth,
                    EventId::MappingEnd,
                )
            }
            _ => Err(unexpected_event("a node", &event)),
        }
    }

    fn compose_alias(
        &mut self,
        document: &mut Document,
        anchor: Anchor,
        mark: Option<Mark>,
    ) -> Result<NodeId> {
        let Some(&id) = self.anchors.get(&anchor) else {
            return Err(YamlError::new(
                ErrorKind::UndefinedAlias(anchor.to_string()),
                mark,
            ));
        };
        if document.node(id).is_collection() {
            self.collection_aliases += 1;
            let max = self.settings.max_aliases_for_collections();
            if self.collection_aliases > max {
                debug!("alias quota of {max} reached at *{anchor}");
                return Err(YamlError::new(ErrorKind::TooManyAliases(max), mark));
            }
        }
        if self.in_progress.contains(&id) {
            trace!("alias *{anchor} refers to an enclosing collection");
            document.node_mut(id).recursive = true;
            self.recursive_aliases += 1;
        }
        self.last_node = Some(id);
        Ok(id)
    }

    fn compose_scalar(
        &mut self,
        document: &mut Document,
        scalar: ScalarEvent,
        start: Option<Mark>,
        end: Option<Mark>,
    ) -> NodeId {
        let (tag, resolved) = match scalar.tag {
            None => (
                self.settings
                    .schema()
                    .resolve(&scalar.value, scalar.implicit.plain),
                true,
            ),
            Some(tag) if tag == "!" => (Tag::from(Tag::STR), false),
            Some(tag) => (tag, false),
        };
        let mut node = Node::scalar(tag, scalar.value, scalar.style);
        node.resolved = resolved;
        node.start_mark = start;
        node.end_mark = end;
        node.block_comments = mem::take(&mut self.pending_comments);
        let id = self.register(document, node, scalar.anchor);
        self.last_node = Some(id);
        id
    }

    #[allow(
        clippy::too_many_arguments,
        reason = "both collection kinds share one composition loop"
    )]
    fn compose_collection(
        &mut self,
        document: &mut Document,
        mut node: Node,
        resolved: bool,
        anchor: Option<Anchor>,
        start: Option<Mark>,
        depth: usize,
        end_id: EventId,
    ) -> Result<NodeId> {
        let max_depth = self.settings.max_nesting_depth();
        if depth >= max_depth {
            return Err(YamlError::new(ErrorKind::NestingDepth(max_depth), start));
        }
        node.resolved = resolved;
        node.start_mark = start;
        node.block_comments = mem::take(&mut self.pending_comments);
        let id = self.register(document, node, anchor);
        self.in_progress.insert(id);
        self.last_node = None;

        let is_mapping = end_id == EventId::MappingEnd;
        loop {
            self.collect_comments(document)?;
            if self.parser.check_event(&[end_id])? {
                break;
            }
            if is_mapping {
                let recursive_before = self.recursive_aliases;
                let key = self.compose_node(document, depth + 1)?;
                if (self.recursive_aliases != recursive_before || document.node(key).recursive)
                    && !self.settings.allow_recursive_keys()
                {
                    return Err(YamlError::new(
                        ErrorKind::RecursiveKey,
                        document.node(key).start_mark.clone(),
                    ));
                }
                let value = self.compose_node(document, depth + 1)?;
                document.push_pair(id, key, value);
            } else {
                let item = self.compose_node(document, depth + 1)?;
                document.push_item(id, item);
            }
        }

        self.attach_end_comments(document, id);
        let end = self.next_event()?;
        document.node_mut(id).end_mark = end.end;
        self.in_progress.remove(&id);
        self.last_node = Some(id);
        Ok(id)
    }

    /// Allocate `node` and record its anchor; a redefined anchor replaces
    /// the earlier node for later aliases.
    fn register(
        &mut self,
        document: &mut Document,
        mut node: Node,
        anchor: Option<Anchor>,
    ) -> NodeId {
        node.anchor.clone_from(&anchor);
        let id = document.alloc(node);
        if let Some(anchor) = anchor
            && let Some(previous) = self.anchors.insert(anchor.clone(), id)
        {
            trace!("anchor &{anchor} redefined, was node {}", previous.index());
        }
        id
    }
}

/// Payload of a scalar event.
struct ScalarEvent {
    anchor: Option<Anchor>,
    tag: Option<Tag>,
    implicit: ImplicitTuple,
    value: String,
    style: ScalarStyle,
}

/// The tag of a collection and whether it was inferred.
fn collection_tag(tag: Option<Tag>, default: &str) -> (Tag, bool) {
    match tag {
        None => (Tag::from(default), true),
        Some(tag) if tag == "!" => (Tag::from(default), false),
        Some(tag) => (tag, false),
    }
}

fn unexpected_event(expected: &str, event: &Event) -> YamlError {
    YamlError::new(
        ErrorKind::Internal(format!("expected {expected}, but got {}", event.id())),
        event.start.clone(),
    )
}

impl Iterator for Composer {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        self.compose_document().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::scanner::Scanner;

    fn composer(input: &str, settings: &LoadSettings) -> Composer {
        Composer::new(Parser::new(Scanner::new(input, settings).unwrap()), settings)
    }

    fn compose(input: &str) -> Document {
        composer(input, &LoadSettings::default())
            .compose_single()
            .unwrap()
            .unwrap()
    }

    fn compose_error(input: &str, settings: &LoadSettings) -> YamlError {
        composer(input, settings)
            .collect::<Result<Vec<_>>>()
            .unwrap_err()
    }

    fn with_comments() -> LoadSettings {
        LoadSettings::builder()
            .with_parse_comments(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_scalar_tags() {
        let document = compose("- 1\n- '1'\n- ! 1\n- !!int 2\n- 1.5\n- ~\n- true\n- x\n");
        let tags: Vec<(String, bool)> = document
            .root_node()
            .children()
            .into_iter()
            .map(|id| {
                let node = document.node(id);
                (node.tag.to_string(), node.resolved)
            })
            .collect();
        assert_eq!(
            tags,
            vec![
                (Tag::INT.to_owned(), true),
                (Tag::STR.to_owned(), true),
                (Tag::STR.to_owned(), false),
                (Tag::INT.to_owned(), false),
                (Tag::FLOAT.to_owned(), true),
                (Tag::NULL.to_owned(), true),
                (Tag::BOOL.to_owned(), true),
                (Tag::STR.to_owned(), true),
            ]
        );
        assert_eq!(document.root_node().tag, Tag::SEQ);
    }

    #[test]
    fn test_aliases_share_nodes() {
        let document = compose("a: &x [1, 2]\nb: *x\n");
        let NodeKind::Mapping { pairs, .. } = &document.root_node().kind else {
            panic!("expected a mapping");
        };
        assert_eq!(pairs[0].1, pairs[1].1);
        assert_eq!(
            document.node(pairs[0].1).anchor,
            Some(Anchor::new("x").unwrap())
        );
        assert!(!document.node(pairs[0].1).recursive);
    }

    #[test]
    fn test_last_anchor_definition_wins() {
        let document = compose("- &a 1\n- &a 2\n- *a\n");
        let items = document.root_node().children();
        assert_eq!(items[2], items[1]);
    }

    #[test]
    fn test_recursive_collection() {
        let document = compose("&a [1, *a]\n");
        let root = document.root();
        assert!(document.root_node().recursive);
        assert_eq!(document.root_node().children()[1], root);
    }

    #[test]
    fn test_recursive_key() {
        let err = compose_error("&a { *a : 1 }\n", &LoadSettings::default());
        assert_eq!(err.kind, ErrorKind::RecursiveKey);

        // The cycle was closed before the mapping started.
        let err = compose_error("- &a [*a]\n- {*a : 1}\n", &LoadSettings::default());
        assert_eq!(err.kind, ErrorKind::RecursiveKey);

        let settings = LoadSettings::builder()
            .with_allow_recursive_keys(true)
            .build()
            .unwrap();
        let documents = composer("&a { *a : 1 }\n", &settings)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert!(documents[0].root_node().recursive);
    }

    #[test]
    fn test_undefined_alias() {
        let err = compose_error("a: *nope\n", &LoadSettings::default());
        assert_eq!(err.kind, ErrorKind::UndefinedAlias("nope".to_owned()));
        assert_eq!(err.problem_mark.unwrap().column(), 3);
    }

    #[test]
    fn test_alias_quota_counts_collections_only() {
        let settings = LoadSettings::builder()
            .with_max_aliases_for_collections(2)
            .build()
            .unwrap();
        let scalars = "- &s x\n- *s\n- *s\n- *s\n";
        assert!(
            composer(scalars, &settings)
                .collect::<Result<Vec<_>>>()
                .is_ok()
        );

        let collections = "- &c [x]\n- *c\n- *c\n- *c\n";
        let err = compose_error(collections, &settings);
        assert_eq!(err.kind, ErrorKind::TooManyAliases(2));
        assert_eq!(err.problem_mark.unwrap().line(), 3);
    }

    #[test]
    fn test_alias_quota_is_per_document() {
        let settings = LoadSettings::builder()
            .with_max_aliases_for_collections(1)
            .build()
            .unwrap();
        let input = "- &c [x]\n- *c\n---\n- &c [x]\n- *c\n";
        let documents = composer(input, &settings)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(documents.len(), 2);
    }

    #[test]
    fn test_nesting_depth() {
        let settings = LoadSettings::builder()
            .with_max_nesting_depth(3)
            .build()
            .unwrap();
        assert!(
            composer("[[[x]]]", &settings)
                .collect::<Result<Vec<_>>>()
                .is_ok()
        );
        let err = compose_error("[[[[x]]]]", &settings);
        assert_eq!(err.kind, ErrorKind::NestingDepth(3));
    }

    #[test]
    fn test_documents() {
        let documents = composer("%YAML 1.2\n--- a\n...\nb\n", &LoadSettings::default())
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents[0].explicit_start);
        assert!(documents[0].explicit_end);
        assert_eq!(documents[0].version, Some((1, 2)));
        assert!(!documents[1].explicit_start);
        assert_eq!(documents[1].root_node().as_scalar(), Some("b"));
        assert!(
            composer("", &LoadSettings::default())
                .compose_single()
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_single_document_expected() {
        let err = composer("a\n---\nb\n", &LoadSettings::default())
            .compose_single()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SingleDocumentExpected);
        assert_eq!(err.problem_mark.unwrap().line(), 1);
    }

    #[test]
    fn test_marks() {
        let document = compose("a:\n  - b\n");
        let NodeKind::Mapping { pairs, .. } = &document.root_node().kind else {
            panic!("expected a mapping");
        };
        let sequence = document.node(pairs[0].1);
        let start = sequence.start_mark.as_ref().unwrap();
        assert_eq!((start.line(), start.column()), (1, 2));
    }

    #[test]
    fn test_comment_attachment() {
        let input = "# head\na: 1 # tail\n\nb:\n  - x\n  # end of b\n# trailing\n";
        let mut composer = composer(input, &with_comments());
        let document = composer.compose_document().unwrap().unwrap();
        let root = document.root_node();
        assert_eq!(root.block_comments[0].value, " head");

        let NodeKind::Mapping { pairs, .. } = &root.kind else {
            panic!("expected a mapping");
        };
        let one = document.node(pairs[0].1);
        assert_eq!(one.in_line_comments.len(), 1);
        assert_eq!(one.in_line_comments[0].comment_type, CommentType::InLine);
        assert_eq!(one.in_line_comments[0].value, " tail");

        let b = document.node(pairs[1].0);
        assert_eq!(b.block_comments[0].comment_type, CommentType::Blank);

        let sequence = document.node(pairs[1].1);
        let ends: Vec<&str> = sequence
            .end_comments
            .iter()
            .map(|comment| comment.value.as_str())
            .collect();
        assert_eq!(ends, vec![" end of b", " trailing"]);
    }

    #[test]
    fn test_comments_ignored_by_default() {
        let document = compose("# head\na: 1 # tail\n");
        assert!(!document.root_node().has_comments());
    }

    #[test]
    fn test_iterator_is_fused_after_error() {
        let mut composer = composer("- *x\n---\n- y\n", &LoadSettings::default());
        assert!(matches!(composer.next(), Some(Err(_))));
        assert!(composer.next().is_none());
    }
}
