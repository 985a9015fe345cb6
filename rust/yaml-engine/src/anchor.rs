// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Anchor names and the strategies that invent them when dumping.

use std::collections::HashSet;

use derive_more::Display;

use crate::error::{ErrorKind, Result, YamlError};
use crate::node::Node;

/// A validated anchor name (without the `&`/`*` indicator).
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub struct Anchor(String);

impl Anchor {
    /// Validate and wrap an anchor name.
    ///
    /// # Errors
    ///
    /// Fails for empty names and names containing whitespace, control
    /// characters or any of `,[]{}*&`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(|ch| !is_anchor_char(ch)) {
            return Err(YamlError::new(ErrorKind::InvalidAnchor(name), None));
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Characters allowed in an anchor name.
pub(crate) fn is_anchor_char(ch: char) -> bool {
    !ch.is_whitespace()
        && !ch.is_control()
        && ch != '\u{FEFF}'
        && !matches!(ch, ',' | '[' | ']' | '{' | '}' | '*' | '&')
}

/// Chooses anchor names for nodes the serializer must reference twice.
pub trait AnchorGenerator {
    /// Name the anchor of `node`.
    fn next_anchor(&mut self, node: &Node) -> Anchor;
}

/// Generates `id001`, `id002`, ...
#[derive(Debug, Clone, Default)]
pub struct NumberAnchorGenerator {
    last_id: usize,
}

impl NumberAnchorGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self { last_id: 0 }
    }
}

impl AnchorGenerator for NumberAnchorGenerator {
    fn next_anchor(&mut self, _node: &Node) -> Anchor {
        self.last_id += 1;
        Anchor(format!("id{:03}", self.last_id))
    }
}

/// Keeps the anchor a node was loaded with, numbering the rest.
///
/// A name is handed out at most once per document so that a redefined
/// anchor in the source cannot make an alias point at the wrong node.
#[derive(Debug, Clone, Default)]
pub struct ReuseAnchorGenerator {
    used: HashSet<Anchor>,
    numbers: NumberAnchorGenerator,
}

impl ReuseAnchorGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnchorGenerator for ReuseAnchorGenerator {
    fn next_anchor(&mut self, node: &Node) -> Anchor {
        if let Some(anchor) = &node.anchor
            && self.used.insert(anchor.clone())
        {
            return anchor.clone();
        }
        loop {
            let anchor = self.numbers.next_anchor(node);
            if self.used.insert(anchor.clone()) {
                return anchor;
            }
        }
    }
}

/// Which [`AnchorGenerator`] a dump uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorStrategy {
    /// `id001`, `id002`, ...
    #[default]
    Number,
    /// The anchor from the source when there is one
    Reuse,
}

impl AnchorStrategy {
    /// A fresh generator; generators are per document.
    #[must_use]
    pub fn generator(self) -> Box<dyn AnchorGenerator> {
        match self {
            Self::Number => Box::new(NumberAnchorGenerator::new()),
            Self::Reuse => Box::new(ReuseAnchorGenerator::new()),
        }
    }
}
