// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Native values: the default construct/represent boundary.
//!
//! [`Value::construct`] turns a composed [`Document`] into an owned tree of
//! core schema values and [`Value::represent`] turns such a tree back into
//! a document for the serializer. Applications with their own types can
//! walk the node graph instead.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use ordermap::OrderMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{ErrorKind, Result, YamlError};
use crate::event::FlowStyle;
use crate::node::{Document, Node, NodeId, NodeKind};
use crate::settings::{DumpSettings, LoadSettings};
use crate::tag::Tag;

/// A core schema value.
///
/// Mappings keep their keys in document order. Floats compare by their bit
/// pattern, so `NaN` equals itself and a value can always serve as a key.
#[derive(Debug, Clone)]
pub enum Value {
    /// `null`, `~` or empty
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Vec<(Value, Value)>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&[(Self, Self)]> {
        match self {
            Self::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up a string key in a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping()?
            .iter()
            .find(|(candidate, _)| candidate.as_str() == Some(key))
            .map(|(_, value)| value)
    }

    /// Construct the value of a composed document.
    ///
    /// # Errors
    ///
    /// Fails on recursive nodes, on duplicate keys unless
    /// `allow_duplicate_keys` is set, on tags without a constructor and on
    /// scalars their tag cannot read.
    pub fn construct(document: &Document, settings: &LoadSettings) -> Result<Self> {
        if document.is_empty() {
            return Ok(Self::Null);
        }
        Constructor {
            document,
            settings,
            visiting: HashSet::new(),
        }
        .construct(document.root())
    }

    /// Represent the value as a document.
    #[must_use]
    pub fn represent(&self, settings: &DumpSettings) -> Document {
        let mut document = Document::default();
        let root = self.represent_into(&mut document, settings);
        document.set_root(root);
        document
    }

    fn represent_into(&self, document: &mut Document, settings: &DumpSettings) -> NodeId {
        let style = settings.default_scalar_style();
        let node = match self {
            Self::Null => Node::scalar(Tag::from(Tag::NULL), "null", style),
            Self::Bool(value) => Node::scalar(Tag::from(Tag::BOOL), value.to_string(), style),
            Self::Int(value) => Node::scalar(Tag::from(Tag::INT), value.to_string(), style),
            Self::Float(value) => Node::scalar(Tag::from(Tag::FLOAT), format_float(*value), style),
            Self::String(value) => Node::scalar(Tag::from(Tag::STR), value.as_str(), style),
            Self::Sequence(items) => {
                let flow_style = self.flow_style(settings);
                let id = document.alloc(Node::sequence(Tag::from(Tag::SEQ), flow_style));
                for item in items {
                    let item = item.represent_into(document, settings);
                    document.push_item(id, item);
                }
                return id;
            }
            Self::Mapping(pairs) => {
                let flow_style = self.flow_style(settings);
                let id = document.alloc(Node::mapping(Tag::from(Tag::MAP), flow_style));
                for (key, value) in pairs {
                    let key = key.represent_into(document, settings);
                    let value = value.represent_into(document, settings);
                    document.push_pair(id, key, value);
                }
                return id;
            }
        };
        document.alloc(node)
    }

    /// `Auto` picks flow style for collections holding scalars only.
    fn flow_style(&self, settings: &DumpSettings) -> FlowStyle {
        match settings.default_flow_style() {
            FlowStyle::Auto => {
                let scalars_only = match self {
                    Self::Sequence(items) => items.iter().all(Self::is_scalar),
                    Self::Mapping(pairs) => pairs
                        .iter()
                        .all(|(key, value)| key.is_scalar() && value.is_scalar()),
                    _ => true,
                };
                if scalars_only {
                    FlowStyle::Flow
                } else {
                    FlowStyle::Block
                }
            }
            style => style,
        }
    }

    const fn is_scalar(&self) -> bool {
        !matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }
}

/// Shortest text that reads back as the same float.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        ".nan".to_owned()
    } else if value.is_infinite() {
        let text = if value > 0.0 { ".inf" } else { "-.inf" };
        text.to_owned()
    } else {
        let text = format!("{value:?}");
        if text.contains(['.', 'e', 'E']) {
            text
        } else {
            format!("{text}.0")
        }
    }
}

struct Constructor<'a> {
    document: &'a Document,
    settings: &'a LoadSettings,
    /// Collections on the path from the root
    visiting: HashSet<NodeId>,
}

impl Constructor<'_> {
    fn construct(&mut self, id: NodeId) -> Result<Value> {
        let document = self.document;
        let node = document.node(id);
        match &node.kind {
            NodeKind::Scalar { value, .. } => construct_scalar(node, value),
            NodeKind::Sequence { items, .. } => {
                self.enter(id, node, Tag::SEQ)?;
                let values = items
                    .iter()
                    .map(|item| self.construct(*item))
                    .collect::<Result<Vec<_>>>()?;
                self.visiting.remove(&id);
                Ok(Value::Sequence(values))
            }
            NodeKind::Mapping { pairs, .. } => {
                self.enter(id, node, Tag::MAP)?;
                let mut entries: OrderMap<Value, Value> = OrderMap::with_capacity(pairs.len());
                for (key_id, value_id) in pairs {
                    let key = self.construct(*key_id)?;
                    let value = self.construct(*value_id)?;
                    if let Some(slot) = entries.get_mut(&key) {
                        if !self.settings.allow_duplicate_keys() {
                            return Err(YamlError::new(
                                ErrorKind::DuplicateKey(key.to_string()),
                                document.node(*key_id).start_mark.clone(),
                            )
                            .with_context(
                                "while constructing a mapping",
                                node.start_mark.clone(),
                            ));
                        }
                        *slot = value;
                    } else {
                        entries.insert(key, value);
                    }
                }
                self.visiting.remove(&id);
                Ok(Value::Mapping(entries.into_iter().collect()))
            }
        }
    }

    /// Check the collection's tag and guard against cycles.
    fn enter(&mut self, id: NodeId, node: &Node, expected: &str) -> Result<()> {
        if node.tag != expected {
            return Err(missing_constructor(node));
        }
        if node.recursive || !self.visiting.insert(id) {
            return Err(YamlError::new(
                ErrorKind::RecursiveValue,
                node.start_mark.clone(),
            ));
        }
        Ok(())
    }
}

fn missing_constructor(node: &Node) -> YamlError {
    YamlError::new(
        ErrorKind::MissingConstructor(node.tag.to_string()),
        node.start_mark.clone(),
    )
}

fn construct_scalar(node: &Node, value: &str) -> Result<Value> {
    let invalid = || {
        YamlError::new(
            ErrorKind::InvalidScalar {
                tag: node.tag.to_string(),
                value: value.to_owned(),
            },
            node.start_mark.clone(),
        )
    };
    match node.tag.as_str() {
        Tag::NULL => Ok(Value::Null),
        Tag::BOOL => match value {
            "true" | "True" | "TRUE" => Ok(Value::Bool(true)),
            "false" | "False" | "FALSE" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        Tag::INT => parse_int(value).map(Value::Int).ok_or_else(invalid),
        Tag::FLOAT => parse_float(value).map(Value::Float).ok_or_else(invalid),
        Tag::STR => Ok(Value::String(value.to_owned())),
        _ => Err(missing_constructor(node)),
    }
}

fn parse_int(value: &str) -> Option<i64> {
    if let Some(octal) = value.strip_prefix("0o") {
        return i64::from_str_radix(octal, 8).ok();
    }
    if let Some(hex) = value.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok();
    }
    value.parse().ok()
}

fn parse_float(value: &str) -> Option<f64> {
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    match unsigned {
        ".inf" | ".Inf" | ".INF" if negative => Some(f64::NEG_INFINITY),
        ".inf" | ".Inf" | ".INF" => Some(f64::INFINITY),
        ".nan" | ".NaN" | ".NAN" if unsigned.len() == value.len() => Some(f64::NAN),
        _ => value.parse().ok(),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(value) => value.hash(state),
            Self::Int(value) => value.hash(state),
            Self::Float(value) => value.to_bits().hash(state),
            Self::String(value) => value.hash(state),
            Self::Sequence(items) => items.hash(state),
            Self::Mapping(pairs) => pairs.hash(state),
        }
    }
}

/// Flow-style rendering, used in messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{}", format_float(*value)),
            Self::String(value) => write!(f, "{value}"),
            Self::Sequence(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Mapping(pairs) => {
                write!(f, "{{")?;
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::composer::Composer;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn load_with(input: &str, settings: &LoadSettings) -> Result<Value> {
        let mut composer = Composer::new(Parser::new(Scanner::new(input, settings)?), settings);
        let document = composer.compose_single()?.unwrap_or_default();
        Value::construct(&document, settings)
    }

    fn load(input: &str) -> Value {
        load_with(input, &LoadSettings::default()).unwrap()
    }

    #[test]
    fn test_construct_core_schema() {
        let value = load(
            "nothing: ~\nbool: True\nint: -12\noctal: 0o17\nhex: 0xff\nfloat: 1.5\nexp: 1e3\n\
             str: hello\nquoted: '42'\nseq: [1, two]\nmap: {a: b}\n",
        );
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({
                "nothing": null,
                "bool": true,
                "int": -12,
                "octal": 15,
                "hex": 255,
                "float": 1.5,
                "exp": 1000.0,
                "str": "hello",
                "quoted": "42",
                "seq": [1, "two"],
                "map": {"a": "b"},
            })
        );
        assert_eq!(value.get("hex").and_then(Value::as_i64), Some(255));
    }

    #[test]
    fn test_special_floats() {
        let value = load("[.inf, -.Inf, .NaN]");
        let items = value.as_sequence().unwrap();
        assert_eq!(items[0].as_f64(), Some(f64::INFINITY));
        assert_eq!(items[1].as_f64(), Some(f64::NEG_INFINITY));
        assert!(items[2].as_f64().unwrap().is_nan());
        // NaN keys compare equal to themselves.
        assert_eq!(items[2], Value::Float(f64::NAN));
    }

    #[test]
    fn test_aliases_are_copied() {
        let value = load("a: &x [1, 2]\nb: *x\n");
        assert_eq!(value.get("a"), value.get("b"));
    }

    #[test]
    fn test_duplicate_keys() {
        let err = load_with("{a: 1, a: 2}", &LoadSettings::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateKey("a".to_owned()));
        assert!(err.to_string().contains("found duplicate key a"), "{err}");

        let settings = LoadSettings::builder()
            .with_allow_duplicate_keys(true)
            .build()
            .unwrap();
        let value = load_with("{a: 1, b: 0, a: 2}", &settings).unwrap();
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"a": 2, "b": 0})
        );
        assert_eq!(value.as_mapping().unwrap()[0].0.as_str(), Some("a"));
    }

    #[test]
    fn test_recursive_value() {
        let err = load_with("&a [*a]", &LoadSettings::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RecursiveValue);
    }

    #[test]
    fn test_tag_errors() {
        let err = load_with("!local x", &LoadSettings::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingConstructor("!local".to_owned()));

        let err = load_with("!!int x", &LoadSettings::default()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidScalar { .. }));

        let err = load_with("!!map [a]", &LoadSettings::default()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingConstructor(_)));
    }

    #[test]
    fn test_empty_document_is_null() {
        assert!(load("").is_null());
        assert!(load("---\n").is_null());
    }

    #[test]
    fn test_represent() {
        let value = Value::Mapping(vec![
            (Value::from("f"), Value::Float(2.0)),
            (Value::from("n"), Value::Null),
            (
                Value::from("s"),
                Value::from(vec![Value::Int(1), Value::Bool(false)]),
            ),
        ]);
        let document = value.represent(&DumpSettings::default());
        let root = document.root_node();
        assert_eq!(root.tag, Tag::MAP);
        let NodeKind::Mapping { pairs, .. } = &root.kind else {
            panic!("expected a mapping");
        };
        assert_eq!(document.node(pairs[0].1).as_scalar(), Some("2.0"));
        assert_eq!(document.node(pairs[1].1).as_scalar(), Some("null"));
        assert_eq!(document.node(pairs[2].1).children().len(), 2);
    }

    #[test]
    fn test_represent_auto_flow_style() {
        let settings = DumpSettings::builder()
            .with_default_flow_style(FlowStyle::Auto)
            .build()
            .unwrap();
        let value = Value::from(vec![
            Value::from(vec![Value::Int(1)]),
            Value::from("x"),
        ]);
        let document = value.represent(&settings);
        let flow_style = |id| match &document.node(id).kind {
            NodeKind::Sequence { flow_style, .. } => *flow_style,
            _ => panic!("expected a sequence"),
        };
        assert_eq!(flow_style(document.root()), FlowStyle::Block);
        assert_eq!(
            flow_style(document.root_node().children()[0]),
            FlowStyle::Flow
        );
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(f64::NEG_INFINITY), "-.inf");
        assert_eq!(format_float(f64::NAN), ".nan");
        assert_eq!(format_float(1e300), "1e300");
    }
}
