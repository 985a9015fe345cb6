// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! A YAML 1.2 processor.
//!
//! Loading runs the input through a pipeline of pull-based stages:
//!
//! - [`Reader`] checks the input and tracks positions,
//! - [`Scanner`] turns characters into tokens,
//! - [`Parser`] turns tokens into events,
//! - [`Composer`] turns events into a [`Document`] node graph.
//!
//! Dumping runs the other way: [`Serializer`] walks a [`Document`] into
//! events and [`Emitter`] writes them as text. Anchors, aliases, comments,
//! all five scalar styles and multi-document streams survive the trip.
//!
//! [`Value`] is a small native model on top of the node graph for callers
//! that only want data.
//!
//! # Example
//!
//! ```
//! use yaml_engine::{DumpSettings, LoadSettings, Value, dump, load};
//!
//! let input = "
//! name: John
//! tags: [a, b]
//! ";
//!
//! let value = load(input, &LoadSettings::default()).unwrap();
//! assert_eq!(value.get("name").and_then(Value::as_str), Some("John"));
//!
//! let text = dump(&value, &DumpSettings::default()).unwrap();
//! assert_eq!(text, "name: John\ntags:\n- a\n- b\n");
//! ```

mod anchor;
mod composer;
mod emitter;
mod error;
mod event;
mod mark;
mod node;
mod parser;
mod reader;
mod scanner;
mod serializer;
mod settings;
mod tag;
mod token;
mod value;

pub use anchor::{
    Anchor, AnchorGenerator, AnchorStrategy, NumberAnchorGenerator, ReuseAnchorGenerator,
};
pub use composer::Composer;
pub use emitter::Emitter;
pub use error::{ErrorKind, Result, YamlError};
pub use event::{Event, EventId, EventKind, FlowStyle, ImplicitTuple};
pub use mark::Mark;
pub use node::{CommentLine, Document, Node, NodeId, NodeKind};
pub use parser::Parser;
pub use reader::Reader;
pub use scanner::Scanner;
pub use serializer::Serializer;
pub use settings::{DumpSettings, DumpSettingsBuilder, LoadSettings, LoadSettingsBuilder};
pub use tag::{CoreSchema, ScalarResolver, Tag};
pub use token::{Chomping, CommentType, ScalarStyle, Token, TokenId, TokenKind};
pub use value::Value;

/// Start parsing `input` into events.
///
/// The returned parser is lazy: each event is produced on demand.
///
/// # Errors
///
/// Fails when the input exceeds the code point limit or contains a
/// character YAML does not allow.
pub fn parse(input: &str, settings: &LoadSettings) -> Result<Parser> {
    Ok(Parser::new(Scanner::new(input, settings)?))
}

/// Compose the only document of `input`.
///
/// Returns `None` for a stream without documents.
///
/// # Errors
///
/// Fails on malformed input, on a violated load limit, and when the stream
/// holds more than one document.
pub fn compose(input: &str, settings: &LoadSettings) -> Result<Option<Document>> {
    compose_all(input, settings)?.compose_single()
}

/// Compose every document of `input`, one at a time.
///
/// # Errors
///
/// Fails like [`parse`]; errors in the documents themselves are returned
/// by the iterator.
pub fn compose_all(input: &str, settings: &LoadSettings) -> Result<Composer> {
    Ok(Composer::new(parse(input, settings)?, settings))
}

/// Load the only document of `input` as a [`Value`].
///
/// An empty stream loads as [`Value::Null`].
///
/// # Errors
///
/// Fails like [`compose`], and when a node cannot become a value.
pub fn load(input: &str, settings: &LoadSettings) -> Result<Value> {
    match compose(input, settings)? {
        Some(document) => Value::construct(&document, settings),
        None => Ok(Value::Null),
    }
}

/// Load every document of `input`.
///
/// # Errors
///
/// Stops at the first document that fails to compose or construct.
pub fn load_all(input: &str, settings: &LoadSettings) -> Result<Vec<Value>> {
    compose_all(input, settings)?
        .map(|document| Value::construct(&document?, settings))
        .collect()
}

/// Write a complete event stream as text.
///
/// # Errors
///
/// Fails when the events are out of order or cannot be written.
pub fn emit(events: impl IntoIterator<Item = Event>, settings: &DumpSettings) -> Result<String> {
    let mut emitter = Emitter::new(settings, String::new());
    for event in events {
        emitter.emit(event)?;
    }
    Ok(emitter.into_inner())
}

/// Write one document as a stream.
///
/// # Errors
///
/// Fails when the document holds an invalid anchor or tag.
pub fn serialize(document: &Document, settings: &DumpSettings) -> Result<String> {
    serialize_all(std::slice::from_ref(document), settings)
}

/// Write several documents as one stream.
///
/// # Errors
///
/// Fails when a document holds an invalid anchor or tag.
pub fn serialize_all(documents: &[Document], settings: &DumpSettings) -> Result<String> {
    let mut emitter = Emitter::new(settings, String::new());
    let mut serializer = Serializer::new(settings, &mut emitter);
    serializer.open()?;
    for document in documents {
        serializer.serialize_document(document)?;
    }
    serializer.close()?;
    Ok(emitter.into_inner())
}

/// Dump one value.
///
/// # Errors
///
/// Fails when the emitter rejects the output.
pub fn dump(value: &Value, settings: &DumpSettings) -> Result<String> {
    serialize(&value.represent(settings), settings)
}

/// Dump several values as a multi-document stream.
///
/// # Errors
///
/// Fails when the emitter rejects the output.
pub fn dump_all(values: &[Value], settings: &DumpSettings) -> Result<String> {
    let documents: Vec<Document> = values
        .iter()
        .map(|value| value.represent(settings))
        .collect();
    serialize_all(&documents, settings)
}

#[cfg(test)]
mod tests;
