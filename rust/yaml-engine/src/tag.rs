// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Tags and implicit tag resolution.

use std::fmt;
use std::sync::LazyLock;

use derive_more::{Display, From};
use regex::Regex;

/// A resolved tag URI such as `tag:yaml.org,2002:str`.
#[derive(Debug, Display, From, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Prefix of the `!!` handle.
    pub const PREFIX: &'static str = "tag:yaml.org,2002:";
    pub const NULL: &'static str = "tag:yaml.org,2002:null";
    pub const BOOL: &'static str = "tag:yaml.org,2002:bool";
    pub const INT: &'static str = "tag:yaml.org,2002:int";
    pub const FLOAT: &'static str = "tag:yaml.org,2002:float";
    pub const STR: &'static str = "tag:yaml.org,2002:str";
    pub const SEQ: &'static str = "tag:yaml.org,2002:seq";
    pub const MAP: &'static str = "tag:yaml.org,2002:map";

    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Tag {
    fn from(tag: &str) -> Self {
        Self(tag.to_owned())
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Decides the tag of untagged scalars.
///
/// `implicit` is true when the scalar was plain; quoted and block scalars
/// are always strings under the YAML 1.2 schemas.
pub trait ScalarResolver: fmt::Debug + Send + Sync {
    fn resolve(&self, value: &str, implicit: bool) -> Tag;
}

#[allow(clippy::expect_used, reason = "constant patterns are covered by tests")]
static CORE_RULES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (Tag::NULL, r"^(?:~|null|Null|NULL)?$"),
        (Tag::BOOL, r"^(?:true|True|TRUE|false|False|FALSE)$"),
        (Tag::INT, r"^(?:[-+]?[0-9]+|0o[0-7]+|0x[0-9a-fA-F]+)$"),
        (
            Tag::FLOAT,
            r"^(?:[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
        ),
    ]
    .into_iter()
    .map(|(tag, pattern)| (tag, Regex::new(pattern).expect("valid core schema pattern")))
    .collect()
});

/// The YAML 1.2 core schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreSchema;

impl ScalarResolver for CoreSchema {
    fn resolve(&self, value: &str, implicit: bool) -> Tag {
        if implicit {
            for (tag, pattern) in CORE_RULES.iter() {
                if pattern.is_match(value) {
                    return Tag::from(*tag);
                }
            }
        }
        Tag::from(Tag::STR)
    }
}
