// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Load and dump settings.
//!
//! Both settings types are immutable once built. Builders validate every
//! value in `build()` so that the pipelines never see an impossible
//! configuration.

use std::sync::Arc;

use ordermap::OrderMap;

use crate::anchor::AnchorStrategy;
use crate::error::{Result, YamlError};
use crate::event::FlowStyle;
use crate::tag::{CoreSchema, ScalarResolver};
use crate::token::ScalarStyle;

const DEFAULT_CODE_POINT_LIMIT: usize = 3 * 1024 * 1024;

/// Settings of the load pipeline.
#[derive(Debug, Clone)]
pub struct LoadSettings {
    label: String,
    allow_duplicate_keys: bool,
    allow_recursive_keys: bool,
    max_aliases_for_collections: usize,
    max_nesting_depth: usize,
    parse_comments: bool,
    max_simple_key_length: usize,
    code_point_limit: usize,
    schema: Arc<dyn ScalarResolver>,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            label: "reader".to_owned(),
            allow_duplicate_keys: false,
            allow_recursive_keys: false,
            max_aliases_for_collections: 50,
            max_nesting_depth: 512,
            parse_comments: false,
            max_simple_key_length: 1024,
            code_point_limit: DEFAULT_CODE_POINT_LIMIT,
            schema: Arc::new(CoreSchema),
        }
    }
}

impl LoadSettings {
    #[must_use]
    pub fn builder() -> LoadSettingsBuilder {
        LoadSettingsBuilder::default()
    }

    /// Name of the input, shown in error marks.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn allow_duplicate_keys(&self) -> bool {
        self.allow_duplicate_keys
    }

    #[must_use]
    pub const fn allow_recursive_keys(&self) -> bool {
        self.allow_recursive_keys
    }

    /// How many aliases to sequences and mappings a document may contain.
    #[must_use]
    pub const fn max_aliases_for_collections(&self) -> usize {
        self.max_aliases_for_collections
    }

    #[must_use]
    pub const fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    #[must_use]
    pub const fn parse_comments(&self) -> bool {
        self.parse_comments
    }

    #[must_use]
    pub const fn max_simple_key_length(&self) -> usize {
        self.max_simple_key_length
    }

    #[must_use]
    pub const fn code_point_limit(&self) -> usize {
        self.code_point_limit
    }

    #[must_use]
    pub fn schema(&self) -> &dyn ScalarResolver {
        self.schema.as_ref()
    }
}

/// Builder for [`LoadSettings`].
#[derive(Debug, Clone, Default)]
pub struct LoadSettingsBuilder {
    settings: LoadSettings,
}

impl LoadSettingsBuilder {
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.settings.label = label.into();
        self
    }

    #[must_use]
    pub const fn with_allow_duplicate_keys(mut self, allow: bool) -> Self {
        self.settings.allow_duplicate_keys = allow;
        self
    }

    #[must_use]
    pub const fn with_allow_recursive_keys(mut self, allow: bool) -> Self {
        self.settings.allow_recursive_keys = allow;
        self
    }

    #[must_use]
    pub const fn with_max_aliases_for_collections(mut self, max: usize) -> Self {
        self.settings.max_aliases_for_collections = max;
        self
    }

    #[must_use]
    pub const fn with_max_nesting_depth(mut self, max: usize) -> Self {
        self.settings.max_nesting_depth = max;
        self
    }

    #[must_use]
    pub const fn with_parse_comments(mut self, parse: bool) -> Self {
        self.settings.parse_comments = parse;
        self
    }

    #[must_use]
    pub const fn with_max_simple_key_length(mut self, max: usize) -> Self {
        self.settings.max_simple_key_length = max;
        self
    }

    #[must_use]
    pub const fn with_code_point_limit(mut self, limit: usize) -> Self {
        self.settings.code_point_limit = limit;
        self
    }

    /// Replace the scalar resolver (the core schema by default).
    #[must_use]
    pub fn with_schema(mut self, schema: Arc<dyn ScalarResolver>) -> Self {
        self.settings.schema = schema;
        self
    }

    /// Validate and freeze the settings.
    ///
    /// # Errors
    ///
    /// Fails when a limit is zero.
    pub fn build(self) -> Result<LoadSettings> {
        let settings = self.settings;
        if settings.max_simple_key_length == 0 {
            return Err(YamlError::setting(
                "max_simple_key_length",
                "must be positive",
            ));
        }
        if settings.code_point_limit == 0 {
            return Err(YamlError::setting("code_point_limit", "must be positive"));
        }
        if settings.max_nesting_depth == 0 {
            return Err(YamlError::setting("max_nesting_depth", "must be positive"));
        }
        Ok(settings)
    }
}

/// Settings of the dump pipeline.
#[derive(Debug, Clone)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "each flag is an independent output option"
)]
pub struct DumpSettings {
    explicit_start: bool,
    explicit_end: bool,
    default_flow_style: FlowStyle,
    default_scalar_style: ScalarStyle,
    canonical: bool,
    multi_line_flow: bool,
    use_unicode_encoding: bool,
    indent: usize,
    indicator_indent: usize,
    indent_with_indicator: bool,
    width: usize,
    best_line_break: String,
    split_lines: bool,
    max_simple_key_length: usize,
    dump_comments: bool,
    yaml_directive: Option<(u32, u32)>,
    tag_directives: OrderMap<String, String>,
    anchor_strategy: AnchorStrategy,
    schema: Arc<dyn ScalarResolver>,
}

impl Default for DumpSettings {
    fn default() -> Self {
        Self {
            explicit_start: false,
            explicit_end: false,
            default_flow_style: FlowStyle::Block,
            default_scalar_style: ScalarStyle::Plain,
            canonical: false,
            multi_line_flow: false,
            use_unicode_encoding: true,
            indent: 2,
            indicator_indent: 0,
            indent_with_indicator: false,
            width: 80,
            best_line_break: "\n".to_owned(),
            split_lines: true,
            max_simple_key_length: 128,
            dump_comments: false,
            yaml_directive: None,
            tag_directives: OrderMap::new(),
            anchor_strategy: AnchorStrategy::default(),
            schema: Arc::new(CoreSchema),
        }
    }
}

impl DumpSettings {
    #[must_use]
    pub fn builder() -> DumpSettingsBuilder {
        DumpSettingsBuilder::default()
    }

    #[must_use]
    pub const fn explicit_start(&self) -> bool {
        self.explicit_start
    }

    #[must_use]
    pub const fn explicit_end(&self) -> bool {
        self.explicit_end
    }

    #[must_use]
    pub const fn default_flow_style(&self) -> FlowStyle {
        self.default_flow_style
    }

    #[must_use]
    pub const fn default_scalar_style(&self) -> ScalarStyle {
        self.default_scalar_style
    }

    #[must_use]
    pub const fn canonical(&self) -> bool {
        self.canonical
    }

    #[must_use]
    pub const fn multi_line_flow(&self) -> bool {
        self.multi_line_flow
    }

    /// Write non-ASCII printable characters as is rather than escaped.
    #[must_use]
    pub const fn use_unicode_encoding(&self) -> bool {
        self.use_unicode_encoding
    }

    #[must_use]
    pub const fn indent(&self) -> usize {
        self.indent
    }

    /// Spaces written before the `-` of block sequence items.
    #[must_use]
    pub const fn indicator_indent(&self) -> usize {
        self.indicator_indent
    }

    #[must_use]
    pub const fn indent_with_indicator(&self) -> bool {
        self.indent_with_indicator
    }

    /// Preferred line width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn best_line_break(&self) -> &str {
        &self.best_line_break
    }

    #[must_use]
    pub const fn split_lines(&self) -> bool {
        self.split_lines
    }

    #[must_use]
    pub const fn max_simple_key_length(&self) -> usize {
        self.max_simple_key_length
    }

    #[must_use]
    pub const fn dump_comments(&self) -> bool {
        self.dump_comments
    }

    #[must_use]
    pub const fn yaml_directive(&self) -> Option<(u32, u32)> {
        self.yaml_directive
    }

    #[must_use]
    pub const fn tag_directives(&self) -> &OrderMap<String, String> {
        &self.tag_directives
    }

    #[must_use]
    pub const fn anchor_strategy(&self) -> AnchorStrategy {
        self.anchor_strategy
    }

    #[must_use]
    pub fn schema(&self) -> &dyn ScalarResolver {
        self.schema.as_ref()
    }
}

/// Builder for [`DumpSettings`].
#[derive(Debug, Clone, Default)]
pub struct DumpSettingsBuilder {
    settings: DumpSettings,
}

impl DumpSettingsBuilder {
    #[must_use]
    pub const fn with_explicit_start(mut self, explicit: bool) -> Self {
        self.settings.explicit_start = explicit;
        self
    }

    #[must_use]
    pub const fn with_explicit_end(mut self, explicit: bool) -> Self {
        self.settings.explicit_end = explicit;
        self
    }

    #[must_use]
    pub const fn with_default_flow_style(mut self, style: FlowStyle) -> Self {
        self.settings.default_flow_style = style;
        self
    }

    #[must_use]
    pub const fn with_default_scalar_style(mut self, style: ScalarStyle) -> Self {
        self.settings.default_scalar_style = style;
        self
    }

    #[must_use]
    pub const fn with_canonical(mut self, canonical: bool) -> Self {
        self.settings.canonical = canonical;
        self
    }

    #[must_use]
    pub const fn with_multi_line_flow(mut self, multi_line: bool) -> Self {
        self.settings.multi_line_flow = multi_line;
        self
    }

    #[must_use]
    pub const fn with_use_unicode_encoding(mut self, unicode: bool) -> Self {
        self.settings.use_unicode_encoding = unicode;
        self
    }

    #[must_use]
    pub const fn with_indent(mut self, indent: usize) -> Self {
        self.settings.indent = indent;
        self
    }

    #[must_use]
    pub const fn with_indicator_indent(mut self, indent: usize) -> Self {
        self.settings.indicator_indent = indent;
        self
    }

    #[must_use]
    pub const fn with_indent_with_indicator(mut self, enabled: bool) -> Self {
        self.settings.indent_with_indicator = enabled;
        self
    }

    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.settings.width = width;
        self
    }

    #[must_use]
    pub fn with_best_line_break(mut self, line_break: impl Into<String>) -> Self {
        self.settings.best_line_break = line_break.into();
        self
    }

    #[must_use]
    pub const fn with_split_lines(mut self, split: bool) -> Self {
        self.settings.split_lines = split;
        self
    }

    #[must_use]
    pub const fn with_max_simple_key_length(mut self, max: usize) -> Self {
        self.settings.max_simple_key_length = max;
        self
    }

    #[must_use]
    pub const fn with_dump_comments(mut self, dump: bool) -> Self {
        self.settings.dump_comments = dump;
        self
    }

    #[must_use]
    pub const fn with_yaml_directive(mut self, version: Option<(u32, u32)>) -> Self {
        self.settings.yaml_directive = version;
        self
    }

    /// Add a `%TAG` directive written at the start of every document.
    #[must_use]
    pub fn with_tag_directive(
        mut self,
        handle: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.settings
            .tag_directives
            .insert(handle.into(), prefix.into());
        self
    }

    #[must_use]
    pub const fn with_anchor_strategy(mut self, strategy: AnchorStrategy) -> Self {
        self.settings.anchor_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Arc<dyn ScalarResolver>) -> Self {
        self.settings.schema = schema;
        self
    }

    /// Validate and freeze the settings.
    ///
    /// # Errors
    ///
    /// Fails when an indentation, line break, key length, directive or tag
    /// handle is out of range.
    pub fn build(self) -> Result<DumpSettings> {
        let settings = self.settings;
        if !(1..=10).contains(&settings.indent) {
            return Err(YamlError::setting("indent", "must be in 1..=10"));
        }
        if settings.indicator_indent > 9 {
            return Err(YamlError::setting("indicator_indent", "must be in 0..=9"));
        }
        if !settings.indent_with_indicator && settings.indicator_indent >= settings.indent {
            return Err(YamlError::setting(
                "indicator_indent",
                format!(
                    "must be smaller than indent ({}) unless indent_with_indicator is set",
                    settings.indent
                ),
            ));
        }
        if !matches!(settings.best_line_break.as_str(), "\n" | "\r" | "\r\n") {
            return Err(YamlError::setting(
                "best_line_break",
                "must be one of \\n, \\r or \\r\\n",
            ));
        }
        if !(1..=1024).contains(&settings.max_simple_key_length) {
            return Err(YamlError::setting(
                "max_simple_key_length",
                "must be in 1..=1024",
            ));
        }
        if let Some((major, _)) = settings.yaml_directive
            && major != 1
        {
            return Err(YamlError::setting(
                "yaml_directive",
                format!("unsupported YAML version {major}"),
            ));
        }
        for (handle, prefix) in &settings.tag_directives {
            if !is_valid_tag_handle(handle) {
                return Err(YamlError::setting(
                    "tag_directives",
                    format!("invalid tag handle '{handle}'"),
                ));
            }
            if prefix.is_empty() {
                return Err(YamlError::setting(
                    "tag_directives",
                    format!("empty prefix for handle '{handle}'"),
                ));
            }
        }
        Ok(settings)
    }
}

/// `!`, `!!` or `!word!`.
pub(crate) fn is_valid_tag_handle(handle: &str) -> bool {
    let Some(inner) = handle
        .strip_prefix('!')
        .and_then(|rest| rest.strip_suffix('!').or_else(|| rest.is_empty().then_some(rest)))
    else {
        return false;
    };
    inner
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_load_defaults() {
        let settings = LoadSettings::default();
        assert_eq!(settings.label(), "reader");
        assert_eq!(settings.max_aliases_for_collections(), 50);
        assert_eq!(settings.code_point_limit(), 3 * 1024 * 1024);
        assert!(!settings.allow_duplicate_keys());
        assert!(!settings.parse_comments());
    }

    #[test]
    fn test_load_builder_rejects_zero_limits() {
        let err = LoadSettings::builder()
            .with_code_point_limit(0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err.kind,
            ErrorKind::InvalidSetting {
                name: "code_point_limit",
                ..
            }
        ));
        assert!(
            LoadSettings::builder()
                .with_max_simple_key_length(0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_dump_builder_validation() {
        let invalid = [
            DumpSettings::builder().with_indent(0),
            DumpSettings::builder().with_indent(11),
            DumpSettings::builder().with_indicator_indent(2),
            DumpSettings::builder().with_best_line_break("\n\n"),
            DumpSettings::builder().with_max_simple_key_length(2000),
            DumpSettings::builder().with_yaml_directive(Some((2, 0))),
            DumpSettings::builder().with_tag_directive("e!", "tag:example.com,2000:"),
        ];
        for builder in invalid {
            assert!(builder.build().is_err());
        }

        let settings = DumpSettings::builder()
            .with_indent(4)
            .with_indicator_indent(2)
            .with_tag_directive("!e!", "tag:example.com,2000:")
            .with_best_line_break("\r\n")
            .build()
            .unwrap();
        assert_eq!(settings.indent(), 4);
        assert_eq!(settings.indicator_indent(), 2);
        assert_eq!(settings.best_line_break(), "\r\n");
        assert!(
            DumpSettings::builder()
                .with_indent(2)
                .with_indicator_indent(2)
                .with_indent_with_indicator(true)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_tag_handles() {
        for handle in ["!", "!!", "!e!", "!my-tag_1!"] {
            assert!(is_valid_tag_handle(handle), "{handle}");
        }
        for handle in ["", "e", "!e", "!e!x", "!a b!"] {
            assert!(!is_valid_tag_handle(handle), "{handle}");
        }
    }
}
