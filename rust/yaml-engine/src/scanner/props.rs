// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Directives and node properties (anchors, aliases and tags).

use super::{Scanner, is_blank_or_end, is_break_or_end, is_flow_indicator};
use crate::anchor::{Anchor, is_anchor_char};
use crate::error::{Result, YamlError};
use crate::mark::Mark;
use crate::token::{Token, TokenKind};

const fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_')
}

/// Characters allowed in a URI, `%` escapes excluded.
fn is_uri_char(ch: char, verbatim: bool) -> bool {
    ch.is_ascii_alphanumeric()
        || "-;/?:@&=+$_.!~*'()".contains(ch)
        || (verbatim && is_flow_indicator(ch))
}

impl Scanner {
    fn skip_spaces(&mut self) {
        while self.reader.peek() == ' ' {
            self.reader.forward(1);
        }
    }

    fn directive_error(&self, start: &Mark, problem: String) -> YamlError {
        YamlError::scanner(
            "while scanning a directive",
            start.clone(),
            problem,
            self.reader.mark(),
        )
    }

    // Directives.

    pub(super) fn scan_directive(&mut self) -> Result<Token> {
        let start = self.reader.mark();
        self.reader.forward(1);
        let name = self.scan_directive_name(&start)?;
        let kind = match name.as_str() {
            "YAML" => {
                let (major, minor) = self.scan_version_directive_value(&start)?;
                TokenKind::VersionDirective { major, minor }
            }
            "TAG" => {
                let (handle, prefix) = self.scan_tag_directive_value(&start)?;
                TokenKind::TagDirective { handle, prefix }
            }
            _ => {
                while !is_break_or_end(self.reader.peek()) {
                    self.reader.forward(1);
                }
                TokenKind::ReservedDirective { name }
            }
        };
        let end = self.reader.mark();
        self.scan_directive_ignored_line(&start)?;
        Ok(Token::new(kind, start, end))
    }

    fn scan_directive_name(&mut self, start: &Mark) -> Result<String> {
        let mut length = 0;
        while is_word_char(self.reader.peek_at(length)) {
            length += 1;
        }
        let ch = self.reader.peek_at(length);
        if length == 0 || !is_blank_or_end(ch) {
            self.reader.forward(length);
            return Err(self.directive_error(
                start,
                format!(
                    "expected alphabetic or numeric character, but found {}",
                    ch.escape_debug()
                ),
            ));
        }
        let name = self.reader.prefix(length);
        self.reader.forward(length);
        Ok(name)
    }

    fn scan_version_directive_value(&mut self, start: &Mark) -> Result<(u32, u32)> {
        self.skip_spaces();
        let major = self.scan_version_directive_number(start)?;
        if self.reader.peek() != '.' {
            return Err(self.directive_error(
                start,
                format!(
                    "expected a digit or '.', but found {}",
                    self.reader.peek().escape_debug()
                ),
            ));
        }
        self.reader.forward(1);
        let minor = self.scan_version_directive_number(start)?;
        if !is_blank_or_end(self.reader.peek()) {
            return Err(self.directive_error(
                start,
                format!(
                    "expected a digit or ' ', but found {}",
                    self.reader.peek().escape_debug()
                ),
            ));
        }
        Ok((major, minor))
    }

    fn scan_version_directive_number(&mut self, start: &Mark) -> Result<u32> {
        let mut length = 0;
        while self.reader.peek_at(length).is_ascii_digit() {
            length += 1;
        }
        if length == 0 {
            return Err(self.directive_error(
                start,
                format!(
                    "expected a digit, but found {}",
                    self.reader.peek().escape_debug()
                ),
            ));
        }
        let digits = self.reader.prefix(length);
        let number = digits
            .parse()
            .map_err(|_| self.directive_error(start, format!("found a too long version number {digits}")))?;
        self.reader.forward(length);
        Ok(number)
    }

    fn scan_tag_directive_value(&mut self, start: &Mark) -> Result<(String, String)> {
        self.skip_spaces();
        let handle = self.scan_tag_handle("directive", start)?;
        if self.reader.peek() != ' ' {
            return Err(self.directive_error(
                start,
                format!(
                    "expected ' ', but found {}",
                    self.reader.peek().escape_debug()
                ),
            ));
        }
        self.skip_spaces();
        let prefix = self.scan_tag_uri("directive", start, true)?;
        if !is_blank_or_end(self.reader.peek()) {
            return Err(self.directive_error(
                start,
                format!(
                    "expected ' ', but found {}",
                    self.reader.peek().escape_debug()
                ),
            ));
        }
        Ok((handle, prefix))
    }

    fn scan_directive_ignored_line(&mut self, start: &Mark) -> Result<()> {
        while matches!(self.reader.peek(), ' ' | '\t') {
            self.reader.forward(1);
        }
        if self.reader.peek() == '#' {
            while !is_break_or_end(self.reader.peek()) {
                self.reader.forward(1);
            }
        }
        let ch = self.reader.peek();
        if !is_break_or_end(ch) {
            return Err(self.directive_error(
                start,
                format!(
                    "expected a comment or a line break, but found {}",
                    ch.escape_debug()
                ),
            ));
        }
        self.scan_line_break();
        Ok(())
    }

    // Anchors and aliases.

    pub(super) fn scan_anchor(&mut self, alias: bool) -> Result<Token> {
        let context = if alias {
            "while scanning an alias"
        } else {
            "while scanning an anchor"
        };
        let start = self.reader.mark();
        self.reader.forward(1);
        let mut length = 0;
        while is_anchor_char(self.reader.peek_at(length)) {
            length += 1;
        }
        let ch = self.reader.peek_at(length);
        if length == 0 || !(is_blank_or_end(ch) || "?:,]}%@`".contains(ch)) {
            let problem = format!(
                "unexpected character found {}({})",
                ch.escape_debug(),
                u32::from(ch)
            );
            self.reader.forward(length);
            return Err(YamlError::scanner(
                context,
                start,
                problem,
                self.reader.mark(),
            ));
        }
        let name = self.reader.prefix(length);
        self.reader.forward(length);
        let end = self.reader.mark();
        let anchor = Anchor::new(name).map_err(|error| error.with_context(context, Some(start.clone())))?;
        let kind = if alias {
            TokenKind::Alias(anchor)
        } else {
            TokenKind::Anchor(anchor)
        };
        Ok(Token::new(kind, start, end))
    }

    // Tags.

    pub(super) fn scan_tag(&mut self) -> Result<Token> {
        let start = self.reader.mark();
        let next = self.reader.peek_at(1);
        let (handle, suffix) = if next == '<' {
            self.reader.forward(2);
            let suffix = self.scan_tag_uri("tag", &start, true)?;
            if self.reader.peek() != '>' {
                return Err(YamlError::scanner(
                    "while scanning a tag",
                    start,
                    format!(
                        "expected '>', but found {}",
                        self.reader.peek().escape_debug()
                    ),
                    self.reader.mark(),
                ));
            }
            self.reader.forward(1);
            (None, suffix)
        } else if is_blank_or_end(next) || (self.flow_level > 0 && matches!(next, ',' | ']' | '}')) {
            // The non-specific tag `!`.
            self.reader.forward(1);
            (None, "!".to_owned())
        } else {
            let mut length = 1;
            let mut use_handle = false;
            loop {
                let ch = self.reader.peek_at(length);
                if is_blank_or_end(ch) || (self.flow_level > 0 && is_flow_indicator(ch)) {
                    break;
                }
                if ch == '!' {
                    use_handle = true;
                    break;
                }
                length += 1;
            }
            let handle = if use_handle {
                self.scan_tag_handle("tag", &start)?
            } else {
                self.reader.forward(1);
                "!".to_owned()
            };
            let suffix = self.scan_tag_uri("tag", &start, false)?;
            (Some(handle), suffix)
        };

        let ch = self.reader.peek();
        if !is_blank_or_end(ch) && !(self.flow_level > 0 && matches!(ch, ',' | ']' | '}')) {
            return Err(YamlError::scanner(
                "while scanning a tag",
                start,
                format!("expected ' ', but found {}", ch.escape_debug()),
                self.reader.mark(),
            ));
        }
        let end = self.reader.mark();
        Ok(Token::new(TokenKind::Tag { handle, suffix }, start, end))
    }

    /// `!`, `!!` or `!word!`.
    fn scan_tag_handle(&mut self, name: &str, start: &Mark) -> Result<String> {
        let ch = self.reader.peek();
        if ch != '!' {
            return Err(YamlError::scanner(
                &format!("while scanning a {name}"),
                start.clone(),
                format!("expected '!', but found {}", ch.escape_debug()),
                self.reader.mark(),
            ));
        }
        let mut length = 1;
        if self.reader.peek_at(length) != ' ' {
            while is_word_char(self.reader.peek_at(length)) {
                length += 1;
            }
            let ch = self.reader.peek_at(length);
            if ch != '!' {
                self.reader.forward(length);
                return Err(YamlError::scanner(
                    &format!("while scanning a {name}"),
                    start.clone(),
                    format!("expected '!', but found {}", ch.escape_debug()),
                    self.reader.mark(),
                ));
            }
            length += 1;
        }
        let handle = self.reader.prefix(length);
        self.reader.forward(length);
        Ok(handle)
    }

    /// A tag URI with `%HH` escapes decoded.
    ///
    /// Shorthand suffixes may not contain flow indicators; verbatim tags and
    /// `%TAG` prefixes may.
    fn scan_tag_uri(&mut self, name: &str, start: &Mark, verbatim: bool) -> Result<String> {
        let mut uri = String::new();
        loop {
            let ch = self.reader.peek();
            if ch == '%' {
                uri.push_str(&self.scan_uri_escapes(name, start)?);
            } else if is_uri_char(ch, verbatim) {
                uri.push(ch);
                self.reader.forward(1);
            } else {
                break;
            }
        }
        if uri.is_empty() {
            return Err(YamlError::scanner(
                &format!("while parsing a {name}"),
                start.clone(),
                format!(
                    "expected URI, but found {}",
                    self.reader.peek().escape_debug()
                ),
                self.reader.mark(),
            ));
        }
        Ok(uri)
    }

    fn scan_uri_escapes(&mut self, name: &str, start: &Mark) -> Result<String> {
        let mark = self.reader.mark();
        let mut bytes = Vec::new();
        while self.reader.peek() == '%' {
            self.reader.forward(1);
            let digits = self.reader.prefix(2);
            let byte = (digits.len() == 2 && digits.chars().all(|ch| ch.is_ascii_hexdigit()))
                .then(|| u8::from_str_radix(&digits, 16).ok())
                .flatten();
            let Some(byte) = byte else {
                return Err(YamlError::scanner(
                    &format!("while scanning a {name}"),
                    start.clone(),
                    format!(
                        "expected URI escape sequence of 2 hexadecimal numbers, but found {}",
                        digits.escape_debug()
                    ),
                    self.reader.mark(),
                ));
            };
            bytes.push(byte);
            self.reader.forward(2);
        }
        String::from_utf8(bytes).map_err(|error| {
            YamlError::scanner(
                &format!("while scanning a {name}"),
                start.clone(),
                error.to_string(),
                mark,
            )
        })
    }
}
