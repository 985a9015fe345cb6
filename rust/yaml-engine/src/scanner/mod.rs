// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Pull-based tokenizer.
//!
//! The scanner turns the character stream into tokens on demand. Block
//! structure is recovered from indentation: every time the column of a
//! collection entry grows, a `BlockSequenceStart` or `BlockMappingStart` is
//! emitted, and every time it shrinks, one `BlockEnd` per closed level.
//!
//! Implicit ("simple") keys are the tricky part: `key: value` only reveals
//! that `key` is a mapping key once the `:` is seen. The scanner therefore
//! remembers, per flow level, the queue position of the last token that
//! could start a key, and inserts the `Key` (and possibly a
//! `BlockMappingStart`) token there retroactively.

mod props;
mod scalar;

use std::collections::{BTreeMap, VecDeque};

use crate::error::{ErrorKind, Result, YamlError};
use crate::mark::{Mark, is_break};
use crate::reader::{EOF, Reader};
use crate::settings::LoadSettings;
use crate::token::{CommentType, ScalarStyle, Token, TokenId, TokenKind};

/// Blank, line break or end of input.
pub(crate) const fn is_blank_or_end(ch: char) -> bool {
    matches!(ch, EOF | ' ' | '\t' | '\n' | '\r')
}

/// Line break or end of input.
pub(crate) const fn is_break_or_end(ch: char) -> bool {
    matches!(ch, EOF | '\n' | '\r')
}

pub(crate) const fn is_flow_indicator(ch: char) -> bool {
    matches!(ch, ',' | '[' | ']' | '{' | '}')
}

#[allow(
    clippy::cast_possible_wrap,
    reason = "columns are bounded by the code point limit"
)]
const fn signed(column: usize) -> isize {
    column as isize
}

/// A token that may turn out to be an implicit mapping key.
#[derive(Debug, Clone)]
struct SimpleKey {
    /// Absolute queue position the `Key` token would be inserted at
    token_number: usize,
    /// A key at the current indentation in block context must be a key
    required: bool,
    mark: Mark,
}

/// Tokenizer over one input stream.
#[derive(Debug)]
pub struct Scanner {
    reader: Reader,
    max_simple_key_length: usize,
    parse_comments: bool,

    /// `StreamEnd` has been queued
    done: bool,
    /// An error was returned; the scanner yields nothing more
    failed: bool,

    tokens: VecDeque<Token>,
    tokens_taken: usize,

    flow_level: usize,
    indent: isize,
    indents: Vec<isize>,

    allow_simple_key: bool,
    possible_simple_keys: BTreeMap<usize, SimpleKey>,
}

impl Scanner {
    /// Create a scanner and queue the `StreamStart` token.
    ///
    /// # Errors
    ///
    /// Fails when the input is rejected by the [`Reader`].
    pub fn new(input: &str, settings: &LoadSettings) -> Result<Self> {
        let reader = Reader::new(settings.label(), input, settings.code_point_limit())?;
        let mark = reader.mark();
        let mut tokens = VecDeque::new();
        tokens.push_back(Token::new(TokenKind::StreamStart, mark.clone(), mark));
        Ok(Self {
            reader,
            max_simple_key_length: settings.max_simple_key_length(),
            parse_comments: settings.parse_comments(),
            done: false,
            failed: false,
            tokens,
            tokens_taken: 0,
            flow_level: 0,
            indent: -1,
            indents: Vec::new(),
            allow_simple_key: true,
            possible_simple_keys: BTreeMap::new(),
        })
    }

    /// Whether the next token is one of `choices`.
    ///
    /// # Errors
    ///
    /// Propagates scanning errors.
    pub fn check_token(&mut self, choices: &[TokenId]) -> Result<bool> {
        Ok(self
            .peek_token()?
            .is_some_and(|token| choices.contains(&token.id())))
    }

    /// The next token, without consuming it.
    ///
    /// # Errors
    ///
    /// Propagates scanning errors.
    pub fn peek_token(&mut self) -> Result<Option<&Token>> {
        self.fill()?;
        Ok(self.tokens.front())
    }

    /// Consume the next token.
    ///
    /// # Errors
    ///
    /// Propagates scanning errors.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.fill()?;
        let token = self.tokens.pop_front();
        if token.is_some() {
            self.tokens_taken += 1;
        }
        Ok(token)
    }

    fn fill(&mut self) -> Result<()> {
        if self.failed {
            return Ok(());
        }
        let mut filled = Ok(());
        loop {
            match self.need_more_tokens() {
                Ok(false) => break,
                Ok(true) => {
                    if let Err(error) = self.fetch_more_tokens() {
                        filled = Err(error);
                        break;
                    }
                }
                Err(error) => {
                    filled = Err(error);
                    break;
                }
            }
        }
        if filled.is_err() {
            self.failed = true;
            self.tokens.clear();
        }
        filled
    }

    fn need_more_tokens(&mut self) -> Result<bool> {
        if self.done {
            return Ok(false);
        }
        if self.tokens.is_empty() {
            return Ok(true);
        }
        // The head token may still become a key.
        self.stale_possible_simple_keys()?;
        Ok(self.next_possible_simple_key() == Some(self.tokens_taken))
    }

    fn fetch_more_tokens(&mut self) -> Result<()> {
        self.scan_to_next_token()?;
        self.stale_possible_simple_keys()?;
        self.unwind_indent(signed(self.reader.column()));

        let ch = self.reader.peek();
        match ch {
            EOF => self.fetch_stream_end(),
            '%' if self.reader.column() == 0 => self.fetch_directive(),
            '-' if self.check_document_indicator("---") => {
                self.fetch_document_indicator(TokenKind::DocumentStart)
            }
            '.' if self.check_document_indicator("...") => {
                self.fetch_document_indicator(TokenKind::DocumentEnd)
            }
            '[' => self.fetch_flow_collection_start(TokenKind::FlowSequenceStart),
            '{' => self.fetch_flow_collection_start(TokenKind::FlowMappingStart),
            ']' => self.fetch_flow_collection_end(TokenKind::FlowSequenceEnd),
            '}' => self.fetch_flow_collection_end(TokenKind::FlowMappingEnd),
            ',' => self.fetch_flow_entry(),
            '-' if is_blank_or_end(self.reader.peek_at(1)) => self.fetch_block_entry(),
            '?' if is_blank_or_end(self.reader.peek_at(1)) => self.fetch_key(),
            ':' if self.check_value() => self.fetch_value(),
            '*' => self.fetch_alias(),
            '&' => self.fetch_anchor(),
            '!' => self.fetch_tag(),
            '|' if self.flow_level == 0 => self.fetch_block_scalar(ScalarStyle::Literal),
            '>' if self.flow_level == 0 => self.fetch_block_scalar(ScalarStyle::Folded),
            '\'' => self.fetch_flow_scalar(ScalarStyle::SingleQuoted),
            '"' => self.fetch_flow_scalar(ScalarStyle::DoubleQuoted),
            _ if self.check_plain() => self.fetch_plain(),
            _ => Err(YamlError::new(
                ErrorKind::Scanner(format!(
                    "found character '{}' that cannot start any token",
                    ch.escape_debug()
                )),
                Some(self.reader.mark()),
            )
            .with_context("while scanning for the next token", None)),
        }
    }

    // Simple keys.

    fn next_possible_simple_key(&self) -> Option<usize> {
        self.possible_simple_keys
            .values()
            .map(|key| key.token_number)
            .min()
    }

    /// Drop candidates that can no longer be keys: simple keys are limited
    /// to a single line and to `max_simple_key_length` characters.
    fn stale_possible_simple_keys(&mut self) -> Result<()> {
        let line = self.reader.line();
        let index = self.reader.index();
        let limit = self.max_simple_key_length;
        let mut stale = Vec::new();
        for (level, key) in &self.possible_simple_keys {
            if key.mark.line() != line || index - key.mark.index() > limit {
                if key.required {
                    return Err(YamlError::scanner(
                        "while scanning a simple key",
                        key.mark.clone(),
                        "could not find expected ':'",
                        self.reader.mark(),
                    ));
                }
                stale.push(*level);
            }
        }
        for level in stale {
            self.possible_simple_keys.remove(&level);
        }
        Ok(())
    }

    fn save_possible_simple_key(&mut self) -> Result<()> {
        let required = self.flow_level == 0 && self.indent == signed(self.reader.column());
        if self.allow_simple_key {
            self.remove_possible_simple_key()?;
            let key = SimpleKey {
                token_number: self.tokens_taken + self.tokens.len(),
                required,
                mark: self.reader.mark(),
            };
            self.possible_simple_keys.insert(self.flow_level, key);
        }
        Ok(())
    }

    fn remove_possible_simple_key(&mut self) -> Result<()> {
        if let Some(key) = self.possible_simple_keys.remove(&self.flow_level)
            && key.required
        {
            return Err(YamlError::scanner(
                "while scanning a simple key",
                key.mark,
                "could not find expected ':'",
                self.reader.mark(),
            ));
        }
        Ok(())
    }

    // Indentation.

    fn unwind_indent(&mut self, column: isize) {
        if self.flow_level > 0 {
            return;
        }
        while self.indent > column {
            let mark = self.reader.mark();
            self.indent = self.indents.pop().unwrap_or(-1);
            self.tokens
                .push_back(Token::new(TokenKind::BlockEnd, mark.clone(), mark));
        }
    }

    fn add_indent(&mut self, column: isize) -> bool {
        if self.indent < column {
            self.indents.push(self.indent);
            self.indent = column;
            true
        } else {
            false
        }
    }

    // Checks.

    fn check_document_indicator(&self, indicator: &str) -> bool {
        self.reader.column() == 0
            && self.reader.starts_with(indicator)
            && is_blank_or_end(self.reader.peek_at(3))
    }

    fn check_value(&self) -> bool {
        self.flow_level > 0 || is_blank_or_end(self.reader.peek_at(1))
    }

    /// A plain scalar cannot start with an indicator, except for `-`, `?`
    /// and `:` directly followed by a "safe" character.
    fn check_plain(&self) -> bool {
        let ch = self.reader.peek();
        if !is_blank_or_end(ch) && !"-?:,[]{}#&*!|>'\"%@`".contains(ch) {
            return true;
        }
        let next = self.reader.peek_at(1);
        matches!(ch, '-' | '?' | ':')
            && !is_blank_or_end(next)
            && (self.flow_level == 0 || !is_flow_indicator(next))
    }

    // Fetchers.

    fn push_simple(&mut self, kind: TokenKind, length: usize) {
        let start = self.reader.mark();
        self.reader.forward(length);
        let end = self.reader.mark();
        self.tokens.push_back(Token::new(kind, start, end));
    }

    fn fetch_stream_end(&mut self) -> Result<()> {
        self.unwind_indent(-1);
        self.remove_possible_simple_key()?;
        self.allow_simple_key = false;
        self.possible_simple_keys.clear();
        let mark = self.reader.mark();
        self.tokens
            .push_back(Token::new(TokenKind::StreamEnd, mark.clone(), mark));
        self.done = true;
        Ok(())
    }

    fn fetch_directive(&mut self) -> Result<()> {
        self.unwind_indent(-1);
        self.remove_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_directive()?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_document_indicator(&mut self, kind: TokenKind) -> Result<()> {
        self.unwind_indent(-1);
        self.remove_possible_simple_key()?;
        self.allow_simple_key = false;
        self.push_simple(kind, 3);
        Ok(())
    }

    fn fetch_flow_collection_start(&mut self, kind: TokenKind) -> Result<()> {
        self.save_possible_simple_key()?;
        self.flow_level += 1;
        self.allow_simple_key = true;
        self.push_simple(kind, 1);
        Ok(())
    }

    fn fetch_flow_collection_end(&mut self, kind: TokenKind) -> Result<()> {
        self.remove_possible_simple_key()?;
        // A stray closing bracket is left for the parser to report.
        self.flow_level = self.flow_level.saturating_sub(1);
        self.allow_simple_key = false;
        self.push_simple(kind, 1);
        Ok(())
    }

    fn fetch_flow_entry(&mut self) -> Result<()> {
        self.allow_simple_key = true;
        self.remove_possible_simple_key()?;
        self.push_simple(TokenKind::FlowEntry, 1);
        Ok(())
    }

    fn fetch_block_entry(&mut self) -> Result<()> {
        if self.flow_level == 0 {
            if !self.allow_simple_key {
                return Err(YamlError::new(
                    ErrorKind::Scanner("sequence entries are not allowed here".to_owned()),
                    Some(self.reader.mark()),
                ));
            }
            if self.add_indent(signed(self.reader.column())) {
                let mark = self.reader.mark();
                self.tokens.push_back(Token::new(
                    TokenKind::BlockSequenceStart,
                    mark.clone(),
                    mark,
                ));
            }
        }
        // In flow context the parser rejects the stray `-`.
        self.allow_simple_key = true;
        self.remove_possible_simple_key()?;
        self.push_simple(TokenKind::BlockEntry, 1);
        Ok(())
    }

    fn fetch_key(&mut self) -> Result<()> {
        if self.flow_level == 0 {
            if !self.allow_simple_key {
                return Err(YamlError::new(
                    ErrorKind::Scanner("mapping keys are not allowed here".to_owned()),
                    Some(self.reader.mark()),
                ));
            }
            if self.add_indent(signed(self.reader.column())) {
                let mark = self.reader.mark();
                self.tokens.push_back(Token::new(
                    TokenKind::BlockMappingStart,
                    mark.clone(),
                    mark,
                ));
            }
        }
        self.allow_simple_key = self.flow_level == 0;
        self.remove_possible_simple_key()?;
        self.push_simple(TokenKind::Key, 1);
        Ok(())
    }

    fn fetch_value(&mut self) -> Result<()> {
        if let Some(key) = self.possible_simple_keys.remove(&self.flow_level) {
            let position = key.token_number - self.tokens_taken;
            self.tokens.insert(
                position,
                Token::new(TokenKind::Key, key.mark.clone(), key.mark.clone()),
            );
            if self.flow_level == 0 && self.add_indent(signed(key.mark.column())) {
                self.tokens.insert(
                    position,
                    Token::new(TokenKind::BlockMappingStart, key.mark.clone(), key.mark),
                );
            }
            self.allow_simple_key = false;
        } else {
            if self.flow_level == 0 {
                if !self.allow_simple_key {
                    return Err(YamlError::new(
                        ErrorKind::Scanner("mapping values are not allowed here".to_owned()),
                        Some(self.reader.mark()),
                    ));
                }
                if self.add_indent(signed(self.reader.column())) {
                    let mark = self.reader.mark();
                    self.tokens.push_back(Token::new(
                        TokenKind::BlockMappingStart,
                        mark.clone(),
                        mark,
                    ));
                }
            }
            self.allow_simple_key = self.flow_level == 0;
            self.remove_possible_simple_key()?;
        }
        self.push_simple(TokenKind::Value, 1);
        Ok(())
    }

    fn fetch_alias(&mut self) -> Result<()> {
        self.save_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_anchor(true)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_anchor(&mut self) -> Result<()> {
        self.save_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_anchor(false)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_tag(&mut self) -> Result<()> {
        self.save_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_tag()?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_block_scalar(&mut self, style: ScalarStyle) -> Result<()> {
        // A simple key may follow a block scalar.
        self.allow_simple_key = true;
        self.remove_possible_simple_key()?;
        let token = self.scan_block_scalar(style)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_flow_scalar(&mut self, style: ScalarStyle) -> Result<()> {
        self.save_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_flow_scalar(style)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_plain(&mut self) -> Result<()> {
        self.save_possible_simple_key()?;
        self.allow_simple_key = false;
        let token = self.scan_plain()?;
        self.tokens.push_back(token);
        Ok(())
    }

    // Whitespace and comments.

    /// Whether the tabs and spaces ahead run into a line break, the end of
    /// input or a comment, so they are not indentation.
    fn blank_run_ahead(&self) -> bool {
        let mut offset = 0;
        while matches!(self.reader.peek_at(offset), ' ' | '\t') {
            offset += 1;
        }
        let ch = self.reader.peek_at(offset);
        is_break_or_end(ch) || ch == '#'
    }

    /// Skip separation space, line breaks and comments up to the next token.
    ///
    /// Tabs are allowed in flow context, after indicators and on otherwise
    /// blank lines; never as block indentation. With comment parsing
    /// enabled every skipped comment and empty line becomes a `Comment`
    /// token.
    fn scan_to_next_token(&mut self) -> Result<()> {
        if self.reader.index() == 0 && self.reader.peek() == '\u{FEFF}' {
            self.reader.forward(1);
        }
        let mut fresh_line = self.reader.at_line_start();
        loop {
            let tabs_allowed =
                self.flow_level > 0 || !self.allow_simple_key || self.blank_run_ahead();
            while self.reader.peek() == ' ' || (tabs_allowed && self.reader.peek() == '\t') {
                self.reader.forward(1);
            }

            let mut commented = false;
            if self.reader.peek() == '#' {
                commented = true;
                let comment_type = if fresh_line {
                    CommentType::Block
                } else {
                    CommentType::InLine
                };
                let start = self.reader.mark();
                self.reader.forward(1);
                let mut value = String::new();
                while !is_break_or_end(self.reader.peek()) {
                    value.push(self.reader.peek());
                    self.reader.forward(1);
                }
                if self.parse_comments {
                    let end = self.reader.mark();
                    self.tokens.push_back(Token::new(
                        TokenKind::Comment {
                            comment_type,
                            value,
                        },
                        start,
                        end,
                    ));
                }
            }

            if !is_break(self.reader.peek()) {
                return Ok(());
            }
            let start = self.reader.mark();
            self.scan_line_break();
            if self.parse_comments && fresh_line && !commented {
                let end = self.reader.mark();
                self.tokens.push_back(Token::new(
                    TokenKind::Comment {
                        comment_type: CommentType::Blank,
                        value: String::new(),
                    },
                    start,
                    end,
                ));
            }
            if self.flow_level == 0 {
                self.allow_simple_key = true;
            }
            fresh_line = true;
        }
    }

    /// Consume one line break, normalizing it to `\n`.
    ///
    /// Returns an empty string when there is no break at the current position.
    fn scan_line_break(&mut self) -> &'static str {
        match self.reader.peek() {
            '\r' if self.reader.peek_at(1) == '\n' => {
                self.reader.forward(2);
                "\n"
            }
            '\r' | '\n' => {
                self.reader.forward(1);
                "\n"
            }
            _ => "",
        }
    }
}

impl Iterator for Scanner {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

#[cfg(test)]
mod tests;
