// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Scalar scanning: plain, quoted and block styles, including line folding.

use super::{Scanner, is_blank_or_end, is_break_or_end, is_flow_indicator, signed};
use crate::error::{Result, YamlError};
use crate::mark::{Mark, is_break};
use crate::reader::EOF;
use crate::token::{Chomping, ScalarStyle, Token, TokenKind};

/// The character a single-letter double-quoted escape stands for.
const fn escape_replacement(ch: char) -> Option<char> {
    Some(match ch {
        '0' => '\0',
        'a' => '\u{07}',
        'b' => '\u{08}',
        't' | '\t' => '\t',
        'n' => '\n',
        'v' => '\u{0B}',
        'f' => '\u{0C}',
        'r' => '\r',
        'e' => '\u{1B}',
        ' ' => ' ',
        '"' => '"',
        '/' => '/',
        '\\' => '\\',
        'N' => '\u{85}',
        '_' => '\u{A0}',
        'L' => '\u{2028}',
        'P' => '\u{2029}',
        _ => return None,
    })
}

/// Number of hex digits following `\x`, `\u` and `\U`.
const fn escape_code_length(ch: char) -> Option<usize> {
    match ch {
        'x' => Some(2),
        'u' => Some(4),
        'U' => Some(8),
        _ => None,
    }
}

impl Scanner {
    fn at_document_marker(&self) -> bool {
        self.reader.column() == 0
            && (self.reader.starts_with("---") || self.reader.starts_with("..."))
            && is_blank_or_end(self.reader.peek_at(3))
    }

    // Plain scalars.

    pub(super) fn scan_plain(&mut self) -> Result<Token> {
        let start = self.reader.mark();
        let mut end = start.clone();
        let indent = self.indent + 1;
        let mut value = String::new();
        let mut spaces = String::new();
        loop {
            if self.reader.peek() == '#' {
                break;
            }
            let mut length = 0;
            loop {
                let ch = self.reader.peek_at(length);
                let next = self.reader.peek_at(length + 1);
                if is_blank_or_end(ch)
                    || (ch == ':'
                        && (is_blank_or_end(next)
                            || (self.flow_level > 0 && is_flow_indicator(next))))
                    || (self.flow_level > 0 && is_flow_indicator(ch))
                {
                    break;
                }
                length += 1;
            }
            if length == 0 {
                break;
            }
            self.allow_simple_key = false;
            value.push_str(&spaces);
            value.push_str(&self.reader.prefix(length));
            self.reader.forward(length);
            end = self.reader.mark();

            spaces = self.scan_plain_spaces();
            if spaces.is_empty()
                || self.reader.peek() == '#'
                || (self.flow_level == 0 && signed(self.reader.column()) < indent)
            {
                break;
            }
        }
        Ok(Token::new(
            TokenKind::Scalar {
                value,
                plain: true,
                style: ScalarStyle::Plain,
            },
            start,
            end,
        ))
    }

    /// Whitespace between two chunks of a plain scalar, folded.
    ///
    /// Returns an empty string when the scalar cannot continue.
    fn scan_plain_spaces(&mut self) -> String {
        let mut length = 0;
        while matches!(self.reader.peek_at(length), ' ' | '\t') {
            length += 1;
        }
        let whitespaces = self.reader.prefix(length);
        self.reader.forward(length);

        if !is_break(self.reader.peek()) {
            return whitespaces;
        }
        self.scan_line_break();
        self.allow_simple_key = true;
        if self.at_document_marker() {
            return String::new();
        }
        let mut breaks = String::new();
        loop {
            match self.reader.peek() {
                ' ' | '\t' => self.reader.forward(1),
                ch if is_break(ch) => {
                    breaks.push_str(self.scan_line_break());
                    if self.at_document_marker() {
                        return String::new();
                    }
                }
                _ => break,
            }
        }
        if breaks.is_empty() {
            // A single line break folds into a space.
            " ".to_owned()
        } else {
            breaks
        }
    }

    // Quoted scalars.

    pub(super) fn scan_flow_scalar(&mut self, style: ScalarStyle) -> Result<Token> {
        let double = style == ScalarStyle::DoubleQuoted;
        let start = self.reader.mark();
        let quote = self.reader.peek();
        self.reader.forward(1);
        let mut value = String::new();
        self.scan_flow_scalar_non_spaces(double, &start, &mut value)?;
        while self.reader.peek() != quote {
            self.scan_flow_scalar_spaces(&start, &mut value)?;
            self.scan_flow_scalar_non_spaces(double, &start, &mut value)?;
        }
        self.reader.forward(1);
        let end = self.reader.mark();
        Ok(Token::new(
            TokenKind::Scalar {
                value,
                plain: false,
                style,
            },
            start,
            end,
        ))
    }

    fn scan_flow_scalar_non_spaces(
        &mut self,
        double: bool,
        start: &Mark,
        value: &mut String,
    ) -> Result<()> {
        loop {
            let mut length = 0;
            while !matches!(
                self.reader.peek_at(length),
                '\'' | '"' | '\\' | EOF | ' ' | '\t' | '\n' | '\r'
            ) {
                length += 1;
            }
            if length > 0 {
                value.push_str(&self.reader.prefix(length));
                self.reader.forward(length);
            }

            let ch = self.reader.peek();
            if !double && ch == '\'' && self.reader.peek_at(1) == '\'' {
                value.push('\'');
                self.reader.forward(2);
            } else if (double && ch == '\'') || (!double && matches!(ch, '"' | '\\')) {
                value.push(ch);
                self.reader.forward(1);
            } else if double && ch == '\\' {
                self.reader.forward(1);
                let ch = self.reader.peek();
                if let Some(replacement) = escape_replacement(ch) {
                    value.push(replacement);
                    self.reader.forward(1);
                } else if let Some(length) = escape_code_length(ch) {
                    self.reader.forward(1);
                    value.push(self.scan_escape_code(length, start)?);
                } else if is_break(ch) {
                    self.scan_line_break();
                    self.scan_flow_scalar_breaks(start, value)?;
                } else {
                    return Err(YamlError::scanner(
                        "while scanning a double-quoted scalar",
                        start.clone(),
                        format!("found unknown escape character {}", ch.escape_debug()),
                        self.reader.mark(),
                    ));
                }
            } else {
                return Ok(());
            }
        }
    }

    fn scan_escape_code(&mut self, length: usize, start: &Mark) -> Result<char> {
        for offset in 0..length {
            let digit = self.reader.peek_at(offset);
            if !digit.is_ascii_hexdigit() {
                return Err(YamlError::scanner(
                    "while scanning a double-quoted scalar",
                    start.clone(),
                    format!(
                        "expected escape sequence of {length} hexadecimal numbers, but found {}",
                        digit.escape_debug()
                    ),
                    self.reader.mark(),
                ));
            }
        }
        let digits = self.reader.prefix(length);
        let code = u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32);
        let Some(ch) = code else {
            return Err(YamlError::scanner(
                "while scanning a double-quoted scalar",
                start.clone(),
                format!("found invalid Unicode character escape code {digits}"),
                self.reader.mark(),
            ));
        };
        self.reader.forward(length);
        Ok(ch)
    }

    fn scan_flow_scalar_spaces(&mut self, start: &Mark, value: &mut String) -> Result<()> {
        let mut length = 0;
        while matches!(self.reader.peek_at(length), ' ' | '\t') {
            length += 1;
        }
        let whitespaces = self.reader.prefix(length);
        self.reader.forward(length);
        let ch = self.reader.peek();
        if ch == EOF {
            return Err(YamlError::scanner(
                "while scanning a quoted scalar",
                start.clone(),
                "found unexpected end of stream",
                self.reader.mark(),
            ));
        }
        if is_break(ch) {
            self.scan_line_break();
            let mut breaks = String::new();
            self.scan_flow_scalar_breaks(start, &mut breaks)?;
            if breaks.is_empty() {
                value.push(' ');
            } else {
                value.push_str(&breaks);
            }
        } else {
            value.push_str(&whitespaces);
        }
        Ok(())
    }

    fn scan_flow_scalar_breaks(&mut self, start: &Mark, value: &mut String) -> Result<()> {
        loop {
            if self.at_document_marker() {
                return Err(YamlError::scanner(
                    "while scanning a quoted scalar",
                    start.clone(),
                    "found unexpected document separator",
                    self.reader.mark(),
                ));
            }
            while matches!(self.reader.peek(), ' ' | '\t') {
                self.reader.forward(1);
            }
            if is_break(self.reader.peek()) {
                value.push_str(self.scan_line_break());
            } else {
                return Ok(());
            }
        }
    }

    // Block scalars.

    pub(super) fn scan_block_scalar(&mut self, style: ScalarStyle) -> Result<Token> {
        let folded = style == ScalarStyle::Folded;
        let start = self.reader.mark();
        self.reader.forward(1);
        let (chomping, increment) = self.scan_block_scalar_indicators(&start)?;
        self.scan_block_scalar_ignored_line(&start)?;

        let min_indent = (self.indent + 1).max(1);
        let (mut breaks, mut end, indent) = match increment {
            None => {
                let (breaks, max_indent, end) = self.scan_block_scalar_indentation();
                (breaks, end, min_indent.max(max_indent))
            }
            Some(increment) => {
                let indent = min_indent + increment - 1;
                let (breaks, end) = self.scan_block_scalar_breaks(indent);
                (breaks, end, indent)
            }
        };

        let mut value = String::new();
        let mut line_break = "";
        while signed(self.reader.column()) == indent && self.reader.peek() != EOF {
            value.push_str(&breaks);
            let leading_non_space = !matches!(self.reader.peek(), ' ' | '\t');
            let mut length = 0;
            while !is_break_or_end(self.reader.peek_at(length)) {
                length += 1;
            }
            value.push_str(&self.reader.prefix(length));
            self.reader.forward(length);
            line_break = self.scan_line_break();
            (breaks, end) = self.scan_block_scalar_breaks(indent);
            if signed(self.reader.column()) == indent && self.reader.peek() != EOF {
                // Folding: a single break between two non-indented lines is a space.
                if folded
                    && line_break == "\n"
                    && leading_non_space
                    && !matches!(self.reader.peek(), ' ' | '\t')
                {
                    if breaks.is_empty() {
                        value.push(' ');
                    }
                } else {
                    value.push_str(line_break);
                }
            } else {
                break;
            }
        }

        match chomping {
            Chomping::Strip => {}
            Chomping::Clip => value.push_str(line_break),
            Chomping::Keep => {
                value.push_str(line_break);
                value.push_str(&breaks);
            }
        }
        Ok(Token::new(
            TokenKind::Scalar {
                value,
                plain: false,
                style,
            },
            start,
            end,
        ))
    }

    /// Chomping and indentation indicators, in either order.
    fn scan_block_scalar_indicators(&mut self, start: &Mark) -> Result<(Chomping, Option<isize>)> {
        let mut chomping = Chomping::Clip;
        let mut increment = None;
        let chomping_of = |ch: char| match ch {
            '+' => Some(Chomping::Keep),
            '-' => Some(Chomping::Strip),
            _ => None,
        };

        let ch = self.reader.peek();
        if let Some(indicator) = chomping_of(ch) {
            chomping = indicator;
            self.reader.forward(1);
            if self.reader.peek().is_ascii_digit() {
                increment = Some(self.scan_block_scalar_increment(start)?);
            }
        } else if ch.is_ascii_digit() {
            increment = Some(self.scan_block_scalar_increment(start)?);
            if let Some(indicator) = chomping_of(self.reader.peek()) {
                chomping = indicator;
                self.reader.forward(1);
            }
        }

        let ch = self.reader.peek();
        if !is_blank_or_end(ch) {
            return Err(YamlError::scanner(
                "while scanning a block scalar",
                start.clone(),
                format!(
                    "expected chomping or indentation indicators, but found {}",
                    ch.escape_debug()
                ),
                self.reader.mark(),
            ));
        }
        Ok((chomping, increment))
    }

    fn scan_block_scalar_increment(&mut self, start: &Mark) -> Result<isize> {
        let digit = self.reader.peek();
        let increment = match digit.to_digit(10) {
            Some(value @ 1..=9) => signed(value as usize),
            _ => {
                return Err(YamlError::scanner(
                    "while scanning a block scalar",
                    start.clone(),
                    "expected indentation indicator in the range 1-9, but found 0",
                    self.reader.mark(),
                ));
            }
        };
        self.reader.forward(1);
        Ok(increment)
    }

    /// The rest of the header line may only hold a comment.
    fn scan_block_scalar_ignored_line(&mut self, start: &Mark) -> Result<()> {
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
            return Err(YamlError::scanner(
                "while scanning a block scalar",
                start.clone(),
                format!(
                    "expected a comment or a line break, but found {}",
                    ch.escape_debug()
                ),
                self.reader.mark(),
            ));
        }
        self.scan_line_break();
        Ok(())
    }

    /// Leading empty lines, and the indentation of the first content line.
    fn scan_block_scalar_indentation(&mut self) -> (String, isize, Mark) {
        let mut breaks = String::new();
        let mut max_indent = 0;
        let mut end = self.reader.mark();
        loop {
            match self.reader.peek() {
                ' ' => {
                    self.reader.forward(1);
                    max_indent = max_indent.max(signed(self.reader.column()));
                }
                ch if is_break(ch) => {
                    breaks.push_str(self.scan_line_break());
                    end = self.reader.mark();
                }
                _ => return (breaks, max_indent, end),
            }
        }
    }

    fn scan_block_scalar_breaks(&mut self, indent: isize) -> (String, Mark) {
        let mut breaks = String::new();
        let mut end = self.reader.mark();
        while signed(self.reader.column()) < indent && self.reader.peek() == ' ' {
            self.reader.forward(1);
        }
        while is_break(self.reader.peek()) {
            breaks.push_str(self.scan_line_break());
            end = self.reader.mark();
            while signed(self.reader.column()) < indent && self.reader.peek() == ' ' {
                self.reader.forward(1);
            }
        }
        (breaks, end)
    }
}
