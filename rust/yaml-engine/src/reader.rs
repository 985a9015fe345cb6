// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Code point reader with line/column tracking.

use std::sync::Arc;

use crate::error::{ErrorKind, Result, YamlError};
use crate::mark::{Mark, is_break};

/// Returned by [`Reader::peek`] past the end of the input.
///
/// NUL is not printable, so it can never occur inside accepted input.
pub(crate) const EOF: char = '\0';

/// Characters YAML allows in a stream.
pub(crate) const fn is_printable(ch: char) -> bool {
    matches!(ch,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{7E}'
        | '\u{85}'
        | '\u{A0}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Sequential access to the decoded input.
#[derive(Debug)]
pub struct Reader {
    name: Arc<str>,
    buffer: Arc<[char]>,
    pointer: usize,
    line: usize,
    column: usize,
}

impl Reader {
    /// Decode `input` and validate it.
    ///
    /// # Errors
    ///
    /// Fails when the input is longer than `code_point_limit` or contains a
    /// non-printable character.
    pub fn new(name: &str, input: &str, code_point_limit: usize) -> Result<Self> {
        let buffer: Arc<[char]> = input.chars().collect();
        let reader = Self {
            name: Arc::from(name),
            buffer,
            pointer: 0,
            line: 0,
            column: 0,
        };
        if reader.buffer.len() > code_point_limit {
            return Err(YamlError::new(
                ErrorKind::CodePointLimit(code_point_limit),
                None,
            ));
        }
        if let Some(position) = reader.buffer.iter().position(|ch| !is_printable(*ch)) {
            let ch = reader.buffer.get(position).copied().unwrap_or(EOF);
            let mut probe = Self {
                name: reader.name.clone(),
                buffer: reader.buffer.clone(),
                pointer: 0,
                line: 0,
                column: 0,
            };
            probe.forward(position);
            return Err(YamlError::new(
                ErrorKind::Reader(format!(
                    "unacceptable code point '{}' (0x{:X}) special characters are not allowed",
                    ch.escape_debug(),
                    u32::from(ch)
                )),
                Some(probe.mark()),
            ));
        }
        Ok(reader)
    }

    /// The character at the current position, or [`EOF`].
    #[must_use]
    pub fn peek(&self) -> char {
        self.peek_at(0)
    }

    /// The character `offset` positions ahead, or [`EOF`].
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> char {
        self.buffer
            .get(self.pointer + offset)
            .copied()
            .unwrap_or(EOF)
    }

    /// Up to `length` characters starting at the current position.
    #[must_use]
    pub fn prefix(&self, length: usize) -> String {
        let end = (self.pointer + length).min(self.buffer.len());
        self.buffer
            .get(self.pointer..end)
            .unwrap_or_default()
            .iter()
            .collect()
    }

    /// Whether the next characters are exactly `text`.
    #[must_use]
    pub fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(offset, ch)| self.peek_at(offset) == ch)
    }

    /// Consume `length` characters, tracking lines and columns.
    pub fn forward(&mut self, length: usize) {
        for _ in 0..length {
            let Some(&ch) = self.buffer.get(self.pointer) else {
                break;
            };
            self.pointer += 1;
            if ch == '\n' || (ch == '\r' && self.peek() != '\n') {
                self.line += 1;
                self.column = 0;
            } else if ch != '\u{FEFF}' {
                self.column += 1;
            }
        }
    }

    /// Whether only spaces and tabs precede the current position on its line.
    #[must_use]
    pub fn at_line_start(&self) -> bool {
        self.buffer
            .get(..self.pointer)
            .unwrap_or_default()
            .iter()
            .rev()
            .take_while(|ch| !is_break(**ch))
            .all(|ch| matches!(ch, ' ' | '\t' | '\u{FEFF}'))
    }

    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark::new(
            self.name.clone(),
            self.pointer,
            self.line,
            self.column,
            self.buffer.clone(),
            self.pointer,
        )
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.pointer
    }

    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_tracks_lines() {
        let mut reader = Reader::new("reader", "ab\ncd\r\nef\rg", 100).unwrap();
        reader.forward(4);
        assert_eq!((reader.line(), reader.column()), (1, 1));
        reader.forward(3);
        assert_eq!((reader.line(), reader.column()), (2, 0));
        reader.forward(3);
        assert_eq!((reader.line(), reader.column()), (3, 0));
        assert_eq!(reader.peek(), 'g');
        reader.forward(5);
        assert_eq!(reader.peek(), EOF);
    }

    #[test]
    fn test_bom_does_not_advance_column() {
        let mut reader = Reader::new("reader", "\u{FEFF}a", 100).unwrap();
        reader.forward(1);
        assert_eq!(reader.column(), 0);
        assert_eq!(reader.index(), 1);
    }

    #[test]
    fn test_rejects_non_printable() {
        let err = Reader::new("reader", "a: \u{1}", 100).err().unwrap();
        assert!(matches!(err.kind, ErrorKind::Reader(_)));
        assert_eq!(err.problem_mark.unwrap().column(), 3);
    }

    #[test]
    fn test_code_point_limit() {
        let err = Reader::new("reader", "abcdef", 5).err().unwrap();
        assert_eq!(err.kind, ErrorKind::CodePointLimit(5));
        assert!(Reader::new("reader", "abcde", 5).is_ok());
    }

    #[test]
    fn test_prefix_and_starts_with() {
        let reader = Reader::new("reader", "--- x", 100).unwrap();
        assert_eq!(reader.prefix(3), "---");
        assert_eq!(reader.prefix(50), "--- x");
        assert!(reader.starts_with("--- "));
        assert!(!reader.starts_with("..."));
    }

    #[test]
    fn test_at_line_start() {
        let mut reader = Reader::new("reader", "a: b\n  # c", 100).unwrap();
        reader.forward(3);
        assert!(!reader.at_line_start());
        reader.forward(4);
        assert!(reader.at_line_start());
    }
}
