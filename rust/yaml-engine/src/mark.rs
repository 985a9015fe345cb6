// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Source positions.
//!
//! A [`Mark`] records where a token, event or node came from. Marks share the
//! decoded input buffer so that error messages can quote the offending line
//! without copying it for every token.

use std::fmt;
use std::sync::Arc;

/// Line-break characters recognised by YAML 1.2.
pub(crate) const fn is_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r')
}

/// A position in the input.
///
/// `line` and `column` are zero-based; `Display` renders them one-based.
#[derive(Clone)]
pub struct Mark {
    name: Arc<str>,
    index: usize,
    line: usize,
    column: usize,
    buffer: Arc<[char]>,
    pointer: usize,
}

impl Mark {
    #[must_use]
    pub const fn new(
        name: Arc<str>,
        index: usize,
        line: usize,
        column: usize,
        buffer: Arc<[char]>,
        pointer: usize,
    ) -> Self {
        Self {
            name,
            index,
            line,
            column,
            buffer,
            pointer,
        }
    }

    /// The label of the input this mark belongs to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute code point offset from the start of the stream.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Offset of the mark inside the shared buffer.
    #[must_use]
    pub const fn pointer(&self) -> usize {
        self.pointer
    }

    /// Render the line around the mark and a caret pointing at it.
    ///
    /// Both lines are prefixed with `indent` spaces. When the line is longer
    /// than `max_length` it is clipped on either side with ` ... `.
    #[must_use]
    pub fn snippet(&self, indent: usize, max_length: usize) -> String {
        const ELLIPSIS: &str = " ... ";
        let half = (max_length / 2).saturating_sub(1);
        let pointer = self.pointer.min(self.buffer.len());

        let mut head = "";
        let mut start = pointer;
        while start > 0 && self.buffer.get(start - 1).is_some_and(|ch| !is_break(*ch)) {
            start -= 1;
            if pointer - start > half {
                head = ELLIPSIS;
                start = (start + ELLIPSIS.len()).min(pointer);
                break;
            }
        }

        let mut tail = "";
        let mut end = pointer;
        while self.buffer.get(end).is_some_and(|ch| !is_break(*ch)) {
            end += 1;
            if end - pointer > half {
                tail = ELLIPSIS;
                end = end.saturating_sub(ELLIPSIS.len()).max(pointer);
                break;
            }
        }

        let line: String = self
            .buffer
            .get(start..end.max(start))
            .unwrap_or_default()
            .iter()
            .collect();
        format!(
            "{pad}{head}{line}{tail}\n{pad}{caret_pad}^",
            pad = " ".repeat(indent),
            caret_pad = " ".repeat(head.len() + pointer - start),
        )
    }
}

impl PartialEq for Mark {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.index == other.index
            && self.line == other.line
            && self.column == other.column
    }
}

impl fmt::Debug for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mark")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " in {}, line {}, column {}:\n{}",
            self.name,
            self.line + 1,
            self.column + 1,
            self.snippet(4, 75)
        )
    }
}
