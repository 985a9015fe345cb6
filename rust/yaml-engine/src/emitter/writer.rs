// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Text output of the emitter: indicators, indentation and the five
//! scalar styles.

use std::fmt;

use super::Emitter;
use crate::error::Result;

/// Short escapes of the double-quoted style.
const fn escape_replacement(ch: char) -> Option<char> {
    Some(match ch {
        '\0' => '0',
        '\u{07}' => 'a',
        '\u{08}' => 'b',
        '\t' => 't',
        '\n' => 'n',
        '\u{0B}' => 'v',
        '\u{0C}' => 'f',
        '\r' => 'r',
        '\u{1B}' => 'e',
        '"' => '"',
        '\\' => '\\',
        '\u{85}' => 'N',
        '\u{A0}' => '_',
        '\u{2028}' => 'L',
        '\u{2029}' => 'P',
        _ => return None,
    })
}

impl<W: fmt::Write> Emitter<W> {
    /// Write text that contains no line break.
    pub(super) fn write_text(&mut self, data: &str) -> Result<()> {
        self.column += data.chars().count();
        self.writer.write_str(data)?;
        Ok(())
    }

    fn write_chars(&mut self, chars: &[char]) -> Result<()> {
        if chars.is_empty() {
            return Ok(());
        }
        let data: String = chars.iter().collect();
        self.write_text(&data)
    }

    pub(super) fn write_indicator(
        &mut self,
        indicator: &str,
        need_whitespace: bool,
        whitespace: bool,
        indention: bool,
    ) -> Result<()> {
        if !self.whitespace && need_whitespace {
            self.write_text(" ")?;
        }
        self.write_text(indicator)?;
        self.whitespace = whitespace;
        self.indention = self.indention && indention;
        self.open_ended = false;
        Ok(())
    }

    pub(super) fn write_indent(&mut self) -> Result<()> {
        let indent = self.indent.unwrap_or(0);
        if !self.indention
            || self.column > indent
            || (self.column == indent && !self.whitespace)
        {
            self.write_line_break()?;
        }
        if self.column < indent {
            self.whitespace = true;
            let padding = " ".repeat(indent - self.column);
            self.write_text(&padding)?;
        }
        Ok(())
    }

    pub(super) fn write_whitespace(&mut self, length: usize) -> Result<()> {
        if length == 0 {
            return Ok(());
        }
        self.whitespace = true;
        self.write_text(&" ".repeat(length))
    }

    pub(super) fn write_line_break(&mut self) -> Result<()> {
        self.whitespace = true;
        self.indention = true;
        self.line += 1;
        self.column = 0;
        self.writer.write_str(self.settings.best_line_break())?;
        Ok(())
    }

    pub(super) fn write_version_directive(&mut self, version: &str) -> Result<()> {
        self.write_text("%YAML ")?;
        self.write_text(version)?;
        self.write_line_break()
    }

    pub(super) fn write_tag_directive(&mut self, handle: &str, prefix: &str) -> Result<()> {
        self.write_text("%TAG ")?;
        self.write_text(handle)?;
        self.write_text(" ")?;
        self.write_text(prefix)?;
        self.write_line_break()
    }

    // Scalars.

    pub(super) fn write_plain(&mut self, text: &str, split: bool) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if !self.whitespace {
            self.write_text(" ")?;
        }
        self.whitespace = false;
        self.indention = false;

        let chars: Vec<char> = text.chars().collect();
        let mut spaces = false;
        let mut start = 0;
        for end in 0..=chars.len() {
            let ch = chars.get(end).copied();
            if spaces {
                if ch != Some(' ') {
                    if start + 1 == end && self.column > self.best_width && split {
                        self.write_indent()?;
                        self.whitespace = false;
                        self.indention = false;
                    } else {
                        self.write_chars(&chars[start..end])?;
                    }
                    start = end;
                }
            } else if matches!(ch, None | Some(' ')) {
                self.write_chars(&chars[start..end])?;
                start = end;
            }
            spaces = ch == Some(' ');
        }
        Ok(())
    }

    pub(super) fn write_single_quoted(&mut self, text: &str, split: bool) -> Result<()> {
        self.write_indicator("'", true, false, false)?;
        let chars: Vec<char> = text.chars().collect();
        let mut spaces = false;
        let mut breaks = false;
        let mut start = 0;
        for end in 0..=chars.len() {
            let ch = chars.get(end).copied();
            if spaces {
                if ch != Some(' ') {
                    if start + 1 == end
                        && self.column > self.best_width
                        && split
                        && start != 0
                        && end != chars.len()
                    {
                        self.write_indent()?;
                    } else {
                        self.write_chars(&chars[start..end])?;
                    }
                    start = end;
                }
            } else if breaks {
                if ch != Some('\n') {
                    // One more break than the text holds: a single break
                    // folds into a space.
                    for _ in start..=end {
                        self.write_line_break()?;
                    }
                    self.write_indent()?;
                    start = end;
                }
            } else if matches!(ch, None | Some(' ' | '\n' | '\'')) && start < end {
                self.write_chars(&chars[start..end])?;
                start = end;
            }
            if ch == Some('\'') {
                self.write_text("''")?;
                start = end + 1;
            }
            if let Some(ch) = ch {
                spaces = ch == ' ';
                breaks = ch == '\n';
            }
        }
        self.write_indicator("'", false, false, false)
    }

    fn needs_escape(&self, ch: char) -> bool {
        if matches!(ch, '"' | '\\' | '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{FEFF}') {
            return true;
        }
        let printable = ('\u{20}'..='\u{7E}').contains(&ch)
            || (self.allow_unicode
                && (('\u{A0}'..='\u{D7FF}').contains(&ch)
                    || ('\u{E000}'..='\u{FFFD}').contains(&ch)
                    || ch >= '\u{10000}'));
        !printable
    }

    pub(super) fn write_double_quoted(&mut self, text: &str, split: bool) -> Result<()> {
        self.write_indicator("\"", true, false, false)?;
        let chars: Vec<char> = text.chars().collect();
        let mut start = 0;
        for end in 0..=chars.len() {
            let ch = chars.get(end).copied();
            if ch.is_none_or(|ch| self.needs_escape(ch)) {
                if start < end {
                    self.write_chars(&chars[start..end])?;
                    start = end;
                }
                if let Some(ch) = ch {
                    let escaped = match escape_replacement(ch) {
                        Some(short) => format!("\\{short}"),
                        None if ch <= '\u{FF}' => format!("\\x{:02X}", u32::from(ch)),
                        None if ch <= '\u{FFFF}' => format!("\\u{:04X}", u32::from(ch)),
                        None => format!("\\U{:08X}", u32::from(ch)),
                    };
                    self.write_text(&escaped)?;
                    start = end + 1;
                }
            }
            if end > 0
                && end + 1 < chars.len()
                && (ch == Some(' ') || start >= end)
                && self.column + end.saturating_sub(start) > self.best_width
                && split
            {
                let mut data: String = if start < end {
                    chars[start..end].iter().collect()
                } else {
                    String::new()
                };
                data.push('\\');
                if start < end {
                    start = end;
                }
                self.write_text(&data)?;
                self.write_indent()?;
                self.whitespace = false;
                self.indention = false;
                // A leading space on the continuation line would be folded away.
                if chars[start] == ' ' {
                    self.write_text("\\")?;
                }
            }
        }
        self.write_indicator("\"", false, false, false)
    }

    fn determine_block_hints(&self, chars: &[char]) -> String {
        let mut hints = String::new();
        if let (Some(&first), Some(&last)) = (chars.first(), chars.last()) {
            if first == ' ' || first == '\n' {
                hints.push_str(&self.best_indent.to_string());
            }
            if last != '\n' {
                hints.push('-');
            } else if chars.len() == 1 || chars[chars.len() - 2] == '\n' {
                hints.push('+');
            }
        }
        hints
    }

    /// The `|` or `>` header line, with any comment held for this line.
    fn write_block_header(&mut self, indicator: char, chars: &[char]) -> Result<()> {
        let hints = self.determine_block_hints(chars);
        self.write_indicator(&format!("{indicator}{hints}"), true, false, false)?;
        if hints.ends_with('+') {
            self.open_ended = true;
        }
        self.write_in_line_comments()?;
        self.write_line_break()
    }

    pub(super) fn write_folded(&mut self, text: &str, split: bool) -> Result<()> {
        let chars: Vec<char> = text.chars().collect();
        self.write_block_header('>', &chars)?;
        let mut leading_space = true;
        let mut spaces = false;
        let mut breaks = true;
        let mut start = 0;
        for end in 0..=chars.len() {
            let ch = chars.get(end).copied();
            if breaks {
                if ch != Some('\n') {
                    // Lines that do not start with a space fold, so an
                    // explicit break needs an extra empty line.
                    if !leading_space && ch.is_some_and(|ch| ch != ' ') && chars[start] == '\n' {
                        self.write_line_break()?;
                    }
                    leading_space = ch == Some(' ');
                    for _ in start..end {
                        self.write_line_break()?;
                    }
                    if ch.is_some() {
                        self.write_indent()?;
                    }
                    start = end;
                }
            } else if spaces {
                if ch != Some(' ') {
                    // A more-indented line keeps its breaks, so it never folds.
                    if start + 1 == end
                        && self.column > self.best_width
                        && split
                        && !leading_space
                    {
                        self.write_indent()?;
                    } else {
                        self.write_chars(&chars[start..end])?;
                    }
                    start = end;
                }
            } else if matches!(ch, None | Some(' ' | '\n')) {
                self.write_chars(&chars[start..end])?;
                if ch.is_none() {
                    self.write_line_break()?;
                }
                start = end;
            }
            if let Some(ch) = ch {
                breaks = ch == '\n';
                spaces = ch == ' ';
            }
        }
        Ok(())
    }

    pub(super) fn write_literal(&mut self, text: &str) -> Result<()> {
        let chars: Vec<char> = text.chars().collect();
        self.write_block_header('|', &chars)?;
        let mut breaks = true;
        let mut start = 0;
        for end in 0..=chars.len() {
            let ch = chars.get(end).copied();
            if breaks {
                if ch != Some('\n') {
                    for _ in start..end {
                        self.write_line_break()?;
                    }
                    if ch.is_some() {
                        self.write_indent()?;
                    }
                    start = end;
                }
            } else if matches!(ch, None | Some('\n')) {
                self.write_chars(&chars[start..end])?;
                if ch.is_none() {
                    self.write_line_break()?;
                }
                start = end;
            }
            if let Some(ch) = ch {
                breaks = ch == '\n';
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DumpSettings;

    fn emitter() -> Emitter<String> {
        Emitter::new(&DumpSettings::default(), String::new())
    }

    #[test]
    fn test_escape_table() {
        assert_eq!(escape_replacement('\n'), Some('n'));
        assert_eq!(escape_replacement('\u{2028}'), Some('L'));
        assert_eq!(escape_replacement('x'), None);
    }

    #[test]
    fn test_double_quoted_escapes() {
        let mut emitter = emitter();
        emitter
            .write_double_quoted("a\"b\\c\n\u{1}\u{FEFF}é", false)
            .unwrap();
        assert_eq!(emitter.writer(), "\"a\\\"b\\\\c\\n\\x01\\uFEFFé\"");
    }

    #[test]
    fn test_double_quoted_ascii_only() {
        let settings = DumpSettings::builder()
            .with_use_unicode_encoding(false)
            .build()
            .unwrap();
        let mut emitter = Emitter::new(&settings, String::new());
        emitter.write_double_quoted("é\u{1F600}", false).unwrap();
        assert_eq!(emitter.writer(), "\"\\xE9\\U0001F600\"");
    }

    #[test]
    fn test_single_quoted_doubles_quotes() {
        let mut emitter = emitter();
        emitter.write_single_quoted("it's", false).unwrap();
        assert_eq!(emitter.writer(), "'it''s'");
    }

    #[test]
    fn test_block_hints() {
        let emitter = emitter();
        let hints = |text: &str| {
            let chars: Vec<char> = text.chars().collect();
            emitter.determine_block_hints(&chars)
        };
        assert_eq!(hints("text\n"), "");
        assert_eq!(hints("text"), "-");
        assert_eq!(hints("text\n\n"), "+");
        assert_eq!(hints("\n"), "2+");
        assert_eq!(hints("  indented\n"), "2");
    }

    #[test]
    fn test_literal_body() {
        let mut emitter = emitter();
        emitter.write_literal("one\n\ntwo\n").unwrap();
        assert_eq!(emitter.writer(), "|\none\n\ntwo\n");
    }
}
