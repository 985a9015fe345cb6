// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Which scalar styles can represent a given text.

/// Styles a scalar may be written in, from a single pass over its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "one flag per style the text allows"
)]
pub(crate) struct ScalarAnalysis {
    /// Number of characters
    pub length: usize,
    pub empty: bool,
    pub multiline: bool,
    pub allow_flow_plain: bool,
    pub allow_block_plain: bool,
    pub allow_single_quoted: bool,
    pub allow_block: bool,
}

/// Characters that may appear verbatim in any scalar style.
///
/// With `allow_unicode` off, everything outside printable ASCII must be
/// escaped, which only double quotes can do.
pub(crate) const fn is_printable(ch: char, allow_unicode: bool) -> bool {
    match ch {
        '\n' | '\u{20}'..='\u{7E}' => true,
        '\u{85}' | '\u{A0}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}' => {
            allow_unicode && ch != '\u{FEFF}'
        }
        _ => false,
    }
}

const fn is_space_or_end(ch: Option<char>) -> bool {
    matches!(ch, None | Some('\0' | ' ' | '\t' | '\r' | '\n'))
}

pub(crate) fn analyze_scalar(scalar: &str, allow_unicode: bool) -> ScalarAnalysis {
    let chars: Vec<char> = scalar.chars().collect();
    if chars.is_empty() {
        return ScalarAnalysis {
            length: 0,
            empty: true,
            multiline: false,
            allow_flow_plain: false,
            allow_block_plain: true,
            allow_single_quoted: true,
            allow_block: false,
        };
    }

    let mut block_indicators = false;
    let mut flow_indicators = false;
    let mut line_breaks = false;
    let mut special_characters = false;

    let mut leading_space = false;
    let mut leading_break = false;
    let mut trailing_space = false;
    let mut trailing_break = false;
    let mut break_space = false;
    let mut space_break = false;

    // Document markers would end the document.
    if scalar.starts_with("---") || scalar.starts_with("...") {
        block_indicators = true;
        flow_indicators = true;
    }

    let mut preceded_by_whitespace = true;
    let mut followed_by_whitespace = is_space_or_end(chars.get(1).copied());
    let mut previous_space = false;
    let mut previous_break = false;
    let last = chars.len() - 1;

    for (index, &ch) in chars.iter().enumerate() {
        if index == 0 {
            if "#,[]{}&*!|>'\"%@`".contains(ch) {
                flow_indicators = true;
                block_indicators = true;
            }
            if ch == '?' || ch == ':' {
                flow_indicators = true;
                if followed_by_whitespace {
                    block_indicators = true;
                }
            }
            if ch == '-' && followed_by_whitespace {
                flow_indicators = true;
                block_indicators = true;
            }
        } else {
            if ",?[]{}".contains(ch) {
                flow_indicators = true;
            }
            if ch == ':' {
                flow_indicators = true;
                if followed_by_whitespace {
                    block_indicators = true;
                }
            }
            if ch == '#' && preceded_by_whitespace {
                flow_indicators = true;
                block_indicators = true;
            }
        }

        if ch == '\n' {
            line_breaks = true;
        }
        if !is_printable(ch, allow_unicode) {
            special_characters = true;
        }

        if ch == ' ' {
            if index == 0 {
                leading_space = true;
            }
            if index == last {
                trailing_space = true;
            }
            if previous_break {
                break_space = true;
            }
            previous_space = true;
            previous_break = false;
        } else if ch == '\n' {
            if index == 0 {
                leading_break = true;
            }
            if index == last {
                trailing_break = true;
            }
            if previous_space {
                space_break = true;
            }
            previous_space = false;
            previous_break = true;
        } else {
            previous_space = false;
            previous_break = false;
        }

        preceded_by_whitespace = is_space_or_end(Some(ch));
        followed_by_whitespace = is_space_or_end(chars.get(index + 2).copied());
    }

    let mut analysis = ScalarAnalysis {
        length: chars.len(),
        empty: false,
        multiline: line_breaks,
        allow_flow_plain: true,
        allow_block_plain: true,
        allow_single_quoted: true,
        allow_block: true,
    };

    if leading_space || leading_break || trailing_space || trailing_break {
        analysis.allow_flow_plain = false;
        analysis.allow_block_plain = false;
    }
    // Trailing spaces would be taken for indentation.
    if trailing_space {
        analysis.allow_block = false;
    }
    // Spaces after a break only survive in block scalars.
    if break_space {
        analysis.allow_flow_plain = false;
        analysis.allow_block_plain = false;
        analysis.allow_single_quoted = false;
    }
    if space_break || special_characters {
        analysis.allow_flow_plain = false;
        analysis.allow_block_plain = false;
        analysis.allow_single_quoted = false;
        analysis.allow_block = false;
    }
    // Multi-line plain scalars are never written.
    if line_breaks {
        analysis.allow_flow_plain = false;
        analysis.allow_block_plain = false;
    }
    if flow_indicators {
        analysis.allow_flow_plain = false;
    }
    if block_indicators {
        analysis.allow_block_plain = false;
    }
    analysis
}
