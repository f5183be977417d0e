//! Per-line classification of markdown source.
//!
//! Every line is tagged independently except for code-fence state, which is
//! the one piece of state carried from top to bottom. [`classify`] threads a
//! [`FenceState`] through [`classify_line`] as an explicit fold; the small
//! matcher functions below each recognize exactly one construct.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum indentation (in columns) for headings, blockquotes and rules.
const MAX_BLOCK_INDENT: usize = 3;

/// Minimum run length of a code fence marker.
const MIN_FENCE_LEN: usize = 3;

/// Largest ordered-list number accepted, in digits.
const MAX_ORDERED_DIGITS: usize = 9;

/// Whether a code-fence boundary opens or closes a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FenceEdge {
    /// The line opens a fenced block.
    Open,
    /// The line closes the currently open block.
    Close,
}

/// Structural tag for a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LineKind {
    /// ATX heading (`# Title`).
    Heading,
    /// Bullet or numbered list item.
    ListItem,
    /// Line starting with `>`.
    Blockquote,
    /// Opening or closing code fence.
    Fence(FenceEdge),
    /// Any line between an opening fence and its closing fence.
    InsideCodeBlock,
    /// Line containing a `|` column separator.
    TableRow,
    /// Thematic break (`---`, `***`, `___`).
    HorizontalRule,
    /// Empty or whitespace-only line.
    Blank,
    /// Anything else.
    Paragraph,
}

impl LineKind {
    /// Returns `true` for both opening and closing fences.
    pub const fn is_fence(self) -> bool {
        matches!(self, Self::Fence(_))
    }

    /// Returns `true` if the line belongs to a fenced code block, boundaries included.
    pub const fn is_code(self) -> bool {
        matches!(self, Self::Fence(_) | Self::InsideCodeBlock)
    }
}

/// Fence state carried between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FenceState {
    /// Not inside a fenced block.
    #[default]
    Closed,
    /// Inside a block opened by `len` repetitions of `marker`.
    Open {
        /// Fence character, `` ` `` or `~`.
        marker: char,
        /// Length of the opening run.
        len: usize,
    },
}

/// A source line with its index and tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// Zero-based line index in the document.
    pub index: usize,
    /// Line text without its terminator.
    pub text: &'a str,
    /// Structural tag.
    pub kind: LineKind,
}

impl ClassifiedLine<'_> {
    /// Leading indentation in columns.
    pub fn indent(&self) -> usize {
        split_indent(self.text).0
    }
}

/// Fields extracted from an ATX heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMatch<'a> {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Trimmed heading text with any closing `#` sequence removed.
    pub text: &'a str,
}

/// List marker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    /// `-`, `*` or `+`.
    Bullet(char),
    /// `1.`, `2.`, ...
    Ordered(u32),
}

/// Fields extracted from a list item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItemMatch<'a> {
    /// Indentation before the marker, in columns.
    pub indent: usize,
    /// The marker.
    pub marker: ListMarker,
    /// Item text after the marker, trimmed.
    pub text: &'a str,
}

/// Classify every line of a document, top to bottom.
pub fn classify<'a, I>(lines: I) -> Vec<ClassifiedLine<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .enumerate()
        .scan(FenceState::Closed, |state, (index, text)| {
            let (kind, next) = classify_line(text, *state);
            *state = next;
            Some(ClassifiedLine { index, text, kind })
        })
        .collect()
}

/// Classify one line given the fence state before it.
///
/// Returns the tag and the fence state after the line.
pub fn classify_line(line: &str, state: FenceState) -> (LineKind, FenceState) {
    if let FenceState::Open { marker, len } = state {
        return if is_fence_close(line, marker, len) {
            (LineKind::Fence(FenceEdge::Close), FenceState::Closed)
        } else {
            (LineKind::InsideCodeBlock, state)
        };
    }

    if line.trim().is_empty() {
        return (LineKind::Blank, state);
    }
    if let Some((marker, len)) = match_fence_open(line) {
        return (
            LineKind::Fence(FenceEdge::Open),
            FenceState::Open { marker, len },
        );
    }

    let kind = if match_heading(line).is_some() {
        LineKind::Heading
    } else if is_horizontal_rule(line) {
        LineKind::HorizontalRule
    } else if is_blockquote(line) {
        LineKind::Blockquote
    } else if match_list_item(line).is_some() {
        LineKind::ListItem
    } else if line.contains('|') {
        LineKind::TableRow
    } else {
        LineKind::Paragraph
    };
    (kind, state)
}

/// Split leading spaces and tabs from a line.
///
/// Returns the indentation width in columns (tabs advance to the next
/// multiple of four) and the remainder of the line.
pub fn split_indent(line: &str) -> (usize, &str) {
    let mut columns = 0;
    for (offset, ch) in line.char_indices() {
        match ch {
            ' ' => columns += 1,
            '\t' => columns += 4 - columns % 4,
            _ => return (columns, &line[offset..]),
        }
    }
    (columns, "")
}

/// Match an ATX heading: up to three spaces, 1–6 `#`, then whitespace or end of line.
///
/// `#Heading` is not a heading. `#` alone is a heading with empty text.
pub fn match_heading(line: &str) -> Option<HeadingMatch<'_>> {
    let (indent, rest) = split_indent(line);
    if indent > MAX_BLOCK_INDENT {
        return None;
    }
    let level = rest.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let after = &rest[level..];
    if !ends_marker(after) {
        return None;
    }
    Some(HeadingMatch {
        level: level as u8,
        text: strip_closing_sequence(after.trim()),
    })
}

/// Remove an optional closing `#` run (`## Title ##` → `Title`).
fn strip_closing_sequence(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.is_empty() {
        return without;
    }
    if without.len() != text.len() && without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        text
    }
}

/// Match a list item: bullet (`-`, `*`, `+`) or `N.` followed by whitespace or end of line.
pub fn match_list_item(line: &str) -> Option<ListItemMatch<'_>> {
    let (indent, rest) = split_indent(line);

    let (marker, after) = if let Some(after) = rest.strip_prefix(['-', '*', '+']) {
        let bullet = rest.chars().next()?;
        (ListMarker::Bullet(bullet), after)
    } else {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || digits > MAX_ORDERED_DIGITS {
            return None;
        }
        let after = rest[digits..].strip_prefix('.')?;
        let number = rest[..digits].parse().ok()?;
        (ListMarker::Ordered(number), after)
    };

    if !ends_marker(after) {
        return None;
    }
    Some(ListItemMatch {
        indent,
        marker,
        text: after.trim(),
    })
}

/// A block marker must be followed by a space, a tab, or nothing but whitespace.
fn ends_marker(after: &str) -> bool {
    after.starts_with([' ', '\t']) || after.trim().is_empty()
}

/// Returns `true` for a `>` blockquote line.
pub fn is_blockquote(line: &str) -> bool {
    let (indent, rest) = split_indent(line);
    indent <= MAX_BLOCK_INDENT && rest.starts_with('>')
}

/// Returns `true` for a thematic break: three or more of the same `-`, `*` or `_`.
pub fn is_horizontal_rule(line: &str) -> bool {
    let (indent, rest) = split_indent(line);
    if indent > MAX_BLOCK_INDENT {
        return false;
    }
    let Some(marker) = rest.chars().next() else {
        return false;
    };
    if !matches!(marker, '-' | '*' | '_') {
        return false;
    }
    let mut count = 0;
    for ch in rest.chars() {
        if ch == marker {
            count += 1;
        } else if !ch.is_whitespace() {
            return false;
        }
    }
    count >= 3
}

/// Match an opening code fence, returning the marker character and run length.
///
/// The run may be followed by an info string (`` ```rust ``); a backtick
/// fence's info string may not itself contain backticks.
pub fn match_fence_open(line: &str) -> Option<(char, usize)> {
    let rest = line.trim_start();
    let marker = rest.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = rest.chars().take_while(|&c| c == marker).count();
    if len < MIN_FENCE_LEN {
        return None;
    }
    // Fence characters are single-byte, so `len` is also a byte offset.
    let info = &rest[len..];
    if marker == '`' && info.contains('`') {
        return None;
    }
    Some((marker, len))
}

/// Returns `true` if `line` closes a block opened by `len` × `marker`.
///
/// The closing line holds only the marker character, repeated at least
/// `len` times, plus surrounding whitespace.
pub fn is_fence_close(line: &str, marker: char, len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() >= len && trimmed.chars().all(|c| c == marker)
}

/// Returns `true` for a table separator row such as `|---|:--:|`.
///
/// Only dashes, colons, pipes and whitespace are allowed, and the row must
/// contain at least one dash and one pipe.
pub fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.contains('-')
        && trimmed.contains('|')
        && trimmed
            .chars()
            .all(|c| matches!(c, '-' | ':' | '|') || c.is_whitespace())
}
