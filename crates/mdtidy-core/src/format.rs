//! Idempotent markdown formatting.
//!
//! The formatter collapses the classified line stream into content entries,
//! each remembering how many blank lines preceded it. The number of blank
//! lines written between two entries is then a pure function of the two
//! entries and that original count, and every rule maps its own output to
//! itself. That is what makes `format(format(t)) == format(t)`.

use crate::document::DocumentText;
use crate::error::{EngineError, EngineResult};
use crate::lines::{self, ClassifiedLine, LineKind};
use crate::weights::LIST_CONTINUATION_COLUMNS;

/// Default cap on consecutive blank lines.
pub const DEFAULT_MAX_BLANK_LINES: usize = 2;

/// Parameters for [`format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Longest run of blank lines kept between ordinary content. Must be at least 1.
    pub max_blank_lines: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_blank_lines: DEFAULT_MAX_BLANK_LINES,
        }
    }
}

impl FormatConfig {
    /// Build a config with the given blank-line cap.
    pub fn new(max_blank_lines: usize) -> EngineResult<Self> {
        let config = Self { max_blank_lines };
        config.validate()?;
        Ok(config)
    }

    /// Check every value is within its valid range.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_blank_lines == 0 {
            return Err(EngineError::invalid_config(
                "max_blank_lines",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// A non-blank output line.
#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    text: &'a str,
    kind: LineKind,
    /// Blank lines between this entry and the previous one in the source.
    blanks_before: usize,
    /// Whether the line belongs to a list block.
    in_list: bool,
}

/// Format a document.
///
/// Strips trailing whitespace outside code, normalizes blank lines around
/// headings and list blocks, caps blank-line runs, keeps fenced code
/// verbatim and ends the output with exactly one newline. A document with no
/// content formats to the empty string.
#[tracing::instrument(skip_all, fields(text_len = doc.as_str().len()))]
pub fn format(doc: &DocumentText, config: &FormatConfig) -> EngineResult<DocumentText> {
    config.validate()?;

    let classified = lines::classify(doc.lines());
    let entries = collect_entries(&classified);

    let mut out = String::with_capacity(doc.as_str().len() + 1);
    let mut prev: Option<&Entry<'_>> = None;
    for entry in &entries {
        if let Some(prev) = prev {
            let blanks = blank_lines_between(prev, entry, config.max_blank_lines);
            out.extend(std::iter::repeat_n('\n', blanks + 1));
        }
        out.push_str(entry.text);
        prev = Some(entry);
    }
    if !entries.is_empty() {
        out.push('\n');
    }

    tracing::debug!(
        input_lines = classified.len(),
        output_lines = out.lines().count(),
        "format complete"
    );
    Ok(DocumentText::new(out))
}

/// Returns `true` if formatting would leave the document unchanged.
pub fn is_formatted(doc: &DocumentText, config: &FormatConfig) -> EngineResult<bool> {
    Ok(format(doc, config)?.as_str() == doc.as_str())
}

/// Drop blank lines (remembering how many preceded each entry), strip
/// trailing whitespace outside code and mark list membership.
fn collect_entries<'a>(classified: &[ClassifiedLine<'a>]) -> Vec<Entry<'a>> {
    let (mut entries, _) = classified.iter().fold(
        (Vec::<Entry<'a>>::new(), 0_usize),
        |(mut entries, blanks), line| {
            if line.kind == LineKind::Blank {
                return (entries, blanks + 1);
            }
            let text = if line.kind == LineKind::InsideCodeBlock {
                // A stray `\r` is line-ending residue, not content.
                line.text.trim_end_matches('\r')
            } else {
                line.text.trim_end()
            };
            let prev_in_list = entries.last().is_some_and(|e| e.in_list);
            let blanks_before = if entries.is_empty() { 0 } else { blanks };
            entries.push(Entry {
                text,
                kind: line.kind,
                blanks_before,
                in_list: continues_list(prev_in_list, line),
            });
            (entries, 0)
        },
    );

    // Trailing blank lines of an unterminated fence are still trailing blank lines.
    while entries
        .last()
        .is_some_and(|e| e.kind == LineKind::InsideCodeBlock && e.text.trim().is_empty())
    {
        entries.pop();
    }
    entries
}

/// A list block is a run of list items plus lines indented two or more
/// columns, including fenced code opened inside it.
fn continues_list(prev_in_list: bool, line: &ClassifiedLine<'_>) -> bool {
    match line.kind {
        LineKind::ListItem => true,
        _ if !prev_in_list => false,
        LineKind::InsideCodeBlock | LineKind::Fence(lines::FenceEdge::Close) => true,
        _ => line.indent() >= LIST_CONTINUATION_COLUMNS,
    }
}

/// Blank lines to write between two consecutive entries.
fn blank_lines_between(prev: &Entry<'_>, cur: &Entry<'_>, max_blank_lines: usize) -> usize {
    let original = cur.blanks_before;

    if prev.kind == LineKind::Heading || cur.kind == LineKind::Heading {
        let other = if cur.kind == LineKind::Heading {
            prev.kind
        } else {
            cur.kind
        };
        return usize::from(!(other.is_fence() && original == 0));
    }

    if prev.in_list && !cur.in_list {
        return 1;
    }

    original.min(max_blank_lines)
}
