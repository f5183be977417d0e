//! Structural scan over classified lines.
//!
//! A single forward fold collects headings, counts, link findings and long
//! lines. The accumulator is returned from the fold; nothing outside it is
//! mutated.

use crate::lines::{self, ClassifiedLine, FenceEdge, LineKind};
use crate::links::{self, LinkKind};
use crate::weights::{INDENTED_CODE_COLUMNS, LIST_CONTINUATION_COLUMNS, LONG_LINE_CHARS};

use super::report::{HeadingInfo, Structure};

/// A link whose target is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyLink {
    /// Zero-based line index.
    pub line: usize,
    /// The link text.
    pub text: String,
}

/// Everything the structural scan extracts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureScan {
    /// The structural inventory reported to callers.
    pub structure: Structure,
    /// Links with empty targets, in document order.
    pub empty_links: Vec<EmptyLink>,
    /// Lines longer than the long-line threshold (code and tables exempt).
    pub long_lines: Vec<usize>,
}

/// Scan state threaded through the fold.
#[derive(Debug, Default)]
struct Accumulator {
    scan: StructureScan,
    prev_kind: Option<LineKind>,
    in_table: bool,
    in_list: bool,
    in_indented_code: bool,
}

impl Accumulator {
    fn step(mut self, line: &ClassifiedLine<'_>, next: Option<&ClassifiedLine<'_>>) -> Self {
        let indent = line.indent();

        self.in_list = match line.kind {
            LineKind::ListItem => true,
            LineKind::Blank => self.in_list,
            _ => self.in_list && indent >= LIST_CONTINUATION_COLUMNS,
        };

        self.track_indented_code(line, indent);
        self.track_tables(line, next);

        let structure = &mut self.scan.structure;
        match line.kind {
            LineKind::Heading => {
                if let Some(heading) = lines::match_heading(line.text) {
                    structure.heading_levels[usize::from(heading.level - 1)] += 1;
                    structure.headings.push(HeadingInfo {
                        level: heading.level,
                        text: heading.text.to_string(),
                        line: line.index,
                    });
                }
            }
            LineKind::ListItem => structure.list_items += 1,
            LineKind::Blockquote => structure.blockquotes += 1,
            LineKind::Fence(FenceEdge::Open) => structure.code_blocks += 1,
            _ => {}
        }

        if !line.kind.is_code() {
            self.scan_links(line);
            if line.kind != LineKind::TableRow && line.text.chars().count() > LONG_LINE_CHARS {
                self.scan.long_lines.push(line.index);
            }
        }

        self.prev_kind = Some(line.kind);
        self
    }

    /// An indented code block starts at a paragraph line indented four or
    /// more columns right after a blank line (or at document start), outside
    /// any list. Blank lines do not end it.
    fn track_indented_code(&mut self, line: &ClassifiedLine<'_>, indent: usize) {
        let indented_text = line.kind == LineKind::Paragraph && indent >= INDENTED_CODE_COLUMNS;

        if self.in_indented_code {
            self.in_indented_code = indented_text || line.kind == LineKind::Blank;
            return;
        }

        let after_break = matches!(self.prev_kind, None | Some(LineKind::Blank));
        if indented_text && after_break && !self.in_list {
            self.scan.structure.code_blocks += 1;
            self.in_indented_code = true;
        }
    }

    /// A table starts where a pipe row is directly followed by a separator
    /// row; later rows of the same table are not counted again.
    fn track_tables(&mut self, line: &ClassifiedLine<'_>, next: Option<&ClassifiedLine<'_>>) {
        if line.kind != LineKind::TableRow {
            self.in_table = false;
            return;
        }
        if self.in_table {
            return;
        }
        let separator_follows = next.is_some_and(|n| {
            n.kind == LineKind::TableRow && lines::is_table_separator(n.text)
        });
        if separator_follows {
            self.scan.structure.tables += 1;
            self.in_table = true;
        }
    }

    fn scan_links(&mut self, line: &ClassifiedLine<'_>) {
        let cleaned = links::strip_inline_code(line.text);
        for link in links::find_links(&cleaned) {
            match link.kind {
                LinkKind::Image => self.scan.structure.images += 1,
                LinkKind::Link => {
                    self.scan.structure.links += 1;
                    if link.has_empty_target() {
                        self.scan.empty_links.push(EmptyLink {
                            line: line.index,
                            text: link.text.to_string(),
                        });
                    }
                }
            }
        }
    }
}

/// Run the structural scan over a classified document.
#[tracing::instrument(skip_all, fields(line_count = classified.len()))]
pub fn scan(classified: &[ClassifiedLine<'_>]) -> StructureScan {
    let acc = classified
        .iter()
        .enumerate()
        .fold(Accumulator::default(), |acc, (i, line)| {
            acc.step(line, classified.get(i + 1))
        });
    tracing::debug!(
        headings = acc.scan.structure.headings.len(),
        code_blocks = acc.scan.structure.code_blocks,
        tables = acc.scan.structure.tables,
        "structure scan complete"
    );
    acc.scan
}
