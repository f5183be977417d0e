//! Report structs for document analysis.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for
//! use in both CLI JSON output and MCP tool responses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Full analysis report for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    /// Word, character, line and reading-time counts.
    pub counts: Counts,
    /// Structural inventory.
    pub structure: Structure,
    /// Detected issues, ordered by first line.
    pub issues: Vec<Issue>,
    /// Derived quality scores.
    pub scores: Scores,
}

// -- Counts -----------------------------------------------------------------

/// Size counts for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Counts {
    /// Maximal runs of non-whitespace.
    pub words: usize,
    /// Unicode scalar values, whitespace included.
    pub characters: usize,
    /// Unicode scalar values, whitespace excluded.
    pub characters_no_whitespace: usize,
    /// Number of lines.
    pub lines: usize,
    /// Estimated reading time in whole minutes, rounded up.
    pub reading_time_minutes: usize,
}

// -- Structure --------------------------------------------------------------

/// A heading found in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeadingInfo {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Trimmed heading text (may be empty).
    pub text: String,
    /// Zero-based source line index.
    pub line: usize,
}

/// Structural inventory of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Structure {
    /// Headings in document order.
    pub headings: Vec<HeadingInfo>,
    /// Heading count per level; index 0 is H1.
    pub heading_levels: [usize; 6],
    /// Inline links (not images).
    pub links: usize,
    /// Inline images.
    pub images: usize,
    /// Fenced plus indented code blocks.
    pub code_blocks: usize,
    /// List item lines.
    pub list_items: usize,
    /// Blockquote lines.
    pub blockquotes: usize,
    /// Tables (header row followed by a separator row).
    pub tables: usize,
}

impl Structure {
    /// Number of top-level (H1) headings.
    pub const fn top_level_headings(&self) -> usize {
        self.heading_levels[0]
    }
}

// -- Issues -----------------------------------------------------------------

/// Category of a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum IssueKind {
    /// A link whose target is empty or whitespace-only.
    EmptyLink,
    /// Two or more headings share the same text.
    DuplicateHeading,
    /// A heading jumps more than one level deeper than the previous heading.
    HeadingLevelSkip,
    /// More than one H1 heading.
    MultipleTopLevelHeadings,
    /// Many lines exceed the long-line threshold.
    LongLines,
    /// A heading marker with no text.
    EmptyHeading,
}

impl IssueKind {
    /// Returns the kebab-case name used in JSON and on the command line.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyLink => "empty-link",
            Self::DuplicateHeading => "duplicate-heading",
            Self::HeadingLevelSkip => "heading-level-skip",
            Self::MultipleTopLevelHeadings => "multiple-top-level-headings",
            Self::LongLines => "long-lines",
            Self::EmptyHeading => "empty-heading",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Issue {
    /// Issue category.
    pub kind: IssueKind,
    /// Human-readable description.
    pub description: String,
    /// First offending line (zero-based), if the issue is tied to a line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Every offending line (zero-based).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<usize>,
}

impl Issue {
    /// An issue tied to a single line.
    pub fn at_line(kind: IssueKind, line: usize, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            line: Some(line),
            lines: vec![line],
        }
    }

    /// An issue spanning several lines; `line` is the first of them.
    pub fn at_lines(kind: IssueKind, lines: Vec<usize>, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            line: lines.first().copied(),
            lines,
        }
    }
}

// -- Scores -----------------------------------------------------------------

/// Coarse label for the heading structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StructureRating {
    /// No headings at all.
    NoStructure,
    /// More than one H1.
    MultipleTopLevel,
    /// Exactly one H1 and at least one H2.
    Excellent,
    /// Headings present, but not the H1 + H2 shape.
    Good,
}

impl StructureRating {
    /// Returns the label as a kebab-case string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoStructure => "no-structure",
            Self::MultipleTopLevel => "multiple-top-level",
            Self::Excellent => "excellent",
            Self::Good => "good",
        }
    }
}

impl std::fmt::Display for StructureRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived quality scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scores {
    /// 0–100, higher means simpler prose.
    pub readability: f64,
    /// 0–100, never below the configured floor.
    pub structure_quality: f64,
    /// Coarse heading-structure label.
    pub structure_rating: StructureRating,
}
