//! Document analysis.
//!
//! [`analyze`] runs a single pass over the classified lines and derives the
//! full [`AnalysisReport`]. Each stage is a pure function in its own module:
//!
//! - [`counts`] - words, characters, lines, reading time
//! - [`structure`] - headings, links, code blocks, lists, tables
//! - [`issues`] - empty links, duplicate headings, level skips, and friends
//! - [`scores`] - readability and structure quality

pub mod counts;
pub mod issues;
pub mod report;
pub mod scores;
pub mod structure;

pub use report::{
    AnalysisReport, Counts, HeadingInfo, Issue, IssueKind, Scores, Structure, StructureRating,
};

use crate::document::DocumentText;
use crate::error::{EngineError, EngineResult};
use crate::lines;
use crate::markdown;
use crate::weights::{DEFAULT_WORDS_PER_MINUTE, ScoringWeights};

/// Parameters for [`analyze`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Reading speed for the reading-time estimate. Must be positive.
    pub words_per_minute: u32,
    /// Score coefficients.
    pub weights: ScoringWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            weights: ScoringWeights::default(),
        }
    }
}

impl AnalysisConfig {
    /// Default weights with the given reading speed.
    pub fn new(words_per_minute: u32) -> EngineResult<Self> {
        let config = Self {
            words_per_minute,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the scoring weights.
    #[must_use]
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Check every value is within its valid range.
    pub fn validate(&self) -> EngineResult<()> {
        if self.words_per_minute == 0 {
            return Err(EngineError::invalid_config(
                "words_per_minute",
                "must be greater than zero",
            ));
        }
        self.weights.validate()
    }
}

/// Analyze a document.
///
/// Never fails on document content; only an out-of-range `config` is an
/// error. An empty document yields all-zero counts and no issues.
#[tracing::instrument(skip_all, fields(text_len = doc.as_str().len()))]
pub fn analyze(doc: &DocumentText, config: &AnalysisConfig) -> EngineResult<AnalysisReport> {
    config.validate()?;

    let counts = counts::count(doc, config.words_per_minute);
    let classified = lines::classify(doc.lines());
    let scan = structure::scan(&classified);
    let issues = issues::detect(&scan);

    let prose = markdown::strip_to_prose(doc.as_str());
    let scores = scores::score(&prose, &scan.structure, counts.words, &config.weights);

    tracing::debug!(
        words = counts.words,
        issues = issues.len(),
        readability = scores.readability,
        structure_quality = scores.structure_quality,
        "analysis complete"
    );

    Ok(AnalysisReport {
        counts,
        structure: scan.structure,
        issues,
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> AnalysisReport {
        analyze(&DocumentText::new(text), &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn empty_document() {
        let report = run("");
        assert_eq!(report.counts, Counts::default());
        assert!(report.issues.is_empty());
        assert_eq!(report.structure, Structure::default());
        assert_eq!(report.scores.structure_rating, StructureRating::NoStructure);
    }

    #[test]
    fn zero_words_per_minute_rejected() {
        let err = AnalysisConfig::new(0).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidConfig {
                field: "words_per_minute",
                ..
            }
        ));

        let config = AnalysisConfig {
            words_per_minute: 0,
            ..AnalysisConfig::default()
        };
        assert!(analyze(&DocumentText::new("text"), &config).is_err());
    }

    #[test]
    fn negative_weight_rejected() {
        let weights = ScoringWeights {
            lists_bonus: -1.0,
            ..ScoringWeights::default()
        };
        let config = AnalysisConfig::default().with_weights(weights);
        assert!(analyze(&DocumentText::new("text"), &config).is_err());
    }

    #[test]
    fn valid_link_has_no_issues() {
        let report = run("[ok](http://x)");
        assert!(report.issues.is_empty());
        assert_eq!(report.structure.links, 1);
    }

    #[test]
    fn full_document() {
        let text = "\
# Guide

Intro text with a [link](https://example.com) and ![img](a.png).

## Install

- step one
- step two

```sh
cargo install mdtidy
```

> note

| a | b |
|---|---|
| 1 | 2 |
";
        let report = run(text);
        let s = &report.structure;
        assert_eq!(s.headings.len(), 2);
        assert_eq!(s.heading_levels, [1, 1, 0, 0, 0, 0]);
        assert_eq!(s.links, 1);
        assert_eq!(s.images, 1);
        assert_eq!(s.list_items, 2);
        assert_eq!(s.code_blocks, 1);
        assert_eq!(s.blockquotes, 1);
        assert_eq!(s.tables, 1);
        assert!(report.issues.is_empty());
        assert_eq!(report.scores.structure_rating, StructureRating::Excellent);
        assert!(report.scores.structure_quality > 20.0);
    }

    #[test]
    fn deterministic() {
        let text = "# A\n\n## A\n\n#### deep\n\n[x]()\n";
        assert_eq!(run(text), run(text));
    }

    #[test]
    fn report_serializes_kebab_case_kinds() {
        let report = run("# Title\n\n### Skip");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["issues"][0]["kind"], "heading-level-skip");
        assert_eq!(json["scores"]["structure_rating"], "good");
    }
}
