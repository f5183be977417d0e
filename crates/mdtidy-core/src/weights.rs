//! Scoring weights and fixed analysis thresholds.
//!
//! The readability and structure-quality formulas are heuristics. Only their
//! direction is meaningful: longer sentences or longer words never raise the
//! readability score, and adding structure never lowers the structure score.
//! The coefficients live here so they can be overridden from configuration
//! and passed explicitly into the analyzer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default reading speed used for reading-time estimates.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Lines longer than this many characters count as long.
pub const LONG_LINE_CHARS: usize = 120;

/// A long-lines issue is raised only when more lines than this are long.
pub const LONG_LINE_MIN_COUNT: usize = 5;

/// Indentation (columns) that turns a paragraph line into indented code.
pub const INDENTED_CODE_COLUMNS: usize = 4;

/// Indentation (columns) that keeps a line inside the preceding list item.
pub const LIST_CONTINUATION_COLUMNS: usize = 2;

/// Upper bound of both scores.
pub const MAX_SCORE: f64 = 100.0;

/// Coefficients for the readability and structure-quality scores.
///
/// Readability: `base - words_per_sentence_penalty * wps - chars_per_word_penalty * cpw`,
/// clamped to 0–100.
///
/// Structure quality: `structure_floor` plus each bonus whose condition
/// holds, capped at 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringWeights {
    /// Readability score before penalties.
    pub readability_base: f64,
    /// Points removed per average word in a sentence.
    pub words_per_sentence_penalty: f64,
    /// Points removed per average character in a word.
    pub chars_per_word_penalty: f64,
    /// Structure score of a document with no structural elements.
    pub structure_floor: f64,
    /// Bonus for having any headings.
    pub headings_bonus: f64,
    /// Bonus for exactly one top-level heading.
    pub single_top_level_bonus: f64,
    /// Bonus for a heading hierarchy without level skips.
    pub balanced_hierarchy_bonus: f64,
    /// Bonus for having any list items.
    pub lists_bonus: f64,
    /// Bonus for having any code blocks.
    pub code_blocks_bonus: f64,
    /// Bonus when sections average no more than `max_words_per_section` words.
    pub section_density_bonus: f64,
    /// Section length threshold for `section_density_bonus`.
    pub max_words_per_section: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            readability_base: 140.0,
            words_per_sentence_penalty: 1.5,
            chars_per_word_penalty: 12.0,
            structure_floor: 20.0,
            headings_bonus: 25.0,
            single_top_level_bonus: 10.0,
            balanced_hierarchy_bonus: 15.0,
            lists_bonus: 15.0,
            code_blocks_bonus: 10.0,
            section_density_bonus: 5.0,
            max_words_per_section: 300,
        }
    }
}

impl ScoringWeights {
    /// Reject negative or non-finite coefficients.
    ///
    /// A negative penalty would invert the direction of a score, so it is an
    /// error rather than something to clamp.
    pub fn validate(&self) -> EngineResult<()> {
        let coefficients = [
            ("readability_base", self.readability_base),
            ("words_per_sentence_penalty", self.words_per_sentence_penalty),
            ("chars_per_word_penalty", self.chars_per_word_penalty),
            ("structure_floor", self.structure_floor),
            ("headings_bonus", self.headings_bonus),
            ("single_top_level_bonus", self.single_top_level_bonus),
            ("balanced_hierarchy_bonus", self.balanced_hierarchy_bonus),
            ("lists_bonus", self.lists_bonus),
            ("code_blocks_bonus", self.code_blocks_bonus),
            ("section_density_bonus", self.section_density_bonus),
        ];
        for (field, value) in coefficients {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::invalid_config(
                    field,
                    format!("must be a finite, non-negative number (got {value})"),
                ));
            }
        }
        if self.structure_floor > MAX_SCORE {
            return Err(EngineError::invalid_config(
                "structure_floor",
                format!("must not exceed {MAX_SCORE}"),
            ));
        }
        if self.max_words_per_section == 0 {
            return Err(EngineError::invalid_config(
                "max_words_per_section",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
