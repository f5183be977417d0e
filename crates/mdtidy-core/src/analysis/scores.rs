//! Readability and structure-quality scoring.

use crate::text;
use crate::weights::{MAX_SCORE, ScoringWeights};

use super::issues::has_level_skips;
use super::report::{Scores, Structure, StructureRating};

/// Compute all scores.
///
/// `prose` is the markdown-stripped body text; `word_count` is the word
/// count of the whole document, used for section density.
#[tracing::instrument(skip_all, fields(prose_len = prose.len()))]
pub fn score(
    prose: &str,
    structure: &Structure,
    word_count: usize,
    weights: &ScoringWeights,
) -> Scores {
    Scores {
        readability: readability(prose, weights),
        structure_quality: structure_quality(structure, word_count, weights),
        structure_rating: rating(structure),
    }
}

/// Readability on a 0–100 scale; higher means simpler.
///
/// Prose without any words scores 100.
pub fn readability(prose: &str, weights: &ScoringWeights) -> f64 {
    let words: Vec<&str> = prose.split_whitespace().collect();
    if words.is_empty() {
        return MAX_SCORE;
    }
    let sentences = text::split_sentences(prose).len().max(1);
    let letters: usize = words.iter().map(|w| text::word_length(w)).sum();

    let words_per_sentence = words.len() as f64 / sentences as f64;
    let chars_per_word = letters as f64 / words.len() as f64;
    let raw = weights.readability_base
        - weights
            .words_per_sentence_penalty
            .mul_add(words_per_sentence, weights.chars_per_word_penalty * chars_per_word);

    round1(raw.clamp(0.0, MAX_SCORE))
}

/// Structure quality on a 0–100 scale, never below `structure_floor`.
pub fn structure_quality(structure: &Structure, word_count: usize, weights: &ScoringWeights) -> f64 {
    let headings = &structure.headings;
    let mut score = weights.structure_floor;

    if !headings.is_empty() {
        score += weights.headings_bonus;
        if structure.top_level_headings() == 1 {
            score += weights.single_top_level_bonus;
        }
        if !has_level_skips(headings) {
            score += weights.balanced_hierarchy_bonus;
        }
        if word_count / headings.len() <= weights.max_words_per_section {
            score += weights.section_density_bonus;
        }
    }
    if structure.list_items > 0 {
        score += weights.lists_bonus;
    }
    if structure.code_blocks > 0 {
        score += weights.code_blocks_bonus;
    }

    round1(score.min(MAX_SCORE))
}

/// Coarse heading-structure label.
pub fn rating(structure: &Structure) -> StructureRating {
    let h1 = structure.heading_levels[0];
    let h2 = structure.heading_levels[1];
    if structure.headings.is_empty() {
        StructureRating::NoStructure
    } else if h1 > 1 {
        StructureRating::MultipleTopLevel
    } else if h1 == 1 && h2 > 0 {
        StructureRating::Excellent
    } else {
        StructureRating::Good
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::HeadingInfo;

    fn heading(level: u8, line: usize) -> HeadingInfo {
        HeadingInfo {
            level,
            text: format!("Heading {line}"),
            line,
        }
    }

    fn with_headings(levels: &[u8]) -> Structure {
        let mut structure = Structure::default();
        for (line, &level) in levels.iter().enumerate() {
            structure.heading_levels[usize::from(level - 1)] += 1;
            structure.headings.push(heading(level, line));
        }
        structure
    }

    #[test]
    fn empty_prose_scores_max() {
        let weights = ScoringWeights::default();
        assert!((readability("", &weights) - MAX_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn longer_sentences_score_lower() {
        let weights = ScoringWeights::default();
        let short = readability("The cat sat. The dog ran. A bird sang.", &weights);
        let long = readability(
            "The cat sat on the mat while the dog ran around the yard and a bird sang in the tree.",
            &weights,
        );
        assert!(long <= short, "long {long} should not beat short {short}");
    }

    #[test]
    fn longer_words_score_lower() {
        let weights = ScoringWeights::default();
        let simple = readability("We use the tool to fix the bug. It is fast.", &weights);
        let complex = readability(
            "Practitioners leverage sophisticated instrumentation facilitating remediation. \
             Implementation necessitates comprehensive organizational coordination.",
            &weights,
        );
        assert!(complex < simple);
    }

    #[test]
    fn readability_is_clamped() {
        let weights = ScoringWeights::default();
        let score = readability(&"incomprehensibilities ".repeat(200), &weights);
        assert!((0.0..=MAX_SCORE).contains(&score));
    }

    #[test]
    fn no_structure_scores_floor() {
        let weights = ScoringWeights::default();
        let score = structure_quality(&Structure::default(), 40, &weights);
        assert!((score - weights.structure_floor).abs() < f64::EPSILON);
        assert!(score > 0.0);
    }

    #[test]
    fn adding_structure_never_lowers_score() {
        let weights = ScoringWeights::default();
        let bare = structure_quality(&Structure::default(), 100, &weights);
        let headed = structure_quality(&with_headings(&[1, 2]), 100, &weights);
        let mut rich = with_headings(&[1, 2]);
        rich.list_items = 3;
        rich.code_blocks = 1;
        let rich = structure_quality(&rich, 100, &weights);
        assert!(bare <= headed && headed <= rich);
        assert!(rich <= MAX_SCORE);
    }

    #[test]
    fn skipped_levels_score_lower_than_balanced() {
        let weights = ScoringWeights::default();
        let balanced = structure_quality(&with_headings(&[1, 2, 3]), 100, &weights);
        let skipped = structure_quality(&with_headings(&[1, 3, 3]), 100, &weights);
        assert!(skipped < balanced);
    }

    #[test]
    fn ratings() {
        assert_eq!(rating(&Structure::default()), StructureRating::NoStructure);
        assert_eq!(rating(&with_headings(&[1, 1])), StructureRating::MultipleTopLevel);
        assert_eq!(rating(&with_headings(&[1, 2])), StructureRating::Excellent);
        assert_eq!(rating(&with_headings(&[2, 3])), StructureRating::Good);
    }
}
