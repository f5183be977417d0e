//! Word and sentence tokenizing for prose.

use regex::Regex;
use std::sync::LazyLock;

/// Sentence terminator: `.`, `!` or `?` followed by whitespace or end of text.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid regex"));

/// Count words as maximal runs of non-whitespace.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split text into sentences.
///
/// A sentence ends at a run of `.`, `!` or `?` followed by whitespace or the
/// end of the text. Fragments without any alphanumeric character (stray
/// punctuation, list bullets) are dropped; a trailing fragment without a
/// terminator still counts as a sentence.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect()
}

/// Number of letters and digits in a word, ignoring punctuation.
pub fn word_length(word: &str) -> usize {
    word.chars().filter(|c| c.is_alphanumeric()).count()
}
