//! Word, character and line counting.

use crate::document::DocumentText;
use crate::text;

use super::report::Counts;

/// Count words, characters and lines, and estimate reading time.
///
/// Reading time is `ceil(words / words_per_minute)`; a document without
/// words takes zero minutes.
pub fn count(doc: &DocumentText, words_per_minute: u32) -> Counts {
    let text = doc.as_str();
    let words = text::count_words(text);
    let (characters, whitespace) = text.chars().fold((0, 0), |(all, ws), c| {
        (all + 1, ws + usize::from(c.is_whitespace()))
    });

    Counts {
        words,
        characters,
        characters_no_whitespace: characters - whitespace,
        lines: doc.line_count(),
        reading_time_minutes: words.div_ceil(words_per_minute.max(1) as usize),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world() {
        let counts = count(&DocumentText::new("Hello world"), 200);
        assert_eq!(counts.words, 2);
        assert_eq!(counts.characters, 11);
        assert_eq!(counts.characters_no_whitespace, 10);
        assert_eq!(counts.lines, 1);
        assert_eq!(counts.reading_time_minutes, 1);
    }

    #[test]
    fn empty_document_counts_zero() {
        assert_eq!(count(&DocumentText::new(""), 200), Counts::default());
    }

    #[test]
    fn reading_time_rounds_up() {
        let text = vec!["word"; 201].join(" ");
        assert_eq!(count(&DocumentText::new(text), 200).reading_time_minutes, 2);

        let text = vec!["word"; 200].join(" ");
        assert_eq!(count(&DocumentText::new(text), 200).reading_time_minutes, 1);
    }

    #[test]
    fn characters_are_codepoints() {
        let counts = count(&DocumentText::new("héllo wörld\n"), 200);
        assert_eq!(counts.characters, 12);
        assert_eq!(counts.characters_no_whitespace, 10);
    }
}
