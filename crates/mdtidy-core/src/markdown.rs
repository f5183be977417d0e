//! Body prose for readability scoring.
//!
//! Structure counting is line-based (see [`lines`](crate::lines)). The
//! readability score only wants the sentences a reader actually reads, so
//! this walks pulldown-cmark events and keeps text that sits outside code,
//! headings, tables, images and YAML frontmatter.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

fn opens_hidden(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::CodeBlock(_)
            | Tag::Heading { .. }
            | Tag::Table(_)
            | Tag::Image { .. }
            | Tag::MetadataBlock(_)
    )
}

fn closes_hidden(end: &TagEnd) -> bool {
    matches!(
        end,
        TagEnd::CodeBlock
            | TagEnd::Heading(_)
            | TagEnd::Table
            | TagEnd::Image
            | TagEnd::MetadataBlock(_)
    )
}

/// Plain body text of a markdown document.
///
/// Link text, emphasis, blockquotes and list items keep their words; link
/// targets, inline code and raw HTML are dropped. Line breaks and the ends
/// of paragraphs and list items become single spaces, so words from
/// neighboring blocks never run together.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn strip_to_prose(text: &str) -> String {
    let mut hidden = 0usize;
    let mut prose = String::with_capacity(text.len() / 2);

    for event in Parser::new_ext(text, parser_options()) {
        match event {
            Event::Start(tag) if opens_hidden(&tag) => hidden += 1,
            Event::End(end) if closes_hidden(&end) => hidden = hidden.saturating_sub(1),
            _ if hidden > 0 => {}
            Event::Text(t) => prose.push_str(&t),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph | TagEnd::Item) => prose.push(' '),
            _ => {}
        }
    }

    prose
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        strip_to_prose(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn fenced_and_indented_code_dropped() {
        let text = "Before.\n\n```rust\nlet x = 1;\n```\n\n    indented();\n\nAfter.";
        assert_eq!(words(text), ["Before.", "After."]);
    }

    #[test]
    fn yaml_frontmatter_dropped() {
        let text = "---\ntitle: Notes\ndate: 2026-02-07\n---\n\nBody text.";
        assert_eq!(words(text), ["Body", "text."]);
    }

    #[test]
    fn headings_dropped_body_kept() {
        let text = "# Guide\n\nFirst part.\n\n## Setup\n\nSecond part.";
        assert_eq!(words(text), ["First", "part.", "Second", "part."]);
    }

    #[test]
    fn link_text_kept_target_dropped() {
        let prose = strip_to_prose("Read [the guide](https://example.com) first.");
        assert!(prose.contains("the guide"));
        assert!(!prose.contains("example.com"));
    }

    #[test]
    fn images_and_tables_dropped() {
        let text = "![diagram](d.png)\n\n| A | B |\n|---|---|\n| 1 | 2 |\n\nText after.";
        assert_eq!(words(text), ["Text", "after."]);
    }

    #[test]
    fn inline_code_and_html_dropped() {
        let prose = strip_to_prose("Call `run()` now.\n\n<div>raw</div>\n");
        assert!(!prose.contains("run()"));
        assert!(!prose.contains("raw"));
        assert!(prose.contains("now."));
    }

    #[test]
    fn blocks_never_merge_words() {
        assert_eq!(words("- alpha\n- beta\n\n> quoted\ntail"), ["alpha", "beta", "quoted", "tail"]);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(strip_to_prose("").is_empty());
    }
}
