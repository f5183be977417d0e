//! Inline link and image matching.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// `![alt](target)`
static IMAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").expect("valid regex"));

/// `[text](target)`, matched after images are masked out.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").expect("valid regex"));

/// Inline code spans, which never contain live links.
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`+[^`]*`+").expect("valid regex"));

/// Whether a match is a link or an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `[text](target)`
    Link,
    /// `![alt](target)`
    Image,
}

/// A single bracket-parenthesis match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkMatch<'a> {
    /// Link or image.
    pub kind: LinkKind,
    /// Bracketed text (link text or image alt text).
    pub text: &'a str,
    /// Parenthesized target, untrimmed.
    pub target: &'a str,
}

impl LinkMatch<'_> {
    /// Returns `true` if the target is empty or whitespace-only.
    pub fn has_empty_target(&self) -> bool {
        self.target.trim().is_empty()
    }
}

/// Remove inline code spans so their contents are not scanned.
pub fn strip_inline_code(line: &str) -> Cow<'_, str> {
    INLINE_CODE.replace_all(line, "")
}

/// Find every link and image on a line, in order of appearance.
///
/// Images are matched first and blanked out, so an image nested inside a
/// link (`[![alt](badge.svg)](url)`) yields both the image and the outer link.
pub fn find_links(line: &str) -> Vec<LinkMatch<'_>> {
    let mut found: Vec<(usize, LinkMatch<'_>)> = Vec::new();
    let mut masked = line.as_bytes().to_vec();

    for caps in IMAGE_PATTERN.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        masked[whole.range()].fill(b' ');
        found.push((
            whole.start(),
            LinkMatch {
                kind: LinkKind::Image,
                text: caps.get(1).map_or("", |m| m.as_str()),
                target: caps.get(2).map_or("", |m| m.as_str()),
            },
        ));
    }

    // Masking only replaces whole matches with ASCII, so char boundaries hold.
    let masked = String::from_utf8_lossy(&masked);
    for caps in LINK_PATTERN.captures_iter(&masked) {
        let (Some(whole), Some(text), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        found.push((
            whole.start(),
            LinkMatch {
                kind: LinkKind::Link,
                text: &line[text.range()],
                target: &line[target.range()],
            },
        ));
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, link)| link).collect()
}
