//! Issue detection over extracted structures.

use std::collections::HashMap;

use crate::weights::{LONG_LINE_CHARS, LONG_LINE_MIN_COUNT};

use super::report::{HeadingInfo, Issue, IssueKind};
use super::structure::StructureScan;

/// Detect issues from a structural scan.
///
/// Issues are ordered by their first line index; the sort is stable, so
/// issues on the same line keep detection order.
#[tracing::instrument(skip_all)]
pub fn detect(scan: &StructureScan) -> Vec<Issue> {
    let headings = &scan.structure.headings;

    let mut issues: Vec<Issue> = scan
        .empty_links
        .iter()
        .map(|link| {
            Issue::at_line(
                IssueKind::EmptyLink,
                link.line,
                format!("link \"{}\" has an empty target", link.text),
            )
        })
        .collect();

    issues.extend(empty_headings(headings));
    issues.extend(duplicate_headings(headings));
    issues.extend(level_skips(headings));
    issues.extend(multiple_top_level(headings));
    issues.extend(long_lines(&scan.long_lines));

    issues.sort_by_key(|issue| issue.line.unwrap_or(usize::MAX));
    tracing::debug!(issue_count = issues.len(), "issue detection complete");
    issues
}

/// Returns `true` if any heading is more than one level deeper than its predecessor.
pub fn has_level_skips(headings: &[HeadingInfo]) -> bool {
    headings.windows(2).any(|pair| pair[1].level > pair[0].level + 1)
}

fn empty_headings(headings: &[HeadingInfo]) -> impl Iterator<Item = Issue> + '_ {
    headings.iter().filter(|h| h.text.is_empty()).map(|h| {
        Issue::at_line(
            IssueKind::EmptyHeading,
            h.line,
            format!("H{} heading has no text", h.level),
        )
    })
}

/// One issue per group of headings whose trimmed, lowercased text matches.
///
/// Groups are reported in order of their first member.
fn duplicate_headings(headings: &[HeadingInfo]) -> Vec<Issue> {
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();

    for heading in headings.iter().filter(|h| !h.text.is_empty()) {
        let key = heading.text.trim().to_lowercase();
        match group_index.get(&key) {
            Some(&idx) => groups[idx].1.push(heading.line),
            None => {
                group_index.insert(key, groups.len());
                groups.push((heading.text.as_str(), vec![heading.line]));
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, lines)| lines.len() > 1)
        .map(|(text, lines)| {
            let description = format!(
                "heading \"{text}\" appears {} times",
                lines.len()
            );
            Issue::at_lines(IssueKind::DuplicateHeading, lines, description)
        })
        .collect()
}

fn level_skips(headings: &[HeadingInfo]) -> impl Iterator<Item = Issue> + '_ {
    headings
        .windows(2)
        .filter(|pair| pair[1].level > pair[0].level + 1)
        .map(|pair| {
            Issue::at_line(
                IssueKind::HeadingLevelSkip,
                pair[1].line,
                format!(
                    "heading level jumps from H{} to H{}",
                    pair[0].level, pair[1].level
                ),
            )
        })
}

fn multiple_top_level(headings: &[HeadingInfo]) -> Option<Issue> {
    let lines: Vec<usize> = headings
        .iter()
        .filter(|h| h.level == 1)
        .map(|h| h.line)
        .collect();
    (lines.len() > 1).then(|| {
        let description = format!("{} top-level (H1) headings", lines.len());
        Issue::at_lines(IssueKind::MultipleTopLevelHeadings, lines, description)
    })
}

fn long_lines(lines: &[usize]) -> Option<Issue> {
    (lines.len() > LONG_LINE_MIN_COUNT).then(|| {
        Issue::at_lines(
            IssueKind::LongLines,
            lines.to_vec(),
            format!(
                "{} lines longer than {LONG_LINE_CHARS} characters",
                lines.len()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::structure;
    use crate::lines;

    fn issues_for(text: &str) -> Vec<Issue> {
        detect(&structure::scan(&lines::classify(text.lines())))
    }

    fn kinds(issues: &[Issue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn heading_level_skip_h1_to_h3() {
        let issues = issues_for("# Title\n\nSome text\n\n### Subsection");
        assert_eq!(kinds(&issues), vec![IssueKind::HeadingLevelSkip]);
        assert_eq!(issues[0].line, Some(4));
    }

    #[test]
    fn stepping_back_up_is_not_a_skip() {
        let issues = issues_for("# A\n## B\n### C\n# D\n## E");
        assert!(!kinds(&issues).contains(&IssueKind::HeadingLevelSkip));
    }

    #[test]
    fn first_heading_deep_is_not_a_skip() {
        assert!(issues_for("### Starts deep\n#### Fine").is_empty());
    }

    #[test]
    fn duplicate_headings_grouped_case_insensitively() {
        let issues = issues_for("## Intro\n\ntext\n\n## intro\n\n## Other");
        assert_eq!(kinds(&issues), vec![IssueKind::DuplicateHeading]);
        assert_eq!(issues[0].lines, vec![0, 4]);
        assert_eq!(issues[0].line, Some(0));
    }

    #[test]
    fn one_issue_per_duplicate_group() {
        let issues = issues_for("## A\n## B\n## a\n## b\n## A");
        let dupes: Vec<_> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::DuplicateHeading)
            .collect();
        assert_eq!(dupes.len(), 2);
        assert_eq!(dupes[0].lines, vec![0, 2, 4]);
        assert_eq!(dupes[1].lines, vec![1, 3]);
    }

    #[test]
    fn empty_link_reported() {
        let issues = issues_for("[broken]()");
        assert_eq!(kinds(&issues), vec![IssueKind::EmptyLink]);
        assert_eq!(issues[0].line, Some(0));
    }

    #[test]
    fn empty_link_around_badge_reported() {
        let issues = issues_for("[![x](i.png)]()");
        assert_eq!(kinds(&issues), vec![IssueKind::EmptyLink]);
    }

    #[test]
    fn valid_link_has_no_issue() {
        assert!(issues_for("[ok](http://x)").is_empty());
    }

    #[test]
    fn empty_headings_flagged_not_grouped() {
        let issues = issues_for("##\n\n##");
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::EmptyHeading, IssueKind::EmptyHeading]
        );
    }

    #[test]
    fn multiple_h1_reported_once() {
        let issues = issues_for("# One\n\n# Two");
        assert_eq!(kinds(&issues), vec![IssueKind::MultipleTopLevelHeadings]);
        assert_eq!(issues[0].lines, vec![0, 2]);
    }

    #[test]
    fn long_lines_need_more_than_threshold() {
        let long = "word ".repeat(30);
        let few = vec![long.as_str(); LONG_LINE_MIN_COUNT].join("\n");
        assert!(issues_for(&few).is_empty());

        let many = vec![long.as_str(); LONG_LINE_MIN_COUNT + 1].join("\n");
        assert_eq!(kinds(&issues_for(&many)), vec![IssueKind::LongLines]);
    }

    #[test]
    fn issues_sorted_by_line() {
        let issues = issues_for("# A\n\n### Skip\n\n[x]()");
        let lines: Vec<_> = issues.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![Some(2), Some(4)]);
    }

    #[test]
    fn level_skip_detection_helper() {
        let heading = |level, line| HeadingInfo {
            level,
            text: String::from("h"),
            line,
        };
        assert!(has_level_skips(&[heading(1, 0), heading(3, 1)]));
        assert!(!has_level_skips(&[heading(2, 0), heading(3, 1), heading(1, 2)]));
    }
}
