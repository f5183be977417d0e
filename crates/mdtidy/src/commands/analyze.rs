//! Analyze command: counts, structure, issues and scores for one document.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use mdtidy_core::analysis::{self, AnalysisReport, IssueKind};
use mdtidy_core::config::Config;

use super::read_input_file;

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// File to analyze (`-` reads stdin).
    pub file: Utf8PathBuf,

    /// Reading speed for the reading-time estimate (overrides config).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub wpm: Option<u32>,

    /// Exit non-zero when any issue is found.
    #[arg(long)]
    pub fail_on_issues: bool,

    /// Exit non-zero when an issue of one of these kinds is found (comma-separated).
    #[arg(long, value_enum, value_delimiter = ',', value_name = "KIND")]
    pub fail_on: Vec<IssueKind>,
}

/// Analyze a markdown document.
#[instrument(name = "cmd_analyze", skip_all, fields(file = %args.file))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, wpm = ?args.wpm, "executing analyze command");

    let doc = read_input_file(&args.file, max_input_bytes)?;

    let mut analysis_config = config
        .analysis_config()
        .context("invalid analysis configuration")?;
    if let Some(wpm) = args.wpm {
        analysis_config.words_per_minute = wpm;
    }

    let report = analysis::analyze(&doc, &analysis_config)
        .with_context(|| format!("failed to analyze {}", args.file))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&args.file, &report);
    }

    if args.fail_on_issues && !report.issues.is_empty() {
        bail!(
            "{} has {} issue(s). Run `mdtidy analyze {}` for details.",
            args.file,
            report.issues.len(),
            args.file,
        );
    }
    let mut gated: Vec<&str> = report
        .issues
        .iter()
        .filter(|issue| args.fail_on.contains(&issue.kind))
        .map(|issue| issue.kind.as_str())
        .collect();
    gated.sort_unstable();
    gated.dedup();
    if !gated.is_empty() {
        bail!("{} has gated issue(s): {}", args.file, gated.join(", "));
    }

    Ok(())
}

fn print_report(file: &Utf8Path, report: &AnalysisReport) {
    let counts = &report.counts;
    let structure = &report.structure;
    let scores = &report.scores;

    println!("{}", file.bold());

    println!(
        "\n  {} {} words, {} characters ({} without whitespace), {} lines, ~{} min read",
        "Counts:".cyan(),
        counts.words,
        counts.characters,
        counts.characters_no_whitespace,
        counts.lines,
        counts.reading_time_minutes,
    );

    println!(
        "\n  {} {} headings, {} links, {} images, {} code blocks, {} list items, {} blockquotes, {} tables",
        "Structure:".cyan(),
        structure.headings.len(),
        structure.links,
        structure.images,
        structure.code_blocks,
        structure.list_items,
        structure.blockquotes,
        structure.tables,
    );

    if !structure.headings.is_empty() {
        let histogram: Vec<String> = structure
            .heading_levels
            .iter()
            .enumerate()
            .filter(|(_, n)| **n > 0)
            .map(|(i, n)| format!("H{}: {n}", i + 1))
            .collect();
        println!("\n  {} {}", "Headings:".cyan(), histogram.join(", "));
        for heading in &structure.headings {
            let indent = "  ".repeat(usize::from(heading.level));
            let text = if heading.text.is_empty() {
                "(empty)".dimmed().to_string()
            } else {
                heading.text.clone()
            };
            println!("  {indent}{text} {}", format!("(line {})", heading.line + 1).dimmed());
        }
    }

    println!(
        "\n  {} Readability {}, Structure {} ({})",
        "Scores:".cyan(),
        colored_score(scores.readability),
        colored_score(scores.structure_quality),
        scores.structure_rating,
    );

    if report.issues.is_empty() {
        println!("\n  {} none", "Issues:".green());
        return;
    }
    println!("\n  {} {}", "Issues:".yellow(), report.issues.len());
    for issue in &report.issues {
        let location = issue
            .line
            .map_or_else(String::new, |line| format!("line {}: ", line + 1));
        println!(
            "    {}{} {}",
            location.dimmed(),
            issue.kind.as_str().yellow(),
            issue.description,
        );
    }
}

fn colored_score(score: f64) -> String {
    let text = format!("{score:.1}");
    if score >= 70.0 {
        text.green().to_string()
    } else if score >= 40.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}
