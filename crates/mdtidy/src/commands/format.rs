//! Format command: normalize whitespace and spacing.

use std::io::Write;

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

use mdtidy_core::config::Config;
use mdtidy_core::format;

use super::read_input_file;

/// Arguments for the `format` subcommand.
#[derive(Args, Debug)]
pub struct FormatArgs {
    /// File to format (`-` reads stdin).
    pub file: Utf8PathBuf,

    /// Print nothing; exit non-zero if the file is not already formatted.
    #[arg(long)]
    pub check: bool,

    /// Longest run of blank lines to keep (overrides config).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_blank_lines: Option<u64>,
}

#[derive(Serialize)]
struct FormatOutcome<'a> {
    file: &'a str,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

/// Format a markdown document.
#[instrument(name = "cmd_format", skip_all, fields(file = %args.file, check = args.check))]
pub fn cmd_format(
    args: FormatArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, max_blank_lines = ?args.max_blank_lines, "executing format command");

    let doc = read_input_file(&args.file, max_input_bytes)?;

    let mut format_config = config
        .format_config()
        .context("invalid format configuration")?;
    if let Some(max) = args.max_blank_lines {
        format_config.max_blank_lines =
            usize::try_from(max).context("--max-blank-lines is too large")?;
    }

    if args.check {
        let clean = format::is_formatted(&doc, &format_config)
            .with_context(|| format!("failed to format {}", args.file))?;
        if global_json {
            print_outcome(&args.file, !clean, None)?;
        }
        if !clean {
            bail!(
                "{} is not formatted. Run `mdtidy format {}` to see the result.",
                args.file,
                args.file
            );
        }
        return Ok(());
    }

    let formatted = format::format(&doc, &format_config)
        .with_context(|| format!("failed to format {}", args.file))?;
    let changed = formatted != doc;

    if global_json {
        print_outcome(&args.file, changed, Some(formatted.as_str()))?;
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(formatted.as_str().as_bytes())
            .context("failed to write to stdout")?;
    }
    Ok(())
}

fn print_outcome(file: &Utf8Path, changed: bool, text: Option<&str>) -> anyhow::Result<()> {
    let outcome = FormatOutcome {
        file: file.as_str(),
        changed,
        text,
    };
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
