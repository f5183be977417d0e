//! Command-line surface of mdtidy.
//!
//! `main.rs` parses [`Cli`], loads the layered config, and hands the chosen
//! [`Commands`] variant to its function in [`commands`]. The parser lives in
//! the library so tests and doc tooling can reach it; [`command()`] returns
//! the clap `Command` for man pages and shell completions.

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// When to color terminal output.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    /// Color even when piped.
    Always,
    /// Plain text.
    Never,
}

impl ColorChoice {
    /// Set the process-wide owo-colors override.
    pub fn apply(self) {
        match self {
            Self::Auto => {}
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT:
    MDTIDY_WORDS_PER_MINUTE         Reading speed for the reading-time estimate
    MDTIDY_MAX_BLANK_LINES          Longest blank-line run `format` keeps
    MDTIDY_MAX_INPUT_BYTES          Largest accepted document, in bytes
    MDTIDY_SCORING__<WEIGHT>        One scoring weight, e.g. MDTIDY_SCORING__LISTS_BONUS
    MDTIDY_LOG_DIR                  Write JSONL logs here, rotated daily
    MDTIDY_LOG_PATH                 Write JSONL logs to this one file
    RUST_LOG                        Log filter when neither -q nor -v is given

CONFIG FILES:
    .mdtidy.toml / mdtidy.toml (also .yaml, .yml, .json) in the nearest
    directory up to the enclosing .git, then --config on top.
";

/// Analyze and tidy markdown documents.
#[derive(Parser)]
#[command(name = "mdtidy", version, about, long_about = None)]
#[command(arg_required_else_help = true, after_long_help = ENV_HELP)]
pub struct Cli {
    /// What to do.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print the bare version number and exit
    #[arg(long)]
    pub version_only: bool,

    /// Extra config file, applied over any discovered one
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Change to DIR before discovering config and reading files
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub chdir: Option<PathBuf>,

    /// Log errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log at debug (-v) or trace (-vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// When to color output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// mdtidy subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Report counts, structure, issues and scores for a document
    Analyze(commands::analyze::AnalyzeArgs),

    /// Normalize whitespace and spacing in a document
    Format(commands::format::FormatArgs),

    /// Show package information and effective configuration
    Info(commands::info::InfoArgs),

    /// Serve the analyzer and formatter as MCP tools on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

impl Commands {
    /// Subcommand name as typed on the command line.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Analyze(_) => "analyze",
            Self::Format(_) => "format",
            Self::Info(_) => "info",
            #[cfg(feature = "mcp")]
            Self::Serve(_) => "serve",
        }
    }
}

/// The clap command tree, for man pages and completions.
pub fn command() -> clap::Command {
    Cli::command()
}
