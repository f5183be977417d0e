//! `mdtidy info`: package metadata and the settings a run would use.

use std::fmt::Display;

use clap::Args;
use mdtidy_core::ScoringWeights;
use mdtidy_core::config::{Config, ConfigSources, SourceFile};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand (output shape follows `--json`).
#[derive(Args, Debug, Default)]
pub struct InfoArgs {}

/// Compile-time package metadata. Empty fields are omitted.
#[derive(Serialize)]
struct About {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

const ABOUT: About = About {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
    description: env!("CARGO_PKG_DESCRIPTION"),
    repository: env!("CARGO_PKG_REPOSITORY"),
    license: env!("CARGO_PKG_LICENSE"),
};

/// Effective settings after layering, with invalid values shown as errors.
#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    /// Every merged file, lowest precedence first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    config_files: Vec<SourceFile>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    words_per_minute: Result<u32, String>,
    max_blank_lines: Result<usize, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
    scoring: ScoringWeights,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            config_files: sources.files.clone(),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            words_per_minute: config
                .analysis_config()
                .map(|c| c.words_per_minute)
                .map_err(|e| e.to_string()),
            max_blank_lines: config
                .format_config()
                .map(|c| c.max_blank_lines)
                .map_err(|e| e.to_string()),
            max_input_bytes: config.input_limit(),
            scoring: config.scoring.clone(),
        }
    }

    fn print(&self) {
        heading("Configuration");
        match &self.config_file {
            Some(path) => row("Config file", path.cyan()),
            None => row("Config file", "none loaded".yellow()),
        }
        if self.config_files.len() > 1 {
            for file in &self.config_files {
                println!("  {:?}: {}", file.kind, file.path);
            }
        }
        row("Log level", &self.log_level);
        if let Some(dir) = &self.log_dir {
            row("Log directory", dir);
        }

        heading("Engine");
        row_checked("Words per minute", &self.words_per_minute);
        row_checked("Max blank lines", &self.max_blank_lines);
        match self.max_input_bytes {
            Some(max) => row("Input limit (bytes)", max),
            None => row("Input limit (bytes)", "disabled".yellow()),
        }
        if self.scoring != ScoringWeights::default() {
            row("Scoring weights", "customized".cyan());
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    about: About,
    config: ConfigInfo,
}

/// Print package metadata and effective configuration, as text or JSON.
///
/// Invalid engine settings are shown, not raised, so this always succeeds
/// once the config files parse.
#[instrument(name = "cmd_info", skip_all, fields(json = global_json))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(files = sources.files.len(), "executing info command");

    let info = FullInfo {
        about: ABOUT,
        config: ConfigInfo::from_config(config, sources),
    };
    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", ABOUT.name.bold(), ABOUT.version.green());
    if !ABOUT.description.is_empty() {
        println!("{}", ABOUT.description);
    }
    if !ABOUT.license.is_empty() {
        row("License", ABOUT.license);
    }
    if !ABOUT.repository.is_empty() {
        row("Repository", ABOUT.repository.cyan());
    }
    info.config.print();
    Ok(())
}

fn heading(title: &str) {
    println!();
    println!("{}", title.bold().underline());
}

fn row(label: &str, value: impl Display) {
    println!("{}: {value}", label.dimmed());
}

/// A resolved setting, or its validation error in red.
fn row_checked<T: Display>(label: &str, value: &Result<T, String>) {
    match value {
        Ok(v) => row(label, v),
        Err(e) => row(label, e.red()),
    }
}
