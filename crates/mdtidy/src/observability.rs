//! Logging and tracing setup.
//!
//! Human-readable events go to stderr (stdout belongs to command output and
//! the MCP transport). When a log directory or file is configured, a JSONL
//! layer is added behind a non-blocking writer.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Explicit log file path; wins over every directory setting.
pub const LOG_PATH_ENV: &str = "MDTIDY_LOG_PATH";

/// Log directory; wins over the config file's `log_dir`.
pub const LOG_DIR_ENV: &str = "MDTIDY_LOG_DIR";

/// File name used inside a log directory (rotated daily).
const LOG_FILE_NAME: &str = "mdtidy.jsonl";

/// Where JSONL logs are written, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogTarget {
    /// Console only.
    #[default]
    Disabled,
    /// Daily-rotated files in this directory.
    Directory(PathBuf),
    /// A single file, never rotated.
    File(PathBuf),
}

/// Resolved observability settings.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// JSONL log destination.
    pub target: LogTarget,
}

impl ObservabilityConfig {
    /// Resolve settings from the environment, falling back to `config_log_dir`.
    ///
    /// Precedence: `MDTIDY_LOG_PATH` > `MDTIDY_LOG_DIR` > config `log_dir`.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            non_empty_env(LOG_PATH_ENV),
            non_empty_env(LOG_DIR_ENV),
            config_log_dir,
        )
    }

    fn resolve(
        log_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        let target = match (log_path, log_dir.or(config_log_dir)) {
            (Some(path), _) => LogTarget::File(path),
            (None, Some(dir)) => LogTarget::Directory(dir),
            (None, None) => LogTarget::Disabled,
        };
        Self { target }
    }
}

fn non_empty_env(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Build the event filter.
///
/// `-q` and `-v` win; otherwise `RUST_LOG` if set, else `default_level`.
/// An unparsable `RUST_LOG` falls back to `default_level`.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(quiet, verbose, rust_log.as_deref(), default_level);
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn filter_directive<'a>(
    quiet: bool,
    verbose: u8,
    rust_log: Option<&'a str>,
    default_level: &'a str,
) -> &'a str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => rust_log
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default_level),
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it for the life
/// of the process.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match file_writer(&config.target)? {
        Some((writer, guard)) => {
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

fn file_writer(
    target: &LogTarget,
) -> anyhow::Result<Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)>> {
    let appender = match target {
        LogTarget::Disabled => return Ok(None),
        LogTarget::Directory(dir) => {
            ensure_dir(dir)?;
            tracing_appender::rolling::daily(dir, LOG_FILE_NAME)
        }
        LogTarget::File(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("no file name in {}", path.display()))?;
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            ensure_dir(dir)?;
            tracing_appender::rolling::never(dir, file_name)
        }
    };
    Ok(Some(tracing_appender::non_blocking(appender)))
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))
}
