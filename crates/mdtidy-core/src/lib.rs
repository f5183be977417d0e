//! Core library for mdtidy.
//!
//! Two pure functions over an immutable [`DocumentText`]:
//!
//! - [`analyze`] - counts, structural inventory, issues and quality scores
//! - [`format`](format::format) - idempotent whitespace and spacing normalization
//!
//! Neither performs I/O or keeps state between calls, so both are safe to
//! call concurrently.
//!
//! # Modules
//!
//! - [`analysis`] - The analyzer and its report types
//! - [`format`] - The formatter
//! - [`lines`] - Per-line classification shared by both
//! - [`links`] - Inline link and image matching
//! - [`weights`] - Scoring coefficients and fixed thresholds
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use mdtidy_core::{AnalysisConfig, DocumentText, FormatConfig, analyze, format};
//!
//! let doc = DocumentText::new("# Title\nSome text\n\n\n\n\nMore text");
//!
//! let report = analyze(&doc, &AnalysisConfig::default()).unwrap();
//! assert_eq!(report.structure.headings.len(), 1);
//!
//! let tidy = format(&doc, &FormatConfig::default()).unwrap();
//! assert_eq!(tidy.as_str(), "# Title\n\nSome text\n\n\nMore text\n");
//! ```
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod lines;
pub mod links;
pub mod markdown;
pub mod text;
pub mod weights;

pub use analysis::{
    AnalysisConfig, AnalysisReport, Counts, HeadingInfo, Issue, IssueKind, Scores, Structure,
    StructureRating, analyze,
};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel, SourceFile, SourceKind};
pub use document::DocumentText;
pub use error::{ConfigError, ConfigResult, EngineError, EngineResult};
pub use format::{FormatConfig, format, is_formatted};
pub use weights::ScoringWeights;

/// Default maximum input size in bytes (5 MiB).
///
/// Used by the CLI and MCP server when `max_input_bytes` is not configured.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
