//! Error types for mdtidy-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors the analysis and formatting engine can report.
///
/// The engine is total over well-formed Unicode text: every variant here
/// describes bad input bytes or a configuration value outside its valid
/// range, never a property of the document content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8 (invalid sequence at byte {valid_up_to})")]
    InvalidEncoding {
        /// Number of leading bytes that decoded cleanly.
        valid_up_to: usize,
    },

    /// A configuration value is outside its valid range.
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl EngineError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl From<std::str::Utf8Error> for EngineError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::InvalidEncoding {
            valid_up_to: err.valid_up_to(),
        }
    }
}

/// Result type alias using [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;
