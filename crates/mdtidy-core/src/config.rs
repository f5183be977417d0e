//! Settings for mdtidy, layered from files and the environment.
//!
//! Layers, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. the user file, `config.<ext>` in the platform config directory
//!    (`~/.config/mdtidy/` on Linux)
//! 3. project files: `.mdtidy.<ext>` and `mdtidy.<ext>` from the nearest
//!    directory at or above the search root that has either
//! 4. files added with [`ConfigLoader::with_file`], in the order added
//! 5. `MDTIDY_*` environment variables, `__` between nested keys
//!    (`MDTIDY_SCORING__LISTS_BONUS=5`)
//!
//! `<ext>` is `toml`, `yaml`, `yml` or `json`. Inside one directory the
//! dotfile loads first, and each extension overrides the one listed before it.
//!
//! Engine settings are range-checked when [`Config::analysis_config`] or
//! [`Config::format_config`] builds the engine's own config, not at load time.
//!
//! ```no_run
//! use mdtidy_core::config::ConfigLoader;
//!
//! let (config, sources) = ConfigLoader::new().with_project_search("docs").load()?;
//! let format = config.format_config()?;
//! println!(
//!     "{:?}: keep at most {} blank lines",
//!     sources.primary_file(),
//!     format.max_blank_lines
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;
use crate::error::{ConfigError, ConfigResult, EngineError, EngineResult};
use crate::format::{DEFAULT_MAX_BLANK_LINES, FormatConfig};
use crate::weights::{DEFAULT_WORDS_PER_MINUTE, ScoringWeights};

const APP_NAME: &str = "mdtidy";

/// Stems of project config files, lowest precedence first.
const PROJECT_STEMS: &[&str] = &[".mdtidy", "mdtidy"];

/// Recognized extensions, lowest precedence first.
const EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

const ENV_PREFIX: &str = "MDTIDY_";

const DEFAULT_BOUNDARY: &str = ".git";

// -- Config -----------------------------------------------------------------

/// Effective mdtidy settings.
///
/// `words_per_minute` and `max_blank_lines` are signed so that `0` or `-3`
/// in a file still loads and is reported as [`EngineError::InvalidConfig`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Level used when neither `-q`/`-v` nor `RUST_LOG` is given.
    pub log_level: LogLevel,
    /// Directory for JSONL log files. File logging is off when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Reading speed for reading-time estimates (default: 200).
    pub words_per_minute: Option<i64>,
    /// Longest run of blank lines the formatter keeps (default: 2).
    pub max_blank_lines: Option<i64>,
    /// Largest document the CLI and MCP tools accept, in bytes (default: 5 MiB).
    pub max_input_bytes: Option<usize>,
    /// Accept documents of any size; `max_input_bytes` is ignored.
    pub disable_input_limit: bool,
    /// Score coefficient overrides. Omitted keys keep their defaults.
    pub scoring: ScoringWeights,
}

impl Config {
    /// Build a validated [`AnalysisConfig`] from this configuration.
    pub fn analysis_config(&self) -> EngineResult<AnalysisConfig> {
        let words_per_minute = positive(
            "words_per_minute",
            self.words_per_minute,
            i64::from(DEFAULT_WORDS_PER_MINUTE),
        )?;
        let words_per_minute = u32::try_from(words_per_minute).map_err(|_| {
            EngineError::invalid_config("words_per_minute", "value is too large")
        })?;
        let config = AnalysisConfig {
            words_per_minute,
            weights: self.scoring.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a validated [`FormatConfig`] from this configuration.
    pub fn format_config(&self) -> EngineResult<FormatConfig> {
        let max_blank_lines = positive(
            "max_blank_lines",
            self.max_blank_lines,
            DEFAULT_MAX_BLANK_LINES as i64,
        )?;
        let max_blank_lines = usize::try_from(max_blank_lines)
            .map_err(|_| EngineError::invalid_config("max_blank_lines", "value is too large"))?;
        FormatConfig::new(max_blank_lines)
    }

    /// Effective input size limit in bytes, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        (!self.disable_input_limit)
            .then(|| self.max_input_bytes.unwrap_or(crate::DEFAULT_MAX_INPUT_BYTES))
    }
}

fn positive(field: &'static str, value: Option<i64>, default: i64) -> EngineResult<i64> {
    match value {
        None => Ok(default),
        Some(v) if v > 0 => Ok(v),
        Some(v) => Err(EngineError::invalid_config(
            field,
            format!("must be a positive integer, got {v}"),
        )),
    }
}

/// Default log verbosity.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Per-line classifier and scoring detail.
    Debug,
    /// Loaded config and command summaries.
    #[default]
    Info,
    /// Only problems worth a look.
    Warn,
    /// Only failures.
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

// -- Sources ----------------------------------------------------------------

/// The layer a config file was loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// From the platform config directory.
    User,
    /// Found by walking up from the search root.
    Project,
    /// Added with [`ConfigLoader::with_file`] (the CLI's `--config`).
    Explicit,
}

/// One file merged into a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Which layer it belongs to.
    pub kind: SourceKind,
    /// Where it was read from.
    pub path: Utf8PathBuf,
}

/// Files merged into a [`Config`], lowest precedence first.
///
/// Returned by [`ConfigLoader::load`] so `mdtidy info` can name them
/// without searching again.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Every file that was merged.
    pub files: Vec<SourceFile>,
}

impl ConfigSources {
    /// The file whose values win over every other file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.files.last().map(|f| f.path.as_path())
    }

    /// Files loaded into one layer, lowest precedence first.
    pub fn of_kind(&self, kind: SourceKind) -> impl Iterator<Item = &Utf8Path> {
        self.files
            .iter()
            .filter(move |f| f.kind == kind)
            .map(|f| f.path.as_path())
    }

    /// Returns `true` if no file contributed.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// -- Loader -----------------------------------------------------------------

/// Collects config files and merges them with the environment.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    search_root: Option<Utf8PathBuf>,
    user_config: bool,
    boundary: Option<String>,
    explicit: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that reads the user file and stops the project walk at `.git`.
    ///
    /// No project search happens until [`with_project_search`] sets a root.
    ///
    /// [`with_project_search`]: Self::with_project_search
    pub fn new() -> Self {
        Self {
            search_root: None,
            user_config: true,
            boundary: Some(DEFAULT_BOUNDARY.to_string()),
            explicit: Vec::new(),
        }
    }

    /// Look for project files in `dir` and its ancestors.
    pub fn with_project_search(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        self.search_root = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Include or skip the user config file.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.user_config = include;
        self
    }

    /// Stop the project walk at the first directory containing `marker`.
    ///
    /// Files next to the marker are still read.
    pub fn with_boundary_marker(mut self, marker: impl Into<String>) -> Self {
        self.boundary = Some(marker.into());
        self
    }

    /// Walk all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary = None;
        self
    }

    /// Merge `path` above every discovered file. Later calls win.
    pub fn with_file(mut self, path: impl AsRef<Utf8Path>) -> Self {
        self.explicit.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge defaults, discovered files, explicit files and the environment.
    #[tracing::instrument(skip(self), fields(search_root = ?self.search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = self.discover();
        let config = extract(&sources)?;
        Ok((config, sources))
    }

    /// Like [`load`](Self::load), but fails with [`ConfigError::NotFound`]
    /// when no file exists in any layer.
    pub fn load_required(self) -> ConfigResult<(Config, ConfigSources)> {
        let sources = self.discover();
        if sources.is_empty() {
            return Err(ConfigError::NotFound);
        }
        let config = extract(&sources)?;
        Ok((config, sources))
    }

    fn discover(&self) -> ConfigSources {
        let user = self
            .user_config
            .then(user_config_file)
            .flatten()
            .map(|path| (SourceKind::User, path));
        let project = self
            .search_root
            .as_deref()
            .map(|root| self.project_files(root))
            .unwrap_or_default()
            .into_iter()
            .map(|path| (SourceKind::Project, path));
        let explicit = self
            .explicit
            .iter()
            .cloned()
            .map(|path| (SourceKind::Explicit, path));

        let files = user
            .into_iter()
            .chain(project)
            .chain(explicit)
            .map(|(kind, path)| SourceFile { kind, path })
            .collect();
        ConfigSources { files }
    }

    /// Project files in the nearest directory that has any.
    fn project_files(&self, root: &Utf8Path) -> Vec<Utf8PathBuf> {
        for dir in root.ancestors() {
            let found: Vec<Utf8PathBuf> = PROJECT_STEMS
                .iter()
                .flat_map(|stem| {
                    EXTENSIONS
                        .iter()
                        .map(move |ext| dir.join(format!("{stem}.{ext}")))
                })
                .filter(|path| path.is_file())
                .collect();
            if !found.is_empty() {
                tracing::debug!(dir = %dir, count = found.len(), "found project config");
                return found;
            }
            if self
                .boundary
                .as_deref()
                .is_some_and(|marker| dir.join(marker).exists())
            {
                tracing::debug!(dir = %dir, "stopped at boundary");
                break;
            }
        }
        Vec::new()
    }
}

fn extract(sources: &ConfigSources) -> ConfigResult<Config> {
    let figment = sources
        .files
        .iter()
        .fold(Figment::from(Serialized::defaults(Config::default())), |fig, file| {
            merge_file(fig, &file.path)
        })
        .merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

    let config: Config = figment
        .extract()
        .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
    tracing::info!(
        files = sources.files.len(),
        primary = ?sources.primary_file(),
        log_level = config.log_level.as_str(),
        "configuration loaded"
    );
    Ok(config)
}

fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

fn user_config_file() -> Option<Utf8PathBuf> {
    let dir = user_config_dir()?;
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

/// Platform config directory for mdtidy, if a home directory is known.
///
/// `~/.config/mdtidy/` on Linux, `~/Library/Application Support/mdtidy/`
/// on macOS.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok()
}
