//! Startup configuration: connection file and logging settings.
//!
//! # Responsibility
//! - Read the plaintext connection file once at startup.
//! - Parse the connection string into a concrete database target.
//! - Resolve logging settings from the process environment.
//!
//! # Invariants
//! - A missing, empty, or unusable connection file is a startup error.
//! - Parsing never touches the filesystem beyond reading the connection file.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Connection file looked up in the working directory by default.
pub const DEFAULT_CONNECTION_FILE: &str = "connection.txt";
pub const CONNECTION_FILE_ENV: &str = "BLOGLINE_CONNECTION_FILE";
pub const LOG_LEVEL_ENV: &str = "BLOGLINE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "BLOGLINE_LOG_DIR";
pub const LOG_STDERR_ENV: &str = "BLOGLINE_LOG_STDERR";

const DEFAULT_LOG_DIR_NAME: &str = "logs";
const DATA_SOURCE_KEYS: [&str; 3] = ["data source", "datasource", "filename"];

/// Database selected by a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    /// Transient database living only for the current process.
    Memory,
    /// Database file on disk; created on first open.
    File(PathBuf),
}

/// Errors raised while loading startup configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Connection file could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Connection file exists but holds only whitespace.
    EmptyConnectionString,
    /// Connection string has no recognizable data source.
    MalformedConnectionString(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, .. } => {
                write!(f, "failed to read connection file `{}`", path.display())
            }
            Self::EmptyConnectionString => write!(f, "connection string is empty"),
            Self::MalformedConnectionString(value) => {
                write!(f, "connection string has no usable data source: `{value}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::EmptyConnectionString | Self::MalformedConnectionString(_) => None,
        }
    }
}

/// Reads and parses the connection file at `path`.
pub fn load_connection_file(path: impl AsRef<Path>) -> Result<DbTarget, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_connection_string(&raw)
}

/// Parses a connection string into a [`DbTarget`].
///
/// Accepted forms:
/// - `:memory:` / `sqlite::memory:`
/// - `sqlite://<path>` / `file:<path>`
/// - `Data Source=<path>;...` (keys are case-insensitive, unknown keys ignored)
/// - a bare path without `=` or `;`
pub fn parse_connection_string(raw: &str) -> Result<DbTarget, ConfigError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ConfigError::EmptyConnectionString);
    }

    if value == ":memory:" || value.eq_ignore_ascii_case("sqlite::memory:") {
        return Ok(DbTarget::Memory);
    }

    if let Some(rest) = strip_prefix_ignore_case(value, "sqlite://")
        .or_else(|| strip_prefix_ignore_case(value, "file:"))
    {
        return path_target(rest, value);
    }

    if value.contains('=') || value.contains(';') {
        return parse_key_value_pairs(value);
    }

    path_target(value, value)
}

fn parse_key_value_pairs(value: &str) -> Result<DbTarget, ConfigError> {
    let data_source = value
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| {
            let key = key.trim().to_ascii_lowercase();
            DATA_SOURCE_KEYS.contains(&key.as_str())
        })
        .map(|(_, source)| source.trim());

    match data_source {
        Some(":memory:") => Ok(DbTarget::Memory),
        Some(source) => path_target(source, value),
        None => Err(ConfigError::MalformedConnectionString(value.to_string())),
    }
}

fn path_target(path: &str, raw: &str) -> Result<DbTarget, ConfigError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(ConfigError::MalformedConnectionString(raw.to_string()));
    }
    Ok(DbTarget::File(PathBuf::from(path)))
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

/// Process-level settings resolved before the menu starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub connection_file: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub log_to_stderr: bool,
}

impl AppConfig {
    /// Resolves settings from `BLOGLINE_*` environment variables.
    ///
    /// Relative paths are anchored at `working_dir`, since the logging
    /// backend requires an absolute directory.
    pub fn from_env(working_dir: &Path) -> Self {
        Self::from_lookup(working_dir, |key| std::env::var(key).ok())
    }

    fn from_lookup(working_dir: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let connection_file = non_blank(CONNECTION_FILE_ENV)
            .map(|value| working_dir.join(value.trim()))
            .unwrap_or_else(|| working_dir.join(DEFAULT_CONNECTION_FILE));
        let log_level = non_blank(LOG_LEVEL_ENV)
            .unwrap_or_else(|| crate::logging::default_log_level().to_string());
        let log_dir = non_blank(LOG_DIR_ENV)
            .map(|value| working_dir.join(value.trim()))
            .unwrap_or_else(|| working_dir.join(DEFAULT_LOG_DIR_NAME));
        let log_to_stderr = non_blank(LOG_STDERR_ENV)
            .map(|value| matches!(value.trim(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Self {
            connection_file,
            log_level,
            log_dir,
            log_to_stderr,
        }
    }
}
