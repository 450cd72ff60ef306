//! Store and logging configuration.
//!
//! # Responsibility
//! - Parse the connection URI that selects a file or in-memory store.
//! - Collect logging settings from explicit values or the environment.
//!
//! # Invariants
//! - Parsing never touches the file system; opening is done by `db::connect`.
//! - Unknown URI schemes are rejected instead of falling back to a default.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable holding the store connection URI.
pub const STORE_URI_ENV: &str = "EMPLOYEE_STORE_URI";
/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "EMPLOYEE_LOG_LEVEL";
/// Environment variable holding the absolute log directory.
pub const LOG_DIR_ENV: &str = "EMPLOYEE_LOG_DIR";

const SQLITE_SCHEME: &str = "sqlite://";
const MEMORY_URIS: &[&str] = &["sqlite::memory:", ":memory:", "memory"];

/// Errors produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyUri,
    UnsupportedScheme(String),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUri => write!(f, "store uri cannot be empty"),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "unsupported store uri scheme `{scheme}`; expected sqlite:// or sqlite::memory:"
            ),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

/// Location of the employee store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    /// Disposable in-memory database, dropped with the connection.
    Memory,
    /// SQLite database file.
    File(PathBuf),
}

impl StoreUri {
    /// Parses `sqlite::memory:`, `memory`, `sqlite://<path>` or a bare path.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyUri);
        }
        if MEMORY_URIS.contains(&trimmed) {
            return Ok(Self::Memory);
        }
        if let Some(path) = trimmed.strip_prefix(SQLITE_SCHEME) {
            if path.is_empty() {
                return Err(ConfigError::EmptyUri);
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if let Some((scheme, _)) = trimmed.split_once("://") {
            return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }

    /// Short label used in log events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File(_) => "file",
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Memory => None,
            Self::File(path) => Some(path.as_path()),
        }
    }
}

impl FromStr for StoreUri {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for StoreUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("sqlite::memory:"),
            Self::File(path) => write!(f, "{SQLITE_SCHEME}{}", path.display()),
        }
    }
}

/// Process-level settings for opening the store and starting logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub uri: StoreUri,
    /// Normalized level (`trace|debug|info|warn|error`).
    pub log_level: &'static str,
    /// Absolute log directory. File logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: StoreUri::Memory,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Reads configuration from process environment variables.
    ///
    /// Unset variables fall back to [`StoreConfig::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to
    /// values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let uri = match lookup(STORE_URI_ENV) {
            Some(raw) => StoreUri::parse(&raw)?,
            None => defaults.uri,
        };
        let log_level = match lookup(LOG_LEVEL_ENV) {
            Some(raw) => normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => defaults.log_level,
        };
        let log_dir = lookup(LOG_DIR_ENV)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            uri,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, StoreUri, LOG_DIR_ENV, LOG_LEVEL_ENV, STORE_URI_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| values.get(key).cloned()
    }

    #[test]
    fn parse_accepts_memory_aliases() {
        for raw in ["sqlite::memory:", ":memory:", " memory "] {
            assert_eq!(StoreUri::parse(raw).unwrap(), StoreUri::Memory);
        }
    }

    #[test]
    fn parse_accepts_sqlite_scheme_and_bare_path() {
        assert_eq!(
            StoreUri::parse("sqlite:///tmp/employees.db").unwrap(),
            StoreUri::File(PathBuf::from("/tmp/employees.db"))
        );
        assert_eq!(
            StoreUri::parse("data/employees.db").unwrap(),
            StoreUri::File(PathBuf::from("data/employees.db"))
        );
    }

    #[test]
    fn parse_rejects_empty_and_foreign_schemes() {
        assert_eq!(StoreUri::parse("  "), Err(ConfigError::EmptyUri));
        assert_eq!(StoreUri::parse("sqlite://"), Err(ConfigError::EmptyUri));
        assert_eq!(
            StoreUri::parse("mongodb://localhost:27017/company"),
            Err(ConfigError::UnsupportedScheme("mongodb".to_string()))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let uri = StoreUri::File(PathBuf::from("/var/lib/employees.db"));
        assert_eq!(uri.to_string().parse::<StoreUri>().unwrap(), uri);
        assert_eq!(StoreUri::Memory.to_string(), "sqlite::memory:");
    }

    #[test]
    fn from_lookup_uses_defaults_when_unset() {
        let config = StoreConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (STORE_URI_ENV, "sqlite:///srv/hr.db"),
            (LOG_LEVEL_ENV, "WARNING"),
            (LOG_DIR_ENV, "/var/log/hr"),
        ]))
        .unwrap();

        assert_eq!(config.uri, StoreUri::File(PathBuf::from("/srv/hr.db")));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/hr")));
    }

    #[test]
    fn from_lookup_rejects_unknown_log_level() {
        let err = StoreConfig::from_lookup(lookup_from(&[(LOG_LEVEL_ENV, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(message) if message.contains("loud")));
    }
}
