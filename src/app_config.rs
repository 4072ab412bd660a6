use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory scanned for log files to ingest
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,

    /// Pattern a filename must match, anchored at the start of the name
    #[serde(default = "default_match_regex")]
    pub match_regex: String,

    /// Database config
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Name of the subdirectory that receives fully ingested files
pub const COMPLETED_DIR_NAME: &str = "etl_complete";

/// Database configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    /// When unset, a per-user default under the platform data directory is used.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    // @level: Error
    Error,
    // @level: Warn
    Warn,
    // @level: Info
    #[default]
    Info,
    // @level: Debug
    Debug,
    // @level: Trace
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow::anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_directory: default_log_directory(),
            match_regex: default_match_regex(),
            database: DatabaseConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// An invalid match pattern is a fatal configuration error and must be
    /// reported before any file is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_regex.is_empty() {
            return Err(ConfigError::EmptyField("match_regex"));
        }
        if self.log_directory.as_os_str().is_empty() {
            return Err(ConfigError::EmptyField("log_directory"));
        }

        // Fails fast on an uncompilable pattern
        self.compiled_regex()?;

        Ok(())
    }

    /// Compile the match pattern, anchored at the start of the filename.
    ///
    /// The pattern need not cover the whole name; `soho\.log-\d{8}` matches
    /// `soho.log-20240101.gz` but not `old.soho.log-20240101`.
    pub fn compiled_regex(&self) -> Result<Regex, ConfigError> {
        compile_match_regex(&self.match_regex)
    }

    /// Directory that receives files after a verified load
    pub fn completed_directory(&self) -> PathBuf {
        self.log_directory.join(COMPLETED_DIR_NAME)
    }

    /// Resolve the database path, falling back to the per-user default
    pub fn database_path(&self) -> Option<&Path> {
        self.database.path.as_deref()
    }
}

/// Compile a filename pattern anchored at the start of the name
pub fn compile_match_regex(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!(r"\A(?:{})", pattern)).map_err(|e| ConfigError::InvalidRegex {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("/var/log/soho")
}

fn default_match_regex() -> String {
    r"soho\.log-\d{8}".to_string()
}
