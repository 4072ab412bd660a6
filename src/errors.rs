/*!
 * Error types for the soho-etl application.
 *
 * This module contains custom error types for the distinct failure kinds
 * of an ingestion run, using the thiserror crate for ergonomic error
 * definitions. Callers branch on the kind, never on message text.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors detected while validating the run configuration.
///
/// All of these are fatal and reported before any file is processed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The match pattern failed to compile
    #[error("Invalid match regex '{pattern}': {reason}")]
    InvalidRegex {
        /// The pattern as configured
        pattern: String,
        /// Compile error reported by the regex engine
        reason: String,
    },

    /// The configured log directory is absent or not a directory
    #[error("Log directory does not exist: {0:?}")]
    MissingLogDirectory(PathBuf),

    /// A configured path value is empty
    #[error("Configuration field '{0}' must not be empty")]
    EmptyField(&'static str),
}

/// Errors raised while archiving a verified file.
///
/// Archiving is copy-then-delete; the variants identify which half failed
/// and what state the filesystem was left in.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The source file disappeared before the copy
    #[error("Source file does not exist: {0:?}")]
    SourceMissing(PathBuf),

    /// The destination is already occupied and overwrite was not requested
    #[error("Destination already exists: {0:?} (pass --force-overwrite to replace it)")]
    DestinationExists(PathBuf),

    /// The copy itself failed; source and destination are unchanged
    #[error("Copy to {dest:?} failed: {source}")]
    CopyFailed {
        /// Destination path of the attempted copy
        dest: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Delete after a successful copy failed; both copies remain on disk
    #[error("Delete of {path:?} failed after copy: {source}")]
    DeleteFailed {
        /// Path that could not be removed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Errors raised by the per-file verification step
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The row count query itself failed
    #[error("Row count query for '{file}' failed: {reason}")]
    QueryFailed {
        /// File whose rows were being counted
        file: String,
        /// Database error text
        reason: String,
    },

    /// Lines read and rows found disagree
    #[error("'{file}' contains {lines_read} lines, but {rows_found} rows were loaded")]
    CountMismatch {
        /// File that was loaded
        file: String,
        /// Lines read from the file, including lines whose insert failed
        lines_read: u64,
        /// Rows found in the raw-log table for this file name
        rows_found: i64,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum EtlError {
    /// Error in the run configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the persistence layer
    #[error("Database error: {0}")]
    Database(String),

    /// Error while verifying a loaded file
    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),

    /// Error while archiving a verified file
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

// Utility functions for error conversion
impl From<std::io::Error> for EtlError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<rusqlite::Error> for EtlError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Database(error.to_string())
    }
}

impl From<anyhow::Error> for EtlError {
    fn from(error: anyhow::Error) -> Self {
        Self::Database(error.to_string())
    }
}
