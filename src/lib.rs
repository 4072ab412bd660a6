/*!
 * # soho-etl - raw log file loader
 *
 * A Rust library for loading raw log files into a relational table,
 * verifying the load, and archiving completed files.
 *
 * ## Features
 *
 * - Scan a directory for log files matching a filename pattern
 * - Load each line verbatim into an append-only SQLite table,
 *   one row per line, committed row-by-row
 * - Verify every load by comparing rows found against lines read
 * - Archive verified files into a completed directory with
 *   copy-then-delete semantics and a never-overwrite default
 * - Leave failed files in place for manual inspection and retry
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `file_utils`: File selection and archive operations
 * - `log_reader`: Lazy line streaming over raw log files
 * - `database`: SQLite persistence:
 *   - `database::connection`: Shared connection handling
 *   - `database::schema`: Schema creation and versioning
 *   - `database::repository`: Raw-log table operations
 *   - `database::models`: Persisted row types
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod file_utils;
pub mod log_reader;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FileOutcome, FileReport, RunSummary};
pub use database::{DatabaseConnection, Repository};
pub use errors::{ArchiveError, ConfigError, EtlError, VerifyError};
pub use log_reader::{LogLine, LogLines};
