/*!
 * Common test utilities for the soho-etl test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use soho_etl::{Config, Repository};

/// Routes library log output through env_logger for test debugging
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample three-line log file for testing
pub fn create_test_log(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = "10.0.0.1 GET /index\n10.0.0.2 GET /about\n10.0.0.1 POST /login\n";
    create_test_file(dir, filename, content)
}

/// Creates a config pointing at the given directory with the default
/// date-stamped pattern
pub fn create_test_config(log_directory: &Path) -> Config {
    Config {
        log_directory: log_directory.to_path_buf(),
        ..Config::default()
    }
}

/// Creates a repository backed by an in-memory database
pub fn create_in_memory_repository() -> Repository {
    Repository::new_in_memory().expect("Failed to create in-memory repository")
}
