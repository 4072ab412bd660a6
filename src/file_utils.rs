use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::ArchiveError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Select the log files in a directory whose names match the pattern.
    ///
    /// Lists a single directory level (no recursion), keeps regular files
    /// only, and returns bare filenames sorted ascending. The pattern is
    /// expected to be anchored at the start of the name already (see
    /// `app_config::compile_match_regex`).
    pub fn select_files<P: AsRef<Path>>(dir: P, pattern: &Regex) -> Result<Vec<String>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
            let entry = entry.context("Failed to read directory entry")?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if pattern.is_match(&name) {
                result.push(name.into_owned());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Copy a file from one location to another.
    ///
    /// Fails if the source is missing or if the destination is already
    /// occupied and `overwrite` is false. The destination's parent
    /// directory is created if needed.
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        from: P1,
        to: P2,
        overwrite: bool,
    ) -> Result<(), ArchiveError> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !Self::file_exists(from) {
            return Err(ArchiveError::SourceMissing(from.to_path_buf()));
        }

        if Self::file_exists(to) && !overwrite {
            return Err(ArchiveError::DestinationExists(to.to_path_buf()));
        }

        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent).map_err(|e| ArchiveError::CopyFailed {
                dest: to.to_path_buf(),
                source: std::io::Error::other(e.to_string()),
            })?;
        }

        fs::copy(from, to).map_err(|e| ArchiveError::CopyFailed {
            dest: to.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Delete a file
    pub fn delete_file<P: AsRef<Path>>(path: P) -> Result<(), ArchiveError> {
        let path = path.as_ref();

        if !Self::file_exists(path) {
            return Err(ArchiveError::SourceMissing(path.to_path_buf()));
        }

        fs::remove_file(path).map_err(|e| ArchiveError::DeleteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Move a file by copying it and then deleting the original.
    ///
    /// The original is never deleted before the copy has succeeded. A
    /// failed delete after a successful copy leaves both copies on disk;
    /// the returned error reports which path could not be removed.
    pub fn move_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        from: P1,
        to: P2,
        overwrite: bool,
    ) -> Result<(), ArchiveError> {
        Self::copy_file(from.as_ref(), to.as_ref(), overwrite)?;
        Self::delete_file(from.as_ref())
    }

    /// Build the destination path for an archived file
    pub fn archive_destination<P: AsRef<Path>>(completed_dir: P, file_name: &str) -> PathBuf {
        completed_dir.as_ref().join(file_name)
    }
}
