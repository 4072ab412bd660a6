use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};

use crate::app_config::Config;
use crate::database::Repository;
use crate::errors::{ArchiveError, ConfigError, VerifyError};
use crate::file_utils::FileManager;
use crate::log_reader::LogLines;

// @module: Application controller for log file ingestion

/// Terminal state of one file's pass through the pipeline.
///
/// A file moves Selected -> Loading -> Verifying -> Archiving -> Done;
/// any failure records the reason here and the run advances to the next
/// file without retrying.
#[derive(Debug)]
pub enum FileOutcome {
    /// Loaded, verified and moved to the completed directory
    Archived,
    /// The file could not be opened or read to completion
    ReadFailed(String),
    /// Verification failed; the file stays in the source directory
    Unverified(VerifyError),
    /// Verified, but the move to the completed directory failed
    ArchiveFailed(ArchiveError),
}

impl FileOutcome {
    /// Whether the file reached the completed directory
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Archived)
    }
}

/// Per-file result of an ingestion run
#[derive(Debug)]
pub struct FileReport {
    /// Bare filename of the processed file
    pub file_name: String,
    /// Lines read from the file, including lines whose insert failed
    pub lines_read: u64,
    /// Rows successfully inserted for this pass
    pub rows_inserted: u64,
    /// Per-line insert failures, logged and skipped
    pub insert_failures: u64,
    /// How the file ended up
    pub outcome: FileOutcome,
}

/// Result of a whole ingestion run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One report per selected file, in processing order
    pub reports: Vec<FileReport>,
}

impl RunSummary {
    /// Number of files that were archived
    pub fn archived_count(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_success()).count()
    }

    /// Number of files that failed somewhere in the pipeline
    pub fn failed_count(&self) -> usize {
        self.reports.len() - self.archived_count()
    }
}

/// Main application controller for log ingestion
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared persistence handle for the whole run
    repository: Repository,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config, repository: Repository) -> Result<Self> {
        Ok(Self { config, repository })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.match_regex.is_empty()
            && !self.config.log_directory.as_os_str().is_empty()
    }

    /// Run the ingestion workflow over every matching file in the log directory.
    ///
    /// Files are processed strictly one at a time, in name order. A failed
    /// file is reported and left in place; the run continues with the next
    /// file over the same shared connection.
    pub fn run(&self, force_overwrite: bool) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        let pattern = self.config.compiled_regex()?;

        if !FileManager::dir_exists(&self.config.log_directory) {
            return Err(ConfigError::MissingLogDirectory(self.config.log_directory.clone()).into());
        }

        let files = FileManager::select_files(&self.config.log_directory, &pattern)?;

        if files.is_empty() {
            info!("No log files match the configured pattern");
            return Ok(RunSummary::default());
        }

        info!("Selected {} log file(s) for ingestion", files.len());

        // The completed directory must exist before the first archive
        FileManager::ensure_dir(self.config.completed_directory())?;

        let progress_bar = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("#>-"));

        let mut summary = RunSummary::default();

        for file_name in files {
            progress_bar.set_message(file_name.clone());

            info!("Processing {:?}", self.config.log_directory.join(&file_name));
            let report = self.process_file(&file_name, force_overwrite);

            match &report.outcome {
                FileOutcome::Archived => {
                    info!(
                        "Completed '{}': {} line(s) loaded and archived",
                        report.file_name, report.rows_inserted
                    );
                }
                FileOutcome::ReadFailed(reason) => {
                    error!("Failed to read '{}': {}", report.file_name, reason);
                }
                FileOutcome::Unverified(reason) => {
                    error!("Load not verified, leaving '{}' in place: {}", report.file_name, reason);
                }
                FileOutcome::ArchiveFailed(reason) => {
                    error!("Failed to archive '{}': {}", report.file_name, reason);
                }
            }

            summary.reports.push(report);
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        info!(
            "Run finished in {:.2}s: {} archived, {} failed",
            start_time.elapsed().as_secs_f64(),
            summary.archived_count(),
            summary.failed_count()
        );

        Ok(summary)
    }

    /// Load, verify and archive a single file.
    ///
    /// Never returns an error; every failure is captured in the report so
    /// the run can advance to the next file.
    fn process_file(&self, file_name: &str, force_overwrite: bool) -> FileReport {
        let source_path = self.config.log_directory.join(file_name);

        let mut lines_read: u64 = 0;
        let mut rows_inserted: u64 = 0;
        let mut insert_failures: u64 = 0;

        let report = |lines_read, rows_inserted, insert_failures, outcome| FileReport {
            file_name: file_name.to_string(),
            lines_read,
            rows_inserted,
            insert_failures,
            outcome,
        };

        // Loading
        let lines = match LogLines::open(&source_path) {
            Ok(lines) => lines,
            Err(e) => {
                return report(0, 0, 0, FileOutcome::ReadFailed(e.to_string()));
            }
        };

        for item in lines {
            let line = match item {
                Ok(line) => line,
                Err(e) => {
                    return report(
                        lines_read,
                        rows_inserted,
                        insert_failures,
                        FileOutcome::ReadFailed(format!(
                            "read error after line {}: {}",
                            lines_read, e
                        )),
                    );
                }
            };

            // The counter advances even when the insert fails; verification
            // compares against lines read, which is what surfaces a partial
            // load as a count mismatch.
            lines_read = line.number;

            match self
                .repository
                .insert_raw_line(file_name, line.number, &line.text)
            {
                Ok(row_id) => {
                    rows_inserted += 1;
                    debug!("Loaded line {} of '{}' as row {}", line.number, file_name, row_id);
                }
                Err(e) => {
                    insert_failures += 1;
                    error!(
                        "Record insertion failed on line {} of '{}': {}",
                        line.number, file_name, e
                    );
                    debug!(
                        "Offending row: ({:?}, {}, {:?})",
                        file_name, line.number, line.text
                    );
                }
            }
        }

        // Verifying
        let rows_found = match self.repository.count_rows_for_file(file_name) {
            Ok(count) => count,
            Err(e) => {
                return report(
                    lines_read,
                    rows_inserted,
                    insert_failures,
                    FileOutcome::Unverified(VerifyError::QueryFailed {
                        file: file_name.to_string(),
                        reason: e.to_string(),
                    }),
                );
            }
        };

        if rows_found != lines_read as i64 {
            return report(
                lines_read,
                rows_inserted,
                insert_failures,
                FileOutcome::Unverified(VerifyError::CountMismatch {
                    file: file_name.to_string(),
                    lines_read,
                    rows_found,
                }),
            );
        }

        debug!(
            "Verified '{}': {} line(s) read, {} row(s) found",
            file_name, lines_read, rows_found
        );

        // Archiving
        let destination =
            FileManager::archive_destination(self.config.completed_directory(), file_name);

        let outcome = match FileManager::move_file(&source_path, &destination, force_overwrite) {
            Ok(()) => FileOutcome::Archived,
            Err(e) => FileOutcome::ArchiveFailed(e),
        };

        report(lines_read, rows_inserted, insert_failures, outcome)
    }
}
