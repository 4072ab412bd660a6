/*!
 * End-to-end ingestion workflow tests: select, load, verify, archive.
 */

use anyhow::Result;
use std::fs;

use soho_etl::app_controller::{Controller, FileOutcome};
use soho_etl::errors::{ArchiveError, VerifyError};

use crate::common;

/// Test the reference scenario: a three-line file and an empty file are
/// both loaded, verified and archived, in name order.
#[test]
fn test_run_withThreeLineAndEmptyFile_shouldArchiveBoth() -> Result<()> {
    common::init_test_logging();

    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_file(dir, "soho.log-20240101", "alpha\nbeta\ngamma\n")?;
    common::create_test_file(dir, "soho.log-20240102", "")?;
    common::create_test_file(dir, "notes.txt", "not a log\n")?;

    let repository = common::create_in_memory_repository();
    let config = common::create_test_config(dir);
    let controller = Controller::with_config(config, repository.clone())?;

    let summary = controller.run(false)?;

    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.archived_count(), 2);
    assert_eq!(summary.failed_count(), 0);

    // Processed in lexicographic order
    assert_eq!(summary.reports[0].file_name, "soho.log-20240101");
    assert_eq!(summary.reports[0].lines_read, 3);
    assert_eq!(summary.reports[0].rows_inserted, 3);
    assert_eq!(summary.reports[1].file_name, "soho.log-20240102");
    assert_eq!(summary.reports[1].lines_read, 0);

    // Rows carry 1-based line numbers and the verbatim line text
    let rows = repository.select_rows_for_file("soho.log-20240101")?;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].line_number, 1);
    assert_eq!(rows[0].raw_line, "alpha\n");
    assert_eq!(rows[2].line_number, 3);
    assert_eq!(rows[2].raw_line, "gamma\n");

    assert_eq!(repository.count_rows_for_file("soho.log-20240102")?, 0);

    // Both files moved into the completed directory, non-matching file untouched
    assert!(!dir.join("soho.log-20240101").exists());
    assert!(!dir.join("soho.log-20240102").exists());
    assert!(dir.join("etl_complete/soho.log-20240101").exists());
    assert!(dir.join("etl_complete/soho.log-20240102").exists());
    assert!(dir.join("notes.txt").exists());

    Ok(())
}

/// Test that an archived file is byte-identical to its source content
#[test]
fn test_run_shouldArchiveByteIdenticalCopy() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let content = "first\nsecond\nlast without newline";
    common::create_test_file(dir, "soho.log-20240101", content)?;

    let repository = common::create_in_memory_repository();
    let controller = Controller::with_config(common::create_test_config(dir), repository)?;

    let summary = controller.run(false)?;

    assert_eq!(summary.archived_count(), 1);
    assert_eq!(
        fs::read_to_string(dir.join("etl_complete/soho.log-20240101"))?,
        content
    );

    Ok(())
}

/// Test the partial-load scenario: one line's insert fails, the counter
/// still reaches the end of the file, and the verifier reports a mismatch.
#[test]
fn test_run_withFailingInsert_shouldDetectMismatchAndKeepFile() -> Result<()> {
    common::init_test_logging();

    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_file(dir, "soho.log-20240101", "one\ntwo\nthree\nfour\nfive\n")?;

    let repository = common::create_in_memory_repository();

    // Make the insert of line 3 fail at the database level
    repository.connection().execute(|conn| {
        conn.execute_batch(
            r#"
            CREATE TRIGGER reject_line_three
            BEFORE INSERT ON raw_logs
            WHEN NEW.line_number = 3
            BEGIN
                SELECT RAISE(ABORT, 'disk I/O error');
            END;
            "#,
        )?;
        Ok(())
    })?;

    let controller = Controller::with_config(common::create_test_config(dir), repository.clone())?;
    let summary = controller.run(false)?;

    assert_eq!(summary.reports.len(), 1);
    let report = &summary.reports[0];

    assert_eq!(report.lines_read, 5);
    assert_eq!(report.rows_inserted, 4);
    assert_eq!(report.insert_failures, 1);
    assert!(matches!(
        report.outcome,
        FileOutcome::Unverified(VerifyError::CountMismatch {
            lines_read: 5,
            rows_found: 4,
            ..
        })
    ));

    // Partial rows stay in the table, the file stays in the source directory
    assert_eq!(repository.count_rows_for_file("soho.log-20240101")?, 4);
    assert!(dir.join("soho.log-20240101").exists());
    assert!(!dir.join("etl_complete/soho.log-20240101").exists());

    Ok(())
}

/// Test the occupied-destination scenario: the load verifies but the
/// archive step fails and both files are left unchanged.
#[test]
fn test_run_withOccupiedDestination_shouldFailArchiveAndKeepSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_log(dir, "soho.log-20240101")?;

    // A previous completed file of the same name is already in place
    let completed = dir.join("etl_complete");
    fs::create_dir(&completed)?;
    common::create_test_file(&completed, "soho.log-20240101", "earlier content\n")?;

    let repository = common::create_in_memory_repository();
    let controller = Controller::with_config(common::create_test_config(dir), repository.clone())?;

    let summary = controller.run(false)?;

    let report = &summary.reports[0];
    assert!(matches!(
        report.outcome,
        FileOutcome::ArchiveFailed(ArchiveError::DestinationExists(_))
    ));

    // Rows were loaded and verified; only the relocation failed
    assert_eq!(repository.count_rows_for_file("soho.log-20240101")?, 3);
    assert!(dir.join("soho.log-20240101").exists());
    assert_eq!(
        fs::read_to_string(completed.join("soho.log-20240101"))?,
        "earlier content\n"
    );

    Ok(())
}

/// Test that --force-overwrite lets the archive replace an occupied destination
#[test]
fn test_run_withForceOverwrite_shouldReplaceDestination() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_file(dir, "soho.log-20240101", "fresh content\n")?;

    let completed = dir.join("etl_complete");
    fs::create_dir(&completed)?;
    common::create_test_file(&completed, "soho.log-20240101", "earlier content\n")?;

    let repository = common::create_in_memory_repository();
    let controller = Controller::with_config(common::create_test_config(dir), repository)?;

    let summary = controller.run(true)?;

    assert_eq!(summary.archived_count(), 1);
    assert!(!dir.join("soho.log-20240101").exists());
    assert_eq!(
        fs::read_to_string(completed.join("soho.log-20240101"))?,
        "fresh content\n"
    );

    Ok(())
}

/// Test that a directory with no matching files ends the run gracefully
#[test]
fn test_run_withNoMatchingFiles_shouldProcessNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_file(dir, "unrelated.txt", "skip\n")?;

    let repository = common::create_in_memory_repository();
    let controller = Controller::with_config(common::create_test_config(dir), repository)?;

    let summary = controller.run(false)?;

    assert!(summary.reports.is_empty());

    Ok(())
}

/// Test that re-ingesting a same-named file duplicates rows and the
/// verifier flags the resulting mismatch (no dedup, no delete).
#[test]
fn test_run_withReingestedFile_shouldReportMismatchFromDuplicates() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let repository = common::create_in_memory_repository();
    let config = common::create_test_config(dir);

    common::create_test_log(dir, "soho.log-20240101")?;
    let controller = Controller::with_config(config.clone(), repository.clone())?;
    let first = controller.run(false)?;
    assert_eq!(first.archived_count(), 1);

    // The same file name shows up again; rows from the first pass remain
    common::create_test_log(dir, "soho.log-20240101")?;
    let second = controller.run(false)?;

    let report = &second.reports[0];
    assert_eq!(report.lines_read, 3);
    assert!(matches!(
        report.outcome,
        FileOutcome::Unverified(VerifyError::CountMismatch {
            lines_read: 3,
            rows_found: 6,
            ..
        })
    ));
    assert_eq!(repository.count_rows_for_file("soho.log-20240101")?, 6);

    Ok(())
}

/// Test that one failing file does not stop later files from processing
#[test]
fn test_run_withOneBadFile_shouldContinueToNextFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    common::create_test_file(dir, "soho.log-20240101", "a\nb\n")?;
    common::create_test_file(dir, "soho.log-20240102", "c\n")?;

    let repository = common::create_in_memory_repository();

    // Every insert for the first file fails; the second file is untouched
    repository.connection().execute(|conn| {
        conn.execute_batch(
            r#"
            CREATE TRIGGER reject_first_file
            BEFORE INSERT ON raw_logs
            WHEN NEW.source_file = 'soho.log-20240101'
            BEGIN
                SELECT RAISE(ABORT, 'constraint violation');
            END;
            "#,
        )?;
        Ok(())
    })?;

    let controller = Controller::with_config(common::create_test_config(dir), repository.clone())?;
    let summary = controller.run(false)?;

    assert_eq!(summary.reports.len(), 2);
    assert!(!summary.reports[0].outcome.is_success());
    assert!(summary.reports[1].outcome.is_success());

    assert!(dir.join("soho.log-20240101").exists());
    assert!(dir.join("etl_complete/soho.log-20240102").exists());
    assert_eq!(repository.count_rows_for_file("soho.log-20240102")?, 1);

    Ok(())
}
