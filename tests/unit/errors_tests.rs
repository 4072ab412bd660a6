/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;

use soho_etl::errors::{ArchiveError, ConfigError, EtlError, VerifyError};

#[test]
fn test_configError_invalidRegex_shouldDisplayPatternAndReason() {
    let error = ConfigError::InvalidRegex {
        pattern: "(".to_string(),
        reason: "unclosed group".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("Invalid match regex"));
    assert!(display.contains("unclosed group"));
}

#[test]
fn test_archiveError_destinationExists_shouldDisplayPath() {
    let error = ArchiveError::DestinationExists(PathBuf::from("/logs/etl_complete/soho.log"));
    let display = format!("{}", error);
    assert!(display.contains("already exists"));
    assert!(display.contains("soho.log"));
}

#[test]
fn test_archiveError_sourceMissing_shouldDisplayPath() {
    let error = ArchiveError::SourceMissing(PathBuf::from("/logs/soho.log"));
    let display = format!("{}", error);
    assert!(display.contains("does not exist"));
}

#[test]
fn test_verifyError_countMismatch_shouldDisplayBothNumbers() {
    let error = VerifyError::CountMismatch {
        file: "soho.log-20240101".to_string(),
        lines_read: 5,
        rows_found: 4,
    };
    let display = format!("{}", error);
    assert!(display.contains("soho.log-20240101"));
    assert!(display.contains('5'));
    assert!(display.contains('4'));
}

#[test]
fn test_verifyError_queryFailed_shouldDisplayReason() {
    let error = VerifyError::QueryFailed {
        file: "soho.log-20240101".to_string(),
        reason: "no such table".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("Row count query"));
    assert!(display.contains("no such table"));
}

#[test]
fn test_etlError_fromIoError_shouldWrapAsFile() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: EtlError = io_error.into();
    assert!(matches!(error, EtlError::File(_)));
}

#[test]
fn test_etlError_fromVerifyError_shouldWrapAsVerify() {
    let error: EtlError = VerifyError::CountMismatch {
        file: "f".to_string(),
        lines_read: 1,
        rows_found: 0,
    }
    .into();
    let display = format!("{}", error);
    assert!(display.contains("Verification error"));
}

#[test]
fn test_etlError_fromArchiveError_shouldWrapAsArchive() {
    let error: EtlError = ArchiveError::SourceMissing(PathBuf::from("/x")).into();
    assert!(matches!(error, EtlError::Archive(_)));
}
