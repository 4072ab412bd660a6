/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};

/// One persisted raw log row, exactly one line of an ingested file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLogRecord {
    /// Auto-generated identity
    pub id: i64,
    /// Filename the line came from (not the full path)
    pub source_file: String,
    /// 1-based position of the line within its file
    pub line_number: i64,
    /// Full line text including any trailing newline
    pub raw_line: String,
    /// When the row was loaded
    pub loaded_at: String,
}
