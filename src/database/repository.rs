/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use rusqlite::params;

use super::connection::{DatabaseConnection, DatabaseStats};
use super::models::RawLogRecord;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Access the underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Raw Log Operations
    // =========================================================================

    /// Insert one raw log row and return its generated id.
    ///
    /// Each insert commits on its own (autocommit per row); a crash
    /// mid-file loses at most the line in flight.
    pub fn insert_raw_line(
        &self,
        source_file: &str,
        line_number: u64,
        raw_line: &str,
    ) -> Result<i64> {
        self.db.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO raw_logs (source_file, line_number, raw_line, loaded_at)
                VALUES (?1, ?2, ?3, datetime('now'))
                "#,
                params![source_file, line_number as i64, raw_line],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Count the rows loaded for a source file name
    pub fn count_rows_for_file(&self, source_file: &str) -> Result<i64> {
        self.db.execute(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM raw_logs WHERE source_file = ?1",
                [source_file],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    /// Fetch the rows loaded for a source file name, in line order
    pub fn select_rows_for_file(&self, source_file: &str) -> Result<Vec<RawLogRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, source_file, line_number, raw_line, loaded_at
                FROM raw_logs
                WHERE source_file = ?1
                ORDER BY line_number, id
                "#,
            )?;

            let records: Vec<RawLogRecord> = stmt
                .query_map([source_file], |row| {
                    Ok(RawLogRecord {
                        id: row.get(0)?,
                        source_file: row.get(1)?,
                        line_number: row.get(2)?,
                        raw_line: row.get(3)?,
                        loaded_at: row.get(4)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(records)
        })
    }

    /// Report the SQLite library version backing this connection
    pub fn database_version(&self) -> Result<String> {
        self.db.execute(|conn| {
            let version: String =
                conn.query_row("SELECT sqlite_version()", [], |row| row.get(0))?;
            Ok(version)
        })
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DatabaseStats> {
        self.db.stats()
    }
}
