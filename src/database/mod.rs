/*!
 * Database module for persistent storage of raw log rows.
 *
 * This module provides SQLite-based persistence for:
 * - The append-only raw-log table, one row per ingested line
 * - Per-file row counts used by load verification
 */

// Allow dead code and unused imports - database types are for library consumers
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::Repository;
