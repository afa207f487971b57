//! Error types shared across tickbar crates.

use std::path::PathBuf;
use thiserror::Error;

/// Error for unparseable trading day strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradingDayError {
    /// Not a `YYYYMMDD` or `YYYY-MM-DD` calendar date.
    #[error("Invalid trading day '{0}', expected YYYYMMDD or YYYY-MM-DD")]
    Invalid(String),
}

/// Errors raised by bar persistence backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create a database directory.
    #[error("Failed to create database '{path}': {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a table.
    #[error("Failed to read table '{path}': {source}")]
    ReadTable {
        /// The table file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a table.
    #[error("Failed to write table '{path}': {source}")]
    WriteTable {
        /// The table file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The database has not been created.
    #[error("Unknown database: {0}")]
    UnknownDatabase(String),

    /// The table has not been created.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// A table or database name is not usable.
    #[error("Invalid table name: {0}")]
    InvalidName(String),

    /// An existing table was created with different columns.
    #[error("Table '{table}' has columns [{found}], expected [{expected}]")]
    SchemaMismatch {
        /// The offending table.
        table: String,
        /// Columns the caller asked for.
        expected: String,
        /// Columns found in the table.
        found: String,
    },

    /// A stored row could not be decoded.
    #[error("Corrupt row {line} in table '{table}': {message}")]
    CorruptRow {
        /// The table containing the row.
        table: String,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the row.
        message: String,
    },
}
