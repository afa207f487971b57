//! Output format abstraction.

use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tickbar_aggregate::CollectedBar;

use crate::{CsvFormatter, JsonFormatter};

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV with a header row.
    #[default]
    Csv,
    /// JSON array.
    Json,
    /// Newline-delimited JSON.
    Ndjson,
}

impl OutputFormat {
    /// Guesses the format from a file extension (`.csv`, `.json`,
    /// `.ndjson`, `.jsonl`).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    /// Returns the formatter writing this format.
    #[must_use]
    pub fn formatter(self) -> Box<dyn Formatter> {
        match self {
            Self::Csv => Box::new(CsvFormatter::new()),
            Self::Json => Box::new(JsonFormatter::new()),
            Self::Ndjson => Box::new(JsonFormatter::ndjson()),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0} (expected csv, json or ndjson)")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes collected bars one at a time.
///
/// A stream is `begin`, then `write_bar` for each bar with its 0-based index,
/// then `finish` with the number of bars written.
pub trait Formatter: std::fmt::Debug + Send + Sync {
    /// Writes whatever precedes the first bar.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn begin(&self, _writer: &mut dyn Write) -> Result<(), FormatError> {
        Ok(())
    }

    /// Writes one bar.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_bar(
        &self,
        index: usize,
        bar: &CollectedBar,
        writer: &mut dyn Write,
    ) -> Result<(), FormatError>;

    /// Writes whatever follows the last bar.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn finish(&self, _count: usize, _writer: &mut dyn Write) -> Result<(), FormatError> {
        Ok(())
    }

    /// Writes a complete stream of `bars`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_bars(&self, bars: &[CollectedBar], writer: &mut dyn Write) -> Result<(), FormatError> {
        self.begin(writer)?;
        for (index, bar) in bars.iter().enumerate() {
            self.write_bar(index, bar, writer)?;
        }
        self.finish(bars.len(), writer)
    }
}
