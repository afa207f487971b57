//! Incremental bar output.

use std::io::Write;
use tickbar_aggregate::CollectedBar;

use crate::{FormatError, Formatter, OutputFormat};

/// Writes bars to `W` as they close instead of buffering a whole run.
#[derive(Debug)]
pub struct BarWriter<W> {
    writer: W,
    formatter: Box<dyn Formatter>,
    written: usize,
}

impl<W: Write> BarWriter<W> {
    /// Starts a stream in `format`, writing any header right away.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the header fails.
    pub fn new(writer: W, format: OutputFormat) -> Result<Self, FormatError> {
        Self::with_formatter(writer, format.formatter())
    }

    /// Starts a stream with a custom formatter.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the header fails.
    pub fn with_formatter(mut writer: W, formatter: Box<dyn Formatter>) -> Result<Self, FormatError> {
        formatter.begin(&mut writer)?;
        Ok(Self {
            writer,
            formatter,
            written: 0,
        })
    }

    /// Writes one bar.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write(&mut self, bar: &CollectedBar) -> Result<(), FormatError> {
        self.formatter.write_bar(self.written, bar, &mut self.writer)?;
        self.written += 1;
        Ok(())
    }

    /// Returns the number of bars written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Closes the stream and flushes, returning the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing fails.
    pub fn finish(mut self) -> Result<W, FormatError> {
        self.formatter.finish(self.written, &mut self.writer)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}
