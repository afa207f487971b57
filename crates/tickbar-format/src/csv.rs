//! CSV output format.

use chrono::DateTime;
use std::io::Write;
use tickbar_aggregate::{BAR_COLUMNS, CollectedBar};
use tickbar_types::Bar;

use crate::{FormatError, Formatter};

/// CSV formatter.
///
/// Used both for CLI output (`instrument,timeframe,` prefix, ISO timestamps)
/// and for the rows of stored bar tables (bare [`BAR_COLUMNS`], epoch
/// seconds).
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
    /// Whether timestamps are written as ISO-8601 instead of epoch seconds.
    iso_timestamps: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a comma-separated formatter with a header and ISO-8601
    /// timestamps.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
            iso_timestamps: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Sets whether timestamps are ISO-8601 (`true`) or epoch seconds.
    #[must_use]
    pub const fn with_iso_timestamps(mut self, iso: bool) -> Self {
        self.iso_timestamps = iso;
        self
    }

    /// Returns the field delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Writes bare bar rows laid out as [`BAR_COLUMNS`].
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_bar_rows<W: Write>(&self, bars: &[Bar], mut writer: W) -> Result<(), FormatError> {
        if self.include_header {
            writeln!(writer, "{}", BAR_COLUMNS.join(&self.delimiter.to_string()))?;
        }

        for bar in bars {
            self.write_bar_row(bar, &mut writer)?;
        }

        Ok(())
    }

    fn write_bar_row<W: Write>(&self, bar: &Bar, mut writer: W) -> Result<(), FormatError> {
        let d = self.delimiter;
        writeln!(
            writer,
            "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}",
            self.timestamp(bar.bucket_start),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.tick_volume,
            bar.volume
        )?;
        Ok(())
    }

    fn timestamp(&self, seconds: i64) -> String {
        match DateTime::from_timestamp(seconds, 0) {
            Some(dt) if self.iso_timestamps => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            _ => seconds.to_string(),
        }
    }
}

impl Formatter for CsvFormatter {
    fn begin(&self, writer: &mut dyn Write) -> Result<(), FormatError> {
        if self.include_header {
            let d = self.delimiter;
            writeln!(
                writer,
                "instrument{d}timeframe{d}{}",
                BAR_COLUMNS.join(&d.to_string())
            )?;
        }
        Ok(())
    }

    fn write_bar(
        &self,
        _index: usize,
        collected: &CollectedBar,
        writer: &mut dyn Write,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;
        write!(writer, "{}{d}{}{d}", collected.instrument, collected.timeframe)?;
        self.write_bar_row(&collected.bar, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickbar_types::Timeframe;

    fn create_test_bar() -> CollectedBar {
        CollectedBar {
            instrument: "rb2405".to_string(),
            timeframe: Timeframe::Minute1,
            bar: Bar::new(1_705_311_000, 3800.0, 3805.0, 3798.0, 3802.0, 12, 340),
        }
    }

    #[test]
    fn test_csv_bars() {
        let formatter = CsvFormatter::new();
        let mut output = Vec::new();

        formatter.write_bars(&[create_test_bar()], &mut output).unwrap();

        let result = String::from_utf8(output).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(
            lines[0],
            "instrument,timeframe,bucket_start,open,high,low,close,tick_volume,volume"
        );
        assert_eq!(
            lines[1],
            "rb2405,m1,2024-01-15T09:30:00Z,3800,3805,3798,3802,12,340"
        );
    }

    #[test]
    fn test_empty_stream_still_has_header() {
        let mut output = Vec::new();
        CsvFormatter::new().write_bars(&[], &mut output).unwrap();
        assert_eq!(output.iter().filter(|&&b| b == b'\n').count(), 1);
    }

    #[test]
    fn test_bar_rows_epoch() {
        let formatter = CsvFormatter::new()
            .with_header(false)
            .with_iso_timestamps(false);
        let mut output = Vec::new();

        formatter
            .write_bar_rows(&[create_test_bar().bar], &mut output)
            .unwrap();

        let result = String::from_utf8(output).unwrap();
        assert_eq!(result, "1705311000,3800,3805,3798,3802,12,340\n");
    }

    #[test]
    fn test_custom_delimiter() {
        let formatter = CsvFormatter::new().with_delimiter(';');
        let mut output = Vec::new();

        formatter.write_bars(&[create_test_bar()], &mut output).unwrap();

        let result = String::from_utf8(output).unwrap();
        assert!(result.starts_with("instrument;timeframe;bucket_start"));
        assert!(result.contains("rb2405;m1;2024-01-15T09:30:00Z;3800"));
    }
}
