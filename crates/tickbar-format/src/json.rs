//! JSON output format.

use std::io::Write;
use tickbar_aggregate::CollectedBar;

use crate::{FormatError, Formatter};

/// JSON formatter.
///
/// Either a JSON array with one bar object per line, or NDJSON. Both can be
/// written incrementally.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    ndjson: bool,
}

impl JsonFormatter {
    /// Creates a JSON array formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self { ndjson: false }
    }

    /// Creates an NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self { ndjson: true }
    }
}

impl Formatter for JsonFormatter {
    fn begin(&self, writer: &mut dyn Write) -> Result<(), FormatError> {
        if !self.ndjson {
            write!(writer, "[")?;
        }
        Ok(())
    }

    fn write_bar(
        &self,
        index: usize,
        bar: &CollectedBar,
        writer: &mut dyn Write,
    ) -> Result<(), FormatError> {
        if !self.ndjson {
            write!(writer, "{}", if index == 0 { "\n  " } else { ",\n  " })?;
        }
        serde_json::to_writer(&mut *writer, bar)?;
        if self.ndjson {
            writeln!(writer)?;
        }
        Ok(())
    }

    fn finish(&self, count: usize, writer: &mut dyn Write) -> Result<(), FormatError> {
        match (self.ndjson, count) {
            (true, _) => {}
            (false, 0) => writeln!(writer, "]")?,
            (false, _) => writeln!(writer, "\n]")?,
        }
        Ok(())
    }
}
