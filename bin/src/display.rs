//! Display utilities and output handling for the tickbar CLI.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tickbar_lib::prelude::*;

/// Resolve the output format: explicit flag, then the output file's
/// extension, then CSV.
pub(crate) fn resolve_format(format: Option<OutputFormat>, output: Option<&Path>) -> OutputFormat {
    format
        .or_else(|| output.and_then(OutputFormat::from_path))
        .unwrap_or_default()
}

/// Open a bar stream on `output`, or stdout when no path is given.
pub(crate) fn open_output(
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<BarWriter<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };
    Ok(BarWriter::new(writer, format)?)
}

/// Closed bars per timeframe.
#[derive(Debug, Default)]
pub(crate) struct BarCounts(BTreeMap<Timeframe, usize>);

impl BarCounts {
    pub(crate) fn record(&mut self, bar: &CollectedBar) {
        *self.0.entry(bar.timeframe).or_default() += 1;
    }

    pub(crate) fn get(&self, timeframe: Timeframe) -> usize {
        self.0.get(&timeframe).copied().unwrap_or_default()
    }
}

/// Print how many bars each timeframe produced.
pub(crate) fn print_summary(
    instrument: &str,
    timeframes: impl Iterator<Item = Timeframe>,
    counts: &BarCounts,
    ticks: usize,
    trades: usize,
) {
    eprintln!("{instrument}: {ticks} ticks, {trades} trades");
    eprintln!("{:<6} {:>8}", "TF", "BARS");
    for timeframe in timeframes {
        eprintln!("{:<6} {:>8}", timeframe.as_str(), counts.get(timeframe));
    }
}
