//! Replay command implementation.
//!
//! Feeds a recorded tick stream through a [`BarAggregator`] and writes each
//! bar in the requested format as soon as it closes.

use crate::display::{BarCounts, open_output, print_summary, resolve_format};
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use tickbar_lib::prelude::*;

/// Arguments for `tickbar replay`.
#[derive(Args)]
pub(crate) struct ReplayArgs {
    /// Tick file with `timestamp,price,volume[,trading_day]` lines (stdin if omitted or `-`)
    input: Option<PathBuf>,

    /// Instrument identifier, used in table names
    #[arg(short, long)]
    instrument: Option<String>,

    /// Comma-separated timeframes (e.g. m1,m5,h1,d1)
    #[arg(short, long, value_delimiter = ',')]
    timeframes: Vec<Timeframe>,

    /// Bucket alignment: continuous or segmented
    #[arg(short, long)]
    session: Option<SessionMode>,

    /// Trading day (YYYYMMDD) for ticks without a trading-day column
    #[arg(short = 'd', long)]
    trading_day: Option<TradingDay>,

    /// JSON collector configuration; explicit flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persist closed bars to the CSV store
    #[arg(long)]
    persist: bool,

    /// Store root directory. Defaults to the platform data directory.
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Output file path. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: csv, json or ndjson. Defaults to the output file's
    /// extension, then csv.
    #[arg(short, long)]
    format: Option<OutputFormat>,
}

impl ReplayArgs {
    /// Merge the flags over the configuration file, if any.
    fn collector_config(&self) -> Result<CollectorConfig> {
        let mut config = match &self.config {
            Some(path) => CollectorConfig::from_path(path)?,
            None => CollectorConfig::default(),
        };

        if let Some(instrument) = &self.instrument {
            config.instrument.clone_from(instrument);
        }
        if !self.timeframes.is_empty() {
            config.timeframes.clone_from(&self.timeframes);
        }
        if let Some(session) = self.session {
            config.session = session;
        }
        if let Some(day) = self.trading_day {
            config.trading_day = Some(day);
        }
        config.persist |= self.persist;

        config.validate()?;
        Ok(config)
    }
}

/// Replay a tick file into bars.
pub(crate) fn replay(args: ReplayArgs, quiet: bool) -> Result<()> {
    let config = args.collector_config()?;
    let mut aggregator = BarAggregator::from_config(&config)?;

    let (tx, rx) = mpsc::channel();
    aggregator.subscribe(ChannelListener::new(tx));

    let store_root = if config.persist {
        let store = args
            .store_dir
            .clone()
            .map_or_else(CsvStore::with_default_path, CsvStore::new);
        let root = store.root().to_path_buf();
        aggregator
            .attach_store(Box::new(store))
            .then_some(root)
    } else {
        None
    };

    let format = resolve_format(args.format, args.output.as_deref());
    let mut output = open_output(args.output.as_deref(), format)?;
    let mut counts = BarCounts::default();
    let input = open_input(args.input.as_deref())?;
    let mut current_day = config.trading_day;
    let mut ticks = 0;
    let mut trades = 0;

    for record in TickReader::new(input) {
        let record = record.with_context(|| format!("Failed to read {}", input_name(&args)))?;

        if let Some(day) = record.trading_day
            && current_day != Some(day)
        {
            aggregator.flush(true);
            aggregator.set_trading_date(day);
            current_day = Some(day);
        }

        ticks += 1;
        if aggregator.on_tick(record.tick) {
            trades += 1;
        }
        drain(&rx, &mut output, &mut counts)?;
    }
    aggregator.flush(true);
    drain(&rx, &mut output, &mut counts)?;
    output.finish()?;

    if !quiet {
        print_summary(aggregator.instrument(), aggregator.timeframes(), &counts, ticks, trades);
        if let Some(root) = store_root {
            eprintln!("Bars saved to: {}", root.display());
        }
        if let Some(output) = &args.output {
            eprintln!("Output written to: {}", output.display());
        }
    }

    Ok(())
}

/// Write the bars closed since the last call.
fn drain(
    rx: &Receiver<CollectedBar>,
    output: &mut BarWriter<Box<dyn Write>>,
    counts: &mut BarCounts,
) -> Result<()> {
    for bar in rx.try_iter() {
        counts.record(&bar);
        output.write(&bar)?;
    }
    Ok(())
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn input_name(args: &ReplayArgs) -> String {
    args.input
        .as_ref()
        .map_or_else(|| "stdin".to_string(), |path| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ReplayArgs,
    }

    fn parse(argv: &[&str]) -> ReplayArgs {
        TestCli::parse_from(std::iter::once("replay").chain(argv.iter().copied())).args
    }

    #[test]
    fn test_flags_override_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("collector.json");
        fs::write(
            &path,
            r#"{"instrument":"rb2405","timeframes":["m1","h1"],"session":"segmented"}"#,
        )
        .unwrap();

        let args = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--timeframes",
            "m5,d1",
            "--trading-day",
            "20240115",
        ]);
        let config = args.collector_config().unwrap();

        assert_eq!(config.instrument, "rb2405");
        assert_eq!(config.timeframes, vec![Timeframe::Minute5, Timeframe::Day1]);
        assert_eq!(config.session, SessionMode::Segmented);
        assert_eq!(config.trading_day.unwrap().to_string(), "20240115");
        assert!(!config.persist);
    }

    #[test]
    fn test_instrument_required() {
        assert!(parse(&[]).collector_config().is_err());
        assert!(parse(&["-i", "rb2405"]).collector_config().is_ok());
    }

    #[test]
    fn test_replay_with_day_switch() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("ticks.csv");
        let output = dir.path().join("bars.csv");
        let store = dir.path().join("store");
        fs::write(
            &input,
            "timestamp,price,volume,trading_day\n\
             1705311000,10.0,5,20240115\n\
             1705311030,11.0,8,20240115\n\
             1705397400,20.0,3,20240116\n",
        )
        .unwrap();

        let args = parse(&[
            input.to_str().unwrap(),
            "-i",
            "rb2405",
            "-t",
            "m1,d1",
            "--persist",
            "--store-dir",
            store.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        replay(args, true).unwrap();

        let lines: Vec<String> = fs::read_to_string(&output)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        // header + two days of d1 and m1 bars
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "rb2405,d1,2024-01-15T00:00:00Z,10,11,10,11,2,8");
        assert_eq!(lines[2], "rb2405,m1,2024-01-15T09:30:00Z,10,11,10,11,2,8");

        let saved = CsvStore::new(&store).load_bars("market.rb2405_d1").unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1], Bar::new(1_705_363_200, 20.0, 20.0, 20.0, 20.0, 1, 3));
    }

    #[test]
    fn test_format_follows_output_extension() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("ticks.csv");
        let output = dir.path().join("bars.ndjson");
        let ticks: String = (0..5)
            .map(|i| format!("{},10.0,{}\n", 1_705_311_000 + i * 60, i + 1))
            .collect();
        fs::write(&input, ticks).unwrap();

        let args = parse(&[
            input.to_str().unwrap(),
            "-i",
            "rb2405",
            "-d",
            "20240115",
            "-o",
            output.to_str().unwrap(),
        ]);
        replay(args, true).unwrap();

        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.starts_with('{') && line.contains("\"m1\"")));
    }
}
