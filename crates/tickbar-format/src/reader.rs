//! Line-oriented tick input.
//!
//! Each line carries `timestamp,price,volume[,trading_day]`, where the
//! timestamp is epoch seconds or RFC 3339, volume is the cumulative traded
//! volume for the day and the optional trading day is `YYYYMMDD` or
//! `YYYY-MM-DD`. Blank lines, `#` comments and a `timestamp,...` header are
//! skipped. Fields may be separated by commas or tabs.

use chrono::DateTime;
use std::io::BufRead;
use thiserror::Error;
use tickbar_types::{Bar, Tick, TradingDay};

/// Errors raised while reading ticks.
#[derive(Error, Debug)]
pub enum TickParseError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed.
    #[error("line {line}: {message}")]
    Invalid {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },
}

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRecord {
    /// The tick.
    pub tick: Tick,
    /// Trading day the tick belongs to, if the input carries one.
    pub trading_day: Option<TradingDay>,
}

/// Parses one input line.
///
/// Returns `Ok(None)` for lines that carry no tick (blank, comment, header).
///
/// # Errors
///
/// Returns a message describing the first bad field.
pub fn parse_tick_line(line: &str) -> Result<Option<TickRecord>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split([',', '\t']).map(str::trim).collect();
    if fields[0].eq_ignore_ascii_case("timestamp") {
        return Ok(None);
    }
    if !(3..=4).contains(&fields.len()) {
        return Err(format!(
            "expected timestamp,price,volume[,trading_day], got {} fields",
            fields.len()
        ));
    }

    let timestamp = parse_timestamp(fields[0])?;
    let price: f64 = fields[1]
        .parse()
        .map_err(|_| format!("invalid price '{}'", fields[1]))?;
    let volume: i64 = fields[2]
        .parse()
        .map_err(|_| format!("invalid volume '{}'", fields[2]))?;
    let trading_day = match fields.get(3) {
        Some(day) if !day.is_empty() => Some(day.parse::<TradingDay>().map_err(|e| e.to_string())?),
        _ => None,
    };

    Ok(Some(TickRecord {
        tick: Tick::new(timestamp, price, volume),
        trading_day,
    }))
}

fn parse_timestamp(field: &str) -> Result<i64, String> {
    field
        .parse::<i64>()
        .or_else(|_| DateTime::parse_from_rfc3339(field).map(|dt| dt.timestamp()))
        .map_err(|_| format!("invalid timestamp '{field}'"))
}

/// Parses a stored bar row laid out as `BAR_COLUMNS`.
///
/// # Errors
///
/// Returns a message describing the first bad field.
pub fn parse_bar_row(line: &str, delimiter: char) -> Result<Bar, String> {
    let fields: Vec<&str> = line.trim().split(delimiter).collect();
    let [start, open, high, low, close, tick_volume, volume] = fields.as_slice() else {
        return Err(format!("expected 7 fields, got {}", fields.len()));
    };

    fn field<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
        value.parse().map_err(|_| format!("invalid {name} '{value}'"))
    }

    Ok(Bar::new(
        parse_timestamp(start)?,
        field("open", open)?,
        field("high", high)?,
        field("low", low)?,
        field("close", close)?,
        field("tick_volume", tick_volume)?,
        field("volume", volume)?,
    ))
}

/// Iterator over the ticks of a line-oriented input.
#[derive(Debug)]
pub struct TickReader<R> {
    lines: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> TickReader<R> {
    /// Creates a reader over `input`.
    pub fn new(input: R) -> Self {
        Self {
            lines: input.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for TickReader<R> {
    type Item = Result<TickRecord, TickParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;

            match parse_tick_line(&line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(message) => {
                    return Some(Err(TickParseError::Invalid {
                        line: self.line,
                        message,
                    }));
                }
            }
        }
    }
}
