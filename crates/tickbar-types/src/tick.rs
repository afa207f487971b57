//! Trade tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single market data update for one instrument.
///
/// `volume` is the cumulative traded volume for the trading day as reported
/// by the feed, not a per-tick delta. A tick whose cumulative volume equals
/// the previous one is a quote refresh rather than a trade print.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Timestamp in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Last traded price.
    pub price: f64,
    /// Cumulative traded volume for the trading day.
    pub volume: i64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(timestamp: i64, price: f64, volume: i64) -> Self {
        Self {
            timestamp,
            price,
            volume,
        }
    }

    /// Returns the tick time as a UTC datetime, if representable.
    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}
