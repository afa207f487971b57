//! OHLCV bar data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar for one bucket of one timeframe.
///
/// A bar only exists once a trade has landed in its bucket; "no trading in
/// this bucket" is represented by the absence of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Left edge of the bucket, in seconds since the Unix epoch.
    pub bucket_start: i64,
    /// First traded price in the bucket.
    pub open: f64,
    /// Highest traded price in the bucket.
    pub high: f64,
    /// Lowest traded price in the bucket.
    pub low: f64,
    /// Last traded price in the bucket.
    pub close: f64,
    /// Number of trade ticks accumulated.
    pub tick_volume: u64,
    /// Sum of cumulative-volume deltas accumulated.
    pub volume: i64,
}

impl Bar {
    /// Creates a bar from its raw fields.
    #[must_use]
    pub const fn new(
        bucket_start: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        tick_volume: u64,
        volume: i64,
    ) -> Self {
        Self {
            bucket_start,
            open,
            high,
            low,
            close,
            tick_volume,
            volume,
        }
    }

    /// Opens a bar at `bucket_start` with every price set to `price`.
    ///
    /// The opening trade itself is not counted yet; apply it with
    /// [`Self::update`].
    #[must_use]
    pub const fn open_at(bucket_start: i64, price: f64) -> Self {
        Self::new(bucket_start, price, price, price, price, 0, 0)
    }

    /// Applies one trade to the bar.
    ///
    /// Counters saturate instead of overflowing on malformed volume feeds.
    pub fn update(&mut self, price: f64, volume_delta: i64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.tick_volume = self.tick_volume.saturating_add(1);
        self.volume = self.volume.saturating_add(volume_delta);
    }

    /// Returns the bucket start as a UTC datetime, if representable.
    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.bucket_start, 0)
    }
}

impl std::fmt::Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.start_time() {
            Some(start) => write!(f, "{}", start.format("%Y-%m-%d %H:%M:%S"))?,
            None => write!(f, "{}", self.bucket_start)?,
        }
        write!(
            f,
            " O:{} H:{} L:{} C:{} TV:{} V:{}",
            self.open, self.high, self.low, self.close, self.tick_volume, self.volume
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_open_then_update() {
        let mut bar = Bar::open_at(60, 10.0);
        assert_eq!(bar.tick_volume, 0);

        bar.update(10.0, 3);
        bar.update(10.5, 2);
        bar.update(9.5, 1);

        assert_relative_eq!(bar.open, 10.0);
        assert_relative_eq!(bar.high, 10.5);
        assert_relative_eq!(bar.low, 9.5);
        assert_relative_eq!(bar.close, 9.5);
        assert_eq!(bar.tick_volume, 3);
        assert_eq!(bar.volume, 6);
    }

    #[test]
    fn test_negative_delta_is_accepted() {
        let mut bar = Bar::open_at(0, 1.0);
        bar.update(1.0, -4);
        assert_eq!(bar.volume, -4);
    }

    #[test]
    fn test_volume_saturates() {
        let mut bar = Bar::open_at(0, 1.0);
        bar.update(1.0, i64::MAX);
        bar.update(1.0, i64::MAX);
        assert_eq!(bar.volume, i64::MAX);

        bar.update(1.0, i64::MIN);
        assert_eq!(bar.volume, -1);
        assert_eq!(bar.tick_volume, 3);
    }

    #[test]
    fn test_display() {
        let bar = Bar::new(34_200, 10.0, 11.0, 9.0, 10.5, 4, 120);
        assert_eq!(
            bar.to_string(),
            "1970-01-01 09:30:00 O:10 H:11 L:9 C:10.5 TV:4 V:120"
        );
    }
}
