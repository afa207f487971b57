//! Bar timeframe catalog.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Bar aggregation timeframe.
///
/// Variants are declared in ascending duration order, so the derived
/// [`Ord`] sorts timeframes from shortest to longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1-second bars.
    #[serde(rename = "s1")]
    Second1,
    /// 2-second bars.
    #[serde(rename = "s2")]
    Second2,
    /// 3-second bars.
    #[serde(rename = "s3")]
    Second3,
    /// 4-second bars.
    #[serde(rename = "s4")]
    Second4,
    /// 5-second bars.
    #[serde(rename = "s5")]
    Second5,
    /// 6-second bars.
    #[serde(rename = "s6")]
    Second6,
    /// 10-second bars.
    #[serde(rename = "s10")]
    Second10,
    /// 12-second bars.
    #[serde(rename = "s12")]
    Second12,
    /// 15-second bars.
    #[serde(rename = "s15")]
    Second15,
    /// 20-second bars.
    #[serde(rename = "s20")]
    Second20,
    /// 30-second bars.
    #[serde(rename = "s30")]
    Second30,
    /// 1-minute bars.
    #[serde(rename = "m1")]
    Minute1,
    /// 2-minute bars.
    #[serde(rename = "m2")]
    Minute2,
    /// 3-minute bars.
    #[serde(rename = "m3")]
    Minute3,
    /// 4-minute bars.
    #[serde(rename = "m4")]
    Minute4,
    /// 5-minute bars.
    #[serde(rename = "m5")]
    Minute5,
    /// 6-minute bars.
    #[serde(rename = "m6")]
    Minute6,
    /// 10-minute bars.
    #[serde(rename = "m10")]
    Minute10,
    /// 12-minute bars.
    #[serde(rename = "m12")]
    Minute12,
    /// 15-minute bars.
    #[serde(rename = "m15")]
    Minute15,
    /// 30-minute bars.
    #[serde(rename = "m30")]
    Minute30,
    /// 1-hour bars.
    #[serde(rename = "h1")]
    Hour1,
    /// 2-hour bars.
    #[serde(rename = "h2")]
    Hour2,
    /// 3-hour bars.
    #[serde(rename = "h3")]
    Hour3,
    /// 4-hour bars.
    #[serde(rename = "h4")]
    Hour4,
    /// 6-hour bars.
    #[serde(rename = "h6")]
    Hour6,
    /// 8-hour bars.
    #[serde(rename = "h8")]
    Hour8,
    /// 12-hour bars.
    #[serde(rename = "h12")]
    Hour12,
    /// One bar per trading day.
    #[serde(rename = "d1")]
    Day1,
}

impl Timeframe {
    /// Returns the nominal duration in seconds.
    ///
    /// The day-class reports 86400, but its buckets are anchored to the
    /// trading day rather than to a fixed modulus; see [`Self::is_day`].
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        match self {
            Self::Second1 => 1,
            Self::Second2 => 2,
            Self::Second3 => 3,
            Self::Second4 => 4,
            Self::Second5 => 5,
            Self::Second6 => 6,
            Self::Second10 => 10,
            Self::Second12 => 12,
            Self::Second15 => 15,
            Self::Second20 => 20,
            Self::Second30 => 30,
            Self::Minute1 => 60,
            Self::Minute2 => 2 * 60,
            Self::Minute3 => 3 * 60,
            Self::Minute4 => 4 * 60,
            Self::Minute5 => 5 * 60,
            Self::Minute6 => 6 * 60,
            Self::Minute10 => 10 * 60,
            Self::Minute12 => 12 * 60,
            Self::Minute15 => 15 * 60,
            Self::Minute30 => 30 * 60,
            Self::Hour1 => 3600,
            Self::Hour2 => 2 * 3600,
            Self::Hour3 => 3 * 3600,
            Self::Hour4 => 4 * 3600,
            Self::Hour6 => 6 * 3600,
            Self::Hour8 => 8 * 3600,
            Self::Hour12 => 12 * 3600,
            Self::Day1 => 24 * 3600,
        }
    }

    /// Returns true for the trading-day timeframe.
    #[must_use]
    pub const fn is_day(&self) -> bool {
        matches!(self, Self::Day1)
    }

    /// Returns the timeframe as a string identifier.
    ///
    /// This is also the suffix of the persisted table name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Second1 => "s1",
            Self::Second2 => "s2",
            Self::Second3 => "s3",
            Self::Second4 => "s4",
            Self::Second5 => "s5",
            Self::Second6 => "s6",
            Self::Second10 => "s10",
            Self::Second12 => "s12",
            Self::Second15 => "s15",
            Self::Second20 => "s20",
            Self::Second30 => "s30",
            Self::Minute1 => "m1",
            Self::Minute2 => "m2",
            Self::Minute3 => "m3",
            Self::Minute4 => "m4",
            Self::Minute5 => "m5",
            Self::Minute6 => "m6",
            Self::Minute10 => "m10",
            Self::Minute12 => "m12",
            Self::Minute15 => "m15",
            Self::Minute30 => "m30",
            Self::Hour1 => "h1",
            Self::Hour2 => "h2",
            Self::Hour3 => "h3",
            Self::Hour4 => "h4",
            Self::Hour6 => "h6",
            Self::Hour8 => "h8",
            Self::Hour12 => "h12",
            Self::Day1 => "d1",
        }
    }

    /// Returns all available timeframes, shortest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Second1,
            Self::Second2,
            Self::Second3,
            Self::Second4,
            Self::Second5,
            Self::Second6,
            Self::Second10,
            Self::Second12,
            Self::Second15,
            Self::Second20,
            Self::Second30,
            Self::Minute1,
            Self::Minute2,
            Self::Minute3,
            Self::Minute4,
            Self::Minute5,
            Self::Minute6,
            Self::Minute10,
            Self::Minute12,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Hour2,
            Self::Hour3,
            Self::Hour4,
            Self::Hour6,
            Self::Hour8,
            Self::Hour12,
            Self::Day1,
        ]
    }

    /// Looks up the intraday timeframe with exactly the given duration.
    #[must_use]
    pub fn from_seconds(seconds: i64) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|tf| !tf.is_day() && tf.seconds() == seconds)
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    /// Parses identifiers such as `m5`, `5m`, `min5`, `hour1` or `day`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if matches!(lower.as_str(), "d1" | "1d" | "d" | "day" | "day1" | "daily") {
            return Ok(Self::Day1);
        }

        let (unit, count) = split_unit(&lower).ok_or_else(|| TimeframeParseError(s.to_string()))?;
        let unit_seconds = match unit {
            "s" | "sec" | "second" => 1,
            "m" | "min" | "minute" => 60,
            "h" | "hour" => 3600,
            _ => return Err(TimeframeParseError(s.to_string())),
        };

        Self::from_seconds(count * unit_seconds).ok_or_else(|| TimeframeParseError(s.to_string()))
    }
}

/// Splits `m5` or `5m` into its unit and count.
fn split_unit(s: &str) -> Option<(&str, i64)> {
    let digits_at = s.find(|c: char| c.is_ascii_digit())?;
    let (unit, count) = if digits_at == 0 {
        let unit_at = s.find(|c: char| !c.is_ascii_digit())?;
        (&s[unit_at..], &s[..unit_at])
    } else {
        (&s[..digits_at], &s[digits_at..])
    };
    Some((unit, count.parse().ok()?))
}

/// Error returned when parsing an invalid timeframe string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeframeParseError(String);

impl std::fmt::Display for TimeframeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid timeframe '{}', expected e.g. s1, s30, m1, m15, h1, h2, d1",
            self.0
        )
    }
}

impl std::error::Error for TimeframeParseError {}
