//! Market session modes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Seconds in one calendar day.
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Morning session open (09:30) as seconds after midnight.
pub const MORNING_OPEN: i64 = 9 * SECONDS_PER_HOUR + 30 * 60;

/// Afternoon session open (13:00) as seconds after midnight.
pub const AFTERNOON_OPEN: i64 = 13 * SECONDS_PER_HOUR;

/// Hour of day separating the morning and afternoon sessions.
pub const NOON: i64 = 12;

/// How trading hours are laid out over the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Round-the-clock or single-session market; buckets use a plain modulus.
    #[default]
    Continuous,
    /// Stock-like market with a 09:30 morning open and a 13:00 afternoon
    /// open around a midday break.
    Segmented,
}

impl SessionMode {
    /// Returns the mode as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Segmented => "segmented",
        }
    }

    /// Returns true for session-segmented markets.
    #[must_use]
    pub const fn is_segmented(&self) -> bool {
        matches!(self, Self::Segmented)
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continuous" | "24h" => Ok(Self::Continuous),
            "segmented" | "stock" | "stock-like" => Ok(Self::Segmented),
            _ => Err(format!(
                "invalid session mode '{s}', expected: continuous, segmented"
            )),
        }
    }
}
