//! Time bucket boundaries.

use tickbar_types::{
    AFTERNOON_OPEN, MORNING_OPEN, NOON, SECONDS_PER_DAY, SECONDS_PER_HOUR, SessionMode, Timeframe,
};

/// Returns the start of the bucket `timestamp` falls into.
///
/// - Day-class bars span the whole trading day and start at
///   `trading_day_base`.
/// - In [`SessionMode::Segmented`] markets, 1-hour bars before noon are
///   anchored on the half hour so the first bar starts at the 09:30 open,
///   and 2-hour bars split the day into a 09:30 morning bucket and a 13:00
///   afternoon bucket.
/// - Everything else floors to a multiple of the timeframe duration.
///
/// 1-hour bars after noon in a segmented market fall through to the plain
/// modulus and therefore start on the hour, not at the 13:00 open offset.
#[must_use]
pub fn bucket_start(
    timestamp: i64,
    timeframe: Timeframe,
    trading_day_base: i64,
    session: SessionMode,
) -> i64 {
    if timeframe.is_day() {
        return trading_day_base;
    }

    if session.is_segmented() {
        let hour = timestamp.div_euclid(SECONDS_PER_HOUR).rem_euclid(24);
        match timeframe {
            Timeframe::Hour1 if hour < NOON => {
                let half_hour = MORNING_OPEN % SECONDS_PER_HOUR;
                return floor_to(timestamp - half_hour, SECONDS_PER_HOUR) + half_hour;
            }
            Timeframe::Hour2 => {
                let midnight = floor_to(timestamp, SECONDS_PER_DAY);
                let open = if hour < NOON {
                    MORNING_OPEN
                } else {
                    AFTERNOON_OPEN
                };
                return midnight + open;
            }
            _ => {}
        }
    }

    floor_to(timestamp, timeframe.seconds())
}

/// Floors `timestamp` to a multiple of `unit`, rounding toward negative infinity.
const fn floor_to(timestamp: i64, unit: i64) -> i64 {
    timestamp.div_euclid(unit) * unit
}
