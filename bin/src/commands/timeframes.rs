//! Timeframes command implementation.

use tickbar_lib::prelude::*;

/// Print the timeframe catalog, shortest first.
pub(crate) fn list_timeframes() {
    println!("{:<6} {:>8}", "ID", "SECONDS");
    println!("{}", "-".repeat(15));

    for timeframe in Timeframe::all() {
        println!("{:<6} {:>8}", timeframe.as_str(), timeframe.seconds());
    }

    println!("\nTotal: {} timeframes", Timeframe::all().len());
}
