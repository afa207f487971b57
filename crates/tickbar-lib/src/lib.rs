//! Multi-timeframe OHLCV bar aggregation from cumulative-volume tick streams.
//!
//! This is a facade crate that re-exports functionality from the tickbar
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```
//! use tickbar_lib::prelude::*;
//!
//! let store = MemoryStore::new();
//! let mut aggregator = BarAggregator::new(
//!     "rb2405",
//!     &[Timeframe::Minute1, Timeframe::Minute5],
//!     SessionMode::Continuous,
//! )
//! .with_store(store.clone());
//!
//! aggregator.set_trading_day("20240115")?;
//! let base = aggregator.trading_day_base();
//! for (offset, price, volume) in [(0, 3800.0, 10), (30, 3801.0, 12), (61, 3799.0, 15)] {
//!     aggregator.on_tick(Tick::new(base + offset, price, volume));
//! }
//! aggregator.flush(true);
//!
//! assert_eq!(store.bars("market.rb2405_m1").len(), 2);
//! # Ok::<(), TradingDayError>(())
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tickbar_types::*;

// Re-export aggregation
pub use tickbar_aggregate::{
    BAR_COLUMNS, BarAggregator, BarListener, BarStore, ChannelListener, CollectedBar,
    CollectorConfig, ConfigError, DEFAULT_DATABASE, MemoryStore, bucket_start, table_name,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use tickbar_format::{
    BarWriter, CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat, TickParseError,
    TickReader, TickRecord,
};

// Re-export storage
#[cfg(feature = "store")]
pub use tickbar_store::CsvStore;

/// Prelude module for convenient imports.
///
/// ```
/// use tickbar_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tickbar_types::{
        Bar, SessionMode, StoreError, Tick, Timeframe, TradingDay, TradingDayError,
    };

    pub use tickbar_aggregate::{
        BarAggregator, BarListener, BarStore, ChannelListener, CollectedBar, CollectorConfig,
        MemoryStore,
    };

    #[cfg(feature = "format")]
    pub use tickbar_format::{
        BarWriter, CsvFormatter, Formatter, JsonFormatter, OutputFormat, TickReader,
    };

    #[cfg(feature = "store")]
    pub use tickbar_store::CsvStore;
}
