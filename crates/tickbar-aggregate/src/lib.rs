//! Multi-timeframe OHLCV bar aggregation for tickbar.
//!
//! This crate turns a live tick stream for one instrument into OHLCV bars
//! at several timeframes at once:
//!
//! - [`BarAggregator`] - Per-instrument aggregation state machine
//! - [`bucket_start`] - Session-aware bucket boundaries
//! - [`BarStore`] / [`BarListener`] - Where closed bars go
//! - [`MemoryStore`] - In-memory [`BarStore`]
//! - [`CollectorConfig`] - Serializable collector configuration
//!
//! # Example
//!
//! ```
//! use std::sync::mpsc;
//! use tickbar_aggregate::{BarAggregator, ChannelListener};
//! use tickbar_types::{SessionMode, Tick, Timeframe};
//!
//! let mut aggregator = BarAggregator::new("rb2405", &[Timeframe::Minute1], SessionMode::Continuous);
//! let (tx, rx) = mpsc::channel();
//! aggregator.subscribe(ChannelListener::new(tx));
//!
//! aggregator.on_tick(Tick::new(0, 10.0, 1));
//! aggregator.on_tick(Tick::new(30, 10.5, 2));
//! aggregator.on_tick(Tick::new(61, 9.0, 3));
//!
//! let closed = rx.try_recv().unwrap();
//! assert_eq!(closed.bar.tick_volume, 2);
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod bucket;
mod config;
mod memory;
mod sink;

pub use aggregator::BarAggregator;
pub use bucket::bucket_start;
pub use config::{CollectorConfig, ConfigError};
pub use memory::MemoryStore;
pub use sink::{
    BAR_COLUMNS, BarListener, BarStore, ChannelListener, CollectedBar, DEFAULT_DATABASE,
    is_valid_name, split_qualified, table_name, upsert_bar,
};
