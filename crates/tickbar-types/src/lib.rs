//! Core types for the tickbar OHLCV bar collector.
//!
//! This crate provides the fundamental data structures used throughout tickbar:
//!
//! - [`Timeframe`] - Bar duration catalog (1 second up to 1 trading day)
//! - [`Tick`] - A trade tick carrying the cumulative traded volume
//! - [`Bar`] - An OHLCV bar for one bucket
//! - [`SessionMode`] - Continuous or session-segmented market hours
//! - [`TradingDay`] - Calendar date anchoring day-class bars

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod error;
mod session;
mod tick;
mod timeframe;
mod trading_day;

pub use bar::Bar;
pub use error::{StoreError, TradingDayError};
pub use session::{AFTERNOON_OPEN, MORNING_OPEN, NOON, SECONDS_PER_DAY, SECONDS_PER_HOUR, SessionMode};
pub use tick::Tick;
pub use timeframe::{Timeframe, TimeframeParseError};
pub use trading_day::TradingDay;
