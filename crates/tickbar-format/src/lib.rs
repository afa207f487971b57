//! Tick input and bar output formats for tickbar.
//!
//! - [`CsvFormatter`] - CSV output and stored bar rows
//! - [`JsonFormatter`] - JSON array or NDJSON output
//! - [`BarWriter`] - Incremental bar output in any [`OutputFormat`]
//! - [`TickReader`] - Line-oriented tick input

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod reader;
mod writer;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::JsonFormatter;
pub use reader::{TickParseError, TickReader, TickRecord, parse_bar_row, parse_tick_line};
pub use writer::BarWriter;
