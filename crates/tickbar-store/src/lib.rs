//! Directory-backed CSV bar store for tickbar.
//!
//! - [`CsvStore`] - [`BarStore`](tickbar_aggregate::BarStore) writing one CSV file per table

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tickbar/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv_store;

pub use csv_store::CsvStore;
