//! Collaborators receiving closed bars.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use tickbar_types::{Bar, StoreError, Timeframe};

/// Column layout of a persisted bar table.
pub const BAR_COLUMNS: &[&str] = &[
    "bucket_start",
    "open",
    "high",
    "low",
    "close",
    "tick_volume",
    "volume",
];

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "market";

/// Persistence backend for closed bars.
///
/// Tables are named `<instrument>_<timeframe>` and addressed as
/// `<database>.<table>` when saving.
pub trait BarStore {
    /// Creates the database if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    fn ensure_database(&mut self, name: &str) -> Result<(), StoreError>;

    /// Creates the table with the given columns if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be created or exists with a
    /// different column layout.
    fn ensure_table(
        &mut self,
        database: &str,
        table: &str,
        columns: &[&str],
    ) -> Result<(), StoreError>;

    /// Saves a bar to a `<database>.<table>` qualified table.
    ///
    /// If one of the last `replace_count` rows has the same bucket start,
    /// it is replaced instead of appending a new row.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is unknown or cannot be written.
    fn save_bar(&mut self, table: &str, bar: &Bar, replace_count: usize) -> Result<(), StoreError>;
}

/// Receiver of closed bars, invoked synchronously on every close.
pub trait BarListener {
    /// Called with each bar as it closes.
    fn on_bar(&mut self, instrument: &str, timeframe: Timeframe, bar: &Bar);
}

impl<F> BarListener for F
where
    F: FnMut(&str, Timeframe, &Bar),
{
    fn on_bar(&mut self, instrument: &str, timeframe: Timeframe, bar: &Bar) {
        self(instrument, timeframe, bar);
    }
}

/// A closed bar tagged with its instrument and timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedBar {
    /// Instrument the bar belongs to.
    pub instrument: String,
    /// Timeframe of the bar.
    pub timeframe: Timeframe,
    /// The bar itself.
    #[serde(flatten)]
    pub bar: Bar,
}

/// Listener forwarding closed bars into an [`mpsc`](std::sync::mpsc) channel.
///
/// Bars closed after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: Sender<CollectedBar>,
}

impl ChannelListener {
    /// Creates a listener sending into `tx`.
    #[must_use]
    pub const fn new(tx: Sender<CollectedBar>) -> Self {
        Self { tx }
    }
}

impl From<Sender<CollectedBar>> for ChannelListener {
    fn from(tx: Sender<CollectedBar>) -> Self {
        Self::new(tx)
    }
}

impl BarListener for ChannelListener {
    fn on_bar(&mut self, instrument: &str, timeframe: Timeframe, bar: &Bar) {
        let _ = self.tx.send(CollectedBar {
            instrument: instrument.to_string(),
            timeframe,
            bar: *bar,
        });
    }
}

/// Returns the table name for an instrument's timeframe.
#[must_use]
pub fn table_name(instrument: &str, timeframe: Timeframe) -> String {
    format!("{instrument}_{timeframe}")
}

/// Returns true if `name` can be used as a database or table name.
///
/// Names are non-empty and limited to ASCII alphanumerics, `_` and `-`.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Splits a `<database>.<table>` qualified name.
///
/// # Errors
///
/// Returns [`StoreError::InvalidName`] unless both parts are valid names.
pub fn split_qualified(qualified: &str) -> Result<(&str, &str), StoreError> {
    qualified
        .split_once('.')
        .filter(|(db, table)| is_valid_name(db) && is_valid_name(table))
        .ok_or_else(|| StoreError::InvalidName(qualified.to_string()))
}

/// Inserts `bar` into `rows`, replacing a row with the same bucket start
/// among the last `replace_count` rows.
///
/// Returns true if an existing row was replaced.
pub fn upsert_bar(rows: &mut Vec<Bar>, bar: Bar, replace_count: usize) -> bool {
    let tail = rows.len().saturating_sub(replace_count);
    match rows[tail..]
        .iter()
        .rposition(|row| row.bucket_start == bar.bucket_start)
    {
        Some(pos) => {
            rows[tail + pos] = bar;
            true
        }
        None => {
            rows.push(bar);
            false
        }
    }
}
