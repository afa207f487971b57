//! Multi-timeframe bar aggregation for one instrument.

use tickbar_types::{Bar, SessionMode, Tick, Timeframe, TradingDay, TradingDayError};
use tracing::{debug, info, warn};

use crate::bucket::bucket_start;
use crate::config::{CollectorConfig, ConfigError};
use crate::sink::{BAR_COLUMNS, BarListener, BarStore, DEFAULT_DATABASE, table_name};

/// Streaming bar aggregator for a single instrument.
///
/// Every tick is fanned out to all configured timeframes. A bar closes when
/// a tick lands in a different bucket or on [`flush`](Self::flush); closed
/// bars are saved to the attached [`BarStore`] (if any) and handed to every
/// subscribed [`BarListener`].
///
/// Only ticks whose cumulative volume differs from the previous tick count
/// as trades. Quote refreshes can still close a bar when they cross a
/// bucket boundary, but never open or update one.
#[derive(Debug)]
pub struct BarAggregator {
    session: SessionMode,
    trading_day_base: i64,
    last_volume: i64,
    slots: Vec<BarSlot>,
    output: BarOutput,
}

/// The open bar of one timeframe; `None` until a trade lands in the bucket.
#[derive(Debug)]
struct BarSlot {
    timeframe: Timeframe,
    bar: Option<Bar>,
}

/// Where closed bars go.
struct BarOutput {
    instrument: String,
    database: String,
    store: Option<Box<dyn BarStore + Send>>,
    listeners: Vec<Box<dyn BarListener + Send>>,
}

impl BarAggregator {
    /// Creates an aggregator without persistence.
    ///
    /// Duplicate timeframes are collapsed; timeframes are processed longest
    /// first.
    #[must_use]
    pub fn new(instrument: impl Into<String>, timeframes: &[Timeframe], session: SessionMode) -> Self {
        let mut timeframes = timeframes.to_vec();
        timeframes.sort_unstable_by(|a, b| b.cmp(a));
        timeframes.dedup();

        Self {
            session,
            trading_day_base: 0,
            last_volume: 0,
            slots: timeframes
                .into_iter()
                .map(|timeframe| BarSlot {
                    timeframe,
                    bar: None,
                })
                .collect(),
            output: BarOutput {
                instrument: instrument.into(),
                database: DEFAULT_DATABASE.to_string(),
                store: None,
                listeners: Vec::new(),
            },
        }
    }

    /// Creates an aggregator from a validated configuration.
    ///
    /// Persistence is not attached here; callers honoring
    /// [`CollectorConfig::persist`] pass a store to
    /// [`attach_store`](Self::attach_store).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn from_config(config: &CollectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut aggregator = Self::new(config.instrument.clone(), &config.timeframes, config.session)
            .with_database(config.database.clone());
        if let Some(day) = config.trading_day {
            aggregator.set_trading_date(day);
        }
        Ok(aggregator)
    }

    /// Sets the database that tables are created in.
    ///
    /// Takes effect for stores attached afterwards.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.output.database = database.into();
        self
    }

    /// Attaches a persistence store, see [`attach_store`](Self::attach_store).
    #[must_use]
    pub fn with_store<S: BarStore + Send + 'static>(mut self, store: S) -> Self {
        self.attach_store(Box::new(store));
        self
    }

    /// Attaches a persistence store, creating the database and one table per
    /// timeframe.
    ///
    /// If any of that setup fails the store is dropped and the aggregator
    /// keeps running in memory only. Returns whether persistence is enabled.
    pub fn attach_store(&mut self, mut store: Box<dyn BarStore + Send>) -> bool {
        let database = &self.output.database;
        if let Err(e) = store.ensure_database(database) {
            warn!(instrument = %self.output.instrument, %database, error = %e, "bar persistence disabled");
            self.output.store = None;
            return false;
        }

        for slot in &self.slots {
            let table = table_name(&self.output.instrument, slot.timeframe);
            if let Err(e) = store.ensure_table(database, &table, BAR_COLUMNS) {
                warn!(instrument = %self.output.instrument, %table, error = %e, "bar persistence disabled");
                self.output.store = None;
                return false;
            }
        }

        self.output.store = Some(store);
        true
    }

    /// Registers a listener for closed bars.
    pub fn subscribe<L: BarListener + Send + 'static>(&mut self, listener: L) {
        self.output.listeners.push(Box::new(listener));
    }

    /// Returns the instrument identifier.
    #[must_use]
    pub fn instrument(&self) -> &str {
        &self.output.instrument
    }

    /// Returns the session mode.
    #[must_use]
    pub const fn session(&self) -> SessionMode {
        self.session
    }

    /// Returns the configured timeframes, longest first.
    pub fn timeframes(&self) -> impl Iterator<Item = Timeframe> + '_ {
        self.slots.iter().map(|slot| slot.timeframe)
    }

    /// Returns the start of the current trading day (0 until set).
    #[must_use]
    pub const fn trading_day_base(&self) -> i64 {
        self.trading_day_base
    }

    /// Returns the last observed cumulative volume.
    #[must_use]
    pub const fn last_volume(&self) -> i64 {
        self.last_volume
    }

    /// Returns true while closed bars are being persisted.
    #[must_use]
    pub fn is_persisting(&self) -> bool {
        self.output.store.is_some()
    }

    /// Returns the open bar of a timeframe, if any trade has landed in it.
    #[must_use]
    pub fn current_bar(&self, timeframe: Timeframe) -> Option<&Bar> {
        self.slots
            .iter()
            .find(|slot| slot.timeframe == timeframe)
            .and_then(|slot| slot.bar.as_ref())
    }

    /// Switches to the trading day given as `YYYYMMDD` or `YYYY-MM-DD`.
    ///
    /// See [`set_trading_date`](Self::set_trading_date).
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the state unchanged, if `day` is not a date.
    pub fn set_trading_day(&mut self, day: &str) -> Result<(), TradingDayError> {
        self.set_trading_date(day.parse()?);
        Ok(())
    }

    /// Switches to a trading day.
    ///
    /// A different day resets the cumulative volume reference to zero.
    /// Open bars are left as they are: flush before switching days.
    pub fn set_trading_date(&mut self, day: TradingDay) {
        let base = day.base_timestamp();
        if base != self.trading_day_base {
            debug!(instrument = %self.output.instrument, %day, "trading day changed");
            self.trading_day_base = base;
            self.last_volume = 0;
        }
    }

    /// Processes one market data update.
    ///
    /// Returns true if the tick is a trade, i.e. its cumulative volume
    /// differs from the previous tick's.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        let is_trade = tick.volume != self.last_volume;
        let volume_delta = tick.volume.saturating_sub(self.last_volume);

        for slot in &mut self.slots {
            let start = bucket_start(
                tick.timestamp,
                slot.timeframe,
                self.trading_day_base,
                self.session,
            );
            if slot.bar.as_ref().is_some_and(|bar| bar.bucket_start != start) {
                self.output.close(slot);
            }

            if !is_trade {
                continue;
            }

            slot.bar
                .get_or_insert(Bar::open_at(start, tick.price))
                .update(tick.price, volume_delta);
        }

        self.last_volume = tick.volume;
        is_trade
    }

    /// Closes open bars.
    ///
    /// The day-class bar is only closed when `end_of_day` is true, so
    /// intraday bars can be forced out without ending the daily bar.
    pub fn flush(&mut self, end_of_day: bool) {
        for slot in &mut self.slots {
            if !slot.timeframe.is_day() || end_of_day {
                self.output.close(slot);
            }
        }
    }
}

impl BarOutput {
    /// Saves, emits and empties the slot's bar, if it has one.
    fn close(&mut self, slot: &mut BarSlot) {
        let Some(bar) = slot.bar.take() else {
            return;
        };

        if let Some(store) = &mut self.store {
            let table = format!(
                "{}.{}",
                self.database,
                table_name(&self.instrument, slot.timeframe)
            );
            if let Err(e) = store.save_bar(&table, &bar, 1) {
                warn!(%table, error = %e, "failed to save bar");
            }
        }

        for listener in &mut self.listeners {
            listener.on_bar(&self.instrument, slot.timeframe, &bar);
        }

        info!(instrument = %self.instrument, timeframe = %slot.timeframe, "{bar}");
    }
}

impl std::fmt::Debug for BarOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarOutput")
            .field("instrument", &self.instrument)
            .field("database", &self.database)
            .field("persisting", &self.store.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
