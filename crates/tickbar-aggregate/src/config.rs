//! Collector configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tickbar_types::{SessionMode, Timeframe, TradingDay};

use crate::sink::{DEFAULT_DATABASE, is_valid_name};

/// Errors raised while loading or validating a [`CollectorConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config '{path}': {source}")]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for this schema.
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// No instrument was configured.
    #[error("No instrument configured")]
    EmptyInstrument,

    /// The instrument or database cannot be used as a table name.
    #[error("Invalid name '{0}': use ASCII letters, digits, '_' or '-'")]
    InvalidName(String),

    /// No timeframes were configured.
    #[error("No timeframes configured for {0}")]
    NoTimeframes(String),
}

/// Configuration of one instrument's bar collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Instrument identifier, also the prefix of persisted table names.
    pub instrument: String,
    /// Timeframes to build bars for.
    pub timeframes: Vec<Timeframe>,
    /// Market session layout.
    pub session: SessionMode,
    /// Whether closed bars are handed to a persistence store.
    pub persist: bool,
    /// Database holding the bar tables.
    pub database: String,
    /// Trading day to start in, if known up front.
    pub trading_day: Option<TradingDay>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            instrument: String::new(),
            timeframes: vec![Timeframe::Minute1],
            session: SessionMode::Continuous,
            persist: false,
            database: DEFAULT_DATABASE.to_string(),
            trading_day: None,
        }
    }
}

impl CollectorConfig {
    /// Creates a default configuration for `instrument`.
    #[must_use]
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            ..Self::default()
        }
    }

    /// Sets the timeframes.
    #[must_use]
    pub fn with_timeframes(mut self, timeframes: impl IntoIterator<Item = Timeframe>) -> Self {
        self.timeframes = timeframes.into_iter().collect();
        self
    }

    /// Sets the session mode.
    #[must_use]
    pub const fn with_session(mut self, session: SessionMode) -> Self {
        self.session = session;
        self
    }

    /// Enables or disables persistence.
    #[must_use]
    pub const fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Sets the database name.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Sets the starting trading day.
    #[must_use]
    pub const fn with_trading_day(mut self, day: TradingDay) -> Self {
        self.trading_day = Some(day);
        self
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the schema.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Checks that the configuration can drive a collector.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument is missing or unusable as a table
    /// name prefix, the database name is unusable, or no timeframes are set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instrument.is_empty() {
            return Err(ConfigError::EmptyInstrument);
        }
        for name in [&self.instrument, &self.database] {
            if !is_valid_name(name) {
                return Err(ConfigError::InvalidName(name.clone()));
            }
        }
        if self.timeframes.is_empty() {
            return Err(ConfigError::NoTimeframes(self.instrument.clone()));
        }
        Ok(())
    }
}
