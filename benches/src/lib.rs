//! Benchmark utilities for tickbar.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tickbar_lib::Tick;

/// Shape of a synthetic trading session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Number of ticks to generate.
    pub ticks: usize,
    /// Seconds between consecutive ticks.
    pub interval: i64,
    /// Every n-th tick is a quote refresh (volume unchanged); 0 disables.
    pub quote_every: usize,
    /// Seed for the price walk.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ticks: 100_000,
            interval: 1,
            quote_every: 3,
            seed: 0x5eed,
        }
    }
}

/// Trading day the synthetic ticks belong to.
pub const TRADING_DAY: &str = "20240115";

/// First tick of the synthetic session, 2024-01-15 09:00:00 UTC.
pub const SESSION_START: i64 = 1_705_309_200;

/// Generates a deterministic tick stream starting at [`SESSION_START`].
///
/// Prices follow a bounded random walk in 0.5 steps; cumulative volume grows
/// by 1-4 on every trade tick.
pub fn synthetic_ticks(config: SessionConfig) -> Vec<Tick> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut price = 3800.0;
    let mut volume = 0;

    (0..config.ticks)
        .map(|i| {
            let is_quote = config.quote_every > 0 && i % config.quote_every == config.quote_every - 1;
            if !is_quote {
                price = (price + f64::from(rng.random_range(-2_i32..=2)) * 0.5).max(1.0);
                volume += rng.random_range(1..=4);
            }

            Tick::new(SESSION_START + i as i64 * config.interval, price, volume)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_session() {
        let config = SessionConfig {
            ticks: 1_000,
            ..SessionConfig::default()
        };
        assert_eq!(synthetic_ticks(config), synthetic_ticks(config));
    }

    #[test]
    fn test_quote_refreshes_keep_volume() {
        let ticks = synthetic_ticks(SessionConfig {
            ticks: 300,
            ..SessionConfig::default()
        });

        for (i, pair) in ticks.windows(2).enumerate() {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, 1);
            if i % 3 == 1 {
                assert_eq!(pair[1].volume, pair[0].volume);
            } else {
                assert!(pair[1].volume > pair[0].volume);
            }
        }
    }
}
