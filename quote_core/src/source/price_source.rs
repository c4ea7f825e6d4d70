use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::common::utils::{round2, Price};
use crate::config::quote_config::QuoteConfig;

/// Where quotes come from. A market-data client would implement this.
pub trait PriceSource {
    fn fetch_price(&mut self, symbol: &str) -> Price;
}

/// Random quotes in `[min_price, max_price]` after a blocking delay that stands in for network latency
#[derive(Debug)]
pub struct SimulatedPriceSource {
    rng: StdRng,
    min_price: f64,
    max_price: f64,
    latency: Duration,
}

impl SimulatedPriceSource {
    pub fn new(min_price: f64, max_price: f64, latency: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            min_price,
            max_price,
            latency,
        }
    }

    pub fn from_config(config: &QuoteConfig) -> Self {
        Self::new(
            config.min_price,
            config.max_price,
            Duration::from_millis(config.latency_ms),
            config.seed,
        )
    }
}

impl PriceSource for SimulatedPriceSource {
    fn fetch_price(&mut self, symbol: &str) -> Price {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let price = round2(self.rng.gen_range(self.min_price..=self.max_price));
        debug!(symbol = %symbol, price, "simulated quote fetched");
        price
    }
}
